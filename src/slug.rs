// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Cyrillic-to-Latin transliteration for slugs and filter-group keys.
//!
//! Two historically distinct flavors coexist and must stay distinct:
//! entity slugs use hyphens (`ё`→`yo`, `й`→`y`), filter-group keys use
//! underscores (`ё`→`e`, `й`→`j`) with a `group` fallback.

/// Hyphen-separated slug for entity URLs, e.g. `"Софийские водопады"` →
/// `"sofiyskie-vodopady"`. Callers append a uniquifying suffix themselves.
pub fn slugify(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for c in title.to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            _ => match slug_cyr(c) {
                Some(lat) => out.push_str(lat),
                None => {
                    if !out.ends_with('-') {
                        out.push('-');
                    }
                }
            },
        }
    }
    out.trim_matches('-').to_owned()
}

/// Underscore-separated key derived from a group label, e.g. `"Тип отдыха"`
/// → `"tip_otdyha"`. Empty output falls back to `"group"`.
pub fn group_key_from_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.trim().to_lowercase().chars() {
        match c {
            'a'..='z' | '0'..='9' => out.push(c),
            '_' => out.push('_'),
            _ => match key_cyr(c) {
                Some(lat) => out.push_str(lat),
                None if c.is_whitespace() => out.push('_'),
                None => {}
            },
        }
    }
    let collapsed = collapse_underscores(&out);
    let trimmed = collapsed.trim_matches('_');
    if trimmed.is_empty() {
        "group".to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Normalizes a user-supplied group key: trim and collapse internal
/// whitespace runs to a single underscore. Returns an empty string for
/// blank input so the caller can fall back to the label-derived key.
pub fn normalize_group_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut in_ws = false;
    for c in key.trim().chars() {
        if c.is_whitespace() {
            in_ws = true;
        } else {
            if in_ws {
                out.push('_');
                in_ws = false;
            }
            out.push(c);
        }
    }
    out
}

fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '_' && out.ends_with('_') {
            continue;
        }
        out.push(c);
    }
    out
}

fn slug_cyr(c: char) -> Option<&'static str> {
    Some(match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "y",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    })
}

fn key_cyr(c: char) -> Option<&'static str> {
    Some(match c {
        'ё' => "e",
        'й' => "j",
        other => return slug_cyr(other),
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("Домбай", "dombay")]
    #[case("Софийские водопады", "sofiyskie-vodopady")]
    #[case("Архыз (новый)", "arhyz-novyy")]
    #[case("Trail #7", "trail-7")]
    fn slugify_cases(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(slugify(title), expected);
    }

    #[rstest]
    #[case("Тип отдыха", "tip_otdyha")]
    #[case("Сезонность  похода", "sezonnost_pohoda")]
    #[case("Ёжик", "ezhik")]
    #[case("  ", "group")]
    #[case("***", "group")]
    fn group_key_cases(#[case] label: &str, #[case] expected: &str) {
        assert_eq!(group_key_from_label(label), expected);
    }

    #[test]
    fn normalize_collapses_inner_whitespace() {
        assert_eq!(normalize_group_key("  my   key "), "my_key");
        assert_eq!(normalize_group_key("plain"), "plain");
        assert_eq!(normalize_group_key("   "), "");
    }
}
