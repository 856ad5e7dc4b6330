// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

// Input sanitation helpers, included into filters/mod.rs.

/// Keeps only non-blank string entries; numbers, nulls and nested values
/// submitted by sloppy clients are dropped silently.
fn clean_values(raw: &[serde_json::Value]) -> Vec<String> {
    raw.iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

fn clean_opt_string(raw: Option<String>) -> Option<String> {
    raw.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty())
}

/// An icon that looks like a URL or an upload path was uploaded by the
/// admin; anything else is the name of a built-in library icon.
fn infer_icon_type(icon: Option<&str>) -> IconType {
    match icon {
        Some(i) if i.starts_with("http") || i.starts_with('/') => IconType::Upload,
        _ => IconType::Library,
    }
}

/// Normalizes a submitted extra-group list: keys are slugged, falling back
/// to a transliteration of the label. Entries where neither yields a key
/// are dropped; labels default to the key.
fn normalize_extra_groups(raw: Vec<ExtraGroupInput>) -> Vec<ExtraGroup> {
    let mut groups = Vec::new();
    for entry in raw {
        let mut key = entry
            .key
            .as_deref()
            .map(normalize_group_key)
            .unwrap_or_default();
        if key.is_empty() {
            if let Some(label) = entry.label.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
                key = group_key_from_label(label);
            }
        }
        if key.is_empty() {
            continue;
        }
        let label = entry
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| key.clone());
        let icon = clean_opt_string(entry.icon);
        let icon_type = entry
            .icon_type
            .unwrap_or_else(|| infer_icon_type(icon.as_deref()));
        groups.push(ExtraGroup {
            key,
            label,
            icon,
            icon_type,
            values: entry.values.map(|v| clean_values(&v)).unwrap_or_default(),
        });
    }
    groups
}

/// Keeps meta only for keys that exist in the family and drops entries that
/// carry no fields after trimming.
fn normalize_fixed_meta(
    family: FilterFamily,
    raw: BTreeMap<String, GroupMetaInput>,
) -> BTreeMap<String, GroupMeta> {
    let mut out = BTreeMap::new();
    for (key, entry) in raw {
        let key = key.trim().to_owned();
        if !family.is_fixed_key(&key) {
            continue;
        }
        let meta = GroupMeta {
            label: clean_opt_string(entry.label),
            icon: clean_opt_string(entry.icon),
            icon_type: entry.icon_type,
        };
        if !meta.is_empty() {
            out.insert(key, meta);
        }
    }
    out
}
