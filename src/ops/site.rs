// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Site and page content singletons.
//!
//! Stored bodies are free-form JSON objects; readers always get the stored
//! object deep-merged over compiled-in defaults, so a partial save never
//! strips keys the frontend expects.

use serde_json::{json, Map, Value};

use crate::error::ApiError;
use crate::model::{PageContent, SiteContent};
use crate::store::FolderStore;

const SITE_SECTIONS: &[&str] = &["region", "home", "footer"];
const PAGES: &[&str] = &["routes", "places", "news", "services"];

pub fn get_site_section(store: &FolderStore, section: &str) -> Result<Value, ApiError> {
    if !SITE_SECTIONS.contains(&section) {
        return Err(ApiError::NotFound("Раздел не найден".to_owned()));
    }
    let stored = store
        .get::<SiteContent>(section)?
        .map(|doc| doc.content)
        .unwrap_or(Value::Null);
    let mut merged = section_defaults(section);
    deep_merge(&mut merged, stored);
    Ok(merged)
}

pub fn update_site_section(
    store: &FolderStore,
    section: &str,
    content: Value,
) -> Result<Value, ApiError> {
    if !SITE_SECTIONS.contains(&section) {
        return Err(ApiError::NotFound("Раздел не найден".to_owned()));
    }
    if !content.is_object() {
        return Err(ApiError::Validation("Ожидается JSON-объект".to_owned()));
    }
    store.put(&SiteContent {
        id: section.to_owned(),
        content,
        updated_at: chrono::Utc::now(),
    })?;
    get_site_section(store, section)
}

pub fn get_page(store: &FolderStore, page: &str) -> Result<Value, ApiError> {
    if !PAGES.contains(&page) {
        return Err(ApiError::NotFound("Страница не найдена".to_owned()));
    }
    Ok(store
        .get::<PageContent>(page)?
        .map(|doc| doc.content)
        .unwrap_or_else(|| json!({})))
}

pub fn update_page(store: &FolderStore, page: &str, content: Value) -> Result<Value, ApiError> {
    if !PAGES.contains(&page) {
        return Err(ApiError::NotFound("Страница не найдена".to_owned()));
    }
    if !content.is_object() {
        return Err(ApiError::Validation("Ожидается JSON-объект".to_owned()));
    }
    store.put(&PageContent {
        id: page.to_owned(),
        content: content.clone(),
        updated_at: chrono::Utc::now(),
    })?;
    Ok(content)
}

/// Recursively overlays `over` onto `base`. Objects merge key by key;
/// arrays and scalars replace wholesale; null leaves the default in place.
fn deep_merge(base: &mut Value, over: Value) {
    match (base, over) {
        (Value::Object(base_map), Value::Object(over_map)) => {
            for (key, over_value) in over_map {
                match base_map.get_mut(&key) {
                    Some(base_value) => deep_merge(base_value, over_value),
                    None => {
                        base_map.insert(key, over_value);
                    }
                }
            }
        }
        (_, Value::Null) => {}
        (base_slot, over_value) => *base_slot = over_value,
    }
}

fn section_defaults(section: &str) -> Value {
    match section {
        "region" => json!({
            "name": "Карачаево-Черкесия",
            "tagline": "Горы, реки и древние аулы",
            "description": "",
            "heroImage": "",
            "facts": [],
        }),
        "home" => json!({
            "heroTitle": "Откройте Карачаево-Черкесию",
            "heroSubtitle": "",
            "heroImage": "",
            "blocks": [],
        }),
        "footer" => json!({
            "about": "",
            "phone": "",
            "email": "",
            "socials": {},
        }),
        _ => Value::Object(Map::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_defaults_for_missing_keys() {
        let mut base = json!({"a": 1, "nested": {"x": "keep", "y": "old"}});
        deep_merge(&mut base, json!({"nested": {"y": "new"}, "b": 2}));
        assert_eq!(
            base,
            json!({"a": 1, "b": 2, "nested": {"x": "keep", "y": "new"}})
        );
    }

    #[test]
    fn merge_replaces_arrays_wholesale() {
        let mut base = json!({"facts": [1, 2, 3]});
        deep_merge(&mut base, json!({"facts": [9]}));
        assert_eq!(base, json!({"facts": [9]}));
    }

    #[test]
    fn null_does_not_erase_defaults() {
        let mut base = json!({"name": "x"});
        deep_merge(&mut base, json!({"name": null}));
        assert_eq!(base, json!({"name": "x"}));
    }
}
