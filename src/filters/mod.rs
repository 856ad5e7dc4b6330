// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Filter configuration per entity family, with rename/remove cascades.
//!
//! Each family (places, routes) owns one [`FilterConfig`] document holding
//! fixed-group value lists (schema-backed fields on the records) and
//! admin-defined extra groups (generic `customFilters` membership). Editing a
//! value cascades into every record of the family; the cascade is sequential,
//! non-transactional, and convergent when re-run (already-migrated records
//! are skipped as no-ops).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;
use crate::model::{Place, Route};
use crate::slug::{group_key_from_label, normalize_group_key};
use crate::store::{Document, FolderStore};

pub mod cascade;

/// Entity family owning one filter configuration. Families are explicit
/// (rather than a hard-coded singleton row) so independent stores can hold
/// independent configs in parallel tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterFamily {
    Places,
    Routes,
}

impl FilterFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Places => "places",
            Self::Routes => "routes",
        }
    }

    /// Closed key set; fixed groups are never added or removed, only hidden.
    pub fn fixed_keys(self) -> &'static [&'static str] {
        match self {
            Self::Places => &["directions", "seasons", "objectTypes", "accessibility"],
            Self::Routes => &[
                "seasons",
                "transport",
                "durationOptions",
                "difficultyLevels",
                "distanceOptions",
                "elevationOptions",
                "isFamilyOptions",
                "hasOvernightOptions",
            ],
        }
    }

    pub fn is_fixed_key(self, key: &str) -> bool {
        self.fixed_keys().contains(&key)
    }

    fn default_values(self, key: &str) -> &'static [&'static str] {
        match (self, key) {
            (Self::Places, "directions") => &["Архыз", "Домбай", "Джылы-Суу", "Медовые водопады"],
            (Self::Places, "seasons") => &["зима", "весна", "лето", "осень"],
            (Self::Places, "objectTypes") => &[
                "заповедник",
                "горы",
                "озера/реки",
                "ледники",
                "водопады",
                "ущелья",
                "пещеры",
            ],
            (Self::Places, "accessibility") => &["только пешком", "на машине"],
            (Self::Routes, "seasons") => &["Зима", "Весна", "Лето", "Осень"],
            (Self::Routes, "transport") => &["Пешком", "Верхом", "Автомобиль", "Квадроцикл"],
            (Self::Routes, "durationOptions") => &["Полдня", "1 день", "2 дня", "3ч 30м", "5 дней"],
            (Self::Routes, "difficultyLevels") => &["1", "2", "3", "4", "5"],
            (Self::Routes, "distanceOptions") => &["до 10 км", "10–50 км", "50–100 км", "100+ км"],
            (Self::Routes, "elevationOptions") => &["до 500 м", "500–1000 м", "1000+ м"],
            (Self::Routes, "isFamilyOptions") | (Self::Routes, "hasOvernightOptions") => &["Да"],
            _ => &[],
        }
    }

    pub fn default_config(self) -> FilterConfig {
        let mut fixed_groups = BTreeMap::new();
        for key in self.fixed_keys() {
            fixed_groups.insert(
                (*key).to_owned(),
                self.default_values(key)
                    .iter()
                    .map(|v| (*v).to_owned())
                    .collect(),
            );
        }
        FilterConfig {
            family: self,
            fixed_groups,
            hidden_fixed_groups: Vec::new(),
            fixed_group_meta: BTreeMap::new(),
            extra_groups: Vec::new(),
            updated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconType {
    Upload,
    Library,
}

/// Display override for a fixed group; `None` fields fall through to the
/// schema-defined presentation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMeta {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub icon_type: Option<IconType>,
}

impl GroupMeta {
    fn is_empty(&self) -> bool {
        self.label.is_none() && self.icon.is_none() && self.icon_type.is_none()
    }
}

/// Admin-defined filter group. `key` is slug-form, unique within the family,
/// and must never collide with a fixed-group key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraGroup {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    pub icon_type: IconType,
    #[serde(default)]
    pub values: Vec<String>,
}

/// One filter configuration document per family; the document id is the
/// family name.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterConfig {
    pub family: FilterFamily,
    #[serde(default)]
    pub fixed_groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub hidden_fixed_groups: Vec<String>,
    #[serde(default)]
    pub fixed_group_meta: BTreeMap<String, GroupMeta>,
    #[serde(default)]
    pub extra_groups: Vec<ExtraGroup>,
    pub updated_at: DateTime<Utc>,
}

impl FilterConfig {
    /// Older documents may predate a fixed key; top it up with family
    /// defaults so readers always see the full closed key set.
    fn fill_missing_fixed(&mut self) {
        for key in self.family.fixed_keys() {
            if !self.fixed_groups.contains_key(*key) {
                self.fixed_groups.insert(
                    (*key).to_owned(),
                    self.family
                        .default_values(key)
                        .iter()
                        .map(|v| (*v).to_owned())
                        .collect(),
                );
            }
        }
    }

    pub fn extra_group(&self, key: &str) -> Option<&ExtraGroup> {
        self.extra_groups.iter().find(|g| g.key == key)
    }

    fn extra_group_mut(&mut self, key: &str) -> Option<&mut ExtraGroup> {
        self.extra_groups.iter_mut().find(|g| g.key == key)
    }
}

impl Document for FilterConfig {
    const COLLECTION: &'static str = "filter_configs";

    fn doc_id(&self) -> &str {
        self.family.as_str()
    }
}

/// Full-replace payload: every fixed key is set from the submitted lists
/// (absent keys clear to empty), extra groups/meta/hidden replace only when
/// present.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplaceConfigInput {
    pub fixed_groups: BTreeMap<String, Vec<serde_json::Value>>,
    pub extra_groups: Option<Vec<ExtraGroupInput>>,
    pub fixed_group_meta: Option<BTreeMap<String, GroupMetaInput>>,
    pub hidden_fixed_groups: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtraGroupInput {
    pub key: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub icon_type: Option<IconType>,
    pub values: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GroupMetaInput {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub icon_type: Option<IconType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddGroupInput {
    pub label: Option<String>,
    pub key: Option<String>,
    pub icon: Option<String>,
    pub icon_type: Option<IconType>,
    pub values: Option<Vec<serde_json::Value>>,
}

/// Patch for one group's display meta. A field that is absent stays
/// untouched; an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGroupMetaInput {
    #[serde(default)]
    pub key: String,
    #[serde(default, deserialize_with = "double_option")]
    pub label: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon_type: Option<Option<IconType>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceValueInput {
    pub group: String,
    pub old_value: String,
    pub new_value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveValueInput {
    pub group: String,
    pub value: String,
}

/// Operations over one family's filter configuration. Mutations write the
/// config first; entity cascades run only after that write succeeded and are
/// best-effort (per-record failures are logged, never propagated).
pub struct FilterService<'a> {
    store: &'a FolderStore,
    family: FilterFamily,
}

impl<'a> FilterService<'a> {
    pub fn new(store: &'a FolderStore, family: FilterFamily) -> Self {
        Self { store, family }
    }

    /// Lazily creates the config with family defaults on first read.
    pub fn get_config(&self) -> Result<FilterConfig, ApiError> {
        match self.store.get::<FilterConfig>(self.family.as_str())? {
            Some(mut config) => {
                config.fill_missing_fixed();
                Ok(config)
            }
            None => {
                let config = self.family.default_config();
                self.store.put(&config)?;
                Ok(config)
            }
        }
    }

    pub fn replace_config(&self, input: ReplaceConfigInput) -> Result<FilterConfig, ApiError> {
        let mut config = self.get_config()?;

        let mut fixed_groups = BTreeMap::new();
        for key in self.family.fixed_keys() {
            let values = input
                .fixed_groups
                .get(*key)
                .map(|raw| clean_values(raw))
                .unwrap_or_default();
            fixed_groups.insert((*key).to_owned(), values);
        }
        config.fixed_groups = fixed_groups;

        if let Some(raw_groups) = input.extra_groups {
            let extra = normalize_extra_groups(raw_groups);
            for group in &extra {
                if self.family.is_fixed_key(&group.key) {
                    return Err(ApiError::Validation(format!(
                        "Ключ «{}» уже используется встроенной группой",
                        group.key
                    )));
                }
            }
            config.extra_groups = extra;
        }

        if let Some(raw_meta) = input.fixed_group_meta {
            config.fixed_group_meta = normalize_fixed_meta(self.family, raw_meta);
        }

        if let Some(hidden) = input.hidden_fixed_groups {
            config.hidden_fixed_groups = hidden
                .into_iter()
                .map(|k| k.trim().to_owned())
                .filter(|k| self.family.is_fixed_key(k))
                .collect();
        }

        config.updated_at = Utc::now();
        self.store.put(&config)?;
        Ok(config)
    }

    pub fn add_extra_group(&self, input: AddGroupInput) -> Result<FilterConfig, ApiError> {
        let label = input
            .label
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| ApiError::Validation("Укажите название группы".to_owned()))?;

        let mut key = input
            .key
            .as_deref()
            .map(normalize_group_key)
            .unwrap_or_default();
        if key.is_empty() {
            key = group_key_from_label(label);
        }

        if self.family.is_fixed_key(&key) {
            return Err(ApiError::Conflict(
                "Такой ключ уже используется встроенной группой".to_owned(),
            ));
        }

        let mut config = self.get_config()?;
        if config.extra_group(&key).is_some() {
            return Err(ApiError::Conflict("Группа с таким ключом уже есть".to_owned()));
        }

        let icon = clean_opt_string(input.icon);
        let icon_type = input
            .icon_type
            .unwrap_or_else(|| infer_icon_type(icon.as_deref()));
        config.extra_groups.push(ExtraGroup {
            key,
            label: label.to_owned(),
            icon,
            icon_type,
            values: input.values.map(|raw| clean_values(&raw)).unwrap_or_default(),
        });

        config.updated_at = Utc::now();
        self.store.put(&config)?;
        Ok(config)
    }

    /// Fixed groups are suppressed (hidden + cleared on the config) without
    /// touching entity records; extra groups are removed and their key is
    /// cascaded out of every record's `customFilters`. The asymmetry is
    /// intentional: fixed-group fields are schema columns shared across the
    /// whole family.
    pub fn remove_group(&self, key: &str) -> Result<FilterConfig, ApiError> {
        let key = key.trim();
        if key.is_empty() {
            return Err(ApiError::Validation("Укажите ключ группы".to_owned()));
        }

        let mut config = self.get_config()?;

        if self.family.is_fixed_key(key) {
            if !config.hidden_fixed_groups.iter().any(|k| k == key) {
                config.hidden_fixed_groups.push(key.to_owned());
            }
            config.fixed_groups.insert(key.to_owned(), Vec::new());
            config.updated_at = Utc::now();
            self.store.put(&config)?;
            return Ok(config);
        }

        config.extra_groups.retain(|g| g.key != key);
        config.updated_at = Utc::now();
        self.store.put(&config)?;

        let updated = self.drop_custom_group(key);
        tracing::info!(
            family = self.family.as_str(),
            group = key,
            updated,
            "extra group removed"
        );
        Ok(config)
    }

    pub fn update_group_meta(&self, input: UpdateGroupMetaInput) -> Result<FilterConfig, ApiError> {
        let key = input.key.trim().to_owned();
        if key.is_empty() {
            return Err(ApiError::Validation("Укажите ключ группы".to_owned()));
        }

        let mut config = self.get_config()?;

        if self.family.is_fixed_key(&key) {
            let meta = config.fixed_group_meta.entry(key.clone()).or_default();
            if let Some(label) = input.label {
                meta.label = label.map(|l| l.trim().to_owned()).filter(|l| !l.is_empty());
            }
            if let Some(icon) = input.icon {
                meta.icon = clean_opt_string(icon);
            }
            if let Some(icon_type) = input.icon_type {
                meta.icon_type = icon_type;
            }
            if config
                .fixed_group_meta
                .get(&key)
                .is_some_and(GroupMeta::is_empty)
            {
                config.fixed_group_meta.remove(&key);
            }
        } else {
            let Some(group) = config.extra_group_mut(&key) else {
                return Err(ApiError::NotFound("Группа не найдена".to_owned()));
            };
            if let Some(label) = input.label {
                // Extra groups always carry a display label; clearing resets it
                // to the key.
                let cleaned = label.map(|l| l.trim().to_owned()).filter(|l| !l.is_empty());
                group.label = cleaned.unwrap_or_else(|| group.key.clone());
            }
            if let Some(icon) = input.icon {
                group.icon = clean_opt_string(icon);
            }
            if let Some(icon_type) = input.icon_type {
                group.icon_type = icon_type.unwrap_or_else(|| infer_icon_type(group.icon.as_deref()));
            }
        }

        config.updated_at = Utc::now();
        self.store.put(&config)?;
        Ok(config)
    }

    /// Renames one value in place (position preserved) and cascades into
    /// every record of the family that carries it.
    pub fn replace_value(&self, input: ReplaceValueInput) -> Result<FilterConfig, ApiError> {
        let group = input.group.trim();
        let old_value = input.old_value.as_str();
        if group.is_empty() || old_value.is_empty() || input.new_value.is_empty() {
            return Err(ApiError::Validation(
                "Нужны group, oldValue и newValue".to_owned(),
            ));
        }
        let new_value = input.new_value.trim();
        if new_value.is_empty() {
            return Err(ApiError::Validation(
                "Новое значение не может быть пустым".to_owned(),
            ));
        }

        let mut config = self.get_config()?;
        let fixed = self.family.is_fixed_key(group);

        if fixed {
            let values = config.fixed_groups.entry(group.to_owned()).or_default();
            let Some(idx) = values.iter().position(|v| v == old_value) else {
                return Err(ApiError::NotFound("Значение не найдено в группе".to_owned()));
            };
            values[idx] = new_value.to_owned();
        } else {
            let Some(extra) = config.extra_group_mut(group) else {
                return Err(ApiError::NotFound("Группа не найдена".to_owned()));
            };
            let Some(idx) = extra.values.iter().position(|v| v == old_value) else {
                return Err(ApiError::NotFound("Значение не найдено в группе".to_owned()));
            };
            extra.values[idx] = new_value.to_owned();
        }

        config.updated_at = Utc::now();
        self.store.put(&config)?;

        let updated = self.cascade_replace(group, fixed, old_value, new_value);
        tracing::info!(
            family = self.family.as_str(),
            group,
            old = old_value,
            new = new_value,
            updated,
            "filter value renamed"
        );
        Ok(config)
    }

    /// Deletes one value from a group and cascades the removal. Unlike
    /// rename, a value already absent from the config list is not an error;
    /// re-running the same removal converges to a no-op.
    pub fn remove_value(&self, input: RemoveValueInput) -> Result<FilterConfig, ApiError> {
        let group = input.group.trim();
        let value = input.value.as_str();
        if group.is_empty() || value.is_empty() {
            return Err(ApiError::Validation("Нужны group и value".to_owned()));
        }

        let mut config = self.get_config()?;
        let fixed = self.family.is_fixed_key(group);

        if fixed {
            config
                .fixed_groups
                .entry(group.to_owned())
                .or_default()
                .retain(|v| v != value);
        } else {
            let Some(extra) = config.extra_group_mut(group) else {
                return Err(ApiError::NotFound("Группа не найдена".to_owned()));
            };
            extra.values.retain(|v| v != value);
        }

        config.updated_at = Utc::now();
        self.store.put(&config)?;

        let updated = self.cascade_remove(group, fixed, value);
        tracing::info!(
            family = self.family.as_str(),
            group,
            value,
            updated,
            "filter value removed"
        );
        Ok(config)
    }

    fn cascade_replace(&self, group: &str, fixed: bool, old: &str, new: &str) -> usize {
        match (self.family, fixed) {
            (FilterFamily::Places, true) => {
                cascade::replace_fixed_everywhere::<Place>(self.store, group, old, new)
            }
            (FilterFamily::Places, false) => {
                cascade::replace_custom_everywhere::<Place>(self.store, group, old, new)
            }
            (FilterFamily::Routes, true) => {
                cascade::replace_fixed_everywhere::<Route>(self.store, group, old, new)
            }
            (FilterFamily::Routes, false) => {
                cascade::replace_custom_everywhere::<Route>(self.store, group, old, new)
            }
        }
    }

    fn cascade_remove(&self, group: &str, fixed: bool, value: &str) -> usize {
        match (self.family, fixed) {
            (FilterFamily::Places, true) => {
                cascade::remove_fixed_everywhere::<Place>(self.store, group, value)
            }
            (FilterFamily::Places, false) => {
                cascade::remove_custom_everywhere::<Place>(self.store, group, value)
            }
            (FilterFamily::Routes, true) => {
                cascade::remove_fixed_everywhere::<Route>(self.store, group, value)
            }
            (FilterFamily::Routes, false) => {
                cascade::remove_custom_everywhere::<Route>(self.store, group, value)
            }
        }
    }

    fn drop_custom_group(&self, key: &str) -> usize {
        match self.family {
            FilterFamily::Places => cascade::drop_custom_group_everywhere::<Place>(self.store, key),
            FilterFamily::Routes => cascade::drop_custom_group_everywhere::<Route>(self.store, key),
        }
    }
}

/// Distinguishes an absent field (`None`) from an explicit JSON `null`
/// (`Some(None)`) in patch payloads.
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

include!("service_impl.rs");

#[cfg(test)]
mod tests;
