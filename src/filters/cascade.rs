// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Best-effort value cascades over one family's records.
//!
//! Drivers load the full collection, rewrite each record in memory and only
//! write back the ones that actually changed. A record that fails to write
//! is logged and skipped; the cascade keeps going so a single bad file never
//! blocks the rest of the family.

use tracing::warn;

use crate::model::{CustomFilters, Place, Route};
use crate::store::{Document, FolderStore};

/// A record type that participates in filter cascades.
pub trait FilterEntity: Document {
    /// Rewrites `old` to `new` inside the fixed group's backing field.
    /// Returns false when the group does not map to a field on this type or
    /// the record does not carry `old`.
    fn replace_fixed(&mut self, group: &str, old: &str, new: &str) -> bool;

    /// Drops `value` from the fixed group's backing field.
    fn remove_fixed(&mut self, group: &str, value: &str) -> bool;

    fn custom_filters_mut(&mut self) -> &mut CustomFilters;

    fn touch(&mut self);
}

impl FilterEntity for Place {
    fn replace_fixed(&mut self, group: &str, old: &str, new: &str) -> bool {
        match self.fixed_field_mut(group) {
            Some(values) => replace_in_vec(values, old, new),
            None => false,
        }
    }

    fn remove_fixed(&mut self, group: &str, value: &str) -> bool {
        match self.fixed_field_mut(group) {
            Some(values) => remove_from_vec(values, value),
            None => false,
        }
    }

    fn custom_filters_mut(&mut self) -> &mut CustomFilters {
        &mut self.custom_filters
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

impl Place {
    fn fixed_field_mut(&mut self, group: &str) -> Option<&mut Vec<String>> {
        match group {
            "directions" => Some(&mut self.directions),
            "seasons" => Some(&mut self.seasons),
            "objectTypes" => Some(&mut self.object_types),
            "accessibility" => Some(&mut self.accessibility),
            _ => None,
        }
    }
}

// Routes store `seasons` and `transport` as single-valued fields; the other
// fixed groups (duration, difficulty and friends) are derived presentation
// buckets with no backing column, so cascades skip them.
impl FilterEntity for Route {
    fn replace_fixed(&mut self, group: &str, old: &str, new: &str) -> bool {
        match self.scalar_field_mut(group) {
            Some(slot) => replace_scalar(slot, old, new),
            None => false,
        }
    }

    fn remove_fixed(&mut self, group: &str, value: &str) -> bool {
        match self.scalar_field_mut(group) {
            Some(slot) => remove_scalar(slot, value),
            None => false,
        }
    }

    fn custom_filters_mut(&mut self) -> &mut CustomFilters {
        &mut self.custom_filters
    }

    fn touch(&mut self) {
        self.updated_at = chrono::Utc::now();
    }
}

impl Route {
    fn scalar_field_mut(&mut self, group: &str) -> Option<&mut Option<String>> {
        match group {
            "seasons" => Some(&mut self.season),
            "transport" => Some(&mut self.transport),
            _ => None,
        }
    }
}

pub fn replace_fixed_everywhere<T: FilterEntity>(
    store: &FolderStore,
    group: &str,
    old: &str,
    new: &str,
) -> usize {
    rewrite_all::<T>(store, |record| record.replace_fixed(group, old, new))
}

pub fn remove_fixed_everywhere<T: FilterEntity>(
    store: &FolderStore,
    group: &str,
    value: &str,
) -> usize {
    rewrite_all::<T>(store, |record| record.remove_fixed(group, value))
}

pub fn replace_custom_everywhere<T: FilterEntity>(
    store: &FolderStore,
    group: &str,
    old: &str,
    new: &str,
) -> usize {
    rewrite_all::<T>(store, |record| {
        match record.custom_filters_mut().get_mut(group) {
            Some(values) => replace_in_vec(values, old, new),
            None => false,
        }
    })
}

/// Removes the value from each record's membership list and drops the key
/// entirely once its list empties out.
pub fn remove_custom_everywhere<T: FilterEntity>(
    store: &FolderStore,
    group: &str,
    value: &str,
) -> usize {
    rewrite_all::<T>(store, |record| {
        let filters = record.custom_filters_mut();
        let mut changed = false;
        let mut now_empty = false;
        if let Some(values) = filters.get_mut(group) {
            changed = remove_from_vec(values, value);
            now_empty = values.is_empty();
        }
        if changed && now_empty {
            filters.remove(group);
        }
        changed
    })
}

pub fn drop_custom_group_everywhere<T: FilterEntity>(store: &FolderStore, key: &str) -> usize {
    rewrite_all::<T>(store, |record| {
        record.custom_filters_mut().remove(key).is_some()
    })
}

fn rewrite_all<T: FilterEntity>(
    store: &FolderStore,
    mut apply: impl FnMut(&mut T) -> bool,
) -> usize {
    let records = match store.list::<T>() {
        Ok(records) => records,
        Err(error) => {
            warn!(collection = T::COLLECTION, %error, "cascade skipped, listing failed");
            return 0;
        }
    };

    let mut updated = 0;
    for mut record in records {
        if !apply(&mut record) {
            continue;
        }
        record.touch();
        if let Err(error) = store.put(&record) {
            warn!(
                collection = T::COLLECTION,
                id = record.doc_id(),
                %error,
                "cascade write failed, record skipped"
            );
        } else {
            updated += 1;
        }
    }
    updated
}

fn replace_in_vec(values: &mut Vec<String>, old: &str, new: &str) -> bool {
    let mut changed = false;
    for value in values.iter_mut() {
        if value == old {
            *value = new.to_owned();
            changed = true;
        }
    }
    changed
}

fn remove_from_vec(values: &mut Vec<String>, target: &str) -> bool {
    let before = values.len();
    values.retain(|v| v != target);
    values.len() != before
}

fn replace_scalar(slot: &mut Option<String>, old: &str, new: &str) -> bool {
    if slot.as_deref() == Some(old) {
        *slot = Some(new.to_owned());
        true
    } else {
        false
    }
}

fn remove_scalar(slot: &mut Option<String>, target: &str) -> bool {
    if slot.as_deref() == Some(target) {
        *slot = None;
        true
    } else {
        false
    }
}
