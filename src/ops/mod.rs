// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Store-backed operations behind the HTTP surface.
//!
//! Each submodule owns one entity family and exposes plain functions taking
//! the store plus deserialized inputs; request/response shaping beyond JSON
//! bodies stays in the `http` layer. Pagination is offset-based over
//! in-memory collections, which is fine at portal scale (hundreds of
//! records, not millions).

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::slug::slugify;

pub mod media;
pub mod news;
pub mod places;
pub mod public;
pub mod reviews;
pub mod routes;
pub mod services;
pub mod site;
pub mod stats;
pub mod users;

#[cfg(test)]
mod tests;

/// Rendered page of a listing, in the shape the frontend paginates on.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: usize,
    pub pages: u32,
}

#[derive(Debug, Default, Clone, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl PageQuery {
    fn clamp(&self) -> (u32, u32) {
        let page = self.page.unwrap_or(1).max(1);
        let limit = self.limit.unwrap_or(20).clamp(1, 100);
        (page, limit)
    }
}

pub(crate) fn paginate<T>(mut items: Vec<T>, query: &PageQuery) -> Paged<T> {
    let (page, limit) = query.clamp();
    let total = items.len();
    let pages = (total as u32).div_ceil(limit).max(1);
    // Widen before multiplying; page comes straight from the query string.
    let start = (page as usize - 1).saturating_mul(limit as usize);
    let items = if start >= total {
        Vec::new()
    } else {
        items
            .drain(start..total.min(start + limit as usize))
            .collect()
    };
    Paged {
        items,
        pagination: Pagination {
            page,
            limit,
            total,
            pages,
        },
    }
}

pub(crate) fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Slugs get a millisecond suffix so two entities with the same title never
/// collide without a uniqueness index.
pub(crate) fn make_slug(title: &str) -> String {
    format!("{}-{}", slugify(title), chrono::Utc::now().timestamp_millis())
}

/// Ids are 32 lowercase hex chars; anything else in a path segment is
/// treated as a slug.
pub(crate) fn looks_like_id(value: &str) -> bool {
    static ID_RE: OnceLock<Regex> = OnceLock::new();
    ID_RE
        .get_or_init(|| Regex::new("^[0-9a-f]{32}$").unwrap())
        .is_match(value)
}

/// Case-insensitive substring search over the given fields.
pub(crate) fn matches_search(needle: &str, fields: &[Option<&str>]) -> bool {
    let needle = needle.to_lowercase();
    fields
        .iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Cleans a submitted reference list: trims, drops blanks and the owner's
/// own id, dedupes preserving order.
pub(crate) fn normalize_refs(owner_id: &str, raw: Vec<String>) -> Vec<String> {
    let mut refs = Vec::new();
    for id in raw {
        let id = id.trim().to_owned();
        if id.is_empty() || id == owner_id || refs.contains(&id) {
            continue;
        }
        refs.push(id);
    }
    refs
}

pub(crate) fn require_title(title: Option<&str>) -> Result<&str, ApiError> {
    title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::Validation("Укажите название".to_owned()))
}
