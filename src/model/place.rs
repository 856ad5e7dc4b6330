// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::{default_true, CustomFilters};

/// A point of interest. Fixed filter dimensions (`directions`, `seasons`,
/// `object_types`, `accessibility`) are native array fields; admin-defined
/// dimensions live in `custom_filters`.
///
/// `nearby_place_ids` is a symmetric mirror list: if A lists B, B must list
/// A. The record owns only its own list; the synchronizer writes the other
/// side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub how_to_get: Option<String>,
    #[serde(default)]
    pub audio_guide: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    #[serde(default)]
    pub unique_views_count: u64,
    #[serde(default)]
    pub directions: Vec<String>,
    #[serde(default)]
    pub seasons: Vec<String>,
    #[serde(default)]
    pub object_types: Vec<String>,
    #[serde(default)]
    pub accessibility: Vec<String>,
    #[serde(default)]
    pub custom_filters: CustomFilters,
    #[serde(default)]
    pub nearby_place_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Place {
    /// Fresh record with empty filter sets; callers fill fields afterwards.
    pub fn new(id: String, title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            slug,
            location: None,
            short_description: None,
            description: None,
            how_to_get: None,
            audio_guide: None,
            video: None,
            is_active: true,
            images: Vec::new(),
            rating: 0.0,
            reviews_count: 0,
            unique_views_count: 0,
            directions: Vec::new(),
            seasons: Vec::new(),
            object_types: Vec::new(),
            accessibility: Vec::new(),
            custom_filters: CustomFilters::new(),
            nearby_place_ids: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Place {
    const COLLECTION: &'static str = "places";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
