// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::{default_true, CustomFilters};

/// A hiking/driving route. Unlike [`super::Place`], the `season` and
/// `transport` filter dimensions are scalar fields on the record, so filter
/// cascades match-and-set them instead of rewriting array elements.
///
/// `guide_ids` mirrors into `Service::route_ids` on guide services;
/// `nearby_place_ids` here is a one-way pick list, not a mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub transport: Option<String>,
    #[serde(default)]
    pub distance: Option<f64>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: u8,
    #[serde(default)]
    pub elevation_gain: Option<f64>,
    #[serde(default)]
    pub is_family: bool,
    #[serde(default)]
    pub has_overnight: bool,
    #[serde(default)]
    pub what_to_bring: Option<String>,
    #[serde(default)]
    pub important_info: Option<String>,
    #[serde(default)]
    pub map_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub points: Vec<RoutePoint>,
    #[serde(default)]
    pub place_ids: Vec<String>,
    #[serde(default)]
    pub nearby_place_ids: Vec<String>,
    #[serde(default)]
    pub guide_ids: Vec<String>,
    #[serde(default)]
    pub similar_route_ids: Vec<String>,
    #[serde(default)]
    pub custom_filters: CustomFilters,
    #[serde(default)]
    pub unique_views_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An ordered stop along a route; order is the position in `Route::points`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePoint {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

fn default_difficulty() -> u8 {
    3
}

impl Route {
    pub fn new(id: String, title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            slug,
            short_description: None,
            description: None,
            season: None,
            transport: None,
            distance: None,
            duration: None,
            difficulty: default_difficulty(),
            elevation_gain: None,
            is_family: false,
            has_overnight: false,
            what_to_bring: None,
            important_info: None,
            map_url: None,
            is_active: true,
            images: Vec::new(),
            points: Vec::new(),
            place_ids: Vec::new(),
            nearby_place_ids: Vec::new(),
            guide_ids: Vec::new(),
            similar_route_ids: Vec::new(),
            custom_filters: CustomFilters::new(),
            unique_views_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for Route {
    const COLLECTION: &'static str = "routes";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
