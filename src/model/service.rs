// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::default_true;

/// Category value that marks a service as a guide and makes it eligible for
/// the route<->guide mirror.
pub const GUIDE_CATEGORY: &str = "Гид";

/// A commercial service listing (guide, rental, transfer...). `route_ids` is
/// the mirror of `Route::guide_ids` and only meaningful on guide-category
/// services.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telegram: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub certificates: Vec<String>,
    #[serde(default)]
    pub prices: Vec<serde_json::Value>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub route_ids: Vec<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Service {
    pub fn new(id: String, title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            slug,
            category: None,
            short_description: None,
            description: None,
            phone: None,
            email: None,
            telegram: None,
            address: None,
            is_verified: false,
            is_active: true,
            images: Vec::new(),
            certificates: Vec::new(),
            prices: Vec::new(),
            data: None,
            route_ids: Vec::new(),
            rating: 0.0,
            reviews_count: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_guide(&self) -> bool {
        self.category.as_deref() == Some(GUIDE_CATEGORY)
    }
}

impl Document for Service {
    const COLLECTION: &'static str = "services";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
