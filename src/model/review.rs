// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewEntity {
    Place,
    Route,
    Service,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    Pending,
    Approved,
    Rejected,
}

/// A visitor review attached to a place, route, or service. Created as
/// `Pending`; approved reviews drive the denormalized `rating` and
/// `reviews_count` on places and services (routes carry neither).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub entity_type: ReviewEntity,
    pub entity_id: String,
    #[serde(default)]
    pub entity_title: Option<String>,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub rating: u8,
    pub text: String,
    pub status: ReviewStatus,
    #[serde(default)]
    pub user_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document for Review {
    const COLLECTION: &'static str = "reviews";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
