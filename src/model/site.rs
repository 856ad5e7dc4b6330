// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

/// Site-configuration singleton (`region`, `home`, `footer`); the document id
/// is the section name, the body a free-form JSON object deep-merged over
/// compiled-in defaults on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteContent {
    pub id: String,
    pub content: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl Document for SiteContent {
    const COLLECTION: &'static str = "site";

    fn doc_id(&self) -> &str {
        &self.id
    }
}

/// Per-page hero/content block; the document id is the page name from a
/// closed set (`routes`, `places`, `news`, `services`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    pub id: String,
    pub content: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

impl Document for PageContent {
    const COLLECTION: &'static str = "pages";

    fn doc_id(&self) -> &str {
        &self.id
    }
}

/// Dedupe record behind unique-view counting: one document per
/// entity/visitor pair, keyed `{entity_type}:{entity_id}:{visitor_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewEvent {
    pub id: String,
    pub entity_type: String,
    pub entity_id: String,
    pub visitor_id: String,
    pub created_at: DateTime<Utc>,
}

impl ViewEvent {
    pub fn key(entity_type: &str, entity_id: &str, visitor_id: &str) -> String {
        format!("{entity_type}:{entity_id}:{visitor_id}")
    }
}

impl Document for ViewEvent {
    const COLLECTION: &'static str = "view_events";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
