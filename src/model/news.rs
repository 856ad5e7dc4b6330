// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

use super::default_true;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl News {
    pub fn new(id: String, title: String, slug: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            title,
            slug,
            excerpt: None,
            content: None,
            images: Vec::new(),
            is_published: true,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Document for News {
    const COLLECTION: &'static str = "news";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
