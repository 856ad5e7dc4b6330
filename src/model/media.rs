// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::Document;

/// An uploaded media asset; the file itself lives under the uploads
/// directory, this record only indexes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub mimetype: String,
    pub size: u64,
    pub created_at: DateTime<Utc>,
}

impl Document for Media {
    const COLLECTION: &'static str = "media";

    fn doc_id(&self) -> &str {
        &self.id
    }
}
