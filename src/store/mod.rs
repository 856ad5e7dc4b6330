// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Folder-backed JSON document store.
//!
//! One directory per collection, one pretty-printed JSON file per document,
//! written atomically (temp file + rename). The store offers per-document
//! atomicity only; cross-document consistency is maintained best-effort by
//! the cascade and synchronizer layers on top.

use std::fmt;
use std::io;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

mod folder;

pub use folder::FolderStore;

/// A persistable document. `COLLECTION` names the directory, `doc_id` the
/// file stem. Ids must be safe path segments (see [`StoreError::InvalidDocId`]).
pub trait Document: Serialize + DeserializeOwned {
    const COLLECTION: &'static str;

    fn doc_id(&self) -> &str;
}

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    InvalidDocId {
        value: String,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::InvalidDocId { value } => {
                write!(f, "document id {value:?} is not a valid path segment")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::InvalidDocId { .. } => None,
        }
    }
}
