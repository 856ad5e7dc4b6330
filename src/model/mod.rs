// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Persistent document types for the portal.
//!
//! Every struct here is a schemaless JSON document: unknown fields written by
//! older builds survive round trips only where `serde_json::Value` is used,
//! and new fields default on read (`#[serde(default)]`) so existing stores
//! keep loading after schema growth.

use std::collections::BTreeMap;

mod media;
mod news;
mod place;
mod review;
mod route;
mod service;
mod site;
mod user;

pub use media::Media;
pub use news::News;
pub use place::Place;
pub use review::{Review, ReviewEntity, ReviewStatus};
pub use route::{Route, RoutePoint};
pub use service::{Service, GUIDE_CATEGORY};
pub use site::{PageContent, SiteContent, ViewEvent};
pub use user::{Role, User};

/// Admin-defined filter membership on an entity record: group key to the
/// values the record carries for that group.
pub type CustomFilters = BTreeMap<String, Vec<String>>;

pub(crate) fn default_true() -> bool {
    true
}
