// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Content-management backend for a regional tourism portal.
//!
//! Records (places, routes, services, news, reviews, users) live as JSON
//! documents in a folder-per-collection store. The interesting parts are
//! the filter-configuration cascades ([`filters`]) and the bidirectional
//! reference mirrors ([`sync`]); everything else is CRUD plumbing exposed
//! over an axum HTTP surface ([`http`]).

pub mod config;
pub mod error;
pub mod filters;
pub mod http;
pub mod model;
pub mod ops;
pub mod slug;
pub mod store;
pub mod sync;
