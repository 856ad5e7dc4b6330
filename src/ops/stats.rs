// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use serde::Serialize;

use crate::error::ApiError;
use crate::model::{News, Place, Review, ReviewStatus, Route, Service, User};
use crate::store::FolderStore;

/// Dashboard counters for the admin home screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub places: usize,
    pub routes: usize,
    pub services: usize,
    pub news: usize,
    pub users: usize,
    pub pending_reviews: usize,
    pub total_views: u64,
}

pub fn collect_stats(store: &FolderStore) -> Result<Stats, ApiError> {
    let places = store.list::<Place>()?;
    let routes = store.list::<Route>()?;
    let pending_reviews = store
        .list::<Review>()?
        .into_iter()
        .filter(|r| r.status == ReviewStatus::Pending)
        .count();
    let total_views = places
        .iter()
        .map(|p| p.unique_views_count)
        .chain(routes.iter().map(|r| r.unique_views_count))
        .sum();

    Ok(Stats {
        places: places.len(),
        routes: routes.len(),
        services: store.count::<Service>()?,
        news: store.count::<News>()?,
        users: store.count::<User>()?,
        pending_reviews,
        total_views,
    })
}
