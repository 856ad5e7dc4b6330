// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Visitor-facing extras: unique-view counting and per-user favorites.
//!
//! Visitors are identified by an opaque client-generated id header; a view
//! is counted once per entity/visitor pair, deduped by a marker document
//! whose id encodes the pair.

use serde::Serialize;
use tracing::warn;

use crate::error::ApiError;
use crate::model::{Place, Route, User, ViewEvent};
use crate::store::FolderStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewTarget {
    Place,
    Route,
}

impl ViewTarget {
    fn as_str(self) -> &'static str {
        match self {
            Self::Place => "place",
            Self::Route => "route",
        }
    }
}

/// Counts a unique view; returns whether this visitor was new for the
/// entity. Tracking is best-effort and never fails the surrounding read.
pub fn track_view(store: &FolderStore, target: ViewTarget, entity_id: &str, visitor_id: &str) -> bool {
    let visitor_id = visitor_id.trim();
    if visitor_id.is_empty() {
        return false;
    }
    let key = ViewEvent::key(target.as_str(), entity_id, visitor_id);

    match store.get::<ViewEvent>(&key) {
        Ok(Some(_)) => return false,
        Ok(None) => {}
        Err(error) => {
            warn!(%error, key, "view dedupe read failed, view skipped");
            return false;
        }
    }

    let event = ViewEvent {
        id: key.clone(),
        entity_type: target.as_str().to_owned(),
        entity_id: entity_id.to_owned(),
        visitor_id: visitor_id.to_owned(),
        created_at: chrono::Utc::now(),
    };
    if let Err(error) = store.put(&event) {
        warn!(%error, key, "view marker write failed, view skipped");
        return false;
    }

    let result = match target {
        ViewTarget::Place => bump_place_views(store, entity_id),
        ViewTarget::Route => bump_route_views(store, entity_id),
    };
    if let Err(error) = result {
        warn!(%error, entity_id, "view counter bump failed");
    }
    true
}

fn bump_place_views(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    if let Some(mut place) = store.get::<Place>(id)? {
        place.unique_views_count += 1;
        store.put(&place)?;
    }
    Ok(())
}

fn bump_route_views(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    if let Some(mut route) = store.get::<Route>(id)? {
        route.unique_views_count += 1;
        store.put(&route)?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorites {
    pub places: Vec<Place>,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoriteKind {
    Place,
    Route,
}

pub fn list_favorites(store: &FolderStore, user_id: &str) -> Result<Favorites, ApiError> {
    let user = require_user(store, user_id)?;
    let mut places = Vec::new();
    for id in &user.favorite_place_ids {
        if let Some(place) = store.get::<Place>(id)? {
            places.push(place);
        }
    }
    let mut routes = Vec::new();
    for id in &user.favorite_route_ids {
        if let Some(route) = store.get::<Route>(id)? {
            routes.push(route);
        }
    }
    Ok(Favorites { places, routes })
}

pub fn add_favorite(
    store: &FolderStore,
    user_id: &str,
    kind: FavoriteKind,
    entity_id: &str,
) -> Result<(), ApiError> {
    match kind {
        FavoriteKind::Place => {
            if store.get::<Place>(entity_id)?.is_none() {
                return Err(ApiError::NotFound("Место не найдено".to_owned()));
            }
        }
        FavoriteKind::Route => {
            if store.get::<Route>(entity_id)?.is_none() {
                return Err(ApiError::NotFound("Маршрут не найден".to_owned()));
            }
        }
    }

    let mut user = require_user(store, user_id)?;
    let list = favorite_list(&mut user, kind);
    if !list.iter().any(|id| id == entity_id) {
        list.push(entity_id.to_owned());
        user.updated_at = chrono::Utc::now();
        store.put(&user)?;
    }
    Ok(())
}

pub fn remove_favorite(
    store: &FolderStore,
    user_id: &str,
    kind: FavoriteKind,
    entity_id: &str,
) -> Result<(), ApiError> {
    let mut user = require_user(store, user_id)?;
    let list = favorite_list(&mut user, kind);
    let before = list.len();
    list.retain(|id| id != entity_id);
    if list.len() != before {
        user.updated_at = chrono::Utc::now();
        store.put(&user)?;
    }
    Ok(())
}

fn favorite_list(user: &mut User, kind: FavoriteKind) -> &mut Vec<String> {
    match kind {
        FavoriteKind::Place => &mut user.favorite_place_ids,
        FavoriteKind::Route => &mut user.favorite_route_ids,
    }
}

fn require_user(store: &FolderStore, user_id: &str) -> Result<User, ApiError> {
    store
        .get::<User>(user_id)?
        .ok_or_else(|| ApiError::NotFound("Пользователь не найден".to_owned()))
}
