// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Place CRUD. Every write that touches `nearby_place_ids` runs the
//! symmetric mirror after the owning record is persisted.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{CustomFilters, Place};
use crate::store::FolderStore;
use crate::sync::{sync_mirrors, PlaceNearby, RefDelta};

use super::{
    looks_like_id, make_slug, matches_search, new_id, normalize_refs, paginate, require_title,
    PageQuery, Paged,
};

/// Patch-style input: absent fields stay untouched on update; on create they
/// take the record defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceInput {
    pub title: Option<String>,
    pub location: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub how_to_get: Option<String>,
    pub audio_guide: Option<String>,
    pub video: Option<String>,
    pub is_active: Option<bool>,
    pub images: Option<Vec<String>>,
    pub directions: Option<Vec<String>>,
    pub seasons: Option<Vec<String>>,
    pub object_types: Option<Vec<String>>,
    pub accessibility: Option<Vec<String>>,
    pub custom_filters: Option<CustomFilters>,
    pub nearby_place_ids: Option<Vec<String>>,
}

// Query params are flat on purpose: serde_urlencoded cannot deserialize
// numeric fields through #[serde(flatten)].
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaceListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub direction: Option<String>,
    pub season: Option<String>,
    pub object_type: Option<String>,
    pub accessibility: Option<String>,
}

impl PlaceListQuery {
    fn page_query(&self) -> PageQuery {
        PageQuery {
            page: self.page,
            limit: self.limit,
        }
    }
}

pub fn list_places(
    store: &FolderStore,
    query: &PlaceListQuery,
    active_only: bool,
) -> Result<Paged<Place>, ApiError> {
    let mut places: Vec<Place> = store
        .list::<Place>()?
        .into_iter()
        .filter(|p| !active_only || p.is_active)
        .filter(|p| match &query.search {
            Some(needle) => matches_search(
                needle,
                &[
                    Some(&p.title),
                    p.location.as_deref(),
                    p.short_description.as_deref(),
                ],
            ),
            None => true,
        })
        .filter(|p| has_value(&p.directions, &query.direction))
        .filter(|p| has_value(&p.seasons, &query.season))
        .filter(|p| has_value(&p.object_types, &query.object_type))
        .filter(|p| has_value(&p.accessibility, &query.accessibility))
        .collect();
    places.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(places, &query.page_query()))
}

fn has_value(values: &[String], wanted: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => values.iter().any(|v| v == wanted),
        None => true,
    }
}

/// Looks a place up by id or, failing the id shape, by slug.
pub fn get_place(store: &FolderStore, id_or_slug: &str) -> Result<Place, ApiError> {
    if looks_like_id(id_or_slug) {
        if let Some(place) = store.get::<Place>(id_or_slug)? {
            return Ok(place);
        }
    }
    store
        .list::<Place>()?
        .into_iter()
        .find(|p| p.slug == id_or_slug)
        .ok_or_else(|| ApiError::NotFound("Место не найдено".to_owned()))
}

pub fn create_place(store: &FolderStore, input: PlaceInput) -> Result<Place, ApiError> {
    let title = require_title(input.title.as_deref())?.to_owned();
    let slug = make_slug(&title);
    let mut place = Place::new(new_id(), title, slug);
    apply_input(&mut place, input);
    place.nearby_place_ids = normalize_refs(&place.id, std::mem::take(&mut place.nearby_place_ids));
    store.put(&place)?;

    let delta = RefDelta::between(&place.id, &[], &place.nearby_place_ids);
    sync_mirrors(&PlaceNearby { store }, &place.id, &delta);
    Ok(place)
}

pub fn update_place(store: &FolderStore, id: &str, input: PlaceInput) -> Result<Place, ApiError> {
    let Some(mut place) = store.get::<Place>(id)? else {
        return Err(ApiError::NotFound("Место не найдено".to_owned()));
    };
    let old_title = place.title.clone();
    let old_nearby = place.nearby_place_ids.clone();
    apply_input(&mut place, input);
    if place.title != old_title {
        place.slug = make_slug(&place.title);
    }
    place.nearby_place_ids = normalize_refs(&place.id, std::mem::take(&mut place.nearby_place_ids));
    place.updated_at = chrono::Utc::now();
    store.put(&place)?;

    let delta = RefDelta::between(&place.id, &old_nearby, &place.nearby_place_ids);
    sync_mirrors(&PlaceNearby { store }, &place.id, &delta);
    Ok(place)
}

/// Deletion reuses the mirror with an empty new list, so every counterpart
/// drops its back-reference before the record disappears.
pub fn delete_place(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    let Some(place) = store.get::<Place>(id)? else {
        return Err(ApiError::NotFound("Место не найдено".to_owned()));
    };
    let delta = RefDelta::between(&place.id, &place.nearby_place_ids, &[]);
    sync_mirrors(&PlaceNearby { store }, &place.id, &delta);
    store.delete::<Place>(id)?;
    Ok(())
}

/// Resolves ids to existing places, silently dropping dangling references.
pub fn resolve_places(store: &FolderStore, ids: &[String]) -> Result<Vec<Place>, ApiError> {
    let mut places = Vec::with_capacity(ids.len());
    for id in ids {
        if let Some(place) = store.get::<Place>(id)? {
            places.push(place);
        }
    }
    Ok(places)
}

fn apply_input(place: &mut Place, input: PlaceInput) {
    if let Some(title) = input.title {
        let title = title.trim().to_owned();
        if !title.is_empty() {
            place.title = title;
        }
    }
    if let Some(location) = input.location {
        place.location = non_blank(location);
    }
    if let Some(short) = input.short_description {
        place.short_description = non_blank(short);
    }
    if let Some(description) = input.description {
        place.description = non_blank(description);
    }
    if let Some(how) = input.how_to_get {
        place.how_to_get = non_blank(how);
    }
    if let Some(audio) = input.audio_guide {
        place.audio_guide = non_blank(audio);
    }
    if let Some(video) = input.video {
        place.video = non_blank(video);
    }
    if let Some(active) = input.is_active {
        place.is_active = active;
    }
    if let Some(images) = input.images {
        place.images = images;
    }
    if let Some(directions) = input.directions {
        place.directions = directions;
    }
    if let Some(seasons) = input.seasons {
        place.seasons = seasons;
    }
    if let Some(object_types) = input.object_types {
        place.object_types = object_types;
    }
    if let Some(accessibility) = input.accessibility {
        place.accessibility = accessibility;
    }
    if let Some(custom) = input.custom_filters {
        place.custom_filters = custom;
    }
    if let Some(nearby) = input.nearby_place_ids {
        place.nearby_place_ids = nearby;
    }
}

pub(super) fn non_blank(value: String) -> Option<String> {
    let value = value.trim().to_owned();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
