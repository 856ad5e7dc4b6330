// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Route CRUD. `guide_ids` is the owning side of the route<->guide mirror;
//! `nearby_place_ids`, `place_ids` and `similar_route_ids` are one-way pick
//! lists and need no counterpart writes.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{CustomFilters, Route, RoutePoint};
use crate::store::FolderStore;
use crate::sync::{sync_mirrors, GuideRoutes, RefDelta};

use super::places::non_blank;
use super::{
    looks_like_id, make_slug, matches_search, new_id, normalize_refs, paginate, require_title,
    PageQuery, Paged,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteInput {
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    // Absent leaves the scalar untouched; explicit null clears it.
    #[serde(deserialize_with = "crate::filters::double_option")]
    pub season: Option<Option<String>>,
    #[serde(deserialize_with = "crate::filters::double_option")]
    pub transport: Option<Option<String>>,
    pub distance: Option<f64>,
    pub duration: Option<String>,
    pub difficulty: Option<u8>,
    pub elevation_gain: Option<f64>,
    pub is_family: Option<bool>,
    pub has_overnight: Option<bool>,
    pub what_to_bring: Option<String>,
    pub important_info: Option<String>,
    pub map_url: Option<String>,
    pub is_active: Option<bool>,
    pub images: Option<Vec<String>>,
    pub points: Option<Vec<RoutePoint>>,
    pub place_ids: Option<Vec<String>>,
    pub nearby_place_ids: Option<Vec<String>>,
    pub guide_ids: Option<Vec<String>>,
    pub similar_route_ids: Option<Vec<String>>,
    pub custom_filters: Option<CustomFilters>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RouteListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub season: Option<String>,
    pub transport: Option<String>,
    pub difficulty: Option<u8>,
}

pub fn list_routes(
    store: &FolderStore,
    query: &RouteListQuery,
    active_only: bool,
) -> Result<Paged<Route>, ApiError> {
    let mut routes: Vec<Route> = store
        .list::<Route>()?
        .into_iter()
        .filter(|r| !active_only || r.is_active)
        .filter(|r| match &query.search {
            Some(needle) => matches_search(
                needle,
                &[Some(&r.title), r.short_description.as_deref()],
            ),
            None => true,
        })
        .filter(|r| matches_scalar(r.season.as_deref(), &query.season))
        .filter(|r| matches_scalar(r.transport.as_deref(), &query.transport))
        .filter(|r| query.difficulty.is_none_or(|d| r.difficulty == d))
        .collect();
    routes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(
        routes,
        &PageQuery {
            page: query.page,
            limit: query.limit,
        },
    ))
}

fn matches_scalar(value: Option<&str>, wanted: &Option<String>) -> bool {
    match wanted {
        Some(wanted) => value == Some(wanted.as_str()),
        None => true,
    }
}

pub fn get_route(store: &FolderStore, id_or_slug: &str) -> Result<Route, ApiError> {
    if looks_like_id(id_or_slug) {
        if let Some(route) = store.get::<Route>(id_or_slug)? {
            return Ok(route);
        }
    }
    store
        .list::<Route>()?
        .into_iter()
        .find(|r| r.slug == id_or_slug)
        .ok_or_else(|| ApiError::NotFound("Маршрут не найден".to_owned()))
}

pub fn create_route(store: &FolderStore, input: RouteInput) -> Result<Route, ApiError> {
    let title = require_title(input.title.as_deref())?.to_owned();
    let slug = make_slug(&title);
    let mut route = Route::new(new_id(), title, slug);
    apply_input(&mut route, input)?;
    route.guide_ids = normalize_refs(&route.id, std::mem::take(&mut route.guide_ids));
    store.put(&route)?;

    let delta = RefDelta::between(&route.id, &[], &route.guide_ids);
    sync_mirrors(&GuideRoutes { store }, &route.id, &delta);
    Ok(route)
}

pub fn update_route(store: &FolderStore, id: &str, input: RouteInput) -> Result<Route, ApiError> {
    let Some(mut route) = store.get::<Route>(id)? else {
        return Err(ApiError::NotFound("Маршрут не найден".to_owned()));
    };
    let old_title = route.title.clone();
    let old_guides = route.guide_ids.clone();
    apply_input(&mut route, input)?;
    if route.title != old_title {
        route.slug = make_slug(&route.title);
    }
    route.guide_ids = normalize_refs(&route.id, std::mem::take(&mut route.guide_ids));
    route.updated_at = chrono::Utc::now();
    store.put(&route)?;

    let delta = RefDelta::between(&route.id, &old_guides, &route.guide_ids);
    sync_mirrors(&GuideRoutes { store }, &route.id, &delta);
    Ok(route)
}

pub fn delete_route(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    let Some(route) = store.get::<Route>(id)? else {
        return Err(ApiError::NotFound("Маршрут не найден".to_owned()));
    };
    let delta = RefDelta::between(&route.id, &route.guide_ids, &[]);
    sync_mirrors(&GuideRoutes { store }, &route.id, &delta);
    store.delete::<Route>(id)?;
    Ok(())
}

fn apply_input(route: &mut Route, input: RouteInput) -> Result<(), ApiError> {
    if let Some(title) = input.title {
        let title = title.trim().to_owned();
        if !title.is_empty() {
            route.title = title;
        }
    }
    if let Some(short) = input.short_description {
        route.short_description = non_blank(short);
    }
    if let Some(description) = input.description {
        route.description = non_blank(description);
    }
    // Scalar filter fields accept explicit null to detach from the filter.
    if let Some(season) = input.season {
        route.season = season.and_then(non_blank);
    }
    if let Some(transport) = input.transport {
        route.transport = transport.and_then(non_blank);
    }
    if let Some(distance) = input.distance {
        route.distance = Some(distance);
    }
    if let Some(duration) = input.duration {
        route.duration = non_blank(duration);
    }
    if let Some(difficulty) = input.difficulty {
        if !(1..=5).contains(&difficulty) {
            return Err(ApiError::Validation(
                "Сложность должна быть от 1 до 5".to_owned(),
            ));
        }
        route.difficulty = difficulty;
    }
    if let Some(elevation) = input.elevation_gain {
        route.elevation_gain = Some(elevation);
    }
    if let Some(is_family) = input.is_family {
        route.is_family = is_family;
    }
    if let Some(has_overnight) = input.has_overnight {
        route.has_overnight = has_overnight;
    }
    if let Some(what) = input.what_to_bring {
        route.what_to_bring = non_blank(what);
    }
    if let Some(info) = input.important_info {
        route.important_info = non_blank(info);
    }
    if let Some(map_url) = input.map_url {
        route.map_url = non_blank(map_url);
    }
    if let Some(active) = input.is_active {
        route.is_active = active;
    }
    if let Some(images) = input.images {
        route.images = images;
    }
    if let Some(points) = input.points {
        route.points = points;
    }
    if let Some(place_ids) = input.place_ids {
        route.place_ids = normalize_refs("", place_ids);
    }
    if let Some(nearby) = input.nearby_place_ids {
        route.nearby_place_ids = normalize_refs("", nearby);
    }
    if let Some(guides) = input.guide_ids {
        route.guide_ids = guides;
    }
    if let Some(similar) = input.similar_route_ids {
        route.similar_route_ids = normalize_refs(&route.id, similar);
    }
    if let Some(custom) = input.custom_filters {
        route.custom_filters = custom;
    }
    Ok(())
}
