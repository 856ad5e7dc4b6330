// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Visitor-facing handlers: active/published records only, detail pages
//! with resolved references, review submission, favorites.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use crate::error::ApiError;
use crate::filters::{FilterConfig, FilterService};
use crate::model::{News, Place, Review, ReviewEntity, Route, Service};
use crate::ops;
use crate::ops::public::{FavoriteKind, ViewTarget};
use crate::ops::Paged;

use super::{parse_family, App, UserId, VisitorId};

pub(super) async fn list_places(
    State(app): State<Arc<App>>,
    Query(query): Query<ops::places::PlaceListQuery>,
) -> Result<Json<Paged<Place>>, ApiError> {
    Ok(Json(ops::places::list_places(&app.store, &query, true)?))
}

#[derive(Debug, Serialize)]
pub(super) struct PlaceDetail {
    #[serde(flatten)]
    place: Place,
    nearby: Vec<Place>,
    reviews: Vec<Review>,
}

pub(super) async fn get_place(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    VisitorId(visitor): VisitorId,
) -> Result<([(&'static str, String); 1], Json<PlaceDetail>), ApiError> {
    let place = ops::places::get_place(&app.store, &id)?;
    if !place.is_active {
        return Err(ApiError::NotFound("Место не найдено".to_owned()));
    }
    ops::public::track_view(&app.store, ViewTarget::Place, &place.id, &visitor);
    let nearby = ops::places::resolve_places(&app.store, &place.nearby_place_ids)?
        .into_iter()
        .filter(|p| p.is_active)
        .collect();
    let reviews = ops::reviews::approved_for_entity(&app.store, ReviewEntity::Place, &place.id)?;
    // Reload so the response reflects the view just counted.
    let place = ops::places::get_place(&app.store, &place.id)?;
    Ok((
        [("x-visitor-id", visitor)],
        Json(PlaceDetail {
            place,
            nearby,
            reviews,
        }),
    ))
}

pub(super) async fn list_routes(
    State(app): State<Arc<App>>,
    Query(query): Query<ops::routes::RouteListQuery>,
) -> Result<Json<Paged<Route>>, ApiError> {
    Ok(Json(ops::routes::list_routes(&app.store, &query, true)?))
}

#[derive(Debug, Serialize)]
pub(super) struct RouteDetail {
    #[serde(flatten)]
    route: Route,
    places: Vec<Place>,
    nearby: Vec<Place>,
    guides: Vec<Service>,
    reviews: Vec<Review>,
}

pub(super) async fn get_route(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
    VisitorId(visitor): VisitorId,
) -> Result<([(&'static str, String); 1], Json<RouteDetail>), ApiError> {
    let route = ops::routes::get_route(&app.store, &id)?;
    if !route.is_active {
        return Err(ApiError::NotFound("Маршрут не найден".to_owned()));
    }
    ops::public::track_view(&app.store, ViewTarget::Route, &route.id, &visitor);

    let places = active_places(&app, &route.place_ids)?;
    let nearby = active_places(&app, &route.nearby_place_ids)?;
    let mut guides = Vec::new();
    for guide_id in &route.guide_ids {
        if let Some(service) = app.store.get::<Service>(guide_id)? {
            if service.is_active {
                guides.push(service);
            }
        }
    }
    let reviews = ops::reviews::approved_for_entity(&app.store, ReviewEntity::Route, &route.id)?;
    let route = ops::routes::get_route(&app.store, &route.id)?;
    Ok((
        [("x-visitor-id", visitor)],
        Json(RouteDetail {
            route,
            places,
            nearby,
            guides,
            reviews,
        }),
    ))
}

fn active_places(app: &App, ids: &[String]) -> Result<Vec<Place>, ApiError> {
    Ok(ops::places::resolve_places(&app.store, ids)?
        .into_iter()
        .filter(|p| p.is_active)
        .collect())
}

pub(super) async fn list_services(
    State(app): State<Arc<App>>,
    Query(query): Query<ops::services::ServiceListQuery>,
) -> Result<Json<Paged<Service>>, ApiError> {
    Ok(Json(ops::services::list_services(&app.store, &query, true)?))
}

#[derive(Debug, Serialize)]
pub(super) struct ServiceDetail {
    #[serde(flatten)]
    service: Service,
    reviews: Vec<Review>,
}

pub(super) async fn get_service(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<ServiceDetail>, ApiError> {
    let service = ops::services::get_service(&app.store, &id)?;
    if !service.is_active {
        return Err(ApiError::NotFound("Сервис не найден".to_owned()));
    }
    let reviews =
        ops::reviews::approved_for_entity(&app.store, ReviewEntity::Service, &service.id)?;
    Ok(Json(ServiceDetail { service, reviews }))
}

pub(super) async fn list_news(
    State(app): State<Arc<App>>,
    Query(query): Query<ops::news::NewsListQuery>,
) -> Result<Json<Paged<News>>, ApiError> {
    Ok(Json(ops::news::list_news(&app.store, &query, true)?))
}

pub(super) async fn get_news(
    State(app): State<Arc<App>>,
    Path(id): Path<String>,
) -> Result<Json<News>, ApiError> {
    let news = ops::news::get_news(&app.store, &id)?;
    if !news.is_published {
        return Err(ApiError::NotFound("Новость не найдена".to_owned()));
    }
    Ok(Json(news))
}

pub(super) async fn submit_review(
    State(app): State<Arc<App>>,
    Json(input): Json<ops::reviews::ReviewInput>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = ops::reviews::create_review(&app.store, input)?;
    Ok((StatusCode::CREATED, Json(review)))
}

pub(super) async fn get_filters(
    State(app): State<Arc<App>>,
    Path(family): Path<String>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(FilterService::new(&app.store, family).get_config()?))
}

pub(super) async fn get_site_section(
    State(app): State<Arc<App>>,
    Path(section): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(ops::site::get_site_section(&app.store, &section)?))
}

pub(super) async fn get_page(
    State(app): State<Arc<App>>,
    Path(page): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(ops::site::get_page(&app.store, &page)?))
}

pub(super) async fn list_favorites(
    State(app): State<Arc<App>>,
    UserId(user_id): UserId,
) -> Result<Json<ops::public::Favorites>, ApiError> {
    Ok(Json(ops::public::list_favorites(&app.store, &user_id)?))
}

pub(super) async fn add_favorite(
    State(app): State<Arc<App>>,
    UserId(user_id): UserId,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    ops::public::add_favorite(&app.store, &user_id, kind, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub(super) async fn remove_favorite(
    State(app): State<Arc<App>>,
    UserId(user_id): UserId,
    Path((kind, id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let kind = parse_kind(&kind)?;
    ops::public::remove_favorite(&app.store, &user_id, kind, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_kind(raw: &str) -> Result<FavoriteKind, ApiError> {
    match raw {
        "places" => Ok(FavoriteKind::Place),
        "routes" => Ok(FavoriteKind::Route),
        _ => Err(ApiError::NotFound("Неизвестный тип избранного".to_owned())),
    }
}
