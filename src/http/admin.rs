// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Admin handlers. Every handler takes [`AdminAuth`] so an invalid token is
//! rejected before any body parsing happens.

use std::sync::Arc;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;
use crate::filters::{
    AddGroupInput, FilterConfig, FilterService, RemoveValueInput, ReplaceConfigInput,
    ReplaceValueInput, UpdateGroupMetaInput,
};
use crate::model::{Media, News, Place, Review, ReviewStatus, Role, Route, Service, User};
use crate::ops;
use crate::ops::media::Upload;
use crate::ops::Paged;

use super::{parse_family, AdminAuth, App};

pub(super) async fn stats(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
) -> Result<Json<ops::stats::Stats>, ApiError> {
    Ok(Json(ops::stats::collect_stats(&app.store)?))
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct RepairReport {
    places_updated: usize,
    services_updated: usize,
}

/// Re-drives both mirrors after a crashed or partial fan-out.
pub(super) async fn repair_mirrors(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
) -> Result<Json<RepairReport>, ApiError> {
    let places_updated = crate::sync::repair_place_mirrors(&app.store)?;
    let services_updated = crate::sync::repair_guide_mirrors(&app.store)?;
    Ok(Json(RepairReport {
        places_updated,
        services_updated,
    }))
}

// Places

pub(super) async fn list_places(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Query(query): Query<ops::places::PlaceListQuery>,
) -> Result<Json<Paged<Place>>, ApiError> {
    Ok(Json(ops::places::list_places(&app.store, &query, false)?))
}

pub(super) async fn get_place(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Place>, ApiError> {
    Ok(Json(ops::places::get_place(&app.store, &id)?))
}

pub(super) async fn create_place(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Json(input): Json<ops::places::PlaceInput>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    let place = ops::places::create_place(&app.store, input)?;
    Ok((StatusCode::CREATED, Json(place)))
}

pub(super) async fn update_place(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(input): Json<ops::places::PlaceInput>,
) -> Result<Json<Place>, ApiError> {
    Ok(Json(ops::places::update_place(&app.store, &id, input)?))
}

pub(super) async fn delete_place(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::places::delete_place(&app.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// Routes

pub(super) async fn list_routes(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Query(query): Query<ops::routes::RouteListQuery>,
) -> Result<Json<Paged<Route>>, ApiError> {
    Ok(Json(ops::routes::list_routes(&app.store, &query, false)?))
}

pub(super) async fn get_route(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(ops::routes::get_route(&app.store, &id)?))
}

pub(super) async fn create_route(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Json(input): Json<ops::routes::RouteInput>,
) -> Result<(StatusCode, Json<Route>), ApiError> {
    let route = ops::routes::create_route(&app.store, input)?;
    Ok((StatusCode::CREATED, Json(route)))
}

pub(super) async fn update_route(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(input): Json<ops::routes::RouteInput>,
) -> Result<Json<Route>, ApiError> {
    Ok(Json(ops::routes::update_route(&app.store, &id, input)?))
}

pub(super) async fn delete_route(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::routes::delete_route(&app.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// Services

pub(super) async fn list_services(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Query(query): Query<ops::services::ServiceListQuery>,
) -> Result<Json<Paged<Service>>, ApiError> {
    Ok(Json(ops::services::list_services(&app.store, &query, false)?))
}

pub(super) async fn get_service(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(ops::services::get_service(&app.store, &id)?))
}

pub(super) async fn create_service(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Json(input): Json<ops::services::ServiceInput>,
) -> Result<(StatusCode, Json<Service>), ApiError> {
    let service = ops::services::create_service(&app.store, input)?;
    Ok((StatusCode::CREATED, Json(service)))
}

pub(super) async fn update_service(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(input): Json<ops::services::ServiceInput>,
) -> Result<Json<Service>, ApiError> {
    Ok(Json(ops::services::update_service(&app.store, &id, input)?))
}

pub(super) async fn delete_service(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::services::delete_service(&app.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// News

pub(super) async fn list_news(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Query(query): Query<ops::news::NewsListQuery>,
) -> Result<Json<Paged<News>>, ApiError> {
    Ok(Json(ops::news::list_news(&app.store, &query, false)?))
}

pub(super) async fn get_news(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<News>, ApiError> {
    Ok(Json(ops::news::get_news(&app.store, &id)?))
}

pub(super) async fn create_news(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Json(input): Json<ops::news::NewsInput>,
) -> Result<(StatusCode, Json<News>), ApiError> {
    let news = ops::news::create_news(&app.store, input)?;
    Ok((StatusCode::CREATED, Json(news)))
}

pub(super) async fn update_news(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(input): Json<ops::news::NewsInput>,
) -> Result<Json<News>, ApiError> {
    Ok(Json(ops::news::update_news(&app.store, &id, input)?))
}

pub(super) async fn delete_news(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::news::delete_news(&app.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// Reviews

pub(super) async fn list_reviews(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Query(query): Query<ops::reviews::ReviewListQuery>,
) -> Result<Json<Paged<Review>>, ApiError> {
    Ok(Json(ops::reviews::list_reviews(&app.store, &query)?))
}

#[derive(Debug, Deserialize)]
pub(super) struct StatusBody {
    status: ReviewStatus,
}

pub(super) async fn set_review_status(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<StatusBody>,
) -> Result<Json<Review>, ApiError> {
    Ok(Json(ops::reviews::set_review_status(
        &app.store,
        &id,
        body.status,
    )?))
}

pub(super) async fn delete_review(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::reviews::delete_review(&app.store, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// Users

pub(super) async fn list_users(
    State(app): State<Arc<App>>,
    AdminAuth(role): AdminAuth,
    Query(query): Query<ops::users::UserListQuery>,
) -> Result<Json<Paged<User>>, ApiError> {
    Ok(Json(ops::users::list_users(&app.store, role, &query)?))
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleBody {
    role: Role,
}

pub(super) async fn update_user_role(
    State(app): State<Arc<App>>,
    AdminAuth(role): AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<RoleBody>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(ops::users::update_role(
        &app.store, role, &id, body.role,
    )?))
}

#[derive(Debug, Deserialize)]
pub(super) struct BanBody {
    banned: bool,
}

pub(super) async fn set_user_banned(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
    Json(body): Json<BanBody>,
) -> Result<Json<User>, ApiError> {
    Ok(Json(ops::users::set_banned(&app.store, &id, body.banned)?))
}

pub(super) async fn delete_user(
    State(app): State<Arc<App>>,
    AdminAuth(role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::users::delete_user(&app.store, role, &id)?;
    Ok(StatusCode::NO_CONTENT)
}

// Filters

pub(super) async fn get_filters(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(FilterService::new(&app.store, family).get_config()?))
}

pub(super) async fn replace_filters(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
    Json(input): Json<ReplaceConfigInput>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(
        FilterService::new(&app.store, family).replace_config(input)?,
    ))
}

pub(super) async fn add_filter_group(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
    Json(input): Json<AddGroupInput>,
) -> Result<(StatusCode, Json<FilterConfig>), ApiError> {
    let family = parse_family(&family)?;
    let config = FilterService::new(&app.store, family).add_extra_group(input)?;
    Ok((StatusCode::CREATED, Json(config)))
}

pub(super) async fn update_filter_group_meta(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
    Json(input): Json<UpdateGroupMetaInput>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(
        FilterService::new(&app.store, family).update_group_meta(input)?,
    ))
}

pub(super) async fn remove_filter_group(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path((family, key)): Path<(String, String)>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(FilterService::new(&app.store, family).remove_group(&key)?))
}

pub(super) async fn replace_filter_value(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
    Json(input): Json<ReplaceValueInput>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(
        FilterService::new(&app.store, family).replace_value(input)?,
    ))
}

pub(super) async fn remove_filter_value(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(family): Path<String>,
    Json(input): Json<RemoveValueInput>,
) -> Result<Json<FilterConfig>, ApiError> {
    let family = parse_family(&family)?;
    Ok(Json(
        FilterService::new(&app.store, family).remove_value(input)?,
    ))
}

// Site content

pub(super) async fn update_site_section(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(section): Path<String>,
    Json(content): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(ops::site::update_site_section(
        &app.store, &section, content,
    )?))
}

pub(super) async fn update_page(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(page): Path<String>,
    Json(content): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(ops::site::update_page(&app.store, &page, content)?))
}

// Media

pub(super) async fn list_media(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
) -> Result<Json<Vec<Media>>, ApiError> {
    Ok(Json(ops::media::list_media(&app.store)?))
}

pub(super) async fn upload_media(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Media>), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::Validation("Некорректная форма загрузки".to_owned()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or("upload").to_owned();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_owned();
        let bytes = field
            .bytes()
            .await
            .map_err(|_| ApiError::Validation("Не удалось прочитать файл".to_owned()))?
            .to_vec();

        let media = ops::media::store_upload(
            &app.store,
            &app.config.uploads_dir,
            Upload {
                original_name,
                content_type,
                bytes,
            },
        )?;
        return Ok((StatusCode::CREATED, Json(media)));
    }
    Err(ApiError::Validation("Поле file не найдено".to_owned()))
}

pub(super) async fn delete_media(
    State(app): State<Arc<App>>,
    AdminAuth(_role): AdminAuth,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    ops::media::delete_media(&app.store, &app.config.uploads_dir, &id)?;
    Ok(StatusCode::NO_CONTENT)
}
