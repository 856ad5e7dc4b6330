// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! HTTP surface: public read API under `/api`, admin API under `/api/admin`.
//!
//! Admin requests authenticate with a static bearer token mapped to a role;
//! public visitors carry opaque `X-Visitor-Id` / `X-User-Id` headers issued
//! by the frontend session layer.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::Config;
use crate::error::ApiError;
use crate::filters::FilterFamily;
use crate::model::Role;
use crate::store::FolderStore;

mod admin;
mod public;


pub struct App {
    pub store: FolderStore,
    pub config: Config,
}

pub fn router(app: Arc<App>) -> Router {
    let uploads_dir = app.config.uploads_dir.clone();

    let public = Router::new()
        .route("/places", get(public::list_places))
        .route("/places/{id}", get(public::get_place))
        .route("/routes", get(public::list_routes))
        .route("/routes/{id}", get(public::get_route))
        .route("/services", get(public::list_services))
        .route("/services/{id}", get(public::get_service))
        .route("/news", get(public::list_news))
        .route("/news/{id}", get(public::get_news))
        .route("/reviews", post(public::submit_review))
        .route("/filters/{family}", get(public::get_filters))
        .route("/site/{section}", get(public::get_site_section))
        .route("/pages/{page}", get(public::get_page))
        .route("/favorites", get(public::list_favorites))
        .route(
            "/favorites/{kind}/{id}",
            post(public::add_favorite).delete(public::remove_favorite),
        );

    let admin = Router::new()
        .route("/stats", get(admin::stats))
        .route("/sync/repair", post(admin::repair_mirrors))
        .route("/places", get(admin::list_places).post(admin::create_place))
        .route(
            "/places/{id}",
            get(admin::get_place)
                .put(admin::update_place)
                .delete(admin::delete_place),
        )
        .route("/routes", get(admin::list_routes).post(admin::create_route))
        .route(
            "/routes/{id}",
            get(admin::get_route)
                .put(admin::update_route)
                .delete(admin::delete_route),
        )
        .route(
            "/services",
            get(admin::list_services).post(admin::create_service),
        )
        .route(
            "/services/{id}",
            get(admin::get_service)
                .put(admin::update_service)
                .delete(admin::delete_service),
        )
        .route("/news", get(admin::list_news).post(admin::create_news))
        .route(
            "/news/{id}",
            get(admin::get_news)
                .put(admin::update_news)
                .delete(admin::delete_news),
        )
        .route("/reviews", get(admin::list_reviews))
        .route("/reviews/{id}/status", patch(admin::set_review_status))
        .route("/reviews/{id}", delete(admin::delete_review))
        .route("/users", get(admin::list_users))
        .route("/users/{id}/role", patch(admin::update_user_role))
        .route("/users/{id}/ban", patch(admin::set_user_banned))
        .route("/users/{id}", delete(admin::delete_user))
        .route(
            "/filters/{family}",
            get(admin::get_filters).put(admin::replace_filters),
        )
        .route("/filters/{family}/groups", post(admin::add_filter_group))
        .route(
            "/filters/{family}/groups/meta",
            patch(admin::update_filter_group_meta),
        )
        .route(
            "/filters/{family}/groups/{key}",
            delete(admin::remove_filter_group),
        )
        .route(
            "/filters/{family}/values/replace",
            post(admin::replace_filter_value),
        )
        .route(
            "/filters/{family}/values/remove",
            post(admin::remove_filter_value),
        )
        .route("/site/{section}", put(admin::update_site_section))
        .route("/pages/{page}", put(admin::update_page))
        .route("/media", get(admin::list_media).post(admin::upload_media))
        .route("/media/{id}", delete(admin::delete_media));

    Router::new()
        .nest("/api/admin", admin)
        .nest("/api", public)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app)
}

/// Admin bearer-token auth; resolves to the role the token grants.
pub struct AdminAuth(pub Role);

impl FromRequestParts<Arc<App>> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<App>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ApiError::Forbidden("Требуется авторизация".to_owned()))?;

        let config = &state.config;
        if config.superadmin_token.as_deref() == Some(token) {
            return Ok(Self(Role::SuperAdmin));
        }
        if config.admin_token.as_deref() == Some(token) {
            return Ok(Self(Role::Admin));
        }
        Err(ApiError::Forbidden("Недостаточно прав".to_owned()))
    }
}

/// Identified portal user, from the session-issued `X-User-Id` header.
pub struct UserId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for UserId {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| Self(id.to_owned()))
            .ok_or_else(|| ApiError::Forbidden("Требуется вход".to_owned()))
    }
}

/// Anonymous visitor id for unique-view counting, from the `X-Visitor-Id`
/// header. A first-time visitor without the header gets one minted; detail
/// handlers echo the id back so the client can persist it.
pub struct VisitorId(pub String);

impl<S: Send + Sync> FromRequestParts<S> for VisitorId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-visitor-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_owned)
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
        Ok(Self(id))
    }
}

fn parse_family(raw: &str) -> Result<FilterFamily, ApiError> {
    match raw {
        "places" => Ok(FilterFamily::Places),
        "routes" => Ok(FilterFamily::Routes),
        _ => Err(ApiError::NotFound("Неизвестная группа фильтров".to_owned())),
    }
}
