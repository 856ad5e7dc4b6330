// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Service CRUD. `route_ids` is the mirrored side of the guide relation and
//! is owned by route edits; service inputs cannot set it directly.

use serde::Deserialize;
use tracing::warn;

use crate::error::ApiError;
use crate::model::{Route, Service};
use crate::store::{Document, FolderStore};

use super::places::non_blank;
use super::{
    looks_like_id, make_slug, matches_search, new_id, paginate, require_title, PageQuery, Paged,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceInput {
    pub title: Option<String>,
    pub category: Option<String>,
    pub short_description: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub telegram: Option<String>,
    pub address: Option<String>,
    pub is_verified: Option<bool>,
    pub is_active: Option<bool>,
    pub images: Option<Vec<String>>,
    pub certificates: Option<Vec<String>>,
    pub prices: Option<Vec<serde_json::Value>>,
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub category: Option<String>,
}

pub fn list_services(
    store: &FolderStore,
    query: &ServiceListQuery,
    active_only: bool,
) -> Result<Paged<Service>, ApiError> {
    let mut services: Vec<Service> = store
        .list::<Service>()?
        .into_iter()
        .filter(|s| !active_only || s.is_active)
        .filter(|s| match &query.search {
            Some(needle) => matches_search(
                needle,
                &[Some(&s.title), s.short_description.as_deref()],
            ),
            None => true,
        })
        .filter(|s| match &query.category {
            Some(category) => s.category.as_deref() == Some(category.as_str()),
            None => true,
        })
        .collect();
    services.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(
        services,
        &PageQuery {
            page: query.page,
            limit: query.limit,
        },
    ))
}

pub fn get_service(store: &FolderStore, id_or_slug: &str) -> Result<Service, ApiError> {
    if looks_like_id(id_or_slug) {
        if let Some(service) = store.get::<Service>(id_or_slug)? {
            return Ok(service);
        }
    }
    store
        .list::<Service>()?
        .into_iter()
        .find(|s| s.slug == id_or_slug)
        .ok_or_else(|| ApiError::NotFound("Сервис не найден".to_owned()))
}

pub fn create_service(store: &FolderStore, input: ServiceInput) -> Result<Service, ApiError> {
    let title = require_title(input.title.as_deref())?.to_owned();
    let slug = make_slug(&title);
    let mut service = Service::new(new_id(), title, slug);
    apply_input(&mut service, input);
    store.put(&service)?;
    Ok(service)
}

pub fn update_service(
    store: &FolderStore,
    id: &str,
    input: ServiceInput,
) -> Result<Service, ApiError> {
    let Some(mut service) = store.get::<Service>(id)? else {
        return Err(ApiError::NotFound("Сервис не найден".to_owned()));
    };
    let old_title = service.title.clone();
    let was_guide = service.is_guide();
    apply_input(&mut service, input);
    if service.title != old_title {
        service.slug = make_slug(&service.title);
    }
    // A service leaving the guide category loses its route attachments;
    // routes pointing at it are cleaned up below.
    if was_guide && !service.is_guide() {
        service.route_ids.clear();
        detach_from_routes(store, &service.id);
    }
    service.updated_at = chrono::Utc::now();
    store.put(&service)?;
    Ok(service)
}

pub fn delete_service(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    let Some(service) = store.get::<Service>(id)? else {
        return Err(ApiError::NotFound("Сервис не найден".to_owned()));
    };
    detach_from_routes(store, &service.id);
    store.delete::<Service>(id)?;
    Ok(())
}

/// Best-effort sweep removing the service id from every route's guide list.
fn detach_from_routes(store: &FolderStore, service_id: &str) {
    let routes = match store.list::<Route>() {
        Ok(routes) => routes,
        Err(error) => {
            warn!(%error, "guide detach skipped, route listing failed");
            return;
        }
    };
    for mut route in routes {
        let before = route.guide_ids.len();
        route.guide_ids.retain(|id| id != service_id);
        if route.guide_ids.len() == before {
            continue;
        }
        route.updated_at = chrono::Utc::now();
        if let Err(error) = store.put(&route) {
            warn!(id = route.doc_id(), %error, "guide detach write failed, route skipped");
        }
    }
}

fn apply_input(service: &mut Service, input: ServiceInput) {
    if let Some(title) = input.title {
        let title = title.trim().to_owned();
        if !title.is_empty() {
            service.title = title;
        }
    }
    if let Some(category) = input.category {
        service.category = non_blank(category);
    }
    if let Some(short) = input.short_description {
        service.short_description = non_blank(short);
    }
    if let Some(description) = input.description {
        service.description = non_blank(description);
    }
    if let Some(phone) = input.phone {
        service.phone = non_blank(phone);
    }
    if let Some(email) = input.email {
        service.email = non_blank(email);
    }
    if let Some(telegram) = input.telegram {
        service.telegram = non_blank(telegram);
    }
    if let Some(address) = input.address {
        service.address = non_blank(address);
    }
    if let Some(verified) = input.is_verified {
        service.is_verified = verified;
    }
    if let Some(active) = input.is_active {
        service.is_active = active;
    }
    if let Some(images) = input.images {
        service.images = images;
    }
    if let Some(certificates) = input.certificates {
        service.certificates = certificates;
    }
    if let Some(prices) = input.prices {
        service.prices = prices;
    }
    if let Some(data) = input.data {
        service.data = if data.is_null() { None } else { Some(data) };
    }
}
