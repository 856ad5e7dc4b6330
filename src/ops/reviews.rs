// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Review moderation and the denormalized rating rollup.
//!
//! Only approved reviews count. Places and services carry `rating` and
//! `reviews_count`; routes take reviews but no rollup fields, so their
//! recompute is a no-op.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{Place, Review, ReviewEntity, ReviewStatus, Service};
use crate::store::FolderStore;

use super::{new_id, paginate, PageQuery, Paged};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewInput {
    pub entity_type: ReviewEntity,
    pub entity_id: String,
    pub author_name: String,
    #[serde(default)]
    pub author_avatar: Option<String>,
    pub rating: u8,
    pub text: String,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReviewListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub status: Option<ReviewStatus>,
    pub entity_type: Option<ReviewEntity>,
    pub entity_id: Option<String>,
}

pub fn list_reviews(
    store: &FolderStore,
    query: &ReviewListQuery,
) -> Result<Paged<Review>, ApiError> {
    let mut reviews: Vec<Review> = store
        .list::<Review>()?
        .into_iter()
        .filter(|r| query.status.is_none_or(|s| r.status == s))
        .filter(|r| query.entity_type.is_none_or(|t| r.entity_type == t))
        .filter(|r| match &query.entity_id {
            Some(id) => &r.entity_id == id,
            None => true,
        })
        .collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(
        reviews,
        &PageQuery {
            page: query.page,
            limit: query.limit,
        },
    ))
}

/// Approved reviews for one entity, the public detail-page slice.
pub fn approved_for_entity(
    store: &FolderStore,
    entity_type: ReviewEntity,
    entity_id: &str,
) -> Result<Vec<Review>, ApiError> {
    let mut reviews: Vec<Review> = store
        .list::<Review>()?
        .into_iter()
        .filter(|r| {
            r.status == ReviewStatus::Approved
                && r.entity_type == entity_type
                && r.entity_id == entity_id
        })
        .collect();
    reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(reviews)
}

/// New reviews land as `Pending` and do not touch the rollup until
/// moderation approves them.
pub fn create_review(store: &FolderStore, input: ReviewInput) -> Result<Review, ApiError> {
    if !(1..=5).contains(&input.rating) {
        return Err(ApiError::Validation("Оценка должна быть от 1 до 5".to_owned()));
    }
    let author_name = input.author_name.trim().to_owned();
    if author_name.is_empty() {
        return Err(ApiError::Validation("Укажите имя автора".to_owned()));
    }
    let text = input.text.trim().to_owned();
    if text.is_empty() {
        return Err(ApiError::Validation("Текст отзыва пуст".to_owned()));
    }

    let entity_title = entity_title(store, input.entity_type, &input.entity_id)?
        .ok_or_else(|| ApiError::NotFound("Объект отзыва не найден".to_owned()))?;

    let now = chrono::Utc::now();
    let review = Review {
        id: new_id(),
        entity_type: input.entity_type,
        entity_id: input.entity_id,
        entity_title: Some(entity_title),
        author_name,
        author_avatar: input.author_avatar,
        rating: input.rating,
        text,
        status: ReviewStatus::Pending,
        user_id: input.user_id,
        created_at: now,
        updated_at: now,
    };
    store.put(&review)?;
    Ok(review)
}

pub fn set_review_status(
    store: &FolderStore,
    id: &str,
    status: ReviewStatus,
) -> Result<Review, ApiError> {
    let Some(mut review) = store.get::<Review>(id)? else {
        return Err(ApiError::NotFound("Отзыв не найден".to_owned()));
    };
    review.status = status;
    review.updated_at = chrono::Utc::now();
    store.put(&review)?;
    recompute_entity_rating(store, review.entity_type, &review.entity_id)?;
    Ok(review)
}

pub fn delete_review(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    let Some(review) = store.get::<Review>(id)? else {
        return Err(ApiError::NotFound("Отзыв не найден".to_owned()));
    };
    store.delete::<Review>(id)?;
    recompute_entity_rating(store, review.entity_type, &review.entity_id)?;
    Ok(())
}

/// Rolls the approved-review average (one decimal) and count onto the
/// reviewed entity.
pub fn recompute_entity_rating(
    store: &FolderStore,
    entity_type: ReviewEntity,
    entity_id: &str,
) -> Result<(), ApiError> {
    if entity_type == ReviewEntity::Route {
        return Ok(());
    }

    let approved: Vec<u8> = store
        .list::<Review>()?
        .into_iter()
        .filter(|r| {
            r.status == ReviewStatus::Approved
                && r.entity_type == entity_type
                && r.entity_id == entity_id
        })
        .map(|r| r.rating)
        .collect();
    let count = approved.len() as u32;
    let rating = if approved.is_empty() {
        0.0
    } else {
        let sum: u32 = approved.iter().map(|r| u32::from(*r)).sum();
        (f64::from(sum) / f64::from(count) * 10.0).round() / 10.0
    };

    match entity_type {
        ReviewEntity::Place => {
            if let Some(mut place) = store.get::<Place>(entity_id)? {
                place.rating = rating;
                place.reviews_count = count;
                place.updated_at = chrono::Utc::now();
                store.put(&place)?;
            }
        }
        ReviewEntity::Service => {
            if let Some(mut service) = store.get::<Service>(entity_id)? {
                service.rating = rating;
                service.reviews_count = count;
                service.updated_at = chrono::Utc::now();
                store.put(&service)?;
            }
        }
        ReviewEntity::Route => {}
    }
    Ok(())
}

fn entity_title(
    store: &FolderStore,
    entity_type: ReviewEntity,
    entity_id: &str,
) -> Result<Option<String>, ApiError> {
    Ok(match entity_type {
        ReviewEntity::Place => store.get::<Place>(entity_id)?.map(|p| p.title),
        ReviewEntity::Route => store.get::<crate::model::Route>(entity_id)?.map(|r| r.title),
        ReviewEntity::Service => store.get::<Service>(entity_id)?.map(|s| s.title),
    })
}
