// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::News;
use crate::store::FolderStore;

use super::places::non_blank;
use super::{
    looks_like_id, make_slug, matches_search, new_id, paginate, require_title, PageQuery, Paged,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsInput {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub images: Option<Vec<String>>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewsListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

pub fn list_news(
    store: &FolderStore,
    query: &NewsListQuery,
    published_only: bool,
) -> Result<Paged<News>, ApiError> {
    let mut news: Vec<News> = store
        .list::<News>()?
        .into_iter()
        .filter(|n| !published_only || n.is_published)
        .filter(|n| match &query.search {
            Some(needle) => matches_search(needle, &[Some(&n.title), n.excerpt.as_deref()]),
            None => true,
        })
        .collect();
    news.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(
        news,
        &PageQuery {
            page: query.page,
            limit: query.limit,
        },
    ))
}

pub fn get_news(store: &FolderStore, id_or_slug: &str) -> Result<News, ApiError> {
    if looks_like_id(id_or_slug) {
        if let Some(news) = store.get::<News>(id_or_slug)? {
            return Ok(news);
        }
    }
    store
        .list::<News>()?
        .into_iter()
        .find(|n| n.slug == id_or_slug)
        .ok_or_else(|| ApiError::NotFound("Новость не найдена".to_owned()))
}

pub fn create_news(store: &FolderStore, input: NewsInput) -> Result<News, ApiError> {
    let title = require_title(input.title.as_deref())?.to_owned();
    let slug = make_slug(&title);
    let mut news = News::new(new_id(), title, slug);
    apply_input(&mut news, input);
    store.put(&news)?;
    Ok(news)
}

pub fn update_news(store: &FolderStore, id: &str, input: NewsInput) -> Result<News, ApiError> {
    let Some(mut news) = store.get::<News>(id)? else {
        return Err(ApiError::NotFound("Новость не найдена".to_owned()));
    };
    let old_title = news.title.clone();
    apply_input(&mut news, input);
    if news.title != old_title {
        news.slug = make_slug(&news.title);
    }
    news.updated_at = chrono::Utc::now();
    store.put(&news)?;
    Ok(news)
}

pub fn delete_news(store: &FolderStore, id: &str) -> Result<(), ApiError> {
    if !store.delete::<News>(id)? {
        return Err(ApiError::NotFound("Новость не найдена".to_owned()));
    }
    Ok(())
}

fn apply_input(news: &mut News, input: NewsInput) {
    if let Some(title) = input.title {
        let title = title.trim().to_owned();
        if !title.is_empty() {
            news.title = title;
        }
    }
    if let Some(excerpt) = input.excerpt {
        news.excerpt = non_blank(excerpt);
    }
    if let Some(content) = input.content {
        news.content = non_blank(content);
    }
    if let Some(images) = input.images {
        news.images = images;
    }
    if let Some(published) = input.is_published {
        news.is_published = published;
    }
}
