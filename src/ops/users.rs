// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Account administration. Role changes are superadmin-only; admin-level
//! accounts can never be banned, and only a superadmin may delete them.

use serde::Deserialize;

use crate::error::ApiError;
use crate::model::{Role, User};
use crate::store::FolderStore;

use super::{matches_search, paginate, PageQuery, Paged};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserListQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

/// Admins only see regular accounts; the full list including other admins
/// is superadmin territory.
pub fn list_users(
    store: &FolderStore,
    actor: Role,
    query: &UserListQuery,
) -> Result<Paged<User>, ApiError> {
    let mut users: Vec<User> = store
        .list::<User>()?
        .into_iter()
        .filter(|u| actor == Role::SuperAdmin || u.role == Role::User)
        .filter(|u| match &query.search {
            Some(needle) => matches_search(
                needle,
                &[Some(&u.login), u.email.as_deref(), u.name.as_deref()],
            ),
            None => true,
        })
        .collect();
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(paginate(
        users,
        &PageQuery {
            page: query.page,
            limit: query.limit,
        },
    ))
}

pub fn update_role(
    store: &FolderStore,
    actor: Role,
    id: &str,
    new_role: Role,
) -> Result<User, ApiError> {
    if actor != Role::SuperAdmin {
        return Err(ApiError::Forbidden(
            "Менять роли может только суперадминистратор".to_owned(),
        ));
    }
    let Some(mut user) = store.get::<User>(id)? else {
        return Err(ApiError::NotFound("Пользователь не найден".to_owned()));
    };
    user.role = new_role;
    user.updated_at = chrono::Utc::now();
    store.put(&user)?;
    Ok(user)
}

pub fn set_banned(store: &FolderStore, id: &str, banned: bool) -> Result<User, ApiError> {
    let Some(mut user) = store.get::<User>(id)? else {
        return Err(ApiError::NotFound("Пользователь не найден".to_owned()));
    };
    if banned && user.role.is_admin() {
        return Err(ApiError::Forbidden(
            "Нельзя заблокировать администратора".to_owned(),
        ));
    }
    user.is_banned = banned;
    user.updated_at = chrono::Utc::now();
    store.put(&user)?;
    Ok(user)
}

pub fn delete_user(store: &FolderStore, actor: Role, id: &str) -> Result<(), ApiError> {
    let Some(user) = store.get::<User>(id)? else {
        return Err(ApiError::NotFound("Пользователь не найден".to_owned()));
    };
    if user.role.is_admin() && actor != Role::SuperAdmin {
        return Err(ApiError::Forbidden(
            "Удалять администраторов может только суперадминистратор".to_owned(),
        ));
    }
    store.delete::<User>(id)?;
    Ok(())
}
