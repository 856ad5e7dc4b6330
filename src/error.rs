// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Error taxonomy for admin and public operations.
//!
//! Primary-mutation errors abort before any cascade runs; cascade fan-out
//! failures are logged per-id and never surface here.

use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::store::StoreError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing required input. Surfaced as 400.
    Validation(String),
    /// Key collision (extra-group key vs fixed key, duplicate extra key). 400.
    Conflict(String),
    /// Referenced config, group, value, or record is absent. 404.
    NotFound(String),
    /// Caller lacks the role the operation requires. 403.
    Forbidden(String),
    /// Underlying document-store failure. 500.
    Store(StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg)
            | Self::Conflict(msg)
            | Self::NotFound(msg)
            | Self::Forbidden(msg) => f.write_str(msg),
            Self::Store(source) => write!(f, "store error: {source}"),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Store(source) => Some(source),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(source: StoreError) -> Self {
        match source {
            // Malformed ids come straight from client path segments.
            StoreError::InvalidDocId { value } => {
                Self::Validation(format!("Некорректный идентификатор: {value}"))
            }
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let message = match &self {
            // Do not leak store paths/io details to clients.
            Self::Store(_) => "Внутренняя ошибка сервера".to_owned(),
            other => other.to_string(),
        };
        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Conflict("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Forbidden("x".into()).status(),
            StatusCode::FORBIDDEN
        );
    }
}
