// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use std::env;
use std::path::PathBuf;

use tracing::warn;

/// Runtime configuration, read once at startup from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    /// Bearer token granting admin-level access.
    pub admin_token: Option<String>,
    /// Bearer token granting superadmin-level access.
    pub superadmin_token: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        let port = parse_or("TROPA_PORT", 8080);
        let data_dir = PathBuf::from(string_or("TROPA_DATA_DIR", "data"));
        let uploads_dir = PathBuf::from(string_or("TROPA_UPLOADS_DIR", "uploads"));
        let admin_token = non_empty_env("TROPA_ADMIN_TOKEN");
        let superadmin_token = non_empty_env("TROPA_SUPERADMIN_TOKEN");

        if admin_token.is_none() && superadmin_token.is_none() {
            warn!("no admin tokens configured, admin API is unreachable");
        }

        Self {
            port,
            data_dir,
            uploads_dir,
            admin_token,
            superadmin_token,
        }
    }
}

fn string_or(key: &str, default: &str) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or_else(|| default.to_owned())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_or(key: &str, default: u16) -> u16 {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!(key, raw, default, "unparseable value, using default");
            default
        }),
        Err(_) => default,
    }
}
