// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

//! Upload handling. Raster images are re-encoded to lossless WebP before
//! hitting disk; SVG passes through untouched because it is already compact
//! and re-encoding would rasterize it.

use std::fs;
use std::path::Path;

use image::codecs::webp::WebPEncoder;
use image::DynamicImage;
use tracing::warn;

use crate::error::ApiError;
use crate::model::Media;
use crate::store::FolderStore;

use super::new_id;

pub struct Upload {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

pub fn store_upload(
    store: &FolderStore,
    uploads_dir: &Path,
    upload: Upload,
) -> Result<Media, ApiError> {
    if upload.bytes.is_empty() {
        return Err(ApiError::Validation("Пустой файл".to_owned()));
    }

    let is_svg = upload.content_type == "image/svg+xml"
        || upload
            .original_name
            .rsplit('.')
            .next()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));

    let (bytes, ext, mimetype) = if is_svg {
        (upload.bytes, ".svg", "image/svg+xml".to_owned())
    } else {
        let decoded = image::load_from_memory(&upload.bytes).map_err(|_| {
            ApiError::Validation("Не удалось обработать изображение".to_owned())
        })?;
        let mut webp = Vec::new();
        let encoder = WebPEncoder::new_lossless(&mut webp);
        DynamicImage::ImageRgba8(decoded.to_rgba8())
            .write_with_encoder(encoder)
            .map_err(|_| {
                ApiError::Validation("Не удалось обработать изображение".to_owned())
            })?;
        (webp, ".webp", "image/webp".to_owned())
    };

    let filename = format!(
        "{}-{}{}",
        chrono::Utc::now().timestamp_millis(),
        &new_id()[..9],
        ext
    );
    fs::create_dir_all(uploads_dir).map_err(|source| io_error(uploads_dir, source))?;
    let path = uploads_dir.join(&filename);
    let size = bytes.len() as u64;
    fs::write(&path, &bytes).map_err(|source| io_error(&path, source))?;

    let media = Media {
        id: new_id(),
        filename: filename.clone(),
        url: format!("/uploads/{filename}"),
        mimetype,
        size,
        created_at: chrono::Utc::now(),
    };
    store.put(&media)?;
    Ok(media)
}

pub fn list_media(store: &FolderStore) -> Result<Vec<Media>, ApiError> {
    let mut media = store.list::<Media>()?;
    media.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(media)
}

/// Drops the index record; the file removal is best-effort so a missing
/// file never blocks the delete.
pub fn delete_media(store: &FolderStore, uploads_dir: &Path, id: &str) -> Result<(), ApiError> {
    let Some(media) = store.get::<Media>(id)? else {
        return Err(ApiError::NotFound("Файл не найден".to_owned()));
    };
    store.delete::<Media>(id)?;
    let path = uploads_dir.join(&media.filename);
    if let Err(error) = fs::remove_file(&path) {
        if error.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), %error, "upload file removal failed");
        }
    }
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> ApiError {
    ApiError::Store(crate::store::StoreError::Io {
        path: path.to_owned(),
        source,
    })
}
