// SPDX-FileCopyrightText: 2026 Tropa Authors
// SPDX-License-Identifier: LicenseRef-Tropa-Proprietary
//
// This file is part of Tropa and is proprietary software.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{Document, StoreError};

/// Document store rooted at a data directory. Cheap to clone around handler
/// state; all methods take `&self` and rely on the filesystem's atomic rename
/// for per-document write atomicity.
#[derive(Debug, Clone)]
pub struct FolderStore {
    root: PathBuf,
}

impl FolderStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|source| StoreError::Io {
            path: root.clone(),
            source,
        })?;
        Ok(Self { root })
    }

    pub fn get<T: Document>(&self, id: &str) -> Result<Option<T>, StoreError> {
        let path = self.doc_path::<T>(id)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let doc = serde_json::from_slice(&bytes).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        Ok(Some(doc))
    }

    pub fn put<T: Document>(&self, doc: &T) -> Result<(), StoreError> {
        let path = self.doc_path::<T>(doc.doc_id())?;
        let dir = self.collection_dir::<T>();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        let json = serde_json::to_vec_pretty(doc).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        write_atomic(&path, &json)
    }

    /// Returns `true` when a document was actually removed.
    pub fn delete<T: Document>(&self, id: &str) -> Result<bool, StoreError> {
        let path = self.doc_path::<T>(id)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }

    /// Loads every document in the collection. Ordering is unspecified;
    /// callers sort as needed.
    pub fn list<T: Document>(&self) -> Result<Vec<T>, StoreError> {
        let dir = self.collection_dir::<T>();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };
        let mut docs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let bytes = fs::read(&path).map_err(|source| StoreError::Io {
                path: path.clone(),
                source,
            })?;
            let doc = serde_json::from_slice(&bytes)
                .map_err(|source| StoreError::Json { path, source })?;
            docs.push(doc);
        }
        Ok(docs)
    }

    pub fn count<T: Document>(&self) -> Result<usize, StoreError> {
        let dir = self.collection_dir::<T>();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(source) => return Err(StoreError::Io { path: dir, source }),
        };
        let mut n = 0;
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: dir.clone(),
                source,
            })?;
            if entry.path().extension().and_then(|e| e.to_str()) == Some("json") {
                n += 1;
            }
        }
        Ok(n)
    }

    fn collection_dir<T: Document>(&self) -> PathBuf {
        self.root.join(T::COLLECTION)
    }

    fn doc_path<T: Document>(&self, id: &str) -> Result<PathBuf, StoreError> {
        validate_doc_id(id)?;
        Ok(self.collection_dir::<T>().join(format!("{id}.json")))
    }
}

/// Ids become file stems, so anything resembling path traversal is refused.
fn validate_doc_id(id: &str) -> Result<(), StoreError> {
    let ok = !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidDocId {
            value: id.to_owned(),
        })
    }
}

/// Write to a sibling temp file, then rename over the target. Readers see
/// either the old or the new document, never a torn write.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
    let mut file = fs::File::create(&tmp).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    file.write_all(bytes).map_err(|source| StoreError::Io {
        path: tmp.clone(),
        source,
    })?;
    drop(file);
    fs::rename(&tmp, path).map_err(|source| {
        let _ = fs::remove_file(&tmp);
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    })
}
