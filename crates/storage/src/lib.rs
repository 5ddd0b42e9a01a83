//! # FitGym Storage
//!
//! The file storage collaborator for uploaded images. Uploads are written
//! below a media root, in one directory per entity kind, and addressed by a
//! relative reference such as `imagenes_entrenamiento/espalda.png`. That
//! reference is what the database stores.
//!
//! Writes and deletes here are not transactional with the database row that
//! points at the file. Callers order the two steps and log when the second
//! one fails.

pub mod error;

pub use error::StorageError;

use core_types::{ImageUpload, MediaKind};
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Attempts at finding a free file name before giving up.
const MAX_NAME_ATTEMPTS: usize = 16;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    default_image: String,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>, default_image: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            default_image: default_image.into(),
        }
    }

    /// The reference stored when no file was uploaded.
    pub fn default_image(&self) -> &str {
        &self.default_image
    }

    pub fn is_default(&self, reference: &str) -> bool {
        reference == self.default_image
    }

    /// Writes an upload and returns its reference.
    ///
    /// The submitted file name is sanitized; if it is already taken a short
    /// random suffix is appended to the stem. Existing files are never overwritten.
    pub async fn save(&self, kind: MediaKind, upload: &ImageUpload) -> Result<String, StorageError> {
        let dir = self.root.join(kind.upload_dir());
        tokio::fs::create_dir_all(&dir).await?;

        let (stem, ext) = sanitize_file_name(&upload.file_name);
        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                join_name(&stem, ext.as_deref())
            } else {
                let suffix = uuid::Uuid::new_v4().simple().to_string();
                join_name(&format!("{stem}_{}", &suffix[..7]), ext.as_deref())
            };

            let path = dir.join(&name);
            let file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await;
            match file {
                Ok(mut file) => {
                    file.write_all(&upload.bytes).await?;
                    file.flush().await?;
                    let reference = format!("{}/{}", kind.upload_dir(), name);
                    tracing::info!(%reference, bytes = upload.bytes.len(), "Image stored.");
                    return Ok(reference);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free file name for '{}'", upload.file_name),
        )))
    }

    /// Removes the file behind `reference`.
    ///
    /// The default placeholder is never removed and a file that is already gone
    /// is not an error. Returns whether a file was actually deleted.
    pub async fn delete(&self, reference: &str) -> Result<bool, StorageError> {
        if self.is_default(reference) {
            return Ok(false);
        }
        let path = self.path_for(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(%reference, "Image deleted.");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(%reference, "Image already absent.");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves a reference to a path inside the media root.
    pub fn path_for(&self, reference: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(reference);
        let escapes = reference.is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(StorageError::InvalidReference(reference.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

/// Reduces a submitted file name to a `(stem, extension)` pair of its last
/// path segment, keeping only `[A-Za-z0-9._-]` (spaces become underscores).
/// Stem and extension are cleaned apart, so an emptied stem keeps its extension.
fn sanitize_file_name(raw: &str) -> (String, Option<String>) {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) => (stem, Some(ext)),
        None => (base, None),
    };

    let stem = clean_component(stem);
    let stem = stem.trim_start_matches('.');
    let stem = if stem.is_empty() { "imagen" } else { stem };
    let ext = ext
        .map(|ext| clean_component(ext).to_ascii_lowercase())
        .filter(|ext| !ext.is_empty());
    (stem.to_string(), ext)
}

fn clean_component(raw: &str) -> String {
    raw.chars()
        .filter_map(|c| match c {
            ' ' => Some('_'),
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') => Some(c),
            _ => None,
        })
        .collect()
}

fn join_name(stem: &str, ext: Option<&str>) -> String {
    match ext {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem.to_string(),
    }
}
