// ABOUTME: Local media storage for recipe images delivered as base64 data URIs
// ABOUTME: Decodes, writes under MEDIA_ROOT/recipes/<uuid>.<ext> and builds public URLs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram contributors

use std::path::{Component, Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::constants::{limits, media};
use crate::errors::{AppError, AppResult};

const IMAGE_FIELD: &str = "image";

/// Decoded image ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// File extension without the dot
    pub extension: String,
    /// Raw bytes
    pub bytes: Vec<u8>,
}

/// Parse `data:image/<ext>;base64,<payload>`
///
/// # Errors
///
/// Returns a field error on `image` for a malformed URI, an unsupported
/// extension, bad base64 or an oversized payload
pub fn decode_data_uri(value: &str) -> AppResult<DecodedImage> {
    let rest = value
        .trim()
        .strip_prefix("data:image/")
        .ok_or_else(|| AppError::field(IMAGE_FIELD, "Expected a data:image/...;base64 URI."))?;
    let (extension, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| AppError::field(IMAGE_FIELD, "Expected a data:image/...;base64 URI."))?;

    let extension = extension.to_ascii_lowercase();
    if !media::ALLOWED_IMAGE_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::field(
            IMAGE_FIELD,
            format!("Unsupported image type: {extension}."),
        ));
    }

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| AppError::field(IMAGE_FIELD, format!("Invalid base64 image data: {e}")))?;

    if bytes.is_empty() {
        return Err(AppError::field(IMAGE_FIELD, "The submitted image is empty."));
    }
    if bytes.len() > limits::MAX_IMAGE_BYTES {
        return Err(AppError::field(IMAGE_FIELD, "The submitted image is too large."));
    }

    Ok(DecodedImage { extension, bytes })
}

/// Filesystem-backed media storage
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStorage {
    /// Create storage rooted at the configured directory
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            url_prefix: config.url_prefix.clone(),
        }
    }

    /// Directory served under the media URL
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decode a data URI and store it as a new recipe image
    ///
    /// Returns the media-relative path (`recipes/<uuid>.<ext>`).
    ///
    /// # Errors
    ///
    /// Returns a field error for invalid image data, or a storage error when
    /// the file cannot be written
    pub async fn save_recipe_image(&self, data_uri: &str) -> AppResult<String> {
        let image = decode_data_uri(data_uri)?;
        let relative = format!(
            "{}/{}.{}",
            media::RECIPE_IMAGE_DIR,
            Uuid::new_v4().simple(),
            image.extension
        );
        let file_path = self.root.join(&relative);

        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&file_path, &image.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {relative}: {e}")))?;

        debug!(path = %relative, bytes = image.bytes.len(), "Stored recipe image");
        Ok(relative)
    }

    /// Public URL of a stored path
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.url_prefix, path.trim_start_matches('/'))
    }

    /// Delete a stored file; failures are logged and otherwise ignored
    pub async fn remove(&self, path: &str) {
        let Some(file_path) = self.resolve(path) else {
            warn!(path, "Refusing to remove media path outside the media root");
            return;
        };

        match tokio::fs::remove_file(&file_path).await {
            Ok(()) => debug!(path, "Removed media file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path, error = %e, "Failed to remove media file"),
        }
    }

    /// Join a relative path onto the root, rejecting traversal
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
            .then(|| self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

    fn storage(root: &Path) -> MediaStorage {
        MediaStorage::new(&MediaConfig {
            root: root.to_path_buf(),
            url_prefix: "/media/".to_owned(),
        })
    }

    #[test]
    fn test_decode_data_uri() {
        let image = decode_data_uri(&format!("data:image/png;base64,{PNG}")).unwrap();
        assert_eq!(image.extension, "png");
        assert!(image.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_decode_rejects_bad_input() {
        for value in [
            "not a data uri",
            "data:image/png,abc",
            "data:image/bmp;base64,AAAA",
            "data:image/png;base64,!!!",
            "data:image/png;base64,",
        ] {
            let err = decode_data_uri(value).unwrap_err();
            assert_eq!(err.http_status(), 400, "{value}");
            assert!(err.field_errors().unwrap().contains_key("image"));
        }
    }

    #[tokio::test]
    async fn test_save_and_remove() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let path = storage
            .save_recipe_image(&format!("data:image/png;base64,{PNG}"))
            .await
            .unwrap();
        assert!(path.starts_with("recipes/"));
        assert!(path.ends_with(".png"));
        assert!(dir.path().join(&path).exists());
        assert_eq!(storage.url(&path), format!("/media/{path}"));

        storage.remove(&path).await;
        assert!(!dir.path().join(&path).exists());
        // Second removal is a silent no-op
        storage.remove(&path).await;
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let storage = storage(Path::new("/srv/media"));
        assert!(storage.resolve("../etc/passwd").is_none());
        assert_eq!(
            storage.resolve("recipes/a.png"),
            Some(PathBuf::from("/srv/media/recipes/a.png"))
        );
    }
}
