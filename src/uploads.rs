//! Photo uploads for stores and products.
//!
//! Files land under `MEDIA_ROOT/<kind>/<uuid>.<ext>`; the row keeps the
//! relative path, which is also the public path under `/media`.

use std::{future::Future, path::Path};

use axum::{body::Bytes, extract::Multipart};
use uuid::Uuid;

use crate::{error::AppResult, validation::field_error};

pub const PHOTO_FIELD: &str = "photo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Stores,
    Products,
}

impl MediaKind {
    pub fn dir(self) -> &'static str {
        match self {
            MediaKind::Stores => "stores",
            MediaKind::Products => "products",
        }
    }
}

#[derive(Debug)]
pub struct PhotoUpload {
    pub extension: &'static str,
    pub bytes: Bytes,
}

/// File extension for an accepted image content type.
pub fn extension_for(content_type: &str) -> Option<&'static str> {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.as_str() {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}

/// Checks type and size of a received file.
pub fn accept_photo(
    content_type: Option<&str>,
    bytes: Bytes,
    max_bytes: usize,
) -> AppResult<PhotoUpload> {
    let extension = content_type
        .and_then(extension_for)
        .ok_or_else(|| field_error(PHOTO_FIELD, "only jpeg, png, webp or gif images are accepted"))?;
    if bytes.is_empty() {
        return Err(field_error(PHOTO_FIELD, "the file is empty"));
    }
    if bytes.len() > max_bytes {
        return Err(field_error(
            PHOTO_FIELD,
            format!("the file exceeds {} bytes", max_bytes),
        ));
    }
    Ok(PhotoUpload { extension, bytes })
}

/// Pulls the `photo` field out of a multipart body, skipping other fields.
pub async fn read_photo(multipart: &mut Multipart, max_bytes: usize) -> AppResult<PhotoUpload> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTO_FIELD) {
            continue;
        }
        let content_type = field.content_type().map(str::to_owned);
        let bytes = field.bytes().await?;
        return accept_photo(content_type.as_deref(), bytes, max_bytes);
    }
    Err(field_error(PHOTO_FIELD, "a photo file is required"))
}

/// Writes the photo and returns its path relative to the media root.
pub async fn store_photo(
    media_root: &Path,
    kind: MediaKind,
    upload: &PhotoUpload,
) -> AppResult<String> {
    let relative = format!("{}/{}.{}", kind.dir(), Uuid::new_v4(), upload.extension);
    let dir = media_root.join(kind.dir());
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| anyhow::anyhow!("creating {}: {}", dir.display(), e))?;
    let path = media_root.join(&relative);
    tokio::fs::write(&path, &upload.bytes)
        .await
        .map_err(|e| anyhow::anyhow!("writing {}: {}", path.display(), e))?;
    tracing::debug!(path = %path.display(), size = upload.bytes.len(), "photo stored");
    Ok(relative)
}

/// Best-effort removal of a replaced photo.
pub async fn remove_photo(media_root: &Path, relative: &str) {
    if relative.contains("..") {
        return;
    }
    if let Err(err) = tokio::fs::remove_file(media_root.join(relative)).await {
        tracing::warn!(error = %err, path = relative, "failed to remove old photo");
    }
}

/// Awaits `save`; if it fails the freshly written photo is deleted again.
pub async fn save_or_discard<T, F>(media_root: &Path, relative: &str, save: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let saved = save.await;
    if saved.is_err() {
        remove_photo(media_root, relative).await;
    }
    saved
}
