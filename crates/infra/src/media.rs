//! Media storage for listing photos and documents.
//!
//! Uploaded objects are keyed `<user_id>/<folder>/<timestamp>-<name>`. The
//! first segment is always the uploader's id so per-user access conventions
//! can be enforced by path prefix alone.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;

use staybook_core::{StoreError, UserId};

/// Bucket all property media lands in.
pub const MEDIA_BUCKET: &str = "properties";

const DEFAULT_FOLDER: &str = "props";

/// Object storage boundary for uploads. Writes never overwrite: a key is
/// written once or the put fails with `Conflict`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StoreError>;
}

/// Build the object key for an upload.
///
/// Folder and file name are sanitized to lowercase `[a-z0-9._/-]` (runs of
/// anything else collapse to a single `-`), duplicate slashes are dropped,
/// and the key is prefixed with the uploader's id and a millisecond
/// timestamp.
pub fn build_object_path(
    user_id: UserId,
    folder: Option<&str>,
    file_name: &str,
    now: DateTime<Utc>,
) -> String {
    let folder = match folder {
        Some(f) if !f.trim().is_empty() => sanitize(f, true),
        _ => DEFAULT_FOLDER.to_string(),
    };
    let folder = if folder.is_empty() { DEFAULT_FOLDER.to_string() } else { folder };

    let name = sanitize(file_name, false);
    let name = if name.is_empty() {
        format!("file-{}", now.timestamp_millis())
    } else {
        name
    };

    format!("{}/{}/{}-{}", user_id, folder, now.timestamp_millis(), name)
}

fn sanitize(input: &str, allow_slash: bool) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        let c = c.to_ascii_lowercase();
        let keep = c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '.'
            || c == '_'
            || c == '-'
            || (allow_slash && c == '/');
        if keep {
            // No duplicate slashes; '..' cannot survive because '/' only
            // neighbours sanitized segment characters.
            if c == '/' && out.ends_with('/') {
                continue;
            }
            out.push(c);
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches(|c| c == '/' || c == '-').to_string()
}

/// Filesystem-backed media store: objects live under `<root>/<bucket>/`.
pub struct FsMediaStore {
    root: PathBuf,
}

impl FsMediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_file(&self, path: &str) -> PathBuf {
        let mut file = self.root.join(MEDIA_BUCKET);
        // Keys come from `build_object_path`, but re-filter components so a
        // hand-built key still cannot climb out of the bucket.
        for component in path.split('/') {
            if component.is_empty() || component == "." || component == ".." {
                continue;
            }
            file.push(component);
        }
        file
    }
}

#[async_trait]
impl MediaStore for FsMediaStore {
    async fn put(&self, path: &str, content_type: &str, bytes: Vec<u8>) -> Result<(), StoreError> {
        let file = self.object_file(path);
        let parent = file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| StoreError::unavailable(format!("create media dir: {e}")))?;

        let mut open = tokio::fs::OpenOptions::new();
        open.write(true).create_new(true);
        let mut handle = match open.open(&file).await {
            Ok(handle) => handle,
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(StoreError::conflict(format!("object exists: {path}")));
            }
            Err(e) => return Err(StoreError::unavailable(format!("open media file: {e}"))),
        };

        handle
            .write_all(&bytes)
            .await
            .map_err(|e| StoreError::unavailable(format!("write media file: {e}")))?;

        tracing::debug!(%path, content_type, size = bytes.len(), "stored media object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_path_is_user_prefixed_and_sanitized() {
        let user = UserId::new();
        let now = Utc::now();
        let path = build_object_path(user, Some("Props/Min Annons"), "Sjöstuga (1).JPG", now);

        let mut parts = path.splitn(2, '/');
        assert_eq!(parts.next().unwrap(), user.to_string());
        let rest = parts.next().unwrap();
        assert!(rest.starts_with("props/min-annons/"));
        assert!(rest.ends_with("-sj-stuga-1-.jpg"));
        assert!(!path.contains(".."));
    }

    #[test]
    fn missing_folder_falls_back_to_default() {
        let path = build_object_path(UserId::new(), None, "photo.png", Utc::now());
        assert!(path.contains("/props/"));

        let path = build_object_path(UserId::new(), Some("///"), "photo.png", Utc::now());
        assert!(path.contains("/props/"));
    }

    #[test]
    fn empty_file_name_gets_a_generated_one() {
        let now = Utc::now();
        let path = build_object_path(UserId::new(), None, "", now);
        assert!(path.ends_with(&format!("file-{}", now.timestamp_millis())));
    }

    #[tokio::test]
    async fn put_writes_once_and_rejects_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        store.put("user/props/1-a.jpg", "image/jpeg", vec![1, 2, 3]).await.unwrap();
        let on_disk = dir.path().join(MEDIA_BUCKET).join("user/props/1-a.jpg");
        assert_eq!(std::fs::read(on_disk).unwrap(), vec![1, 2, 3]);

        let err = store
            .put("user/props/1-a.jpg", "image/jpeg", vec![4])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn traversal_components_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsMediaStore::new(dir.path());

        store.put("../../escape/../x.bin", "application/octet-stream", vec![0]).await.unwrap();
        assert!(dir.path().join(MEDIA_BUCKET).join("escape/x.bin").exists());
    }
}
