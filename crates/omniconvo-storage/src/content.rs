// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Filesystem implementation of the ContentStore trait.
//!
//! Keys have the form `{key_prefix}/{id}.md` and map to files under the
//! configured root. Content is written to a hidden temporary sibling, flushed,
//! and renamed into place, so a key only becomes visible once fully written.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use omniconvo_config::model::ContentStorageConfig;
use omniconvo_core::{AdapterType, ContentStore, HealthStatus, OmniError, PluginAdapter};

/// Content store rooted at a local directory.
pub struct FsContentStore {
    root: PathBuf,
    key_prefix: String,
}

impl FsContentStore {
    /// Create a new store. Nothing touches the filesystem until [`ContentStore::initialize`].
    pub fn new(config: ContentStorageConfig) -> Self {
        Self {
            root: PathBuf::from(config.root),
            key_prefix: config.key_prefix.trim_matches('/').to_string(),
        }
    }

    /// The content key an identifier is stored under.
    pub fn key_for(&self, id: &str) -> String {
        format!("{}/{id}.md", self.key_prefix)
    }

    fn path_for_key(&self, key: &str) -> Result<PathBuf, OmniError> {
        let relative = Path::new(key);
        let is_plain = !key.is_empty()
            && !key.contains('\\')
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !is_plain {
            return Err(OmniError::InvalidInput(format!(
                "content key `{key}` is not a relative path"
            )));
        }
        Ok(self.root.join(relative))
    }

    fn content_err(message: String, e: std::io::Error) -> OmniError {
        OmniError::Content {
            message,
            source: Some(Box::new(e)),
        }
    }
}

fn validate_id(id: &str) -> Result<(), OmniError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(OmniError::InvalidInput(format!(
            "content id `{id}` must be non-empty ASCII alphanumerics, '-' or '_'"
        )))
    }
}

#[async_trait]
impl PluginAdapter for FsContentStore {
    fn name(&self) -> &str {
        "filesystem"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContentStore
    }

    async fn health_check(&self) -> Result<HealthStatus, OmniError> {
        match tokio::fs::metadata(&self.root).await {
            Ok(meta) if meta.is_dir() => Ok(HealthStatus::Healthy),
            Ok(_) => Ok(HealthStatus::Unhealthy(format!(
                "{} is not a directory",
                self.root.display()
            ))),
            Err(e) => Ok(HealthStatus::Unhealthy(e.to_string())),
        }
    }

    async fn shutdown(&self) -> Result<(), OmniError> {
        Ok(())
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    async fn initialize(&self) -> Result<(), OmniError> {
        let dir = self.root.join(&self.key_prefix);
        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            Self::content_err(format!("failed to create {}", dir.display()), e)
        })?;
        debug!(root = %self.root.display(), "filesystem content store initialized");
        Ok(())
    }

    async fn store_conversation(&self, id: &str, content: &str) -> Result<String, OmniError> {
        validate_id(id)?;
        let key = self.key_for(id);
        let path = self.path_for_key(&key)?;

        let exists = tokio::fs::try_exists(&path)
            .await
            .map_err(|e| Self::content_err(format!("failed to stat {key}"), e))?;
        if exists {
            return Err(OmniError::Content {
                message: format!("content key {key} already exists"),
                source: None,
            });
        }

        let tmp = path.with_file_name(format!(".{id}.{}.tmp", uuid::Uuid::new_v4()));
        let write = async {
            let mut file = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&tmp)
                .await?;
            file.write_all(content.as_bytes()).await?;
            file.sync_all().await?;
            tokio::fs::rename(&tmp, &path).await
        };

        if let Err(e) = write.await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                warn!(path = %tmp.display(), error = %cleanup, "failed to remove temporary content file");
            }
            return Err(Self::content_err(format!("failed to write {key}"), e));
        }

        debug!(key = %key, bytes = content.len(), "stored conversation content");
        Ok(key)
    }

    async fn fetch_conversation(&self, key: &str) -> Result<Option<String>, OmniError> {
        let path = self.path_for_key(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::content_err(format!("failed to read {key}"), e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn store_at(root: &Path) -> FsContentStore {
        FsContentStore::new(ContentStorageConfig {
            root: root.to_string_lossy().into_owned(),
            key_prefix: "conversations".to_string(),
        })
    }

    #[tokio::test]
    async fn store_then_fetch_is_byte_identical() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        store.initialize().await.unwrap();

        let content = "### Human\nhéllo ✓\n\n---\n\n### Assistant\nhi";
        let key = store.store_conversation("abc-123", content).await.unwrap();
        assert_eq!(key, "conversations/abc-123.md");

        let fetched = store.fetch_conversation(&key).await.unwrap();
        assert_eq!(fetched.as_deref(), Some(content));
    }

    #[tokio::test]
    async fn keys_are_write_once() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        store.initialize().await.unwrap();

        store.store_conversation("dup", "first").await.unwrap();
        let second = store.store_conversation("dup", "second").await;
        assert!(matches!(second, Err(OmniError::Content { .. })));

        let fetched = store.fetch_conversation("conversations/dup.md").await.unwrap();
        assert_eq!(fetched.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn no_temporary_files_remain_after_store() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        store.initialize().await.unwrap();
        store.store_conversation("clean", "body").await.unwrap();

        let names: Vec<String> = std::fs::read_dir(dir.path().join("conversations"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["clean.md".to_string()]);
    }

    #[tokio::test]
    async fn unsafe_ids_are_rejected() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        store.initialize().await.unwrap();

        for id in ["", "../escape", "a/b", "with space"] {
            let result = store.store_conversation(id, "x").await;
            assert!(
                matches!(result, Err(OmniError::InvalidInput(_))),
                "id {id:?} should be rejected"
            );
        }
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected_on_fetch() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());

        for key in ["../etc/passwd", "/etc/passwd", "a\\b", ""] {
            assert!(store.fetch_conversation(key).await.is_err(), "{key:?}");
        }
    }

    #[tokio::test]
    async fn fetch_missing_key_returns_none() {
        let dir = tempdir().unwrap();
        let store = store_at(dir.path());
        store.initialize().await.unwrap();
        assert_eq!(
            store.fetch_conversation("conversations/none.md").await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn store_fails_when_root_is_unwritable() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();
        let store = store_at(&blocker);

        assert!(store.store_conversation("x", "body").await.is_err());
        assert!(matches!(
            store.health_check().await.unwrap(),
            HealthStatus::Unhealthy(_)
        ));
    }
}
