// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock storage gateway for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use omniconvo_core::traits::adapter::PluginAdapter;
use omniconvo_core::traits::content::ContentStore;
use omniconvo_core::types::{AdapterType, HealthStatus};
use omniconvo_core::OmniError;

/// An in-memory [`ContentStore`] keyed as `conversations/{id}.md`.
///
/// Writes are write-once like the real gateway. Flip
/// [`set_fail_writes`](Self::set_fail_writes) to simulate an unavailable backend.
pub struct MockContentStore {
    blobs: Mutex<HashMap<String, String>>,
    fail_writes: AtomicBool,
    store_calls: AtomicUsize,
}

impl MockContentStore {
    pub fn new() -> Self {
        Self {
            blobs: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            store_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of `store_conversation` calls, failed ones included.
    pub fn store_calls(&self) -> usize {
        self.store_calls.load(Ordering::SeqCst)
    }

    pub async fn blob_count(&self) -> usize {
        self.blobs.lock().await.len()
    }

    pub async fn blob(&self, key: &str) -> Option<String> {
        self.blobs.lock().await.get(key).cloned()
    }

    /// Drops a stored blob, leaving any record that points at it dangling.
    pub async fn remove_blob(&self, key: &str) -> Option<String> {
        self.blobs.lock().await.remove(key)
    }
}

impl Default for MockContentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockContentStore {
    fn name(&self) -> &str {
        "mock-content"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::ContentStore
    }

    async fn health_check(&self) -> Result<HealthStatus, OmniError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmniError> {
        Ok(())
    }
}

#[async_trait]
impl ContentStore for MockContentStore {
    async fn initialize(&self) -> Result<(), OmniError> {
        Ok(())
    }

    async fn store_conversation(&self, id: &str, content: &str) -> Result<String, OmniError> {
        self.store_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(OmniError::Content {
                message: "mock content write failure".into(),
                source: None,
            });
        }

        let key = format!("conversations/{id}.md");
        let mut blobs = self.blobs.lock().await;
        if blobs.contains_key(&key) {
            return Err(OmniError::Content {
                message: format!("content key already exists: {key}"),
                source: None,
            });
        }
        blobs.insert(key.clone(), content.to_string());
        Ok(key)
    }

    async fn fetch_conversation(&self, key: &str) -> Result<Option<String>, OmniError> {
        Ok(self.blobs.lock().await.get(key).cloned())
    }
}
