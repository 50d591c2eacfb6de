// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock record store for deterministic testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use omniconvo_core::traits::adapter::PluginAdapter;
use omniconvo_core::traits::records::RecordStore;
use omniconvo_core::types::{
    AdapterType, ConversationRecord, HealthStatus, NewConversationRecord,
};
use omniconvo_core::OmniError;

/// Fixed creation timestamp so assertions stay deterministic.
pub const MOCK_CREATED_AT: &str = "2026-01-01T00:00:00.000Z";

/// An in-memory [`RecordStore`] that hands out ids `rec-1`, `rec-2`, ...
pub struct MockRecordStore {
    records: Mutex<Vec<ConversationRecord>>,
    next_id: AtomicUsize,
    fail_creates: AtomicBool,
    create_calls: AtomicUsize,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_creates: AtomicBool::new(false),
            create_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    /// Number of `create` calls, failed ones included.
    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub async fn records(&self) -> Vec<ConversationRecord> {
        self.records.lock().await.clone()
    }
}

impl Default for MockRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockRecordStore {
    fn name(&self) -> &str {
        "mock-records"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, OmniError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmniError> {
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn initialize(&self) -> Result<(), OmniError> {
        Ok(())
    }

    async fn create(&self, input: NewConversationRecord) -> Result<ConversationRecord, OmniError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_creates.load(Ordering::SeqCst) {
            return Err(OmniError::Storage {
                source: "mock record store unavailable".into(),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = ConversationRecord {
            id: format!("rec-{n}"),
            model: input.model,
            scraped_at: input.scraped_at,
            created_at: MOCK_CREATED_AT.to_string(),
            source_html_bytes: input.source_html_bytes,
            views: input.views,
            content_key: input.content_key,
        };
        self.records.lock().await.push(record.clone());
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn increment_views(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError> {
        let mut records = self.records.lock().await;
        Ok(records.iter_mut().find(|r| r.id == id).map(|r| {
            r.views += 1;
            r.clone()
        }))
    }
}
