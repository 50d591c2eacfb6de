// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the capability traits and the protocol server.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::traits::{ContentStore, PluginAdapter, RecordStore};

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of capability an adapter provides.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    RecordStore,
    ContentStore,
}

/// Metadata for a saved conversation, as owned by the record store.
///
/// `id` and `created_at` are assigned by the store. `content_key` points at
/// the transcript blob and never changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationRecord {
    pub id: String,
    /// Label of the source AI platform.
    pub model: String,
    /// ISO 8601 timestamp supplied by the pipeline.
    pub scraped_at: String,
    /// ISO 8601 timestamp assigned by the record store.
    pub created_at: String,
    /// Byte length of the stored transcript at creation time.
    pub source_html_bytes: u64,
    pub views: u64,
    pub content_key: String,
}

/// Input for creating a [`ConversationRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewConversationRecord {
    pub model: String,
    pub scraped_at: String,
    pub source_html_bytes: u64,
    pub views: u64,
    pub content_key: String,
}

/// Configured capability handles, produced once by a [`crate::Bootstrap`].
#[derive(Clone)]
pub struct Capabilities {
    /// Storage gateway holding transcript bytes.
    pub content: Arc<dyn ContentStore>,
    /// Record store holding conversation metadata.
    pub records: Arc<dyn RecordStore>,
    /// Public base URL used to build permalinks.
    pub base_url: String,
}

impl std::fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Capabilities")
            .field("content", &self.content.name())
            .field("records", &self.records.name())
            .field("base_url", &self.base_url)
            .finish()
    }
}
