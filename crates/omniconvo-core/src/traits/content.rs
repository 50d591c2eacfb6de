// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage gateway trait for conversation transcript bytes.

use async_trait::async_trait;

use crate::error::OmniError;
use crate::traits::adapter::PluginAdapter;

/// Exclusive owner of transcript content, addressed by opaque keys.
///
/// Keys are write-once: storing under an identifier that already has content
/// is an error.
#[async_trait]
pub trait ContentStore: PluginAdapter {
    /// Prepares the backend (directories, buckets, credentials).
    async fn initialize(&self) -> Result<(), OmniError>;

    /// Stores `content` under a key derived from `id` and returns the canonical key.
    ///
    /// The returned key must only be observable once the full content is durable.
    async fn store_conversation(&self, id: &str, content: &str) -> Result<String, OmniError>;

    /// Reads the content stored under `key`, or `None` if nothing is there.
    async fn fetch_conversation(&self, key: &str) -> Result<Option<String>, OmniError>;
}
