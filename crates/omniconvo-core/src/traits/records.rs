// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait for conversation metadata.

use async_trait::async_trait;

use crate::error::OmniError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ConversationRecord, NewConversationRecord};

/// Owner of structured conversation records.
#[async_trait]
pub trait RecordStore: PluginAdapter {
    /// Initializes the backend (connection, migrations).
    async fn initialize(&self) -> Result<(), OmniError>;

    /// Creates a record, assigning its `id` and `created_at`.
    async fn create(&self, input: NewConversationRecord) -> Result<ConversationRecord, OmniError>;

    /// Looks up a record by id.
    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError>;

    /// Bumps the view counter and returns the updated record, or `None` for an unknown id.
    async fn increment_views(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError>;
}
