// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The save path: render, store the blob, then create the record.

use std::sync::Arc;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use omniconvo_core::{
    ContentStore, ConversationRecord, NewConversationRecord, OmniError, RecordStore,
};

use crate::runtime::LazyRuntime;
use crate::transcript::{TranscriptInput, render_transcript};

/// Source platform label stored with every conversation.
pub const DEFAULT_MODEL: &str = "Claude";

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedConversation {
    pub permalink: String,
    pub record: ConversationRecord,
}

/// A conversation as served to viewers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewedConversation {
    pub record: ConversationRecord,
    pub content: String,
}

pub struct ConversationPipeline {
    runtime: Arc<LazyRuntime>,
}

impl ConversationPipeline {
    pub fn new(runtime: Arc<LazyRuntime>) -> Self {
        Self { runtime }
    }

    pub fn runtime(&self) -> &LazyRuntime {
        &self.runtime
    }

    /// Persists a conversation and returns its permalink.
    ///
    /// The content blob is written before the record so a record never points
    /// at missing content. A failed record write can leave an unreferenced blob.
    pub async fn save(
        &self,
        input: &TranscriptInput,
        title: Option<&str>,
    ) -> Result<SavedConversation, OmniError> {
        input.validate()?;
        let caps = self.runtime.ensure_initialized().await?;

        let transcript = render_transcript(input, title);
        let content_id = Uuid::new_v4().to_string();
        let scraped_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

        let content_key = caps
            .content
            .store_conversation(&content_id, &transcript)
            .await?;
        debug!(content_key = %content_key, "transcript stored");

        let record = caps
            .records
            .create(NewConversationRecord {
                model: DEFAULT_MODEL.to_string(),
                scraped_at,
                source_html_bytes: transcript.len() as u64,
                views: 0,
                content_key,
            })
            .await?;

        info!(
            record_id = %record.id,
            content_key = %record.content_key,
            bytes = record.source_html_bytes,
            "conversation saved"
        );

        Ok(SavedConversation {
            permalink: permalink(&caps.base_url, &record.id),
            record,
        })
    }

    /// Loads a conversation for display and counts the view.
    ///
    /// The view is only counted once the content has been read.
    pub async fn view(&self, id: &str) -> Result<ViewedConversation, OmniError> {
        let caps = self.runtime.ensure_initialized().await?;
        let not_found = || OmniError::NotFound {
            kind: "conversation".into(),
            id: id.to_string(),
        };

        let record = caps.records.get(id).await?.ok_or_else(not_found)?;

        let content = caps
            .content
            .fetch_conversation(&record.content_key)
            .await?
            .ok_or_else(|| OmniError::Content {
                message: format!(
                    "content {} missing for conversation {}",
                    record.content_key, record.id
                ),
                source: None,
            })?;

        let record = caps
            .records
            .increment_views(id)
            .await?
            .ok_or_else(not_found)?;

        Ok(ViewedConversation { record, content })
    }
}

/// Public address of a saved conversation.
pub fn permalink(base_url: &str, id: &str) -> String {
    format!("{}/conversation/{id}", base_url.trim_end_matches('/'))
}
