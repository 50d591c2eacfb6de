// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Production capability bootstrap: filesystem content plus SQLite records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use omniconvo_config::OmniConfig;
use omniconvo_core::{Bootstrap, Capabilities, ContentStore, OmniError, RecordStore};
use omniconvo_storage::{FsContentStore, SqliteRecordStore};

/// Builds and initializes both storage capabilities from a loaded configuration.
pub struct StorageBootstrap {
    config: OmniConfig,
}

impl StorageBootstrap {
    pub fn new(config: OmniConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Bootstrap for StorageBootstrap {
    async fn bootstrap(&self) -> Result<Capabilities, OmniError> {
        let content = FsContentStore::new(self.config.storage.clone());
        content.initialize().await?;

        let records = SqliteRecordStore::new(self.config.database.clone());
        records.initialize().await?;

        info!(
            content_root = %self.config.storage.root,
            database = %self.config.database.path,
            "storage opened"
        );

        Ok(Capabilities {
            content: Arc::new(content),
            records: Arc::new(records),
            base_url: self.config.base_url.clone(),
        })
    }
}
