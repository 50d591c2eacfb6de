// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the RecordStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use omniconvo_config::model::DatabaseConfig;
use omniconvo_core::{
    AdapterType, ConversationRecord, HealthStatus, NewConversationRecord, OmniError,
    PluginAdapter, RecordStore,
};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed record store.
///
/// Wraps a [`Database`] handle and delegates to the typed query modules.
/// The database is opened on the first call to [`RecordStore::initialize`].
pub struct SqliteRecordStore {
    config: DatabaseConfig,
    db: OnceCell<Database>,
}

impl SqliteRecordStore {
    /// Create a new store with the given configuration.
    ///
    /// The database connection is not opened until [`RecordStore::initialize`] is called.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    fn db(&self) -> Result<&Database, OmniError> {
        self.db.get().ok_or_else(|| OmniError::Storage {
            source: "record store not initialized -- call initialize() first".into(),
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), OmniError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteRecordStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::RecordStore
    }

    async fn health_check(&self) -> Result<HealthStatus, OmniError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), OmniError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn initialize(&self) -> Result<(), OmniError> {
        let db = Database::open(&self.config.path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| OmniError::Storage {
            source: "record store already initialized".into(),
        })?;
        debug!(path = %self.config.path, "SQLite record store initialized");
        Ok(())
    }

    async fn create(&self, input: NewConversationRecord) -> Result<ConversationRecord, OmniError> {
        let record = ConversationRecord {
            id: uuid::Uuid::new_v4().to_string(),
            model: input.model,
            scraped_at: input.scraped_at,
            created_at: chrono::Utc::now()
                .format("%Y-%m-%dT%H:%M:%S%.3fZ")
                .to_string(),
            source_html_bytes: input.source_html_bytes,
            views: input.views,
            content_key: input.content_key,
        };
        queries::conversations::insert_conversation(self.db()?, &record).await?;
        Ok(record)
    }

    async fn get(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError> {
        queries::conversations::get_conversation(self.db()?, id).await
    }

    async fn increment_views(&self, id: &str) -> Result<Option<ConversationRecord>, OmniError> {
        queries::conversations::increment_views(self.db()?, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn make_config(path: &str) -> DatabaseConfig {
        DatabaseConfig {
            path: path.to_string(),
            wal_mode: true,
        }
    }

    fn new_record(key: &str) -> NewConversationRecord {
        NewConversationRecord {
            model: "Claude".to_string(),
            scraped_at: "2026-01-01T00:00:00.000Z".to_string(),
            source_html_bytes: 11,
            views: 0,
            content_key: key.to_string(),
        }
    }

    #[tokio::test]
    async fn sqlite_record_store_implements_plugin_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));

        assert_eq!(store.name(), "sqlite");
        assert_eq!(store.version(), semver::Version::new(0, 1, 0));
        assert_eq!(store.adapter_type(), AdapterType::RecordStore);
    }

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
        assert!(store.create(new_record("conversations/x.md")).await.is_err());
        assert!(store.get("x").await.is_err());
    }

    #[tokio::test]
    async fn create_assigns_identity_and_timestamp() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("create.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let a = store.create(new_record("conversations/a.md")).await.unwrap();
        let b = store.create(new_record("conversations/b.md")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert!(uuid::Uuid::parse_str(&a.id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&a.created_at).is_ok());
        assert_eq!(a.views, 0);
        assert_eq!(a.source_html_bytes, 11);

        let fetched = store.get(&a.id).await.unwrap().unwrap();
        assert_eq!(fetched, a);
    }

    #[tokio::test]
    async fn increment_views_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("views.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        let rec = store.create(new_record("conversations/v.md")).await.unwrap();
        let updated = store.increment_views(&rec.id).await.unwrap().unwrap();
        assert_eq!(updated.views, 1);
        assert!(store.increment_views("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn health_check_and_shutdown_when_initialized() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteRecordStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        assert_eq!(store.health_check().await.unwrap(), HealthStatus::Healthy);
        store.shutdown().await.unwrap();
    }
}
