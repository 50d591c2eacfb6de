// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and migrations.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use omniconvo_core::OmniError;
use tracing::debug;

/// Convert a tokio-rusqlite error into `OmniError::Storage`.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> OmniError {
    OmniError::Storage {
        source: Box::new(e),
    }
}

/// A migrated SQLite database behind a single tokio-rusqlite connection.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, OmniError> {
        if let Some(parent) = std::path::Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| OmniError::Storage {
                    source: Box::new(e),
                })?;
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(|e| OmniError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, wal_mode).await
    }

    /// Open a private in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, OmniError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(|e| OmniError::Storage {
                source: Box::new(e),
            })?;
        Self::prepare(conn, false).await
    }

    async fn prepare(conn: tokio_rusqlite::Connection, wal_mode: bool) -> Result<Self, OmniError> {
        conn.call(move |conn| -> Result<(), rusqlite::Error> {
            if wal_mode {
                conn.execute_batch("PRAGMA journal_mode = WAL;")?;
            }
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            conn.busy_timeout(std::time::Duration::from_millis(5000))?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;

        conn.call(|conn| Ok(crate::migrations::run_migrations(conn)))
            .await
            .map_err(map_tr_err)??;

        debug!(wal_mode, "database opened and migrated");
        Ok(Self { conn })
    }

    /// Returns the underlying connection for query modules.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }
}
