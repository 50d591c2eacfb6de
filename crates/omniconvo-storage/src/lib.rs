// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for OmniConvo.
//!
//! Provides the two capabilities the protocol server consumes:
//! - [`SqliteRecordStore`]: conversation metadata in WAL-mode SQLite with
//!   embedded migrations and a single-writer model via `tokio-rusqlite`.
//! - [`FsContentStore`]: transcript bytes on the local filesystem with
//!   write-once keys and atomic publication.

pub mod content;
pub mod database;
pub mod migrations;
pub mod queries;
pub mod records;

pub use content::FsContentStore;
pub use database::Database;
pub use records::SqliteRecordStore;
