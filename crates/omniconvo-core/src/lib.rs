// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for OmniConvo.
//!
//! This crate provides the error type, the conversation domain types, and the
//! capability traits that the storage backends implement and the protocol
//! server consumes. Nothing here performs I/O.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::OmniError;
pub use types::{
    AdapterType, Capabilities, ConversationRecord, HealthStatus, NewConversationRecord,
};

// Re-export all capability traits at crate root.
pub use traits::{Bootstrap, ContentStore, PluginAdapter, RecordStore};
