// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for OmniConvo.

use thiserror::Error;

/// The primary error type used across capability traits and the persistence pipeline.
#[derive(Debug, Error)]
pub enum OmniError {
    /// Configuration errors (invalid TOML, failed validation, missing values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (database connection, query failure, migrations).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Content store errors (blob write/read failure, key collisions).
    #[error("content error: {message}")]
    Content {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested entity does not exist.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Caller-supplied input was rejected before any side effect happened.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl OmniError {
    /// Renders the error followed by every underlying cause, joined by `": "`.
    ///
    /// A cause already spelled out in the message above it is not repeated.
    pub fn cause_chain(&self) -> String {
        let mut rendered = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            let text = cause.to_string();
            if !rendered.ends_with(&text) {
                rendered.push_str(": ");
                rendered.push_str(&text);
            }
            current = std::error::Error::source(cause);
        }
        rendered
    }
}
