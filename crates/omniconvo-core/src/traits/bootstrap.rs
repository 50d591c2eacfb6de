// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One-shot runtime bootstrap.

use async_trait::async_trait;

use crate::error::OmniError;
use crate::types::Capabilities;

/// Loads configuration and produces initialized capability handles.
///
/// Called at most once per successful process initialization. A failed call
/// must leave no state behind that prevents a later retry.
#[async_trait]
pub trait Bootstrap: Send + Sync + 'static {
    async fn bootstrap(&self) -> Result<Capabilities, OmniError>;
}
