// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability trait definitions.
//!
//! Storage backends extend the [`PluginAdapter`] base trait and use
//! `#[async_trait]` so they can be held as trait objects.

pub mod adapter;
pub mod bootstrap;
pub mod content;
pub mod records;

pub use adapter::PluginAdapter;
pub use bootstrap::Bootstrap;
pub use content::ContentStore;
pub use records::RecordStore;
