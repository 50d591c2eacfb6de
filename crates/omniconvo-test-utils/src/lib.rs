// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for OmniConvo integration tests.
//!
//! Provides in-memory capability adapters and a counting bootstrap so the
//! protocol server and pipeline can be exercised without a disk or database.
//!
//! # Components
//!
//! - [`MockContentStore`] - In-memory storage gateway with a write failure switch
//! - [`MockRecordStore`] - In-memory record store with sequential ids
//! - [`CountingBootstrap`] - Bootstrap that counts runs and can fail on demand

pub mod bootstrap;
pub mod mock_content;
pub mod mock_records;

pub use bootstrap::CountingBootstrap;
pub use mock_content::MockContentStore;
pub use mock_records::MockRecordStore;
