// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Counting bootstrap for lazy-initialization tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use omniconvo_core::traits::bootstrap::Bootstrap;
use omniconvo_core::types::Capabilities;
use omniconvo_core::OmniError;

use crate::mock_content::MockContentStore;
use crate::mock_records::MockRecordStore;

/// Base URL handed out by [`CountingBootstrap::new`].
pub const TEST_BASE_URL: &str = "https://omniconvo.test";

/// A [`Bootstrap`] over the in-memory mocks that records how often it ran.
///
/// It can be told to fail its first `n` runs, to take a while (so concurrent
/// callers overlap), or to panic.
pub struct CountingBootstrap {
    content: Arc<MockContentStore>,
    records: Arc<MockRecordStore>,
    base_url: String,
    calls: AtomicUsize,
    failures_remaining: AtomicUsize,
    delay: Option<Duration>,
    panic: AtomicBool,
}

impl CountingBootstrap {
    pub fn new() -> Self {
        Self::with_stores(
            Arc::new(MockContentStore::new()),
            Arc::new(MockRecordStore::new()),
        )
    }

    pub fn with_stores(content: Arc<MockContentStore>, records: Arc<MockRecordStore>) -> Self {
        Self {
            content,
            records,
            base_url: TEST_BASE_URL.to_string(),
            calls: AtomicUsize::new(0),
            failures_remaining: AtomicUsize::new(0),
            delay: None,
            panic: AtomicBool::new(false),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fail the first `n` bootstrap runs with a configuration error.
    pub fn failing_first(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    /// Sleep for `delay` inside every run.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn panicking(self) -> Self {
        self.panic.store(true, Ordering::SeqCst);
        self
    }

    /// Number of bootstrap runs started so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn content(&self) -> Arc<MockContentStore> {
        Arc::clone(&self.content)
    }

    pub fn records(&self) -> Arc<MockRecordStore> {
        Arc::clone(&self.records)
    }

    /// Capabilities over the same mocks, without counting a run.
    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            content: self.content.clone(),
            records: self.records.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl Default for CountingBootstrap {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Bootstrap for CountingBootstrap {
    async fn bootstrap(&self) -> Result<Capabilities, OmniError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic.load(Ordering::SeqCst) {
            panic!("bootstrap exploded");
        }

        let failing = self
            .failures_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(OmniError::Config("mock bootstrap failure".into()));
        }

        Ok(self.capabilities())
    }
}
