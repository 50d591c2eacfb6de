// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lazy, single-flight construction of the storage capabilities.

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{info, warn};

use omniconvo_core::{Bootstrap, Capabilities, OmniError, PluginAdapter};

/// Holds the capabilities once they have been built.
///
/// Concurrent first callers share a single bootstrap run. A failed run leaves
/// the runtime uninitialized, so the next caller tries again.
pub struct LazyRuntime {
    bootstrap: Option<Arc<dyn Bootstrap>>,
    capabilities: OnceCell<Capabilities>,
}

impl LazyRuntime {
    pub fn new(bootstrap: Arc<dyn Bootstrap>) -> Self {
        Self {
            bootstrap: Some(bootstrap),
            capabilities: OnceCell::new(),
        }
    }

    /// A runtime that starts out initialized with the given capabilities.
    pub fn ready(capabilities: Capabilities) -> Self {
        Self {
            bootstrap: None,
            capabilities: OnceCell::new_with(Some(capabilities)),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.capabilities.initialized()
    }

    /// Returns the capabilities, building them on first use.
    pub async fn ensure_initialized(&self) -> Result<&Capabilities, OmniError> {
        self.capabilities
            .get_or_try_init(|| async {
                let bootstrap = self.bootstrap.as_ref().ok_or_else(|| {
                    OmniError::Internal("runtime has no bootstrap".into())
                })?;
                info!("initializing storage capabilities");
                match bootstrap.bootstrap().await {
                    Ok(caps) => {
                        info!(
                            content = caps.content.name(),
                            records = caps.records.name(),
                            "storage capabilities ready"
                        );
                        Ok(caps)
                    }
                    Err(e) => {
                        warn!(error = %e.cause_chain(), "storage initialization failed");
                        Err(e)
                    }
                }
            })
            .await
    }
}

impl std::fmt::Debug for LazyRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyRuntime")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}
