// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `omniconvo serve` command implementation.
//!
//! Wires the storage bootstrap, the lazy runtime, the MCP server and the HTTP
//! gateway together, then serves until Ctrl-C.

use std::sync::Arc;

use tracing::{info, warn};

use omniconvo_config::OmniConfig;
use omniconvo_core::{OmniError, PluginAdapter};
use omniconvo_gateway::{GatewayState, ServerConfig, start_server};
use omniconvo_mcp_server::{LazyRuntime, McpServer};

use crate::bootstrap::StorageBootstrap;

/// Runs the gateway. Storage is opened before binding unless `lazy_init` is set,
/// in which case the first tool call opens it.
pub async fn run_serve(config: OmniConfig, lazy_init: bool) -> Result<(), OmniError> {
    init_tracing(&config.logging.level);

    info!(
        name = %config.server.name,
        base_url = %config.base_url,
        lazy_init,
        "starting omniconvo"
    );

    let runtime = Arc::new(LazyRuntime::new(Arc::new(StorageBootstrap::new(
        config.clone(),
    ))));
    if !lazy_init {
        runtime.ensure_initialized().await?;
    }

    let server = Arc::new(McpServer::new(config.server.name.clone(), runtime.clone())?);
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    start_server(&server_config, GatewayState { server }, shutdown_signal()).await?;

    if runtime.is_initialized() {
        let caps = runtime.ensure_initialized().await?;
        if let Err(e) = caps.records.shutdown().await {
            warn!(error = %e.cause_chain(), "record store shutdown failed");
        }
        if let Err(e) = caps.content.shutdown().await {
            warn!(error = %e.cause_chain(), "content store shutdown failed");
        }
    }

    info!("omniconvo serve shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl-C, serving until killed");
            std::future::pending::<()>().await;
        }
    }
}

/// Initialize the tracing subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "omniconvo={log_level},tower_http={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
