// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for OmniConvo.
//!
//! Carries MCP request bodies to [`omniconvo_mcp_server::McpServer`] and
//! serves saved conversations to the viewer.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, router, start_server};
