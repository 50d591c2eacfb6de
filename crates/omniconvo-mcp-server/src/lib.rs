// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! MCP server for OmniConvo.
//!
//! Speaks JSON-RPC 2.0 over a single request/response exchange and exposes
//! one tool, `save_conversation`, which renders a transcript, stores it
//! through the storage gateway and records its metadata.
//!
//! - [`McpServer`] classifies envelopes and dispatches methods
//! - [`ConversationPipeline`] performs the ordered writes
//! - [`LazyRuntime`] builds the storage capabilities on first use

pub mod pipeline;
pub mod protocol;
pub mod runtime;
pub mod server;
pub mod tools;
pub mod transcript;

pub use pipeline::{ConversationPipeline, SavedConversation, ViewedConversation, permalink};
pub use protocol::{JsonRpcError, JsonRpcResponse, RpcError};
pub use runtime::LazyRuntime;
pub use server::{McpReply, McpServer, PROTOCOL_VERSION};
pub use transcript::{Role, TranscriptInput, Turn, render_transcript};
