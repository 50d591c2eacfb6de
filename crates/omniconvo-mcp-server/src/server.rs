// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request dispatch for the MCP endpoint.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use serde_json::{Value, json};
use tracing::{debug, error, warn};

use omniconvo_core::OmniError;

use crate::pipeline::ConversationPipeline;
use crate::protocol::{Envelope, JsonRpcResponse, Method, RpcError, parse_envelope};
use crate::runtime::LazyRuntime;
use crate::tools::{ArgumentValidator, SAVE_CONVERSATION, catalogue};

/// MCP protocol revision reported by `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Outcome of handling one request body.
#[derive(Debug, Clone, PartialEq)]
pub enum McpReply {
    /// A notification was accepted. No JSON-RPC body is sent.
    Acknowledged,
    Response(JsonRpcResponse),
}

pub struct McpServer {
    name: String,
    validator: ArgumentValidator,
    pipeline: ConversationPipeline,
}

impl McpServer {
    pub fn new(name: impl Into<String>, runtime: Arc<LazyRuntime>) -> Result<Self, OmniError> {
        Ok(Self {
            name: name.into(),
            validator: ArgumentValidator::new()?,
            pipeline: ConversationPipeline::new(runtime),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pipeline(&self) -> &ConversationPipeline {
        &self.pipeline
    }

    /// Liveness payload. Does not touch storage.
    pub fn health(&self) -> Value {
        json!({ "status": "healthy", "server": self.name })
    }

    /// Handles a raw request body.
    pub async fn handle_bytes(&self, body: &[u8]) -> McpReply {
        match serde_json::from_slice::<Value>(body) {
            Ok(value) => self.handle_value(value).await,
            Err(e) => {
                debug!(error = %e, "request body is not JSON");
                McpReply::Response(JsonRpcResponse::failure(Value::Null, &RpcError::Parse))
            }
        }
    }

    /// Handles one parsed JSON value.
    pub async fn handle_value(&self, value: Value) -> McpReply {
        match parse_envelope(&value) {
            Envelope::Notification { method } => {
                debug!(method = %method, "notification acknowledged");
                McpReply::Acknowledged
            }
            Envelope::Invalid { id } => {
                warn!(id = %id, "invalid JSON-RPC envelope");
                McpReply::Response(JsonRpcResponse::failure(id, &RpcError::InvalidRequest))
            }
            Envelope::Call { id, method, params } => {
                debug!(id = %id, method = ?method, "dispatching request");
                let outcome = AssertUnwindSafe(self.dispatch(method, &params))
                    .catch_unwind()
                    .await;
                let response = match outcome {
                    Ok(Ok(result)) => JsonRpcResponse::success(id, result),
                    Ok(Err(err)) => JsonRpcResponse::failure(id, &err),
                    Err(panic) => {
                        error!(panic = panic_message(&*panic), "request handler panicked");
                        JsonRpcResponse::failure(id, &RpcError::Internal)
                    }
                };
                McpReply::Response(response)
            }
        }
    }

    async fn dispatch(&self, method: Method, params: &Value) -> Result<Value, RpcError> {
        match method {
            Method::Initialize => Ok(self.initialize_result()),
            Method::ToolsList => Ok(json!({ "tools": catalogue() })),
            Method::ToolsCall => self.call_tool(params).await,
            Method::Unknown(name) => Err(RpcError::UnknownMethod(name)),
        }
    }

    fn initialize_result(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": { "tools": {} },
            "serverInfo": {
                "name": self.name,
                "version": env!("CARGO_PKG_VERSION"),
            }
        })
    }

    async fn call_tool(&self, params: &Value) -> Result<Value, RpcError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .ok_or(RpcError::MissingToolName)?;
        if name != SAVE_CONVERSATION {
            return Err(RpcError::UnknownTool(name.to_string()));
        }

        let args = self.validator.parse(params.get("arguments"))?;
        let saved = self
            .pipeline
            .save(&args.input, args.title.as_deref())
            .await
            .map_err(|e| match e {
                OmniError::InvalidInput(message) => RpcError::InvalidParams(message),
                other => {
                    error!(
                        error = %other.cause_chain(),
                        tool = SAVE_CONVERSATION,
                        "tool call failed"
                    );
                    RpcError::Internal
                }
            })?;

        Ok(json!({
            "content": [{
                "type": "text",
                "text": format!("Conversation saved: {}", saved.permalink),
            }]
        }))
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use omniconvo_test_utils::CountingBootstrap;
    use tracing_test::traced_test;

    fn server_with(bootstrap: Arc<CountingBootstrap>) -> McpServer {
        McpServer::new("test-server", Arc::new(LazyRuntime::new(bootstrap))).unwrap()
    }

    fn response(reply: McpReply) -> Value {
        match reply {
            McpReply::Response(resp) => serde_json::to_value(resp).unwrap(),
            McpReply::Acknowledged => panic!("expected a response"),
        }
    }

    #[tokio::test]
    async fn parse_error_has_null_id() {
        let server = server_with(Arc::new(CountingBootstrap::new()));
        let resp = response(server.handle_bytes(b"{not json").await);
        assert_eq!(resp["error"]["code"], -32700);
        assert_eq!(resp["id"], Value::Null);
    }

    #[tokio::test]
    async fn batch_is_invalid_request() {
        let server = server_with(Arc::new(CountingBootstrap::new()));
        let resp = response(server.handle_bytes(b"[]").await);
        assert_eq!(resp["error"]["code"], -32600);
        assert_eq!(resp["id"], Value::Null);
    }

    #[tokio::test]
    async fn initialize_reports_server_info_without_bootstrapping() {
        let bootstrap = Arc::new(CountingBootstrap::new());
        let server = server_with(bootstrap.clone());
        let resp = response(
            server
                .handle_value(json!({"jsonrpc": "2.0", "id": 1, "method": "initialize"}))
                .await,
        );
        assert_eq!(resp["result"]["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(resp["result"]["serverInfo"]["name"], "test-server");
        assert!(resp["result"]["capabilities"]["tools"].is_object());
        assert_eq!(bootstrap.calls(), 0);
    }

    #[tokio::test]
    async fn missing_tool_name() {
        let server = server_with(Arc::new(CountingBootstrap::new()));
        let resp = response(
            server
                .handle_value(json!({"jsonrpc": "2.0", "id": 2, "method": "tools/call", "params": {}}))
                .await,
        );
        assert_eq!(resp["error"]["code"], -32602);
        assert_eq!(resp["error"]["message"], "Missing tool name");
    }

    #[tokio::test]
    #[traced_test]
    async fn internal_errors_are_logged_not_leaked() {
        let bootstrap = Arc::new(CountingBootstrap::new());
        bootstrap.records().set_fail_creates(true);
        let server = server_with(bootstrap);

        let resp = response(
            server
                .handle_value(json!({
                    "jsonrpc": "2.0", "id": 9, "method": "tools/call",
                    "params": {"name": "save_conversation", "arguments": {"conversation_text": "hi"}}
                }))
                .await,
        );
        assert_eq!(resp["id"], 9);
        assert_eq!(resp["error"]["code"], -32603);
        assert_eq!(resp["error"]["message"], "Internal server error");
        assert!(logs_contain("mock record store unavailable"));
    }

    #[tokio::test]
    #[traced_test]
    async fn content_io_cause_is_logged_not_leaked() {
        use omniconvo_config::model::ContentStorageConfig;
        use omniconvo_core::{Capabilities, ContentStore};
        use omniconvo_storage::FsContentStore;
        use omniconvo_test_utils::MockRecordStore;

        let dir = tempfile::tempdir().unwrap();
        let content = FsContentStore::new(ContentStorageConfig {
            root: dir.path().display().to_string(),
            key_prefix: "conversations".into(),
        });
        content.initialize().await.unwrap();
        // Pull the prefix directory out from under the store so the blob write fails.
        std::fs::remove_dir(dir.path().join("conversations")).unwrap();

        let records = Arc::new(MockRecordStore::new());
        let runtime = LazyRuntime::ready(Capabilities {
            content: Arc::new(content),
            records: records.clone(),
            base_url: "https://omniconvo.test".into(),
        });
        let server = McpServer::new("test-server", Arc::new(runtime)).unwrap();

        let resp = response(
            server
                .handle_value(json!({
                    "jsonrpc": "2.0", "id": 4, "method": "tools/call",
                    "params": {"name": "save_conversation", "arguments": {"conversation_text": "hi"}}
                }))
                .await,
        );
        assert_eq!(resp["error"]["code"], -32603);
        assert_eq!(resp["error"]["message"], "Internal server error");
        assert!(!resp.to_string().contains("os error"));
        assert!(logs_contain("failed to write conversations/"));
        assert!(logs_contain("os error"));
        assert_eq!(records.create_calls(), 0);
    }

    #[tokio::test]
    async fn panics_become_internal_errors() {
        let server = server_with(Arc::new(CountingBootstrap::new().panicking()));
        let resp = response(
            server
                .handle_value(json!({
                    "jsonrpc": "2.0", "id": "p", "method": "tools/call",
                    "params": {"name": "save_conversation", "arguments": {"conversation_text": "hi"}}
                }))
                .await,
        );
        assert_eq!(resp["id"], "p");
        assert_eq!(resp["error"]["code"], -32603);
    }

    #[test]
    fn health_payload() {
        let server = server_with(Arc::new(CountingBootstrap::new()));
        assert_eq!(
            server.health(),
            json!({"status": "healthy", "server": "test-server"})
        );
    }
}
