// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! JSON-RPC 2.0 envelope types and request classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

pub const PARSE_ERROR: i64 = -32700;
pub const INVALID_REQUEST: i64 = -32600;
pub const METHOD_NOT_FOUND: i64 = -32601;
pub const INVALID_PARAMS: i64 = -32602;
pub const INTERNAL_ERROR: i64 = -32603;

/// A JSON-RPC response object. Exactly one of `result` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(id: Value, err: &RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code: err.code(),
                message: err.to_string(),
            }),
        }
    }
}

/// Errors that are surfaced to the caller. The display string is the wire message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RpcError {
    #[error("Parse error")]
    Parse,
    #[error("Invalid Request")]
    InvalidRequest,
    #[error("Unknown method: {0}")]
    UnknownMethod(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Missing tool name")]
    MissingToolName,
    #[error("{0}")]
    InvalidParams(String),
    /// Opaque on purpose; the cause is only logged.
    #[error("Internal server error")]
    Internal,
}

impl RpcError {
    pub fn code(&self) -> i64 {
        match self {
            RpcError::Parse => PARSE_ERROR,
            RpcError::InvalidRequest => INVALID_REQUEST,
            RpcError::UnknownMethod(_) | RpcError::UnknownTool(_) => METHOD_NOT_FOUND,
            RpcError::MissingToolName | RpcError::InvalidParams(_) => INVALID_PARAMS,
            RpcError::Internal => INTERNAL_ERROR,
        }
    }
}

/// Methods the server dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    Initialize,
    ToolsList,
    ToolsCall,
    Unknown(String),
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        match name {
            "initialize" => Method::Initialize,
            "tools/list" => Method::ToolsList,
            "tools/call" => Method::ToolsCall,
            other => Method::Unknown(other.to_string()),
        }
    }
}

/// Classification of an incoming JSON value.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    /// No `id` but a `method`: fire-and-forget, never answered with a body.
    Notification { method: String },
    /// A well-formed request that expects a response.
    Call {
        id: Value,
        method: Method,
        params: Value,
    },
    /// Anything else. `id` is echoed when it was usable, otherwise null.
    Invalid { id: Value },
}

/// Classifies a parsed JSON body.
///
/// Only objects are requests. An `id` that is not a string, number or null is
/// treated as unusable and replaced by null in the error response.
pub fn parse_envelope(value: &Value) -> Envelope {
    let Some(obj) = value.as_object() else {
        return Envelope::Invalid { id: Value::Null };
    };

    let Some(raw_id) = obj.get("id") else {
        return match obj.get("method") {
            Some(Value::String(method)) => Envelope::Notification {
                method: method.clone(),
            },
            Some(other) => Envelope::Notification {
                method: other.to_string(),
            },
            None => Envelope::Invalid { id: Value::Null },
        };
    };

    let id_usable = matches!(raw_id, Value::String(_) | Value::Number(_) | Value::Null);
    let id = if id_usable { raw_id.clone() } else { Value::Null };
    if !id_usable {
        return Envelope::Invalid { id };
    }

    let version_ok = obj.get("jsonrpc").and_then(Value::as_str) == Some(JSONRPC_VERSION);
    match obj.get("method").and_then(Value::as_str) {
        Some(method) if version_ok => Envelope::Call {
            id,
            method: Method::from(method),
            params: obj.get("params").cloned().unwrap_or(Value::Null),
        },
        _ => Envelope::Invalid { id },
    }
}
