// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway.

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use omniconvo_core::{ConversationRecord, OmniError};
use omniconvo_mcp_server::McpReply;

use crate::server::GatewayState;

/// Response body for the liveness endpoints.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Configured server name.
    pub server: String,
}

/// Response body for GET /api/conversation/{id}.
#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation: ConversationRecord,
    /// Stored Markdown transcript.
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// POST /api/mcp
///
/// Notifications get 204 with no body; everything else gets 200 with the
/// JSON-RPC response, errors included.
pub async fn post_mcp(State(state): State<GatewayState>, body: Bytes) -> Response {
    match state.server.handle_bytes(&body).await {
        McpReply::Acknowledged => StatusCode::NO_CONTENT.into_response(),
        McpReply::Response(resp) => (StatusCode::OK, Json(resp)).into_response(),
    }
}

/// GET /api/mcp and GET /health
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        server: state.server.name().to_string(),
    })
}

/// GET /api/conversation/{id}
pub async fn get_conversation(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Response {
    match state.server.pipeline().view(&id).await {
        Ok(viewed) => Json(ConversationResponse {
            conversation: viewed.record,
            content: viewed.content,
        })
        .into_response(),
        Err(OmniError::NotFound { .. }) => {
            error_response(StatusCode::NOT_FOUND, "conversation not found")
        }
        Err(e) => {
            tracing::error!(
                error = %e.cause_chain(),
                conversation_id = %id,
                "failed to load conversation"
            );
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "healthy".to_string(),
            server: "omniconvo-mcp".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(json, r#"{"status":"healthy","server":"omniconvo-mcp"}"#);
    }

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "conversation not found".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"error\":\"conversation not found\""));
    }

    #[test]
    fn conversation_response_uses_camel_case_record() {
        let resp = ConversationResponse {
            conversation: ConversationRecord {
                id: "rec-1".into(),
                model: "Claude".into(),
                scraped_at: "2026-01-01T00:00:00.000Z".into(),
                created_at: "2026-01-01T00:00:00.000Z".into(),
                source_html_bytes: 4,
                views: 1,
                content_key: "conversations/a.md".into(),
            },
            content: "body".into(),
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["conversation"]["sourceHtmlBytes"], 4);
        assert_eq!(json["conversation"]["contentKey"], "conversations/a.md");
        assert_eq!(json["content"], "body");
    }
}
