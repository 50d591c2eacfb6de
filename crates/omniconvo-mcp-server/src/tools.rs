// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tool catalogue and argument validation for `save_conversation`.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use omniconvo_core::OmniError;

use crate::protocol::RpcError;
use crate::transcript::{TranscriptInput, Turn};

pub const SAVE_CONVERSATION: &str = "save_conversation";

const MISSING_TRANSCRIPT: &str =
    "Missing required argument: conversation_text or conversation_history";

/// A tool as advertised by `tools/list`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Every tool the server exposes.
pub fn catalogue() -> Vec<ToolDefinition> {
    vec![ToolDefinition {
        name: SAVE_CONVERSATION.to_string(),
        description: "Save a conversation transcript and return a shareable permalink. \
                      Provide either conversation_text (Markdown) or conversation_history \
                      (ordered human/assistant turns)."
            .to_string(),
        input_schema: save_conversation_schema(),
    }]
}

pub fn save_conversation_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "conversation_text": {
                "type": "string",
                "minLength": 1,
                "description": "Full conversation as Markdown text"
            },
            "conversation_history": {
                "type": "array",
                "minItems": 1,
                "description": "Ordered conversation turns",
                "items": {
                    "type": "object",
                    "properties": {
                        "role": { "type": "string", "enum": ["human", "assistant"] },
                        "content": { "type": "string" },
                        "timestamp": { "type": "string" }
                    },
                    "required": ["role", "content"]
                }
            },
            "title": {
                "type": "string",
                "description": "Optional title rendered as a heading"
            }
        },
        "anyOf": [
            { "required": ["conversation_text"] },
            { "required": ["conversation_history"] }
        ]
    })
}

/// Validated `save_conversation` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveConversationArgs {
    pub input: TranscriptInput,
    pub title: Option<String>,
}

#[derive(Deserialize)]
struct RawArgs {
    conversation_text: Option<String>,
    conversation_history: Option<Vec<Turn>>,
    title: Option<String>,
}

/// Checks tool arguments against the advertised schema.
pub struct ArgumentValidator {
    schema: jsonschema::Validator,
}

impl ArgumentValidator {
    pub fn new() -> Result<Self, OmniError> {
        let schema = jsonschema::validator_for(&save_conversation_schema())
            .map_err(|e| OmniError::Internal(format!("tool schema does not compile: {e}")))?;
        Ok(Self { schema })
    }

    /// Parses `arguments`. Missing or non-object arguments are treated as `{}`.
    /// History wins when both transcript fields are supplied.
    pub fn parse(&self, arguments: Option<&Value>) -> Result<SaveConversationArgs, RpcError> {
        let empty = json!({});
        let args = arguments.filter(|v| v.is_object()).unwrap_or(&empty);

        let present = |field: &str| args.get(field).is_some_and(|v| !v.is_null());
        if !present("conversation_text") && !present("conversation_history") {
            return Err(RpcError::InvalidParams(MISSING_TRANSCRIPT.to_string()));
        }

        if let Err(err) = self.schema.validate(args) {
            let path = err.instance_path.to_string();
            let path = if path.is_empty() { "/".to_string() } else { path };
            return Err(RpcError::InvalidParams(format!(
                "Invalid arguments: {path}: {err}"
            )));
        }

        let raw: RawArgs = serde_json::from_value(args.clone())
            .map_err(|e| RpcError::InvalidParams(format!("Invalid arguments: {e}")))?;

        let input = match (raw.conversation_history, raw.conversation_text) {
            (Some(turns), _) => TranscriptInput::Turns(turns),
            (None, Some(text)) => TranscriptInput::Text(text),
            (None, None) => return Err(RpcError::InvalidParams(MISSING_TRANSCRIPT.to_string())),
        };

        Ok(SaveConversationArgs {
            input,
            title: raw.title,
        })
    }
}
