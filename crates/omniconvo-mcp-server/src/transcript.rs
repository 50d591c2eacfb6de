// SPDX-FileCopyrightText: 2026 OmniConvo Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Transcript input types and Markdown rendering.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use omniconvo_core::OmniError;

/// Separator placed between rendered turns.
pub const TURN_SEPARATOR: &str = "\n\n---\n\n";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Human,
    Assistant,
}

impl Role {
    pub fn header(self) -> &'static str {
        match self {
            Role::Human => "### Human",
            Role::Assistant => "### Assistant",
        }
    }
}

/// One message of a structured conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A conversation as supplied by the caller: either ready text or ordered turns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptInput {
    Text(String),
    Turns(Vec<Turn>),
}

impl TranscriptInput {
    /// Rejects inputs that would produce an empty transcript.
    pub fn validate(&self) -> Result<(), OmniError> {
        match self {
            TranscriptInput::Text(text) if text.is_empty() => Err(OmniError::InvalidInput(
                "conversation_text must not be empty".into(),
            )),
            TranscriptInput::Turns(turns) if turns.is_empty() => Err(OmniError::InvalidInput(
                "conversation_history must contain at least one turn".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// Renders the stored Markdown form of a conversation.
///
/// Plain text passes through unchanged. Turns keep their input order.
pub fn render_transcript(input: &TranscriptInput, title: Option<&str>) -> String {
    let body = match input {
        TranscriptInput::Text(text) => text.clone(),
        TranscriptInput::Turns(turns) => turns
            .iter()
            .map(render_turn)
            .collect::<Vec<_>>()
            .join(TURN_SEPARATOR),
    };

    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("# {title}\n\n{body}"),
        None => body,
    }
}

fn render_turn(turn: &Turn) -> String {
    match &turn.timestamp {
        Some(ts) => format!(
            "{}\n*{}*\n{}",
            turn.role.header(),
            format_timestamp(ts),
            turn.content
        ),
        None => format!("{}\n{}", turn.role.header(), turn.content),
    }
}

/// RFC 3339 values are normalized to UTC; anything else is kept verbatim.
fn format_timestamp(raw: &str) -> String {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.to_utc().format(TIMESTAMP_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}
