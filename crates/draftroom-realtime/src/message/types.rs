//! Inbound and outbound collaboration message definitions.
//!
//! Every frame on the wire is a JSON object with a `type` field plus
//! type-specific payload fields. Inbound frames with an unrecognized (or
//! missing) type are relayed verbatim to the rest of the document's
//! connections, so parsing keeps the raw value around.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Messages sent by a client to the hub.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Cursor moved; relayed to everyone else on the document.
    CursorPosition {
        /// Editor-defined position payload (line/column, offsets, ...).
        position: Value,
    },
    /// Selection changed; relayed to everyone else.
    Selection {
        /// Editor-defined selection payload.
        selection: Value,
    },
    /// Typing indicator toggled; relayed to everyone else.
    Typing {
        /// Whether the user is currently typing.
        is_typing: bool,
    },
    /// Keepalive; answered with a pong to the sender only.
    Ping,
    /// Anything else: relayed verbatim, excluding the sender.
    Other(Value),
}

impl ClientMessage {
    /// Parse a raw text frame.
    ///
    /// Only malformed JSON is an error; an unexpected `type` is not.
    pub fn parse(frame: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(frame)?;
        let message = match value.get("type").and_then(Value::as_str) {
            Some("cursor_position") => Self::CursorPosition {
                position: value
                    .get("position")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            },
            Some("selection") => Self::Selection {
                selection: value
                    .get("selection")
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Default::default())),
            },
            Some("typing") => Self::Typing {
                is_typing: value
                    .get("is_typing")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            },
            Some("ping") => Self::Ping,
            _ => Self::Other(value),
        };
        Ok(message)
    }
}

/// Events sent by the hub to clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A user joined the document.
    UserJoined {
        /// Display name of the joiner.
        user: String,
        /// Everyone now active on the document, in join order.
        active_users: Vec<String>,
    },
    /// A user left the document.
    UserLeft {
        /// Display name of the leaver.
        user: String,
        /// Everyone still active on the document.
        active_users: Vec<String>,
    },
    /// A version was saved.
    VersionSaved {
        /// Who saved.
        user: String,
        /// Summary of the new version.
        version: Value,
    },
    /// Relayed cursor position.
    CursorPosition {
        /// Whose cursor.
        user: String,
        /// Position payload.
        position: Value,
    },
    /// Relayed selection.
    Selection {
        /// Whose selection.
        user: String,
        /// Selection payload.
        selection: Value,
    },
    /// Relayed typing indicator.
    Typing {
        /// Who is (or stopped) typing.
        user: String,
        /// Whether they are typing.
        is_typing: bool,
    },
    /// Keepalive response.
    Pong,
}
