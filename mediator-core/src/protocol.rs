//! JSON payloads exchanged with the browser client.
//!
//! # HTTP
//!
//! Every `/api/...` endpoint answers with one of the response types below,
//! or with [`ErrorBody`] and status 400.
//!
//! # WebSocket
//!
//! Both directions carry an [`Envelope`]:
//!
//! ```text
//! {"type": "mouse-move", "data": {"x": 10, "y": 20}}
//! ```
//!
//! Client messages decode into [`ClientMessage`]; replies use the request's
//! `type` with the result as `data`, or `"error"` with an [`ErrorBody`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::MediatorError;
use crate::input::{Key, Modifier, MouseButton};

// ── Responses ────────────────────────────────────────────────────

/// `{}`: acknowledgement with no data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Empty {}

/// Error body: `{"error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&MediatorError> for ErrorBody {
    fn from(e: &MediatorError) -> Self {
        Self {
            error: e.to_string(),
        }
    }
}

/// Display dimensions in pixels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

/// Pointer position. Also the request body for moving the pointer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MousePos {
    pub x: i32,
    pub y: i32,
}

/// Kind of a directory entry: `"d"` for directories, `"f"` otherwise.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EntryType {
    #[serde(rename = "d")]
    Dir,
    #[serde(rename = "f")]
    File,
}

/// One directory entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryType,
}

/// Directory listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ListDir {
    pub entries: Vec<DirEntry>,
}

/// Service status reported by `/api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Health {
    pub status: String,
    /// Frames published since start.
    pub frames: u64,
    /// Consumers currently waiting for a frame.
    pub subscribers: usize,
}

// ── Requests ─────────────────────────────────────────────────────

/// Mouse click request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MouseClick {
    #[serde(default)]
    pub button: MouseButton,
    #[serde(default)]
    pub double_click: bool,
}

/// Scroll request: columns and rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Scroll {
    #[serde(default)]
    pub x: i32,
    #[serde(default)]
    pub y: i32,
}

/// Type a string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyboardType {
    pub text: String,
}

/// Tap a key with modifiers held.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyboardKey {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

// ── WebSocket ────────────────────────────────────────────────────

/// `{"type": ..., "data": ...}` wrapper used on the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub data: Value,
}

impl Envelope {
    /// Wrap a serialisable payload.
    pub fn new<T: Serialize>(kind: impl Into<String>, data: &T) -> Result<Self, MediatorError> {
        Ok(Self {
            kind: kind.into(),
            data: serde_json::to_value(data)?,
        })
    }

    /// An `"error"` envelope carrying `e`.
    pub fn error(e: &MediatorError) -> Self {
        Self {
            kind: "error".into(),
            data: serde_json::json!({ "error": e.to_string() }),
        }
    }
}

/// Typed client → server WebSocket message.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    MouseMove(MousePos),
    MouseClick(MouseClick),
    Scroll(Scroll),
    KeyboardType(KeyboardType),
    KeyboardKey(KeyboardKey),
    MousePos,
    ScreenSize,
}

impl ClientMessage {
    /// The envelope `type` for this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::MouseMove(_) => "mouse-move",
            ClientMessage::MouseClick(_) => "mouse-click",
            ClientMessage::Scroll(_) => "scroll",
            ClientMessage::KeyboardType(_) => "keyboard-type",
            ClientMessage::KeyboardKey(_) => "keyboard-key",
            ClientMessage::MousePos => "mouse-pos",
            ClientMessage::ScreenSize => "screen-size",
        }
    }

    /// Decode the `data` of an envelope according to its `type`.
    pub fn from_envelope(env: Envelope) -> Result<Self, MediatorError> {
        let data = env.data;
        let msg = match env.kind.as_str() {
            "mouse-move" => ClientMessage::MouseMove(serde_json::from_value(data)?),
            "mouse-click" => ClientMessage::MouseClick(serde_json::from_value(data)?),
            "scroll" => ClientMessage::Scroll(serde_json::from_value(data)?),
            "keyboard-type" => ClientMessage::KeyboardType(serde_json::from_value(data)?),
            "keyboard-key" => ClientMessage::KeyboardKey(serde_json::from_value(data)?),
            "mouse-pos" => ClientMessage::MousePos,
            "screen-size" => ClientMessage::ScreenSize,
            other => {
                return Err(MediatorError::InvalidInput(format!(
                    "unknown message type: {other}"
                )));
            }
        };
        Ok(msg)
    }

    /// Parse a raw text frame.
    pub fn parse(text: &str) -> Result<Self, MediatorError> {
        Self::from_envelope(serde_json::from_str(text)?)
    }
}

// ── Tests ────────────────────────────────────────────────────────
