//! Domain-specific error types for the mediator service.
//!
//! All fallible operations return `Result<T, MediatorError>`. The capture
//! engine recovers from its own errors; everything else is surfaced to the
//! HTTP layer, which reports it to the browser.

use thiserror::Error;

/// The canonical error type for the mediator service.
#[derive(Debug, Error)]
pub enum MediatorError {
    // ── Capture pipeline ─────────────────────────────────────────
    /// The screen could not be captured (permission, no display, ...).
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// The captured image could not be encoded.
    #[error("frame encoding failed: {0}")]
    Encode(String),

    /// A oneshot or mpsc channel was closed before delivering.
    #[error("channel closed")]
    ChannelClosed,

    // ── Requests ─────────────────────────────────────────────────
    /// A directory path escaped the configured base or was malformed.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A request carried a value that could not be interpreted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The operation is not available on this platform.
    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    /// A JSON payload could not be decoded or encoded.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The filesystem or OS reported an error.
    #[error("{0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for errors that do not fit another variant.
    #[error("{0}")]
    Other(String),
}

// ── Convenient From implementations ──────────────────────────────

impl From<String> for MediatorError {
    fn from(s: String) -> Self {
        MediatorError::Other(s)
    }
}

impl From<&str> for MediatorError {
    fn from(s: &str) -> Self {
        MediatorError::Other(s.to_string())
    }
}

impl From<tokio::sync::oneshot::error::RecvError> for MediatorError {
    fn from(_: tokio::sync::oneshot::error::RecvError) -> Self {
        MediatorError::ChannelClosed
    }
}

impl From<image::ImageError> for MediatorError {
    fn from(e: image::ImageError) -> Self {
        MediatorError::Encode(e.to_string())
    }
}
