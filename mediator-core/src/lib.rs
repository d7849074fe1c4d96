//! # mediator-core
//!
//! Core library for the mediator remote-desktop service.
//!
//! This crate contains:
//! - **Screen capture engine**: `FrameHub`, `CaptureEngine`, the buffer pool
//!   and the capture / encode seams (`screencap`)
//! - **Input**: the `InputDevice` seam plus typed buttons, keys and modifiers
//! - **Protocol**: JSON payloads for the HTTP and WebSocket API
//! - **Filesystem**: sandboxed directory listing
//! - **Error**: `MediatorError`, a `thiserror`-based error type

pub mod error;
pub mod fs;
pub mod input;
pub mod protocol;
pub mod screencap;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use error::MediatorError;
pub use input::{InputDevice, Key, Modifier, MouseButton};
pub use screencap::{
    CaptureEngine, EngineConfig, Frame, FrameBuffer, FrameEncoder, FrameHub, FrameWaiter,
    JpegFrameEncoder, PixelFormat, RawScreenFrame, ScreenCapture,
};
