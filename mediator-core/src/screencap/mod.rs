//! # screencap: frame broadcast capture engine
//!
//! Captures the display on demand, encodes it to JPEG and fans the result
//! out to every consumer waiting for a frame.
//!
//! ```text
//!  HTTP handler ─subscribe()─► FrameHub ──trigger──► CaptureEngine
//!        ▲                      │   ▲                    │
//!        │                      │   └──publish(buffer)───┤
//!        └──── FrameWaiter ◄────┘                        ▼
//!                                         ScreenCapture → FrameEncoder
//! ```
//!
//! | Module    | Purpose                                              |
//! |-----------|------------------------------------------------------|
//! | `buffer`  | Growable byte sink holding one encoded frame          |
//! | `pool`    | Ring of reusable buffers and the shared `Frame` type  |
//! | `trigger` | Idempotent wake-up flag for the idle loop             |
//! | `hub`     | Subscription registry and publish fan-out             |
//! | `engine`  | The capture loop with back-off and frame pacing       |
//! | `device`  | Capture / encode traits implemented by backends       |
//! | `jpeg`    | JPEG encoder on top of the `image` crate              |
//! | `types`   | Raw captured image representation                     |
//!
//! Consumers must resubscribe after every frame; a waiter resolves once.

pub mod buffer;
pub mod device;
pub mod engine;
pub mod hub;
pub mod jpeg;
pub mod pool;
pub mod trigger;
pub mod types;

// ── Re-exports ───────────────────────────────────────────────────

pub use buffer::FrameBuffer;
pub use device::{FrameEncoder, ScreenCapture};
pub use engine::{CaptureEngine, CycleReport, EngineConfig};
pub use hub::{FrameHub, FrameWaiter};
pub use jpeg::JpegFrameEncoder;
pub use pool::{BufferPool, Frame};
pub use trigger::Trigger;
pub use types::{PixelFormat, RawScreenFrame};
