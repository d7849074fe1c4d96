//! MJPEG over `multipart/x-mixed-replace`.
//!
//! Each part is one published frame:
//!
//! ```text
//! --MEDIATOR_FRAME_BOUNDARY\r\n
//! Content-Type: image/jpeg\r\n
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of JPEG>\r\n
//! ```
//!
//! The stream subscribes to the hub, waits for the next frame, emits it and
//! subscribes again. When the client disconnects the body is dropped and
//! the stream simply stops subscribing.

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};

use mediator_core::{Frame, FrameHub};

pub const BOUNDARY: &str = "MEDIATOR_FRAME_BOUNDARY";
pub const CONTENT_TYPE: &str = "multipart/x-mixed-replace;boundary=MEDIATOR_FRAME_BOUNDARY";

/// Part header preceding a frame of `len` bytes.
pub fn part_header(len: usize) -> Bytes {
    Bytes::from(format!(
        "--{BOUNDARY}\r\nContent-Type: image/jpeg\r\nContent-Length: {len}\r\n\r\n"
    ))
}

/// The three chunks of one multipart part. The frame bytes are shared with
/// the hub, not copied.
fn part(frame: Frame) -> [Bytes; 3] {
    [
        part_header(frame.len()),
        Bytes::from_owner(frame),
        Bytes::from_static(b"\r\n"),
    ]
}

/// Logs when the consumer goes away.
struct Disconnect {
    frames: u64,
}

impl Drop for Disconnect {
    fn drop(&mut self) {
        tracing::info!(frames = self.frames, "screencast client disconnected");
    }
}

/// Endless multipart body fed by `hub`.
pub fn multipart(hub: Arc<FrameHub>) -> impl Stream<Item = Result<Bytes, Infallible>> + Send {
    stream::unfold(
        (hub, Disconnect { frames: 0 }),
        |(hub, mut guard)| async move {
            match hub.subscribe().await {
                Ok(frame) => {
                    guard.frames += 1;
                    Some((part(frame), (hub, guard)))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "frame subscription closed");
                    None
                }
            }
        },
    )
    .flat_map(|chunks| stream::iter(chunks.map(Ok)))
}

// ── Tests ────────────────────────────────────────────────────────
