//! Seams between the capture engine and the platform.
//!
//! The engine only knows how to ask for one display image and how to turn
//! it into compressed bytes. Both are blocking calls and run on Tokio's
//! blocking pool, so implementations may do real work on the calling
//! thread.

use crate::error::MediatorError;
use crate::screencap::buffer::FrameBuffer;
use crate::screencap::types::RawScreenFrame;

/// Produces raw images of the captured display.
pub trait ScreenCapture: Send + 'static {
    /// Grab the current contents of the display.
    fn capture_display(&mut self) -> Result<RawScreenFrame, MediatorError>;
}

/// Compresses a raw image into a frame buffer.
pub trait FrameEncoder: Send + 'static {
    /// Encode `image` into `sink` at `quality` (1..=100).
    ///
    /// `sink` arrives empty. On error its contents are discarded.
    fn encode(
        &mut self,
        sink: &mut FrameBuffer,
        image: &RawScreenFrame,
        quality: u8,
    ) -> Result<(), MediatorError>;
}

impl<T: ScreenCapture + ?Sized> ScreenCapture for Box<T> {
    fn capture_display(&mut self) -> Result<RawScreenFrame, MediatorError> {
        (**self).capture_display()
    }
}

impl<T: FrameEncoder + ?Sized> FrameEncoder for Box<T> {
    fn encode(
        &mut self,
        sink: &mut FrameBuffer,
        image: &RawScreenFrame,
        quality: u8,
    ) -> Result<(), MediatorError> {
        (**self).encode(sink, image, quality)
    }
}
