//! Cross-platform display capture via `xcap`.
//!
//! Always captures the first monitor the platform enumerates (the primary
//! display on Windows and macOS). Monitors are re-enumerated on every call
//! so that resolution changes and hot-plugging are picked up.

use mediator_core::{MediatorError, PixelFormat, RawScreenFrame, ScreenCapture};
use xcap::Monitor;

/// Screen capture backend for the primary display.
#[derive(Debug, Default, Clone, Copy)]
pub struct XcapScreen;

impl XcapScreen {
    pub fn new() -> Self {
        Self
    }

    fn monitor() -> Result<Monitor, MediatorError> {
        Monitor::all()
            .map_err(|e| MediatorError::Capture(format!("enumerate monitors: {e}")))?
            .into_iter()
            .next()
            .ok_or_else(|| MediatorError::Capture("no display found".into()))
    }

    /// Dimensions of the captured display.
    pub fn size(&self) -> Result<(u32, u32), MediatorError> {
        let monitor = Self::monitor()?;
        Ok((monitor.width(), monitor.height()))
    }
}

impl ScreenCapture for XcapScreen {
    fn capture_display(&mut self) -> Result<RawScreenFrame, MediatorError> {
        let image = Self::monitor()?
            .capture_image()
            .map_err(|e| MediatorError::Capture(e.to_string()))?;
        let (width, height) = image.dimensions();
        Ok(RawScreenFrame::packed(
            width,
            height,
            PixelFormat::Rgba8,
            image.into_raw(),
        ))
    }
}
