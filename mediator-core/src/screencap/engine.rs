//! The capture loop.
//!
//! Sleeps until a subscriber fires the hub's trigger, then captures the
//! display, encodes it into the next pool buffer and publishes it. Capture
//! and encode failures are retried after a fixed back-off; the waiters
//! that triggered the cycle stay registered and get the first good frame.
//!
//! ```text
//!   idle ──trigger──► capture ──► encode ──► publish ──► pace ──► idle
//!                        ▲           │
//!                        └─back-off──┘ (on error)
//! ```

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::error::MediatorError;
use crate::screencap::buffer::FrameBuffer;
use crate::screencap::device::{FrameEncoder, ScreenCapture};
use crate::screencap::hub::FrameHub;
use crate::screencap::pool::{DEFAULT_POOL_SIZE, Frame};

// ── EngineConfig ─────────────────────────────────────────────────

/// Tuning for [`CaptureEngine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Encoder quality (1..=100). Fixed for the lifetime of the engine.
    pub quality: u8,
    /// Minimum time between the start of two capture cycles.
    pub frame_interval: Duration,
    /// Delay before retrying a failed capture or encode.
    pub retry_backoff: Duration,
    /// Number of buffers in the frame pool.
    pub pool_size: usize,
}

impl EngineConfig {
    /// Frame interval for a target rate; `fps` is clamped to 1..=60.
    pub fn interval_for_fps(fps: u8) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(fps.clamp(1, 60)))
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            quality: 80,
            frame_interval: Self::interval_for_fps(15),
            retry_backoff: Duration::from_secs(2),
            pool_size: DEFAULT_POOL_SIZE,
        }
    }
}

// ── CycleReport ──────────────────────────────────────────────────

/// Outcome of one triggered capture cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The frame that was published.
    pub frame: Frame,
    /// Waiters that received it.
    pub delivered: usize,
    /// Failed attempts before the successful one.
    pub failures: u32,
    /// Time from the display grab to the publish of that image.
    pub latency: Duration,
    /// Time slept after publishing to hold the frame rate.
    pub paced: Duration,
}

/// How long to sleep so that a cycle which has run for `elapsed` lasts at
/// least `interval`. `None` when the budget is already spent.
pub fn pacing_delay(elapsed: Duration, interval: Duration) -> Option<Duration> {
    interval.checked_sub(elapsed).filter(|d| !d.is_zero())
}

// ── CaptureEngine ────────────────────────────────────────────────

struct Pipeline<C, E> {
    capturer: C,
    encoder: E,
}

impl<C: ScreenCapture, E: FrameEncoder> Pipeline<C, E> {
    /// Capture and encode into `sink`. Returns when the image was grabbed.
    fn produce(&mut self, sink: &mut FrameBuffer, quality: u8) -> Result<Instant, MediatorError> {
        let image = self.capturer.capture_display()?;
        sink.reset();
        self.encoder.encode(sink, &image, quality)?;
        Ok(image.timestamp)
    }
}

/// Drives capture, encoding and publishing for one [`FrameHub`].
///
/// Capture and encode are blocking and run on Tokio's blocking pool; the
/// loop itself is an ordinary task. It has no stop signal and runs until
/// the runtime shuts down.
pub struct CaptureEngine<C, E> {
    hub: Arc<FrameHub>,
    pipeline: Arc<Mutex<Pipeline<C, E>>>,
    config: EngineConfig,
}

impl<C: ScreenCapture, E: FrameEncoder> CaptureEngine<C, E> {
    /// Create an engine publishing into `hub`.
    pub fn new(hub: Arc<FrameHub>, capturer: C, encoder: E, config: EngineConfig) -> Self {
        Self {
            hub,
            pipeline: Arc::new(Mutex::new(Pipeline { capturer, encoder })),
            config,
        }
    }

    /// Build a hub sized from `config`, spawn the loop on it and return
    /// the hub for consumers.
    pub fn start(capturer: C, encoder: E, config: EngineConfig) -> (Arc<FrameHub>, JoinHandle<()>) {
        let hub = Arc::new(FrameHub::new(config.pool_size));
        let handle = Self::new(Arc::clone(&hub), capturer, encoder, config).spawn();
        (hub, handle)
    }

    /// Spawn [`run`](Self::run) on the current Tokio runtime.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Serve capture cycles forever.
    pub async fn run(mut self) {
        info!(
            quality = self.config.quality,
            interval_ms = self.config.frame_interval.as_millis() as u64,
            pool = self.config.pool_size,
            "capture loop started"
        );

        loop {
            self.hub.wait_for_trigger().await;

            // A subscriber that raced the previous publish may already
            // have been served, or every waiter may have disconnected.
            if self.hub.live_pending() == 0 {
                trace!("trigger fired with no live waiters; staying idle");
                continue;
            }

            if let Some(report) = self.run_cycle().await {
                debug!(
                    sequence = report.frame.sequence(),
                    delivered = report.delivered,
                    failures = report.failures,
                    latency_ms = report.latency.as_millis() as u64,
                    "capture cycle complete"
                );
            }
        }
    }

    /// Run one cycle: capture and encode until it succeeds, publish, then
    /// pace to the frame interval.
    ///
    /// Returns `None` when every waiter disconnected while the cycle was
    /// retrying; nothing is published and the engine goes back to idle.
    pub async fn run_cycle(&mut self) -> Option<CycleReport> {
        let started = Instant::now();
        let mut failures = 0u32;

        let (frame, delivered, latency) = loop {
            match self.attempt().await {
                Ok(published) => break published,
                Err(e) => {
                    failures += 1;
                    warn!(
                        error = %e,
                        failures,
                        "capture failed; retrying in {:?}",
                        self.config.retry_backoff
                    );
                    tokio::time::sleep(self.config.retry_backoff).await;
                    if self.hub.live_pending() == 0 {
                        debug!(failures, "all waiters left; abandoning capture cycle");
                        return None;
                    }
                }
            }
        };

        let paced = match pacing_delay(started.elapsed(), self.config.frame_interval) {
            Some(delay) => {
                tokio::time::sleep(delay).await;
                delay
            }
            None => Duration::ZERO,
        };

        Some(CycleReport {
            frame,
            delivered,
            failures,
            latency,
            paced,
        })
    }

    /// One capture + encode attempt; publishes on success.
    async fn attempt(&mut self) -> Result<(Frame, usize, Duration), MediatorError> {
        let mut buffer = self.hub.checkout();
        let pipeline = Arc::clone(&self.pipeline);
        let quality = self.config.quality;

        let (buffer, result) = tokio::task::spawn_blocking(move || {
            let result = pipeline
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .produce(&mut buffer, quality);
            (buffer, result)
        })
        .await
        .map_err(|e| MediatorError::Other(format!("capture worker panicked: {e}")))?;

        match result {
            Ok(captured_at) => {
                let (frame, delivered) = self.hub.publish(buffer);
                Ok((frame, delivered, captured_at.elapsed()))
            }
            Err(e) => {
                self.hub.restore(buffer);
                Err(e)
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_sleeps_remainder() {
        let d = pacing_delay(Duration::from_millis(20), Duration::from_millis(66));
        assert_eq!(d, Some(Duration::from_millis(46)));
    }

    #[test]
    fn pacing_never_negative() {
        assert_eq!(
            pacing_delay(Duration::from_millis(100), Duration::from_millis(66)),
            None
        );
        assert_eq!(
            pacing_delay(Duration::from_millis(66), Duration::from_millis(66)),
            None
        );
    }

    #[test]
    fn fps_interval_is_clamped() {
        assert_eq!(EngineConfig::interval_for_fps(0), Duration::from_secs(1));
        assert_eq!(
            EngineConfig::interval_for_fps(200),
            EngineConfig::interval_for_fps(60)
        );
    }

    #[test]
    fn default_config_matches_service_defaults() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.quality, 80);
        assert_eq!(cfg.pool_size, 4);
        assert_eq!(cfg.retry_backoff, Duration::from_secs(2));
    }
}
