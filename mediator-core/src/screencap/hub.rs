//! Subscription registry shared between the capture loop and consumers.
//!
//! Consumers call [`FrameHub::subscribe`] and await the returned
//! [`FrameWaiter`]; the capture loop calls [`FrameHub::publish`]. One mutex
//! guards the waiter list and the buffer pool cursor, and it is never held
//! across capture or encoding.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use tokio::sync::oneshot;

use crate::error::MediatorError;
use crate::screencap::buffer::FrameBuffer;
use crate::screencap::pool::{BufferPool, Frame};
use crate::screencap::trigger::Trigger;

// ── FrameWaiter ──────────────────────────────────────────────────

/// Handle for one pending frame request.
///
/// Resolves exactly once, with the first frame published after the
/// subscribe call. Dropping it abandons the request; the publisher simply
/// skips it.
#[derive(Debug)]
pub struct FrameWaiter {
    rx: oneshot::Receiver<Frame>,
}

impl Future for FrameWaiter {
    type Output = Result<Frame, MediatorError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx).map_err(MediatorError::from)
    }
}

// ── FrameHub ─────────────────────────────────────────────────────

struct Registry {
    waiters: Vec<oneshot::Sender<Frame>>,
    pool: BufferPool,
}

/// Fan-out point for encoded screen frames.
///
/// Construct one per process, wrap it in an `Arc`, hand a clone to the
/// capture loop and to every request handler.
pub struct FrameHub {
    registry: Mutex<Registry>,
    trigger: Trigger,
    published: AtomicU64,
}

impl FrameHub {
    /// Create a hub whose pool has `pool_size` slots.
    pub fn new(pool_size: usize) -> Self {
        Self {
            registry: Mutex::new(Registry {
                waiters: Vec::new(),
                pool: BufferPool::new(pool_size),
            }),
            trigger: Trigger::new(),
            published: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Registry> {
        // The critical sections never panic midway, so a poisoned lock
        // still holds consistent data.
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register interest in the next frame and wake the capture loop.
    ///
    /// Never blocks on capture; await the returned waiter for the frame.
    pub fn subscribe(&self) -> FrameWaiter {
        let (tx, rx) = oneshot::channel();
        self.lock().waiters.push(tx);
        self.trigger.fire();
        FrameWaiter { rx }
    }

    /// Deliver a filled buffer to every registered waiter and clear the
    /// list. Returns the published frame and how many waiters took it.
    pub fn publish(&self, buffer: FrameBuffer) -> (Frame, usize) {
        let mut registry = self.lock();
        let sequence = self.published.fetch_add(1, Ordering::Relaxed) + 1;
        let frame = registry.pool.commit(buffer, sequence);

        let mut delivered = 0;
        for tx in registry.waiters.drain(..) {
            // A dropped receiver means the consumer went away.
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            }
        }
        drop(registry);

        tracing::trace!(
            sequence,
            slot = frame.slot(),
            bytes = frame.len(),
            delivered,
            "published frame"
        );
        (frame, delivered)
    }

    /// Take the next pool buffer for the capture loop to fill.
    pub(crate) fn checkout(&self) -> FrameBuffer {
        self.lock().pool.checkout()
    }

    /// Return a buffer that was not published (encode failed).
    pub(crate) fn restore(&self, buffer: FrameBuffer) {
        self.lock().pool.restore(buffer);
    }

    /// Wait for a subscriber to fire the trigger.
    pub(crate) async fn wait_for_trigger(&self) {
        self.trigger.wait().await;
    }

    /// Whether a capture cycle has been requested but not started.
    pub fn trigger_pending(&self) -> bool {
        self.trigger.is_pending()
    }

    /// Waiters registered for the next publish.
    pub fn pending(&self) -> usize {
        self.lock().waiters.len()
    }

    /// Waiters whose consumer is still listening. Drops the senders of
    /// abandoned waiters as a side effect.
    pub fn live_pending(&self) -> usize {
        let mut registry = self.lock();
        registry.waiters.retain(|tx| !tx.is_closed());
        registry.waiters.len()
    }

    /// Slot the next frame will be written to.
    pub fn cursor(&self) -> usize {
        self.lock().pool.cursor()
    }

    /// Number of frames published since the hub was created.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl Default for FrameHub {
    fn default() -> Self {
        Self::new(crate::screencap::pool::DEFAULT_POOL_SIZE)
    }
}

impl std::fmt::Debug for FrameHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHub")
            .field("pending", &self.pending())
            .field("published", &self.published())
            .finish()
    }
}

// ── Tests ────────────────────────────────────────────────────────
