//! Fixed ring of reusable frame buffers.
//!
//! The capture loop checks out the buffer at the cursor, fills it outside
//! any lock, and commits it back; committing advances the cursor so a slot
//! is only rewritten after every other slot has been used once.

use std::sync::Arc;

use crate::screencap::buffer::FrameBuffer;

/// Number of slots used when no explicit size is configured.
pub const DEFAULT_POOL_SIZE: usize = 4;

// ── Frame ────────────────────────────────────────────────────────

/// One published, encoded screen image.
///
/// Cloning is cheap: every subscriber of a publish shares the same
/// underlying buffer.
#[derive(Debug, Clone)]
pub struct Frame {
    buffer: Arc<FrameBuffer>,
    sequence: u64,
    slot: usize,
}

impl Frame {
    /// Encoded image bytes.
    pub fn bytes(&self) -> &[u8] {
        self.buffer.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Publish counter value for this frame, starting at 1.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Pool slot the frame was written to.
    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Whether both frames share one buffer, i.e. came from the same publish.
    pub fn same_buffer(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.buffer, &other.buffer)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        self.bytes()
    }
}

// ── BufferPool ───────────────────────────────────────────────────

/// Ring of `N` frame buffers indexed by a rotating cursor.
///
/// Delivered frames hold an `Arc` to their slot's buffer. When a slot comes
/// around again while a consumer still holds it, the pool hands out a new
/// buffer of the same capacity rather than overwriting bytes that are
/// still being read.
#[derive(Debug)]
pub struct BufferPool {
    slots: Vec<Arc<FrameBuffer>>,
    cursor: usize,
}

impl BufferPool {
    /// Create a pool with `size` empty slots (at least one).
    pub fn new(size: usize) -> Self {
        let slots = (0..size.max(1)).map(|_| Arc::default()).collect();
        Self { slots, cursor: 0 }
    }

    /// Index of the slot the next frame will be written to.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    /// Take the buffer at the cursor for writing, emptied.
    ///
    /// The cursor does not move; call [`commit`](Self::commit) with the
    /// filled buffer, or [`restore`](Self::restore) to give it back unused.
    pub fn checkout(&mut self) -> FrameBuffer {
        let slot = std::mem::take(&mut self.slots[self.cursor]);
        let mut buffer = match Arc::try_unwrap(slot) {
            Ok(buffer) => buffer,
            Err(held) => {
                tracing::debug!(
                    slot = self.cursor,
                    "frame still held by a consumer; allocating a fresh slot buffer"
                );
                FrameBuffer::with_capacity(held.capacity())
            }
        };
        buffer.reset();
        buffer
    }

    /// Return an unpublished buffer to the cursor slot without advancing.
    pub fn restore(&mut self, buffer: FrameBuffer) {
        self.slots[self.cursor] = Arc::new(buffer);
    }

    /// Store the filled buffer in the cursor slot, advance the cursor and
    /// return the frame to deliver.
    pub fn commit(&mut self, buffer: FrameBuffer, sequence: u64) -> Frame {
        let slot = self.cursor;
        let buffer = Arc::new(buffer);
        self.slots[slot] = Arc::clone(&buffer);
        self.cursor = (self.cursor + 1) % self.slots.len();
        Frame {
            buffer,
            sequence,
            slot,
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_SIZE)
    }
}

// ── Tests ────────────────────────────────────────────────────────
