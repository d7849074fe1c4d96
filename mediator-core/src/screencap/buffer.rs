//! Growable byte sink that holds one encoded frame.

use std::io;

/// Smallest allocation made on the first write into an empty buffer.
pub const MIN_CAPACITY: usize = 2048;

// ── FrameBuffer ──────────────────────────────────────────────────

/// A reusable, growable container for one encoded image.
///
/// Unlike `Vec<u8>`, the valid length is tracked separately from the
/// backing allocation so that [`reset`](Self::reset) keeps the storage
/// around for the next frame. Capacity only grows: after a few frames of
/// similar size the buffer stops allocating entirely.
///
/// Writes never fail, which lets encoders treat the buffer as an
/// infallible [`io::Write`] sink.
#[derive(Debug, Default)]
pub struct FrameBuffer {
    /// Backing storage; `data.len()` is the capacity.
    data: Vec<u8>,
    /// Number of valid bytes at the start of `data`.
    len: usize,
}

impl FrameBuffer {
    /// An empty buffer with no allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty buffer with `capacity` bytes already allocated.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity],
            len: 0,
        }
    }

    /// Append `bytes` after the current valid length and return how many
    /// bytes were written (always `bytes.len()`).
    pub fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        let needed = self.len + bytes.len();
        if self.data.is_empty() {
            self.data = vec![0; needed.max(MIN_CAPACITY)];
        } else if needed > self.data.len() {
            let mut capacity = self.data.len() * 2;
            while needed > capacity {
                capacity *= 2;
            }
            let mut grown = vec![0; capacity];
            grown[..self.len].copy_from_slice(&self.data[..self.len]);
            self.data = grown;
        }

        self.data[self.len..needed].copy_from_slice(bytes);
        self.len = needed;
        bytes.len()
    }

    /// Forget the current contents while keeping the allocation.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// The valid bytes, `[0, len)`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len]
    }

    /// Number of valid bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
}

impl io::Write for FrameBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Ok(self.write_bytes(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl AsRef<[u8]> for FrameBuffer {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

// ── Tests ────────────────────────────────────────────────────────
