//! Reusable frame storage for the scan loop
//!
//! Live scanning samples a frame on every tick. The pool keeps one RGBA
//! buffer sized to the largest frame seen so far and reuses it, so steady
//! state scanning does not allocate.

use crate::models::Frame;
use crate::models::pixels::byte_len;

/// Default reservation: one 1080p RGBA frame
pub const DEFAULT_CAPACITY: usize = 1920 * 1080 * 4;

/// Single reusable RGBA buffer
#[derive(Debug)]
pub struct FramePool {
    buffer: Vec<u8>,
    width: u32,
    height: u32,
    stats: AllocationStats,
}

impl FramePool {
    /// Pool reserving [`DEFAULT_CAPACITY`] bytes
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Pool reserving `capacity` bytes up front
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            width: 0,
            height: 0,
            stats: AllocationStats::default(),
        }
    }

    /// Copy `frame` into the pool, resizing to its native resolution,
    /// and return a view of the copy.
    ///
    /// Returns `None`, leaving the pool untouched, when `frame.rgba` is
    /// shorter than its dimensions require.
    pub fn fill_from(&mut self, frame: Frame<'_>) -> Option<Frame<'_>> {
        let len = byte_len(frame.width, frame.height);
        let pixels = frame.rgba.get(..len)?;
        if len > self.buffer.capacity() {
            self.stats.record_allocation();
        } else {
            self.stats.record_reuse(len);
        }

        self.buffer.clear();
        self.buffer.extend_from_slice(pixels);
        self.width = frame.width;
        self.height = frame.height;

        Some(Frame {
            width: self.width,
            height: self.height,
            rgba: &self.buffer,
        })
    }

    /// The last frame copied in, if any
    pub fn current(&self) -> Option<Frame<'_>> {
        if self.buffer.is_empty() {
            return None;
        }
        Some(Frame {
            width: self.width,
            height: self.height,
            rgba: &self.buffer,
        })
    }

    /// Bytes the pool can hold without reallocating
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Reuse/allocation counters since the last [`clear`](Self::clear)
    pub fn stats(&self) -> &AllocationStats {
        &self.stats
    }

    /// Forget the current frame and counters (keeps capacity)
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.width = 0;
        self.height = 0;
        self.stats = AllocationStats::default();
    }
}

impl Default for FramePool {
    fn default() -> Self {
        Self::new()
    }
}

/// Statistics for monitoring allocation patterns
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AllocationStats {
    /// Frames that fit in the existing buffer
    pub reuses: usize,
    /// Frames that forced the buffer to grow
    pub allocations: usize,
    /// Bytes copied into reused storage
    pub total_bytes_reused: usize,
}

impl AllocationStats {
    fn record_reuse(&mut self, bytes: usize) {
        self.reuses += 1;
        self.total_bytes_reused += bytes;
    }

    fn record_allocation(&mut self) {
        self.allocations += 1;
    }
}
