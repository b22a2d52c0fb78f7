//! Circular history window ("frame") for LZSS-family decompression.
//!
//! The frame stores the most recently emitted bytes. Every byte written to
//! the output is mirrored here at the cursor, so later back-references,
//! including ones that overlap the bytes they are producing, see the freshest
//! data.
//!
//! # Sizes
//!
//! Frame sizes observed across the supported dialects:
//! - 0x400 (1 KB)
//! - 0x800 (2 KB)
//! - 0x1000 (4 KB, the classic `lzss.c` window)
//! - 0x2000 (8 KB)
//! - 0x10000 (64 KB)
//!
//! All of them are powers of two, so index arithmetic is a bitmask.

use crate::error::{LzError, Result};
use crate::sink::OutputSink;

/// A fixed-size circular history window.
///
/// Besides the bytes themselves the frame tracks which part of its content
/// is *defined*: either the whole frame (after a pre-fill) or only the bytes
/// written since the cursor was placed. References outside the defined part
/// can then be rejected instead of silently copying zeros.
#[derive(Debug, Clone)]
pub struct Frame {
    /// The underlying buffer.
    buffer: Vec<u8>,
    /// Current write position (next byte will be written here).
    cursor: usize,
    /// Cursor position when writing started.
    origin: usize,
    /// Bytes written since the cursor was placed (saturates at capacity).
    written: usize,
    /// Whether the initial content counts as defined history.
    prefilled: bool,
    /// Mask for efficient modulo (capacity - 1).
    mask: usize,
}

impl Frame {
    /// Create a zeroed frame with no defined history.
    ///
    /// `capacity` must be a non-zero power of two.
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 || !capacity.is_power_of_two() {
            return Err(LzError::invalid_dialect(format!(
                "frame size must be a power of 2, got {capacity:#x}"
            )));
        }

        Ok(Self {
            buffer: vec![0; capacity],
            cursor: 0,
            origin: 0,
            written: 0,
            prefilled: false,
            mask: capacity - 1,
        })
    }

    /// Get the capacity of the frame.
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Get the current write position.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Place the write cursor. Resets the written-byte count.
    pub fn set_cursor(&mut self, position: usize) {
        self.cursor = position & self.mask;
        self.origin = self.cursor;
        self.written = 0;
    }

    /// Fill `len` bytes starting at index 0 with `value`.
    pub fn fill(&mut self, value: u8, len: usize) {
        let len = len.min(self.capacity());
        self.buffer[..len].fill(value);
    }

    /// Copy `pattern` into the frame starting at index 0.
    ///
    /// A pattern longer than the frame is cut off at the frame end.
    pub fn preload(&mut self, pattern: &[u8]) {
        let len = pattern.len().min(self.capacity());
        self.buffer[..len].copy_from_slice(&pattern[..len]);
    }

    /// Treat the whole current content as defined history.
    pub fn mark_defined(&mut self) {
        self.prefilled = true;
    }

    /// Number of bytes that may legally be referenced.
    pub fn defined_len(&self) -> usize {
        if self.prefilled {
            self.capacity()
        } else {
            self.written
        }
    }

    /// Check whether frame index `index` holds defined data.
    pub fn is_defined_index(&self, index: usize) -> bool {
        self.prefilled
            || self.written >= self.capacity()
            || (index.wrapping_sub(self.origin) & self.mask) < self.written
    }

    /// Check whether the byte `distance` positions behind the cursor is defined.
    pub fn is_defined_distance(&self, distance: usize) -> bool {
        distance >= 1 && distance <= self.capacity() && distance <= self.defined_len()
    }

    /// Frame index `distance` bytes behind the cursor.
    pub fn index_behind(&self, distance: usize) -> usize {
        self.cursor.wrapping_sub(distance) & self.mask
    }

    /// Read the byte at `index` (wrapped into the frame).
    #[inline]
    pub fn get(&self, index: usize) -> u8 {
        self.buffer[index & self.mask]
    }

    /// Write a byte at the cursor and advance it.
    #[inline]
    pub fn push(&mut self, byte: u8) {
        self.buffer[self.cursor] = byte;
        self.cursor = (self.cursor + 1) & self.mask;
        if self.written < self.capacity() {
            self.written += 1;
        }
    }

    /// Copy `length` bytes starting at frame index `source` into both the
    /// sink and the frame.
    ///
    /// The copy runs strictly byte by byte, so a source range overlapping the
    /// bytes being written (distance shorter than length) produces the
    /// repeating pattern LZ77 expects. Stops early once the sink is full.
    ///
    /// # Returns
    ///
    /// The number of bytes copied.
    pub fn copy_to(&mut self, source: usize, length: usize, sink: &mut OutputSink) -> usize {
        let mut src_pos = source & self.mask;
        let mut copied = 0;

        for _ in 0..length {
            let byte = self.buffer[src_pos];
            if !sink.push(byte) {
                break;
            }
            self.push(byte);
            src_pos = (src_pos + 1) & self.mask;
            copied += 1;
        }

        copied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_basic() {
        let mut frame = Frame::new(8).unwrap();

        for &b in b"Hello" {
            frame.push(b);
        }

        assert_eq!(frame.defined_len(), 5);
        assert_eq!(frame.get(frame.index_behind(1)), b'o');
        assert_eq!(frame.get(frame.index_behind(5)), b'H');
        assert!(frame.is_defined_distance(5));
        assert!(!frame.is_defined_distance(6));
    }

    #[test]
    fn test_frame_wrap() {
        let mut frame = Frame::new(4).unwrap();

        for &b in b"ABCDEF" {
            frame.push(b);
        }

        assert_eq!(frame.defined_len(), 4);
        assert_eq!(frame.cursor(), 2);
        let tail: Vec<u8> = (1..=4).rev().map(|d| frame.get(frame.index_behind(d))).collect();
        assert_eq!(tail, b"CDEF");
        assert!(frame.is_defined_index(3));
    }

    #[test]
    fn test_defined_index_tracks_origin() {
        let mut frame = Frame::new(16).unwrap();
        frame.set_cursor(14);
        frame.push(b'x');
        frame.push(b'y');
        frame.push(b'z');

        assert!(frame.is_defined_index(14));
        assert!(frame.is_defined_index(15));
        assert!(frame.is_defined_index(0));
        assert!(!frame.is_defined_index(1));
        assert!(!frame.is_defined_index(13));
    }

    #[test]
    fn test_prefill_defines_everything() {
        let mut frame = Frame::new(16).unwrap();
        frame.fill(b' ', 12);
        frame.mark_defined();

        assert_eq!(frame.get(0), b' ');
        assert_eq!(frame.get(12), 0);
        assert!(frame.is_defined_index(13));
        assert!(frame.is_defined_distance(16));
    }

    #[test]
    fn test_copy_overlap() {
        // "AB" then distance 2, length 6 -> "ABABAB"
        let mut frame = Frame::new(32).unwrap();
        let mut sink = OutputSink::new(8);

        for &b in b"AB" {
            sink.push(b);
            frame.push(b);
        }

        let source = frame.index_behind(2);
        assert_eq!(frame.copy_to(source, 6, &mut sink), 6);
        assert_eq!(sink.as_slice(), b"ABABABAB");
    }

    #[test]
    fn test_copy_stops_at_sink_capacity() {
        let mut frame = Frame::new(32).unwrap();
        let mut sink = OutputSink::new(4);

        sink.push(b'X');
        frame.push(b'X');

        let source = frame.index_behind(1);
        assert_eq!(frame.copy_to(source, 10, &mut sink), 3);
        assert!(sink.is_full());
        assert_eq!(sink.as_slice(), b"XXXX");
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        assert!(Frame::new(100).is_err());
        assert!(Frame::new(0).is_err());
    }
}
