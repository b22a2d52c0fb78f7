//! Pre-sized output buffer and the decode result.
//!
//! Every container header handled by the callers declares the unpacked size
//! up front, so the output is allocated once at that size and filled left to
//! right. Termination is "buffer full", not "end of stream".

use crate::error::{LzError, Result};

/// Fixed-capacity destination buffer written in decode order.
#[derive(Debug, Clone)]
pub struct OutputSink {
    /// Zero-initialised buffer of exactly the target length.
    buffer: Vec<u8>,
    /// Next position to write.
    position: usize,
}

impl OutputSink {
    /// Allocate a sink for exactly `target_length` bytes.
    pub fn new(target_length: usize) -> Self {
        Self {
            buffer: vec![0; target_length],
            position: 0,
        }
    }

    /// Total capacity (the declared target length).
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes still missing to reach the target length.
    pub fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Check whether the target length has been reached.
    pub fn is_full(&self) -> bool {
        self.position >= self.buffer.len()
    }

    /// Write `byte` at `position`.
    ///
    /// Writes are monotonic: `position` must be the current write position.
    pub fn write(&mut self, position: usize, byte: u8) -> Result<()> {
        if position != self.position {
            return Err(LzError::OutOfOrderWrite {
                position,
                expected: self.position,
            });
        }
        if self.push(byte) {
            Ok(())
        } else {
            Err(LzError::BufferTooSmall {
                needed: position + 1,
                available: self.buffer.len(),
            })
        }
    }

    /// Append a byte. Returns `false` (and drops the byte) once full.
    #[inline]
    pub fn push(&mut self, byte: u8) -> bool {
        match self.buffer.get_mut(self.position) {
            Some(slot) => {
                *slot = byte;
                self.position += 1;
                true
            }
            None => false,
        }
    }

    /// The bytes written so far.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Close the sink and hand the buffer over as a [`Decoded`] result.
    pub fn finish(self, consumed: usize, terminated: bool) -> Decoded {
        Decoded {
            produced: self.position,
            data: self.buffer,
            consumed,
            terminated,
        }
    }
}

/// Result of one decode call.
///
/// Owns the full, zero-padded output buffer together with the number of
/// bytes that were actually produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    data: Vec<u8>,
    produced: usize,
    consumed: usize,
    terminated: bool,
}

impl Decoded {
    /// An empty result for a zero target length.
    pub fn empty() -> Self {
        Self {
            data: Vec::new(),
            produced: 0,
            consumed: 0,
            terminated: false,
        }
    }

    /// Bytes actually produced.
    pub fn produced(&self) -> usize {
        self.produced
    }

    /// Declared target length.
    pub fn expected(&self) -> usize {
        self.data.len()
    }

    /// Input bytes consumed by the decoder.
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Whether an in-band terminator token ended the stream.
    pub fn terminated(&self) -> bool {
        self.terminated
    }

    /// Whether the declared size was reached.
    pub fn is_complete(&self) -> bool {
        self.produced == self.data.len()
    }

    /// The produced bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.produced]
    }

    /// The whole buffer, zero-padded up to the declared size.
    pub fn padded(&self) -> &[u8] {
        &self.data
    }

    /// Take the produced bytes.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.data.truncate(self.produced);
        self.data
    }

    /// Take the whole zero-padded buffer.
    pub fn into_padded(self) -> Vec<u8> {
        self.data
    }

    /// Fail with [`LzError::TruncatedInput`] unless the declared size was met.
    pub fn require_complete(self) -> Result<Self> {
        if self.is_complete() {
            Ok(self)
        } else {
            Err(LzError::truncated(self.produced, self.data.len()))
        }
    }
}
