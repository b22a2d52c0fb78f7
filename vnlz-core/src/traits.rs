//! Core traits shared by every decoder.
//!
//! A decode is a single synchronous call: compressed bytes plus the declared
//! unpacked size in, a pre-sized buffer out. There is no streaming state to
//! carry between calls, so implementations are expected to be `Sync` and
//! reusable across threads.

use crate::error::Result;
use crate::sink::Decoded;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What to do when the input runs out before the declared size is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum DecodeMode {
    /// Return the partial output with its produced count.
    #[default]
    Lenient,
    /// Fail with `TruncatedInput`.
    Strict,
}

/// A one-shot decompressor.
pub trait Decompress {
    /// Decode `input` into a buffer of exactly `target_length` bytes.
    ///
    /// # Returns
    ///
    /// The output buffer together with the number of bytes produced and the
    /// number of input bytes consumed.
    fn decode(&self, input: &[u8], target_length: usize) -> Result<Decoded>;

    /// Decode and insist on reaching `target_length`.
    fn decode_exact(&self, input: &[u8], target_length: usize) -> Result<Vec<u8>> {
        Ok(self.decode(input, target_length)?.require_complete()?.into_vec())
    }
}

/// A one-shot compressor producing streams a matching [`Decompress`] accepts.
pub trait Compress {
    /// Compress `data` completely.
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>>;
}

impl<T: Decompress + ?Sized> Decompress for &T {
    fn decode(&self, input: &[u8], target_length: usize) -> Result<Decoded> {
        (**self).decode(input, target_length)
    }
}
