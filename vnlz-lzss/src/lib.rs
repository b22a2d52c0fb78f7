//! # vnlz LZSS
//!
//! Pure Rust sliding-window (LZSS family) decompression for the compressed
//! streams found inside visual-novel engine containers.
//!
//! Dozens of engines ship their own variant of the same scheme: a circular
//! frame, control bits choosing between a literal and a back-reference, and
//! a 2 or 3 byte match token. They differ only in constants, so a single
//! decoder is driven by a [`DialectTable`]:
//!
//! | Tag | Frame | Notes |
//! |-----|-------|-------|
//! | `okumura` | 4 KB | classic `lzss.c`, space-seeded |
//! | `okumura-zero` | 4 KB | zero-seeded (`lzss`, `ff7`) |
//! | `okumura-graded` | 4 KB | run/ramp seeded |
//! | `okumura-fc0` | 4 KB | space-seeded, cursor at 0xFC0 |
//! | `lz10` | 1 KB | 10-bit offsets |
//! | `msb-cursor1` | 4 KB | MSB flags, cursor 1 |
//! | `cursor1-term` | 4 KB | zero count ends the stream |
//! | `shin` | 4 KB | relative distances |
//! | `kid-be` | 2 KB | relative distances, 5-bit lengths |
//! | `hotel-dusk` | 64 KB | 3-byte tokens |
//! | `packed13` | 8 KB | bit-packed, zero offset ends the stream |
//!
//! ## Example
//!
//! ```rust
//! use vnlz_lzss::{Dialect, decode, encode};
//!
//! let table = Dialect::Okumura.table();
//! let data = b"It was a dark and stormy night; a dark and stormy night.";
//!
//! let packed = encode(data, table).unwrap();
//! let decoded = decode(&packed, data.len(), table).unwrap();
//! assert_eq!(decoded.as_bytes(), data);
//! ```
//!
//! ## Custom dialects
//!
//! [`DialectTable`] implements `serde` traits, so formats missing from the
//! catalog can be described in a configuration file and validated with
//! [`DialectTable::validate`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "parallel")]
pub mod batch;
pub mod catalog;
pub mod decode;
pub mod dialect;
pub mod encode;
pub mod framing;
pub mod tables;

// Re-exports
pub use catalog::{Dialect, lookup};
pub use decode::{SlidingWindowDecoder, Token, decode, decode_exact, decode_strict};
pub use dialect::{ControlSpec, DialectTable, InitialFill, OffsetMode, Terminator, TokenLayout};
pub use encode::{MatchingEncoder, encode};
pub use framing::{SizePrefix, check_declared_size, decode_prefixed, encode_prefixed};

#[cfg(feature = "parallel")]
pub use batch::{BatchJob, decode_batch, decode_prefixed_batch};

pub use vnlz_core::{DecodeMode, Decoded, LzError, Result};
