//! # vnlz Core
//!
//! Core components for the vnlz decoder family.
//!
//! This crate provides the building blocks shared by every LZSS dialect:
//!
//! - [`bitstream`]: Raw byte cursor, control-bit cadences, packed bit I/O
//! - [`frame`]: Circular history window with defined-region tracking
//! - [`sink`]: Pre-sized output buffer and the [`Decoded`] result
//! - [`traits`]: One-shot [`Decompress`] / [`Compress`] traits and [`DecodeMode`]
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Tools                                               │
//! │     vnlz CLI, batch decode                              │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Dialects                                            │
//! │     DialectTable, SlidingWindowDecoder, matching encoder│
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: Primitives (this crate)                             │
//! │     ByteReader/ControlBits, Frame, OutputSink           │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use vnlz_core::{Frame, OutputSink};
//!
//! let mut frame = Frame::new(0x1000).unwrap();
//! let mut sink = OutputSink::new(4);
//!
//! sink.push(b'A');
//! frame.push(b'A');
//!
//! // distance 1, length 3: overlapping self-copy
//! let source = frame.index_behind(1);
//! frame.copy_to(source, 3, &mut sink);
//! assert_eq!(sink.as_slice(), b"AAAA");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

#[cfg(feature = "async-io")]
pub mod async_io;
pub mod bitstream;
pub mod error;
pub mod frame;
pub mod sink;
pub mod traits;

// Re-exports for convenience
pub use bitstream::{
    BitOrder, ByteReader, ControlBits, ControlCadence, Endian, PackedBitReader, PackedBitWriter,
};
pub use error::{LzError, Result};
pub use frame::Frame;
pub use sink::{Decoded, OutputSink};
pub use traits::{Compress, DecodeMode, Decompress};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitOrder, ByteReader, ControlBits, ControlCadence, Endian};
    pub use crate::error::{LzError, Result};
    pub use crate::frame::Frame;
    pub use crate::sink::{Decoded, OutputSink};
    pub use crate::traits::{Compress, DecodeMode, Decompress};
}
