//! Error types for vnlz operations.
//!
//! A single error enum covers every failure the decoders can report:
//! truncated streams, back-references into undefined history, unknown or
//! malformed dialect tables, and I/O errors from the surrounding tooling.

use std::io;
use thiserror::Error;

/// The main error type for vnlz operations.
#[derive(Debug, Error)]
pub enum LzError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The compressed stream ran out before the declared size was produced.
    #[error("Truncated input: produced {produced} of {expected} bytes")]
    TruncatedInput {
        /// Bytes actually written to the output.
        produced: usize,
        /// Bytes declared by the container header.
        expected: usize,
    },

    /// A back-reference points into history that was never written.
    #[error(
        "Invalid token at output position {position}: source {source_index:#x} lies outside the {defined} defined frame bytes"
    )]
    InvalidToken {
        /// Output position at which the token was decoded.
        position: usize,
        /// Frame index (or distance) the token referred to.
        source_index: usize,
        /// Number of defined bytes in the frame at that point.
        defined: usize,
    },

    /// No dialect is registered under the requested tag.
    #[error("Unsupported dialect: {tag}")]
    UnsupportedDialect {
        /// The tag that was looked up.
        tag: String,
    },

    /// A dialect table violates a structural invariant.
    #[error("Invalid dialect table: {message}")]
    InvalidDialect {
        /// Description of the violated invariant.
        message: String,
    },

    /// Invalid container header around a compressed stream.
    #[error("Invalid header: {message}")]
    InvalidHeader {
        /// Description of the header error.
        message: String,
    },

    /// An output write did not land at the current write position.
    #[error("Out-of-order write at {position}, expected {expected}")]
    OutOfOrderWrite {
        /// Position of the rejected write.
        position: usize,
        /// Current write position of the output.
        expected: usize,
    },

    /// An output write went past the declared size.
    #[error("Buffer too small: need {needed} bytes, have {available}")]
    BufferTooSmall {
        /// Bytes needed to hold the write.
        needed: usize,
        /// Declared output size.
        available: usize,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: expected {expected} more bytes")]
    UnexpectedEof {
        /// Number of bytes that were expected but not available.
        expected: usize,
    },
}

/// Result type alias for vnlz operations.
pub type Result<T> = std::result::Result<T, LzError>;

impl LzError {
    /// Create a truncated input error.
    pub fn truncated(produced: usize, expected: usize) -> Self {
        Self::TruncatedInput { produced, expected }
    }

    /// Create an invalid token error.
    pub fn invalid_token(position: usize, source_index: usize, defined: usize) -> Self {
        Self::InvalidToken {
            position,
            source_index,
            defined,
        }
    }

    /// Create an unsupported dialect error.
    pub fn unsupported_dialect(tag: impl Into<String>) -> Self {
        Self::UnsupportedDialect { tag: tag.into() }
    }

    /// Create an invalid dialect error.
    pub fn invalid_dialect(message: impl Into<String>) -> Self {
        Self::InvalidDialect {
            message: message.into(),
        }
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader {
            message: message.into(),
        }
    }

    /// Create an unexpected EOF error.
    pub fn unexpected_eof(expected: usize) -> Self {
        Self::UnexpectedEof { expected }
    }

    /// Whether this error only signals that the input ran dry.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::UnexpectedEof { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LzError::truncated(10, 64);
        assert!(err.to_string().contains("10 of 64"));

        let err = LzError::unsupported_dialect("lzx9");
        assert!(err.to_string().contains("lzx9"));

        let err = LzError::invalid_token(0, 0xFFF, 0);
        assert!(err.to_string().contains("0xfff"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: LzError = io_err.into();
        assert!(matches!(err, LzError::Io(_)));
    }

    #[test]
    fn test_is_eof() {
        assert!(LzError::unexpected_eof(1).is_eof());
        assert!(!LzError::truncated(0, 1).is_eof());
    }
}
