//! Size-prefixed streams.
//!
//! Most containers store the unpacked size as a 32-bit integer right in front
//! of the compressed stream. These helpers read and write that prefix around
//! a decode or encode call.

use crate::decode::SlidingWindowDecoder;
use crate::dialect::DialectTable;
use crate::encode::MatchingEncoder;
use std::fmt;
use std::str::FromStr;
use vnlz_core::error::{LzError, Result};
use vnlz_core::sink::Decoded;
use vnlz_core::traits::{Compress, DecodeMode, Decompress};

/// Largest unpacked size a prefix may declare (256 MB).
pub const MAX_DECLARED_SIZE: usize = 256 << 20;

/// Reject unpacked sizes above [`MAX_DECLARED_SIZE`].
pub fn check_declared_size(size: usize) -> Result<usize> {
    if size > MAX_DECLARED_SIZE {
        return Err(LzError::invalid_header(format!(
            "declared size {size} exceeds {MAX_DECLARED_SIZE}"
        )));
    }
    Ok(size)
}

/// Byte order of a 32-bit unpacked-size prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizePrefix {
    /// Little-endian `u32`.
    Le32,
    /// Big-endian `u32`.
    Be32,
}

impl SizePrefix {
    /// Width of the prefix in bytes.
    pub const LEN: usize = 4;

    /// Read the declared size from the front of `data`.
    pub fn read(&self, data: &[u8]) -> Result<usize> {
        let raw: [u8; 4] = data
            .get(..Self::LEN)
            .and_then(|b| b.try_into().ok())
            .ok_or_else(|| {
                LzError::invalid_header(format!(
                    "size prefix needs {} bytes, got {}",
                    Self::LEN,
                    data.len()
                ))
            })?;
        let size = match self {
            Self::Le32 => u32::from_le_bytes(raw),
            Self::Be32 => u32::from_be_bytes(raw),
        } as usize;
        check_declared_size(size)
    }

    /// Encode `size` as a prefix.
    pub fn encode(&self, size: usize) -> Result<[u8; 4]> {
        let size = u32::try_from(size)
            .map_err(|_| LzError::invalid_header(format!("size {size} does not fit in 32 bits")))?;
        Ok(match self {
            Self::Le32 => size.to_le_bytes(),
            Self::Be32 => size.to_be_bytes(),
        })
    }
}

impl FromStr for SizePrefix {
    type Err = LzError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "le32" | "le" => Ok(Self::Le32),
            "be32" | "be" => Ok(Self::Be32),
            other => Err(LzError::invalid_header(format!("unknown size prefix: {other}"))),
        }
    }
}

impl fmt::Display for SizePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Le32 => write!(f, "le32"),
            Self::Be32 => write!(f, "be32"),
        }
    }
}

/// Decode a stream preceded by its unpacked size.
///
/// [`Decoded::consumed`] counts stream bytes only, not the prefix.
pub fn decode_prefixed(
    data: &[u8],
    prefix: SizePrefix,
    dialect: &DialectTable,
    mode: DecodeMode,
) -> Result<Decoded> {
    let size = prefix.read(data)?;
    SlidingWindowDecoder::new(dialect)?
        .with_mode(mode)
        .decode(&data[SizePrefix::LEN..], size)
}

/// Encode `data` and put its size in front.
pub fn encode_prefixed(data: &[u8], prefix: SizePrefix, dialect: &DialectTable) -> Result<Vec<u8>> {
    let header = prefix.encode(data.len())?;
    let body = MatchingEncoder::new(dialect)?.encode(data)?;

    let mut out = Vec::with_capacity(SizePrefix::LEN + body.len());
    out.extend_from_slice(&header);
    out.extend_from_slice(&body);
    Ok(out)
}
