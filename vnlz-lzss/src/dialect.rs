//! Dialect tables: the per-format parameters of the LZSS engine.
//!
//! Every container format in the catalog uses the same sliding-window
//! scheme with a handful of knobs turned differently. A [`DialectTable`]
//! captures those knobs as plain data; it is selected once per format and
//! never mutated during a decode.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use vnlz_core::bitstream::{BitOrder, ByteReader, ControlCadence, Endian};
use vnlz_core::error::{LzError, Result};

/// Largest frame a table may declare (16 MB).
pub const MAX_FRAME_SIZE: usize = 1 << 24;

/// Largest length bias a table may declare.
pub const MAX_LENGTH_BIAS: usize = 0x10000;

/// How the frame is seeded before the first token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum InitialFill {
    /// Nothing is defined; referencing unwritten history is an error.
    None,
    /// The whole frame is zeros.
    Zeros,
    /// `len` bytes from index 0 hold `value`, the rest is zeros.
    Byte {
        /// Fill byte.
        value: u8,
        /// Number of filled bytes.
        len: usize,
    },
    /// The graded pattern from [`crate::tables::graded_fill`].
    Graded,
}

/// Control-bit convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlSpec {
    /// Order of bits inside a control word (or the whole packed stream).
    pub order: BitOrder,
    /// How exhaustion of a control word is detected.
    pub cadence: ControlCadence,
    /// Control bit value that announces a literal.
    pub literal_bit: bool,
}

/// How offset and length fields are packed into a match token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum TokenLayout {
    /// Two bytes `b0, b1`: `offset = b0 | (b1 >> length_bits) << 8`,
    /// `length = b1 & ((1 << length_bits) - 1)`.
    ///
    /// With `length_bits = 4` this is the classic `lzss.c` packing.
    SplitByte {
        /// Width of the length field in the low bits of the second byte.
        length_bits: u8,
    },
    /// A `bytes`-wide integer in the given byte order holding both fields
    /// at fixed bit positions.
    Word {
        /// Token width in bytes.
        bytes: u8,
        /// Byte order of the integer.
        endian: Endian,
        /// Bit position of the offset field.
        offset_shift: u8,
        /// Width of the offset field.
        offset_bits: u8,
        /// Bit position of the length field.
        length_shift: u8,
        /// Width of the length field.
        length_bits: u8,
    },
    /// Fully bit-packed stream: control bit, then either 8 literal bits or
    /// `offset_bits` + `length_bits`, with no byte alignment.
    Bits {
        /// Width of the offset field.
        offset_bits: u8,
        /// Width of the length field.
        length_bits: u8,
    },
}

#[inline]
fn field_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

impl TokenLayout {
    /// Width of the offset field in bits.
    pub fn offset_bits(&self) -> u8 {
        match *self {
            Self::SplitByte { length_bits } => 16u8.saturating_sub(length_bits),
            Self::Word { offset_bits, .. } | Self::Bits { offset_bits, .. } => offset_bits,
        }
    }

    /// Width of the length field in bits.
    pub fn length_bits(&self) -> u8 {
        match *self {
            Self::SplitByte { length_bits }
            | Self::Word { length_bits, .. }
            | Self::Bits { length_bits, .. } => length_bits,
        }
    }

    /// Largest value the offset field can hold.
    pub fn max_offset_field(&self) -> u32 {
        field_mask(self.offset_bits())
    }

    /// Largest value the length field can hold.
    pub fn max_length_field(&self) -> u32 {
        field_mask(self.length_bits())
    }

    /// Whether this layout reads everything through one bit stream.
    pub fn is_bit_packed(&self) -> bool {
        matches!(self, Self::Bits { .. })
    }

    /// Read one byte-aligned token and split it into `(offset, length)` fields.
    ///
    /// Must not be called for [`TokenLayout::Bits`].
    pub fn read_fields(&self, reader: &mut ByteReader<'_>) -> Result<(u32, u32)> {
        match *self {
            Self::SplitByte { length_bits } => {
                let [b0, b1] = reader.read_array::<2>()?;
                let offset = b0 as u32 | ((b1 as u32) >> length_bits) << 8;
                let length = b1 as u32 & field_mask(length_bits);
                Ok((offset, length))
            }
            Self::Word {
                bytes,
                endian,
                offset_shift,
                offset_bits,
                length_shift,
                length_bits,
            } => {
                let value = reader.read_uint(bytes as usize, endian)?;
                Ok((
                    (value >> offset_shift) & field_mask(offset_bits),
                    (value >> length_shift) & field_mask(length_bits),
                ))
            }
            Self::Bits { .. } => Err(LzError::invalid_dialect(
                "bit-packed tokens cannot be read from a byte stream",
            )),
        }
    }

    /// Pack `(offset, length)` fields into token bytes.
    ///
    /// Must not be called for [`TokenLayout::Bits`].
    pub fn write_fields(&self, offset: u32, length: u32, out: &mut Vec<u8>) {
        match *self {
            Self::SplitByte { length_bits } => {
                out.push(offset as u8);
                out.push((((offset >> 8) << length_bits) | length) as u8);
            }
            Self::Word {
                bytes,
                endian,
                offset_shift,
                length_shift,
                ..
            } => {
                let value = (offset << offset_shift) | (length << length_shift);
                let le = value.to_le_bytes();
                let raw = &le[..bytes as usize];
                match endian {
                    Endian::Little => out.extend_from_slice(raw),
                    Endian::Big => out.extend(raw.iter().rev()),
                }
            }
            Self::Bits { .. } => {
                debug_assert!(false, "bit-packed tokens are written through PackedBitWriter");
            }
        }
    }
}

/// Meaning of the offset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum OffsetMode {
    /// The field is an absolute frame index.
    Absolute,
    /// The field is a distance behind the cursor, minus `bias`.
    Relative {
        /// Added to the field to get the distance.
        bias: u16,
    },
}

/// In-band end-of-stream convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Terminator {
    /// The stream ends only when input or output runs out.
    #[default]
    None,
    /// A match with offset field 0 ends the stream.
    ZeroOffset,
    /// A match with length field 0 ends the stream.
    ZeroCount,
}

impl Terminator {
    /// Whether a match token with these raw fields ends the stream.
    pub fn ends_stream(&self, offset: u32, length: u32) -> bool {
        match self {
            Self::None => false,
            Self::ZeroOffset => offset == 0,
            Self::ZeroCount => length == 0,
        }
    }
}

/// Per-format parameters of the sliding-window decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialectTable {
    /// Short identifier.
    pub name: Cow<'static, str>,
    /// Frame size in bytes (power of two).
    pub frame_size: usize,
    /// Cursor position of the first written byte.
    pub initial_cursor: usize,
    /// Frame seeding.
    pub initial_fill: InitialFill,
    /// Control-bit convention.
    pub control: ControlSpec,
    /// Match token packing.
    pub token: TokenLayout,
    /// Offset field meaning.
    pub offset: OffsetMode,
    /// Shortest match the encoder emits.
    pub min_match: usize,
    /// Added to the length field to get the copy length.
    pub length_bias: usize,
    /// In-band terminator.
    #[serde(default)]
    pub terminator: Terminator,
}

impl DialectTable {
    /// Longest copy a single token can express.
    pub fn max_match(&self) -> usize {
        self.length_bias
            .saturating_add(self.token.max_length_field() as usize)
    }

    /// Longest back-reference distance the encoder may use.
    pub fn max_distance(&self) -> usize {
        match self.offset {
            OffsetMode::Absolute => self.frame_size - 1,
            OffsetMode::Relative { bias } => {
                (bias as usize + self.token.max_offset_field() as usize).min(self.frame_size)
            }
        }
    }

    /// Frame mask for index arithmetic.
    pub fn frame_mask(&self) -> usize {
        self.frame_size - 1
    }

    /// Check every structural invariant of the table.
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(LzError::invalid_dialect(format!("{}: {message}", self.name)));

        if self.frame_size == 0 || !self.frame_size.is_power_of_two() {
            return fail(format!("frame size {:#x} is not a power of 2", self.frame_size));
        }
        if self.frame_size > MAX_FRAME_SIZE {
            return fail(format!("frame size {:#x} exceeds {MAX_FRAME_SIZE:#x}", self.frame_size));
        }
        if self.initial_cursor >= self.frame_size {
            return fail(format!(
                "initial cursor {:#x} outside frame of {:#x}",
                self.initial_cursor, self.frame_size
            ));
        }
        if let InitialFill::Byte { len, .. } = self.initial_fill {
            if len > self.frame_size {
                return fail(format!("fill length {len:#x} exceeds frame"));
            }
        }
        if self.control.cadence == ControlCadence::Sentinel
            && self.control.order != BitOrder::LsbFirst
            && !self.token.is_bit_packed()
        {
            return fail("sentinel cadence requires LSB-first control words".into());
        }

        match self.token {
            TokenLayout::SplitByte { length_bits } => {
                if !(1..=7).contains(&length_bits) {
                    return fail(format!("split-byte length width {length_bits} not in 1..=7"));
                }
            }
            TokenLayout::Word {
                bytes,
                offset_shift,
                offset_bits,
                length_shift,
                length_bits,
                ..
            } => {
                if !(2..=4).contains(&bytes) {
                    return fail(format!("token width {bytes} not in 2..=4 bytes"));
                }
                let width = bytes as u32 * 8;
                if offset_bits == 0 || length_bits == 0 {
                    return fail("offset and length fields must be non-empty".into());
                }
                if offset_shift as u32 + offset_bits as u32 > width
                    || length_shift as u32 + length_bits as u32 > width
                {
                    return fail(format!("fields do not fit in {bytes} bytes"));
                }
                let offset_range = offset_shift..offset_shift + offset_bits;
                let length_range = length_shift..length_shift + length_bits;
                if offset_range.start < length_range.end && length_range.start < offset_range.end {
                    return fail("offset and length fields overlap".into());
                }
            }
            TokenLayout::Bits {
                offset_bits,
                length_bits,
            } => {
                if !(1..=24).contains(&offset_bits) || !(1..=16).contains(&length_bits) {
                    return fail("bit-packed field widths out of range".into());
                }
            }
        }

        let offset_bits = self.token.offset_bits() as u32;
        match self.offset {
            OffsetMode::Absolute => {
                if offset_bits < usize::BITS && (1usize << offset_bits) > self.frame_size {
                    return fail(format!(
                        "{offset_bits}-bit absolute offsets overrun frame of {:#x}",
                        self.frame_size
                    ));
                }
            }
            OffsetMode::Relative { bias } => {
                if bias == 0 {
                    return fail("relative offset bias must be at least 1".into());
                }
                let max = bias as usize + self.token.max_offset_field() as usize;
                if max > self.frame_size {
                    return fail(format!(
                        "distance {max:#x} reaches past frame of {:#x}",
                        self.frame_size
                    ));
                }
            }
        }

        if self.length_bias == 0 || self.length_bias > MAX_LENGTH_BIAS {
            return fail(format!(
                "length bias {} not in 1..={MAX_LENGTH_BIAS:#x}",
                self.length_bias
            ));
        }
        let min_allowed = match self.terminator {
            Terminator::ZeroCount => self.length_bias + 1,
            _ => self.length_bias,
        };
        if self.min_match < min_allowed || self.min_match > self.max_match() {
            return fail(format!(
                "minimum match {} outside {min_allowed}..={}",
                self.min_match,
                self.max_match()
            ));
        }

        Ok(())
    }
}
