//! Sliding-window decompression.
//!
//! One decode loop serves every dialect. The [`DialectTable`] decides how
//! the frame is seeded, how control bits are read and how match tokens are
//! unpacked; the loop itself only alternates between literals and copies
//! until the declared output size is reached or the input runs dry.

use crate::catalog::Dialect;
use crate::dialect::{DialectTable, InitialFill, OffsetMode, TokenLayout};
use crate::tables::graded_fill;
use vnlz_core::bitstream::{ByteReader, ControlBits, PackedBitReader};
use vnlz_core::error::{LzError, Result};
use vnlz_core::frame::Frame;
use vnlz_core::sink::{Decoded, OutputSink};
use vnlz_core::traits::{DecodeMode, Decompress};

/// A single decoded token, with the match fields still in raw form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte.
    Literal(u8),
    /// A back-reference.
    Match {
        /// Raw offset field (absolute index or biased distance).
        offset: u32,
        /// Raw length field (before the length bias).
        length: u32,
    },
}

/// Token source over either a byte-aligned or a fully bit-packed stream.
enum TokenStream<'a> {
    Aligned {
        reader: ByteReader<'a>,
        control: ControlBits,
        layout: TokenLayout,
    },
    Packed {
        reader: PackedBitReader<'a>,
        offset_bits: u8,
        length_bits: u8,
    },
}

impl<'a> TokenStream<'a> {
    fn new(input: &'a [u8], table: &DialectTable) -> Self {
        match table.token {
            TokenLayout::Bits {
                offset_bits,
                length_bits,
            } => Self::Packed {
                reader: PackedBitReader::new(input, table.control.order),
                offset_bits,
                length_bits,
            },
            layout => Self::Aligned {
                reader: ByteReader::new(input),
                control: ControlBits::new(table.control.order, table.control.cadence),
                layout,
            },
        }
    }

    /// Next token, or `None` once the input is exhausted.
    fn next_token(&mut self, literal_bit: bool) -> Result<Option<Token>> {
        match self.read_token(literal_bit) {
            Ok(token) => Ok(Some(token)),
            Err(e) if e.is_eof() => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn read_token(&mut self, literal_bit: bool) -> Result<Token> {
        match self {
            Self::Aligned {
                reader,
                control,
                layout,
            } => {
                if control.next_bit(reader)? == literal_bit {
                    Ok(Token::Literal(reader.read_u8()?))
                } else {
                    let (offset, length) = layout.read_fields(reader)?;
                    Ok(Token::Match { offset, length })
                }
            }
            Self::Packed {
                reader,
                offset_bits,
                length_bits,
            } => {
                if reader.read_bit()? == literal_bit {
                    Ok(Token::Literal(reader.read_bits(8)? as u8))
                } else {
                    let offset = reader.read_bits(*offset_bits)?;
                    let length = reader.read_bits(*length_bits)?;
                    Ok(Token::Match { offset, length })
                }
            }
        }
    }

    fn consumed(&self) -> usize {
        match self {
            Self::Aligned { reader, .. } => reader.position(),
            Self::Packed { reader, .. } => reader.bytes_consumed(),
        }
    }
}

/// Allocate a frame and seed it the way the dialect's encoder did.
pub(crate) fn seed_frame(table: &DialectTable) -> Result<Frame> {
    let mut frame = Frame::new(table.frame_size)?;
    match table.initial_fill {
        InitialFill::None => {}
        InitialFill::Zeros => frame.mark_defined(),
        InitialFill::Byte { value, len } => {
            frame.fill(value, len);
            frame.mark_defined();
        }
        InitialFill::Graded => {
            frame.preload(graded_fill());
            frame.mark_defined();
        }
    }
    frame.set_cursor(table.initial_cursor);
    Ok(frame)
}

/// Decoder for one dialect.
///
/// Holds only the (validated) table and the truncation policy; every call
/// to [`decode`](Decompress::decode) allocates its own frame and output, so
/// one decoder can be shared between threads.
#[derive(Debug, Clone)]
pub struct SlidingWindowDecoder {
    table: DialectTable,
    mode: DecodeMode,
}

impl SlidingWindowDecoder {
    /// Create a decoder for `table`.
    ///
    /// # Errors
    ///
    /// [`LzError::InvalidDialect`] if the table is inconsistent.
    pub fn new(table: &DialectTable) -> Result<Self> {
        table.validate()?;
        Ok(Self {
            table: table.clone(),
            mode: DecodeMode::default(),
        })
    }

    /// Create a decoder for a built-in dialect tag or alias.
    pub fn for_tag(tag: &str) -> Result<Self> {
        Self::new(Dialect::from_tag(tag)?.table())
    }

    /// Select the truncation policy.
    pub fn with_mode(mut self, mode: DecodeMode) -> Self {
        self.mode = mode;
        self
    }

    /// The dialect table.
    pub fn table(&self) -> &DialectTable {
        &self.table
    }

    /// The truncation policy.
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Resolve a raw offset field to a frame index.
    fn source_index(&self, frame: &Frame, offset: u32) -> usize {
        match self.table.offset {
            OffsetMode::Absolute => offset as usize & self.table.frame_mask(),
            OffsetMode::Relative { bias } => frame.index_behind(offset as usize + bias as usize),
        }
    }

    fn run(&self, input: &[u8], target_length: usize) -> Result<Decoded> {
        let table = &self.table;
        let mut frame = seed_frame(table)?;
        let mut sink = OutputSink::new(target_length);
        let mut tokens = TokenStream::new(input, table);
        let mut terminated = false;

        while !sink.is_full() {
            let Some(token) = tokens.next_token(table.control.literal_bit)? else {
                break;
            };

            match token {
                Token::Literal(byte) => {
                    sink.push(byte);
                    frame.push(byte);
                }
                Token::Match { offset, length } => {
                    if table.terminator.ends_stream(offset, length) {
                        tracing::trace!(
                            dialect = %table.name,
                            position = sink.position(),
                            "terminator token"
                        );
                        terminated = true;
                        break;
                    }

                    let source = self.source_index(&frame, offset);
                    if !frame.is_defined_index(source) {
                        return Err(LzError::invalid_token(
                            sink.position(),
                            source,
                            frame.defined_len(),
                        ));
                    }
                    frame.copy_to(source, length as usize + table.length_bias, &mut sink);
                }
            }
        }

        Ok(sink.finish(tokens.consumed(), terminated))
    }
}

impl Decompress for SlidingWindowDecoder {
    fn decode(&self, input: &[u8], target_length: usize) -> Result<Decoded> {
        if target_length == 0 {
            return Ok(Decoded::empty());
        }

        tracing::debug!(
            dialect = %self.table.name,
            input_len = input.len(),
            target_length,
            "decode start"
        );

        let decoded = self.run(input, target_length)?;

        tracing::debug!(
            dialect = %self.table.name,
            produced = decoded.produced(),
            consumed = decoded.consumed(),
            terminated = decoded.terminated(),
            "decode finished"
        );

        if decoded.is_complete() {
            return Ok(decoded);
        }
        match self.mode {
            DecodeMode::Strict => Err(LzError::truncated(decoded.produced(), target_length)),
            DecodeMode::Lenient => {
                if !decoded.terminated() {
                    tracing::warn!(
                        dialect = %self.table.name,
                        produced = decoded.produced(),
                        expected = target_length,
                        "input exhausted before declared size"
                    );
                }
                Ok(decoded)
            }
        }
    }
}

/// Decode `input` to at most `target_length` bytes (lenient).
pub fn decode(input: &[u8], target_length: usize, dialect: &DialectTable) -> Result<Decoded> {
    SlidingWindowDecoder::new(dialect)?.decode(input, target_length)
}

/// Decode `input`, failing with [`LzError::TruncatedInput`] if short.
pub fn decode_strict(input: &[u8], target_length: usize, dialect: &DialectTable) -> Result<Decoded> {
    SlidingWindowDecoder::new(dialect)?
        .with_mode(DecodeMode::Strict)
        .decode(input, target_length)
}

/// Decode `input` to exactly `target_length` bytes.
pub fn decode_exact(input: &[u8], target_length: usize, dialect: &DialectTable) -> Result<Vec<u8>> {
    Ok(decode_strict(input, target_length, dialect)?.into_vec())
}
