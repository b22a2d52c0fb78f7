//! Greedy matching encoder.
//!
//! Produces streams that [`SlidingWindowDecoder`](crate::decode::SlidingWindowDecoder)
//! reproduces byte for byte. The encoder keeps a mirror of the decoder's
//! frame, seeded identically, and at every position picks the longest match
//! it can express in the dialect's token layout.

use crate::decode::{Token, seed_frame};
use crate::dialect::{DialectTable, OffsetMode, Terminator, TokenLayout};
use vnlz_core::bitstream::{BitOrder, PackedBitWriter};
use vnlz_core::error::Result;
use vnlz_core::frame::Frame;
use vnlz_core::traits::Compress;

/// Default number of distances probed per position.
pub const DEFAULT_SEARCH_LIMIT: usize = 0x1000;

/// Greedy LZSS encoder for one dialect.
#[derive(Debug, Clone)]
pub struct MatchingEncoder {
    table: DialectTable,
    search_limit: usize,
}

impl MatchingEncoder {
    /// Create an encoder for `table`.
    pub fn new(table: &DialectTable) -> Result<Self> {
        table.validate()?;
        Ok(Self {
            table: table.clone(),
            search_limit: DEFAULT_SEARCH_LIMIT,
        })
    }

    /// Limit how far back the match search looks.
    ///
    /// Smaller limits trade ratio for speed on large frames.
    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /// The dialect table.
    pub fn table(&self) -> &DialectTable {
        &self.table
    }

    /// Raw offset field for a copy from `distance` bytes behind the cursor,
    /// or `None` if the dialect cannot express it.
    fn offset_field(&self, frame: &Frame, distance: usize) -> Option<u32> {
        let field = match self.table.offset {
            OffsetMode::Absolute => frame.index_behind(distance),
            OffsetMode::Relative { bias } => distance.checked_sub(bias as usize)?,
        };
        let field = u32::try_from(field).ok()?;
        if field > self.table.token.max_offset_field() {
            return None;
        }
        if self.table.terminator == Terminator::ZeroOffset && field == 0 {
            return None;
        }
        Some(field)
    }

    /// Find the longest match for `data[pos..]` against the frame.
    ///
    /// Returns `(offset_field, length)`.
    fn find_match(&self, frame: &Frame, data: &[u8], pos: usize) -> Option<(u32, usize)> {
        let lookahead = &data[pos..];
        let max_len = lookahead.len().min(self.table.max_match());
        if max_len < self.table.min_match {
            return None;
        }

        let limit = self
            .search_limit
            .min(self.table.max_distance())
            .min(frame.defined_len());
        let cursor = frame.cursor();

        let mut best: Option<(u32, usize)> = None;
        for distance in 1..=limit {
            let source = cursor.wrapping_sub(distance);
            if frame.get(source) != lookahead[0] {
                continue;
            }

            let mut len = 1;
            while len < max_len {
                // Past the distance the copy reads bytes it wrote itself.
                let byte = if len < distance {
                    frame.get(source.wrapping_add(len))
                } else {
                    lookahead[len - distance]
                };
                if byte != lookahead[len] {
                    break;
                }
                len += 1;
            }

            if len >= self.table.min_match && best.is_none_or(|(_, best_len)| len > best_len) {
                let Some(field) = self.offset_field(frame, distance) else {
                    continue;
                };
                best = Some((field, len));
                if len == max_len {
                    break;
                }
            }
        }

        best
    }

    /// Split `data` into tokens.
    ///
    /// Dialects with an in-band terminator get a terminator token appended.
    pub fn tokens(&self, data: &[u8]) -> Result<Vec<Token>> {
        let mut frame = seed_frame(&self.table)?;
        let mut tokens = Vec::with_capacity(data.len() / 2 + 1);
        let mut pos = 0;

        while pos < data.len() {
            match self.find_match(&frame, data, pos) {
                Some((offset, len)) => {
                    tokens.push(Token::Match {
                        offset,
                        length: (len - self.table.length_bias) as u32,
                    });
                    for &byte in &data[pos..pos + len] {
                        frame.push(byte);
                    }
                    pos += len;
                }
                None => {
                    tokens.push(Token::Literal(data[pos]));
                    frame.push(data[pos]);
                    pos += 1;
                }
            }
        }

        if self.table.terminator != Terminator::None {
            tokens.push(Token::Match {
                offset: 0,
                length: 0,
            });
        }

        Ok(tokens)
    }

    /// Serialise tokens in the dialect's stream layout.
    pub fn write_tokens(&self, tokens: &[Token]) -> Vec<u8> {
        match self.table.token {
            TokenLayout::Bits {
                offset_bits,
                length_bits,
            } => self.write_packed(tokens, offset_bits, length_bits),
            layout => self.write_aligned(tokens, layout),
        }
    }

    fn control_bit(&self, token: &Token) -> bool {
        match token {
            Token::Literal(_) => self.table.control.literal_bit,
            Token::Match { .. } => !self.table.control.literal_bit,
        }
    }

    fn write_aligned(&self, tokens: &[Token], layout: TokenLayout) -> Vec<u8> {
        let mut out = Vec::with_capacity(tokens.len() * 2);

        for group in tokens.chunks(8) {
            let control_pos = out.len();
            out.push(0);
            let mut control = 0u8;

            for (j, token) in group.iter().enumerate() {
                if self.control_bit(token) {
                    control |= match self.table.control.order {
                        BitOrder::MsbFirst => 0x80 >> j,
                        BitOrder::LsbFirst => 1 << j,
                    };
                }
                match *token {
                    Token::Literal(byte) => out.push(byte),
                    Token::Match { offset, length } => layout.write_fields(offset, length, &mut out),
                }
            }

            out[control_pos] = control;
        }

        out
    }

    fn write_packed(&self, tokens: &[Token], offset_bits: u8, length_bits: u8) -> Vec<u8> {
        let mut writer = PackedBitWriter::new(self.table.control.order);

        for token in tokens {
            writer.write_bit(self.control_bit(token));
            match *token {
                Token::Literal(byte) => writer.write_bits(byte as u32, 8),
                Token::Match { offset, length } => {
                    writer.write_bits(offset, offset_bits);
                    writer.write_bits(length, length_bits);
                }
            }
        }

        writer.finish()
    }
}

impl Compress for MatchingEncoder {
    fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let tokens = self.tokens(data)?;
        let out = self.write_tokens(&tokens);
        tracing::debug!(
            dialect = %self.table.name,
            input_len = data.len(),
            tokens = tokens.len(),
            output_len = out.len(),
            "encode finished"
        );
        Ok(out)
    }
}

/// Compress `data` for `dialect`.
pub fn encode(data: &[u8], dialect: &DialectTable) -> Result<Vec<u8>> {
    MatchingEncoder::new(dialect)?.encode(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CURSOR1_TERM, KID_BE, OKUMURA, PACKED13, SHIN};
    use crate::decode::decode;

    #[test]
    fn test_literal_only_for_short_input() {
        let encoder = MatchingEncoder::new(&SHIN).unwrap();
        let tokens = encoder.tokens(b"ab").unwrap();
        assert_eq!(tokens, vec![Token::Literal(b'a'), Token::Literal(b'b')]);
        // shin: literal bit is 0, so the control byte is empty
        assert_eq!(encoder.write_tokens(&tokens), vec![0x00, b'a', b'b']);
    }

    #[test]
    fn test_run_becomes_overlapping_match() {
        let encoder = MatchingEncoder::new(&SHIN).unwrap();
        let tokens = encoder.tokens(b"aaaaaaaa").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::Literal(b'a'),
                Token::Match {
                    offset: 0,
                    length: 4
                }
            ]
        );
    }

    #[test]
    fn test_prefill_is_used() {
        // okumura frame holds spaces, so leading spaces are a single match
        let encoder = MatchingEncoder::new(&OKUMURA).unwrap();
        let tokens = encoder.tokens(&[b' '; 18]).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0], Token::Match { length: 15, .. }));
    }

    #[test]
    fn test_terminator_appended() {
        let encoder = MatchingEncoder::new(&PACKED13).unwrap();
        let tokens = encoder.tokens(b"x").unwrap();
        assert_eq!(
            tokens.last(),
            Some(&Token::Match {
                offset: 0,
                length: 0
            })
        );

        let encoder = MatchingEncoder::new(&CURSOR1_TERM).unwrap();
        let tokens = encoder.tokens(b"").unwrap();
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_roundtrip_repetitive() {
        let data = b"abcabcabcabcabcabcabcabc the quick brown fox abcabc".repeat(20);
        for table in [&OKUMURA, &SHIN, &KID_BE, &PACKED13, &CURSOR1_TERM] {
            let packed = encode(&data, table).unwrap();
            assert!(packed.len() < data.len(), "{} did not compress", table.name);
            let decoded = decode(&packed, data.len(), table).unwrap();
            assert_eq!(decoded.as_bytes(), &data[..], "{}", table.name);
        }
    }

    #[test]
    fn test_search_limit() {
        let data = b"0123456789ABCDEF0123456789ABCDEF";
        let near = MatchingEncoder::new(&SHIN)
            .unwrap()
            .with_search_limit(8)
            .tokens(data)
            .unwrap();
        assert!(near.iter().all(|t| matches!(t, Token::Literal(_))));
    }
}
