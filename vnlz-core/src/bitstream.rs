//! Bit- and byte-level input for LZSS-family decoders.
//!
//! Every dialect handled by vnlz mixes two kinds of input:
//!
//! - **control bits**, one per token, telling the decoder whether the next
//!   token is a literal or a back-reference. They arrive in 8-bit control
//!   words interleaved with the token bytes.
//! - **raw bytes** for literals and packed offset/length fields, which are
//!   always byte-aligned in the byte-oriented dialects.
//!
//! [`ByteReader`] supplies the raw bytes, [`ControlBits`] layers the control
//! cadence on top of it, and [`PackedBitReader`] / [`PackedBitWriter`] cover
//! the fully bit-packed dialects where control bits, literals and fields all
//! share one bit stream.
//!
//! # Example
//!
//! ```
//! use vnlz_core::bitstream::{BitOrder, ByteReader, ControlBits, ControlCadence};
//!
//! let data = [0b1010_0000, 0x41];
//! let mut reader = ByteReader::new(&data);
//! let mut control = ControlBits::new(BitOrder::MsbFirst, ControlCadence::Counted);
//!
//! assert!(control.next_bit(&mut reader).unwrap());
//! assert!(!control.next_bit(&mut reader).unwrap());
//! assert_eq!(reader.read_u8().unwrap(), 0x41);
//! ```

use crate::error::{LzError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Order in which bits are taken out of a control word or bit stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum BitOrder {
    /// Test 0x80 first, then 0x40, and so on.
    MsbFirst,
    /// Test 0x01 first, then 0x02, and so on.
    LsbFirst,
}

/// How the decoder notices that the current control word is used up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ControlCadence {
    /// A rotating mask walks over the 8 bits and is reset on exhaustion.
    Counted,
    /// `ctl >>= 1` per token with `0xFF00` seeded above the fetched byte;
    /// a new word is fetched once the seed bits have shifted out.
    /// Only meaningful for LSB-first control words.
    Sentinel,
}

/// Byte order of multi-byte token fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Endian {
    /// Least significant byte first.
    Little,
    /// Most significant byte first.
    Big,
}

/// A forward-only cursor over compressed bytes.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the first byte of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of bytes left.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    /// Check whether every byte has been consumed.
    pub fn is_empty(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Read one raw byte.
    #[inline]
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.position)
            .ok_or_else(|| LzError::unexpected_eof(1))?;
        self.position += 1;
        Ok(byte)
    }

    /// Read `N` raw bytes.
    ///
    /// Nothing is consumed when fewer than `N` bytes remain.
    #[inline]
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let end = self.position + N;
        let bytes = self
            .data
            .get(self.position..end)
            .ok_or_else(|| LzError::unexpected_eof(end - self.data.len()))?;
        let mut array = [0u8; N];
        array.copy_from_slice(bytes);
        self.position = end;
        Ok(array)
    }

    /// Read a little-endian `u16`.
    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.read_array::<2>().map(u16::from_le_bytes)
    }

    /// Read a big-endian `u16`.
    pub fn read_u16_be(&mut self) -> Result<u16> {
        self.read_array::<2>().map(u16::from_be_bytes)
    }

    /// Read a 1- to 4-byte unsigned integer in the given byte order.
    pub fn read_uint(&mut self, bytes: usize, endian: Endian) -> Result<u32> {
        debug_assert!((1..=4).contains(&bytes), "integer width must be 1-4 bytes");

        let end = self.position + bytes;
        let raw = self
            .data
            .get(self.position..end)
            .ok_or_else(|| LzError::unexpected_eof(end - self.data.len()))?;
        let value = match endian {
            Endian::Little => raw
                .iter()
                .rev()
                .fold(0u32, |acc, &b| (acc << 8) | b as u32),
            Endian::Big => raw.iter().fold(0u32, |acc, &b| (acc << 8) | b as u32),
        };
        self.position = end;
        Ok(value)
    }
}

/// Control-bit cadence state.
///
/// Holds the current control word and decides when a new one has to be
/// fetched from the byte stream. The word is fetched lazily on the first bit
/// of each group, so a stream that ends right after a token never reads a
/// dangling control byte.
#[derive(Debug, Clone)]
pub struct ControlBits {
    order: BitOrder,
    cadence: ControlCadence,
    /// Current control word (with sentinel bits for `Sentinel`).
    flags: u32,
    /// Rotating test mask for `Counted`; zero means exhausted.
    mask: u32,
}

impl ControlBits {
    /// Create an empty control state.
    pub fn new(order: BitOrder, cadence: ControlCadence) -> Self {
        Self {
            order,
            cadence,
            flags: 0,
            mask: 0,
        }
    }

    /// Take the next control bit, fetching a new control word when needed.
    #[inline]
    pub fn next_bit(&mut self, reader: &mut ByteReader<'_>) -> Result<bool> {
        match self.cadence {
            ControlCadence::Counted => {
                if self.mask == 0 {
                    self.flags = reader.read_u8()? as u32;
                    self.mask = match self.order {
                        BitOrder::MsbFirst => 0x80,
                        BitOrder::LsbFirst => 0x01,
                    };
                }
                let bit = self.flags & self.mask != 0;
                self.mask = match self.order {
                    BitOrder::MsbFirst => self.mask >> 1,
                    BitOrder::LsbFirst => (self.mask << 1) & 0xFF,
                };
                Ok(bit)
            }
            ControlCadence::Sentinel => {
                self.flags >>= 1;
                if self.flags & 0x100 == 0 {
                    self.flags = reader.read_u8()? as u32 | 0xFF00;
                }
                Ok(self.flags & 1 != 0)
            }
        }
    }
}

/// A bit-granular reader for fully bit-packed streams.
#[derive(Debug, Clone)]
pub struct PackedBitReader<'a> {
    data: &'a [u8],
    order: BitOrder,
    /// Index of the byte currently being consumed.
    byte_pos: usize,
    /// Number of bits already taken from `data[byte_pos]`.
    bit_pos: u8,
}

impl<'a> PackedBitReader<'a> {
    /// Create a reader over `data`.
    pub fn new(data: &'a [u8], order: BitOrder) -> Self {
        Self {
            data,
            order,
            byte_pos: 0,
            bit_pos: 0,
        }
    }

    /// Total bits read so far.
    pub fn bits_read(&self) -> u64 {
        self.byte_pos as u64 * 8 + self.bit_pos as u64
    }

    /// Number of input bytes touched so far (a partial byte counts).
    pub fn bytes_consumed(&self) -> usize {
        self.byte_pos + usize::from(self.bit_pos > 0)
    }

    /// Read a single bit.
    #[inline]
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = *self
            .data
            .get(self.byte_pos)
            .ok_or_else(|| LzError::unexpected_eof(1))?;
        let shift = match self.order {
            BitOrder::MsbFirst => 7 - self.bit_pos,
            BitOrder::LsbFirst => self.bit_pos,
        };
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        Ok((byte >> shift) & 1 != 0)
    }

    /// Read up to 32 bits; the first bit read ends up most significant.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 32, "Cannot read more than 32 bits at once");

        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }
}

/// Writes a bit-packed stream into a byte vector.
///
/// The final partial byte is padded with zero bits by [`finish`](Self::finish).
#[derive(Debug)]
pub struct PackedBitWriter {
    output: Vec<u8>,
    order: BitOrder,
    current: u8,
    bits_in_current: u8,
}

impl PackedBitWriter {
    /// Create an empty writer.
    pub fn new(order: BitOrder) -> Self {
        Self {
            output: Vec::new(),
            order,
            current: 0,
            bits_in_current: 0,
        }
    }

    /// Write a single bit.
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            let shift = match self.order {
                BitOrder::MsbFirst => 7 - self.bits_in_current,
                BitOrder::LsbFirst => self.bits_in_current,
            };
            self.current |= 1 << shift;
        }
        self.bits_in_current += 1;
        if self.bits_in_current == 8 {
            self.output.push(self.current);
            self.current = 0;
            self.bits_in_current = 0;
        }
    }

    /// Write the low `count` bits of `value`, most significant first.
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 32, "Cannot write more than 32 bits at once");

        for i in (0..count).rev() {
            self.write_bit((value >> i) & 1 != 0);
        }
    }

    /// Pad the last byte with zeros and return the packed bytes.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bits_in_current > 0 {
            self.output.push(self.current);
        }
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_reader_basic() {
        let data = [0x12, 0x34, 0x56, 0x78, 0x9A];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_u8().unwrap(), 0x12);
        assert_eq!(reader.read_u16_be().unwrap(), 0x3456);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_u16_le().unwrap(), 0x9A78);
        assert!(reader.is_empty());
        assert!(reader.read_u8().unwrap_err().is_eof());
    }

    #[test]
    fn test_byte_reader_short_array_consumes_nothing() {
        let data = [0x01];
        let mut reader = ByteReader::new(&data);

        assert!(reader.read_array::<2>().is_err());
        assert_eq!(reader.position(), 0);
        assert_eq!(reader.read_u8().unwrap(), 0x01);
    }

    #[test]
    fn test_read_uint_three_bytes() {
        let data = [0x01, 0x02, 0x03, 0x01, 0x02, 0x03];
        let mut reader = ByteReader::new(&data);

        assert_eq!(reader.read_uint(3, Endian::Little).unwrap(), 0x030201);
        assert_eq!(reader.read_uint(3, Endian::Big).unwrap(), 0x010203);
    }

    #[test]
    fn test_control_msb_counted() {
        // 0b1011_0001 followed by a second control word
        let data = [0xB1, 0x80];
        let mut reader = ByteReader::new(&data);
        let mut control = ControlBits::new(BitOrder::MsbFirst, ControlCadence::Counted);

        let bits: Vec<bool> = (0..8)
            .map(|_| control.next_bit(&mut reader).unwrap())
            .collect();
        assert_eq!(
            bits,
            [true, false, true, true, false, false, false, true]
        );
        assert_eq!(reader.position(), 1);

        assert!(control.next_bit(&mut reader).unwrap());
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_control_lsb_counted_and_sentinel_agree() {
        let data = [0xB1, 0x5A, 0xC3];
        let mut a = ByteReader::new(&data);
        let mut b = ByteReader::new(&data);
        let mut counted = ControlBits::new(BitOrder::LsbFirst, ControlCadence::Counted);
        let mut sentinel = ControlBits::new(BitOrder::LsbFirst, ControlCadence::Sentinel);

        for _ in 0..24 {
            assert_eq!(
                counted.next_bit(&mut a).unwrap(),
                sentinel.next_bit(&mut b).unwrap()
            );
            assert_eq!(a.position(), b.position());
        }
        assert!(counted.next_bit(&mut a).unwrap_err().is_eof());
        assert!(sentinel.next_bit(&mut b).unwrap_err().is_eof());
    }

    #[test]
    fn test_control_fetch_is_lazy() {
        let data = [0x01];
        let mut reader = ByteReader::new(&data);
        let mut control = ControlBits::new(BitOrder::LsbFirst, ControlCadence::Counted);

        for _ in 0..8 {
            control.next_bit(&mut reader).unwrap();
        }
        // The next group has not been requested yet.
        assert!(reader.is_empty());
        assert!(control.next_bit(&mut reader).is_err());
    }

    #[test]
    fn test_packed_roundtrip_msb() {
        let mut writer = PackedBitWriter::new(BitOrder::MsbFirst);
        writer.write_bit(true);
        writer.write_bits(0x41, 8);
        writer.write_bits(0x1ABC, 13);
        writer.write_bits(0b1010, 4);
        let bytes = writer.finish();
        assert_eq!(bytes[0], 0b1010_0000);

        let mut reader = PackedBitReader::new(&bytes, BitOrder::MsbFirst);
        assert!(reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(8).unwrap(), 0x41);
        assert_eq!(reader.read_bits(13).unwrap(), 0x1ABC);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert_eq!(reader.bits_read(), 26);
        assert_eq!(reader.bytes_consumed(), 4);
    }

    #[test]
    fn test_packed_lsb_order() {
        // 0xB5 = 0b1011_0101, LSB first: 1,0,1,0,1,1,0,1
        let data = [0xB5];
        let mut reader = PackedBitReader::new(&data, BitOrder::LsbFirst);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1010);
        assert_eq!(reader.read_bits(4).unwrap(), 0b1101);
        assert!(reader.read_bit().is_err());
    }
}
