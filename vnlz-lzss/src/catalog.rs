//! Built-in dialect catalog.
//!
//! Each container format picks one of these tables by tag. Tags are matched
//! case-insensitively and a few formats are also reachable through aliases.

use crate::dialect::{ControlSpec, DialectTable, InitialFill, OffsetMode, Terminator, TokenLayout};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use vnlz_core::bitstream::{BitOrder, ControlCadence, Endian};
use vnlz_core::error::{LzError, Result};

const LSB_SENTINEL_LITERAL_SET: ControlSpec = ControlSpec {
    order: BitOrder::LsbFirst,
    cadence: ControlCadence::Sentinel,
    literal_bit: true,
};

const MSB_COUNTED_LITERAL_SET: ControlSpec = ControlSpec {
    order: BitOrder::MsbFirst,
    cadence: ControlCadence::Counted,
    literal_bit: true,
};

const LSB_COUNTED_LITERAL_CLEAR: ControlSpec = ControlSpec {
    order: BitOrder::LsbFirst,
    cadence: ControlCadence::Counted,
    literal_bit: false,
};

/// `offset = v >> 4`, `length = v & 0xF` over a big-endian word.
const HI_OFFSET_LO_LENGTH: TokenLayout = TokenLayout::Word {
    bytes: 2,
    endian: Endian::Big,
    offset_shift: 4,
    offset_bits: 12,
    length_shift: 0,
    length_bits: 4,
};

/// Classic `lzss.c`: space-seeded 4 KB frame.
pub static OKUMURA: DialectTable = DialectTable {
    name: Cow::Borrowed("okumura"),
    frame_size: 0x1000,
    initial_cursor: 0xFEE,
    initial_fill: InitialFill::Byte {
        value: b' ',
        len: 0xFEE,
    },
    control: LSB_SENTINEL_LITERAL_SET,
    token: TokenLayout::SplitByte { length_bits: 4 },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// `lzss.c` layout with a zeroed frame.
pub static OKUMURA_ZERO: DialectTable = DialectTable {
    name: Cow::Borrowed("okumura-zero"),
    frame_size: 0x1000,
    initial_cursor: 0xFEE,
    initial_fill: InitialFill::Zeros,
    control: LSB_SENTINEL_LITERAL_SET,
    token: TokenLayout::SplitByte { length_bits: 4 },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// `lzss.c` layout with the graded seeding table.
pub static OKUMURA_GRADED: DialectTable = DialectTable {
    name: Cow::Borrowed("okumura-graded"),
    frame_size: 0x1000,
    initial_cursor: 0xFEE,
    initial_fill: InitialFill::Graded,
    control: LSB_SENTINEL_LITERAL_SET,
    token: TokenLayout::SplitByte { length_bits: 4 },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// `lzss.c` token layout with the cursor and fill ending at 0xFC0.
pub static OKUMURA_FC0: DialectTable = DialectTable {
    name: Cow::Borrowed("okumura-fc0"),
    frame_size: 0x1000,
    initial_cursor: 0xFC0,
    initial_fill: InitialFill::Byte {
        value: b' ',
        len: 0xFC0,
    },
    control: LSB_SENTINEL_LITERAL_SET,
    token: TokenLayout::SplitByte { length_bits: 4 },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// 1 KB frame, 10-bit offsets and 6-bit lengths.
pub static LZ10: DialectTable = DialectTable {
    name: Cow::Borrowed("lz10"),
    frame_size: 0x400,
    initial_cursor: 0x3BE,
    initial_fill: InitialFill::Zeros,
    control: LSB_SENTINEL_LITERAL_SET,
    token: TokenLayout::SplitByte { length_bits: 6 },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// MSB-first flags, frame cursor starting at 1.
pub static MSB_CURSOR1: DialectTable = DialectTable {
    name: Cow::Borrowed("msb-cursor1"),
    frame_size: 0x1000,
    initial_cursor: 1,
    initial_fill: InitialFill::Zeros,
    control: MSB_COUNTED_LITERAL_SET,
    token: HI_OFFSET_LO_LENGTH,
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// [`MSB_CURSOR1`] with a `+2` bias and a zero count ending the stream.
pub static CURSOR1_TERM: DialectTable = DialectTable {
    name: Cow::Borrowed("cursor1-term"),
    frame_size: 0x1000,
    initial_cursor: 1,
    initial_fill: InitialFill::Zeros,
    control: MSB_COUNTED_LITERAL_SET,
    token: HI_OFFSET_LO_LENGTH,
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 2,
    terminator: Terminator::ZeroCount,
};

/// Relative 12-bit distances in the low bits of a big-endian word.
pub static SHIN: DialectTable = DialectTable {
    name: Cow::Borrowed("shin"),
    frame_size: 0x1000,
    initial_cursor: 0,
    initial_fill: InitialFill::None,
    control: LSB_COUNTED_LITERAL_CLEAR,
    token: TokenLayout::Word {
        bytes: 2,
        endian: Endian::Big,
        offset_shift: 0,
        offset_bits: 12,
        length_shift: 12,
        length_bits: 4,
    },
    offset: OffsetMode::Relative { bias: 1 },
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// Relative 11-bit distances above a 5-bit length, 2 KB frame.
pub static KID_BE: DialectTable = DialectTable {
    name: Cow::Borrowed("kid-be"),
    frame_size: 0x800,
    initial_cursor: 0,
    initial_fill: InitialFill::None,
    control: LSB_COUNTED_LITERAL_CLEAR,
    token: TokenLayout::Word {
        bytes: 2,
        endian: Endian::Big,
        offset_shift: 5,
        offset_bits: 11,
        length_shift: 0,
        length_bits: 5,
    },
    offset: OffsetMode::Relative { bias: 1 },
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::None,
};

/// 64 KB frame with three-byte tokens.
pub static HOTEL_DUSK: DialectTable = DialectTable {
    name: Cow::Borrowed("hotel-dusk"),
    frame_size: 0x10000,
    initial_cursor: 0xFEFD,
    initial_fill: InitialFill::Zeros,
    control: ControlSpec {
        order: BitOrder::LsbFirst,
        cadence: ControlCadence::Counted,
        literal_bit: true,
    },
    token: TokenLayout::Word {
        bytes: 3,
        endian: Endian::Little,
        offset_shift: 0,
        offset_bits: 16,
        length_shift: 16,
        length_bits: 8,
    },
    offset: OffsetMode::Absolute,
    min_match: 4,
    length_bias: 4,
    terminator: Terminator::None,
};

/// Fully bit-packed stream, 8 KB frame, offset 0 ends the stream.
pub static PACKED13: DialectTable = DialectTable {
    name: Cow::Borrowed("packed13"),
    frame_size: 0x2000,
    initial_cursor: 1,
    initial_fill: InitialFill::Zeros,
    control: MSB_COUNTED_LITERAL_SET,
    token: TokenLayout::Bits {
        offset_bits: 13,
        length_bits: 4,
    },
    offset: OffsetMode::Absolute,
    min_match: 3,
    length_bias: 3,
    terminator: Terminator::ZeroOffset,
};

/// A built-in dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `okumura`
    Okumura,
    /// `okumura-zero`
    OkumuraZero,
    /// `okumura-graded`
    OkumuraGraded,
    /// `okumura-fc0`
    OkumuraFc0,
    /// `lz10`
    Lz10,
    /// `msb-cursor1`
    MsbCursor1,
    /// `cursor1-term`
    Cursor1Term,
    /// `shin`
    Shin,
    /// `kid-be`
    KidBe,
    /// `hotel-dusk`
    HotelDusk,
    /// `packed13`
    Packed13,
}

impl Dialect {
    /// Every built-in dialect, in listing order.
    pub const ALL: [Dialect; 11] = [
        Self::Okumura,
        Self::OkumuraZero,
        Self::OkumuraGraded,
        Self::OkumuraFc0,
        Self::Lz10,
        Self::MsbCursor1,
        Self::Cursor1Term,
        Self::Shin,
        Self::KidBe,
        Self::HotelDusk,
        Self::Packed13,
    ];

    /// Look a dialect up by tag or alias (case-insensitive).
    pub fn from_tag(tag: &str) -> Result<Self> {
        let wanted = tag.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                d.tag().eq_ignore_ascii_case(wanted)
                    || d.aliases().iter().any(|a| a.eq_ignore_ascii_case(wanted))
            })
            .ok_or_else(|| LzError::unsupported_dialect(tag))
    }

    /// Primary tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Okumura => "okumura",
            Self::OkumuraZero => "okumura-zero",
            Self::OkumuraGraded => "okumura-graded",
            Self::OkumuraFc0 => "okumura-fc0",
            Self::Lz10 => "lz10",
            Self::MsbCursor1 => "msb-cursor1",
            Self::Cursor1Term => "cursor1-term",
            Self::Shin => "shin",
            Self::KidBe => "kid-be",
            Self::HotelDusk => "hotel-dusk",
            Self::Packed13 => "packed13",
        }
    }

    /// Alternative tags.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::OkumuraZero => &["lzss", "ff7"],
            Self::KidBe => &["lzss-be"],
            Self::HotelDusk => &["hd"],
            _ => &[],
        }
    }

    /// One-line description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Okumura => "lzss.c: 4 KB frame seeded with spaces, LSB flags, 12-bit absolute offsets",
            Self::OkumuraZero => "lzss.c layout over a zeroed frame",
            Self::OkumuraGraded => "lzss.c layout over the graded run/ramp seeding table",
            Self::OkumuraFc0 => "lzss.c layout, cursor and space fill at 0xFC0",
            Self::Lz10 => "1 KB frame at 0x3BE, 10-bit offsets, 6-bit lengths",
            Self::MsbCursor1 => "MSB flags, cursor 1, offset in the high 12 bits of a BE word",
            Self::Cursor1Term => "msb-cursor1 with +2 lengths and a zero count as terminator",
            Self::Shin => "LSB flags (1 = match), BE word with 12-bit relative distance",
            Self::KidBe => "LSB flags (1 = match), BE word with 11-bit relative distance, 2 KB frame",
            Self::HotelDusk => "64 KB frame at 0xFEFD, 3-byte LE tokens, lengths +4",
            Self::Packed13 => "bit-packed MSB stream, 13-bit offsets, offset 0 terminates",
        }
    }

    /// The dialect's parameter table.
    pub fn table(&self) -> &'static DialectTable {
        match self {
            Self::Okumura => &OKUMURA,
            Self::OkumuraZero => &OKUMURA_ZERO,
            Self::OkumuraGraded => &OKUMURA_GRADED,
            Self::OkumuraFc0 => &OKUMURA_FC0,
            Self::Lz10 => &LZ10,
            Self::MsbCursor1 => &MSB_CURSOR1,
            Self::Cursor1Term => &CURSOR1_TERM,
            Self::Shin => &SHIN,
            Self::KidBe => &KID_BE,
            Self::HotelDusk => &HOTEL_DUSK,
            Self::Packed13 => &PACKED13,
        }
    }
}

impl FromStr for Dialect {
    type Err = LzError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_tag(s)
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Look up a built-in table by tag or alias.
pub fn lookup(tag: &str) -> Result<&'static DialectTable> {
    Dialect::from_tag(tag).map(|d| d.table())
}
