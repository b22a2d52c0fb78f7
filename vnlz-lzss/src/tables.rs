//! Static frame-seeding tables.
//!
//! Some encoders seed their window with a structured pattern instead of a
//! single byte, so that short runs and ramps can be matched before any real
//! data has been written. The decoder must reproduce the pattern exactly.

use std::sync::OnceLock;

/// Size of the graded table.
pub const GRADED_LEN: usize = 0x1000;

/// End of the graded pattern (the first byte the encoder writes to).
pub const GRADED_CURSOR: usize = 0xFEE;

/// Build the graded seeding table.
///
/// Layout:
///
/// - `0x000..0xD00`: every byte value 0..=255, each repeated 13 times
/// - `0xD00..0xE00`: ascending ramp 0..=255
/// - `0xE00..0xF00`: descending ramp 255..=0
/// - `0xF00..0xF80`: zeros
/// - `0xF80..0xFEE`: spaces (0x20)
/// - `0xFEE..0x1000`: zeros
pub fn build_graded() -> [u8; GRADED_LEN] {
    let mut table = [0u8; GRADED_LEN];
    let mut k = 0;

    for value in 0..=255u8 {
        for _ in 0..13 {
            table[k] = value;
            k += 1;
        }
    }

    for value in 0..=255u8 {
        table[k] = value;
        k += 1;
    }

    for value in (0..=255u8).rev() {
        table[k] = value;
        k += 1;
    }

    // 0xF00..0xF80 stays zero
    k += 0x80;

    table[k..GRADED_CURSOR].fill(b' ');

    table
}

/// Get the graded seeding table.
///
/// This table is cached after first construction.
pub fn graded_fill() -> &'static [u8; GRADED_LEN] {
    static TABLE: OnceLock<[u8; GRADED_LEN]> = OnceLock::new();
    TABLE.get_or_init(build_graded)
}
