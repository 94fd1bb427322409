//! Fold-level encoding.
//!
//! A level is an `i32` whose low 12 bits carry the level number (biased by
//! [`BASE`] so container arithmetic never goes negative) plus two flag
//! bits: [`HEADER_FLAG`] marks a line that can be contracted and
//! [`WHITE_FLAG`] marks whitespace lines that share their neighbour's fold.

/// Base value of the level number.
pub const BASE: i32 = 0x400;

/// Mask extracting the level number.
pub const NUMBER_MASK: i32 = 0x0FFF;

/// The line is blank and takes the fold of its neighbourhood.
pub const WHITE_FLAG: i32 = 0x1000;

/// The line is a fold header.
pub const HEADER_FLAG: i32 = 0x2000;

/// The level number without the flags.
pub fn number(level: i32) -> i32 {
    level & NUMBER_MASK
}

/// Whether `level` has the header flag.
pub fn is_header(level: i32) -> bool {
    level & HEADER_FLAG != 0
}

/// Whether `level` has the white flag.
pub fn is_white(level: i32) -> bool {
    level & WHITE_FLAG != 0
}
