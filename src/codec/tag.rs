//! Wire tag byte constants.
//!
//! Tags partition into 32-wide ranges; `tag / RANGE` selects the decoder
//! family. Within the signed families an even tag encodes a non-negative
//! value and `tag + 1` its negative. Unassigned values are invalid on the
//! wire.

/// Width of one tag range.
pub const RANGE: u8 = 32;

// Special: [0, 32)
pub const UNDEFINED: u8 = 0;
pub const NULL: u8 = 1;
pub const TRUE: u8 = 2;
pub const FALSE: u8 = 3;

// Number: [32, 64)
pub const INT: u8 = 32;
pub const INT_NEG: u8 = 33;
pub const BIGINT: u8 = 34;
pub const BIGINT_NEG: u8 = 35;
pub const FLOAT: u8 = 36;
pub const FLOAT_NEG: u8 = 37;
pub const INFINITY: u8 = 52;
pub const INFINITY_NEG: u8 = 53;
pub const NAN: u8 = 54;
pub const ZERO: u8 = 55;

// String: [64, 96)
pub const STR: u8 = 64;
pub const STR_EMPTY: u8 = 65;
pub const STR_DECIMAL: u8 = 66;
pub const STR_DECIMAL_NEG: u8 = 67;
pub const STR_HEX_UPPER: u8 = 68;
pub const STR_HEX_LOWER: u8 = 69;
pub const STR_BINARY: u8 = 72;
pub const STR_BINARY_NEG: u8 = 73;

// Container: [96, 128)
pub const ARRAY: u8 = 96;
pub const SET: u8 = 98;
pub const MAP: u8 = 100;

// Object and date: [128, 160)
pub const OBJECT: u8 = 128;
pub const DATE: u8 = 130;
pub const DATE_NEG: u8 = 131;

// Typed buffer: [160, 192)
pub const BUF8: u8 = 160;
pub const BUF16: u8 = 162;
pub const BUF32: u8 = 164;

/// End-of-container sentinel; never a leading value tag.
pub const END: u8 = 255;
