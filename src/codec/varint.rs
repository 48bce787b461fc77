//! Variable-length integer and fraction payloads.
//!
//! Each wire byte carries 7 payload bits plus a continuation flag in the
//! high bit. Payload bits are mirrored: a group's least significant bit
//! occupies wire bit 6. Groups are emitted most-significant-first and only
//! the terminal group has the continuation flag clear, so decode is
//! self-terminating. `encode(0)` still emits one byte.

use bytes::{BufMut, BytesMut};

use crate::error::CaskError;

const CONTINUE: u8 = 0x80;
const GROUP_MASK: u8 = 0x7F;

/// Mirrors the low 7 bits of a group (an involution).
fn reverse7(group: u8) -> u8 {
    (group & GROUP_MASK).reverse_bits() >> 1
}

/// Encodes a non-negative integer as continuation-flagged 7-bit groups.
pub fn encode(buf: &mut BytesMut, value: u128) {
    let groups = group_count(value);
    for j in (0..groups).rev() {
        let group = ((value >> (7 * j)) & 0x7F) as u8;
        let flag = if j == 0 { 0 } else { CONTINUE };
        buf.put_u8(flag | reverse7(group));
    }
}

fn group_count(value: u128) -> u32 {
    let bits = 128 - value.leading_zeros();
    bits.div_ceil(7).max(1)
}

/// Decodes a varint at `pos`, advancing it one byte per group consumed.
///
/// Magnitudes past 128 bits fail with `IntegerOverflow`; callers that can
/// degrade to floating point rewind and use [`decode_f64`].
pub fn decode(bytes: &[u8], pos: &mut usize) -> Result<u128, CaskError> {
    let mut acc: u128 = 0;
    loop {
        let byte = take(bytes, pos)?;
        if acc > u128::MAX >> 7 {
            return Err(CaskError::IntegerOverflow(
                "varint magnitude exceeds 128 bits".into(),
            ));
        }
        acc = (acc << 7) | u128::from(reverse7(byte));
        if byte & CONTINUE == 0 {
            return Ok(acc);
        }
    }
}

/// Decodes a varint magnitude in floating point, for values past 128 bits.
pub fn decode_f64(bytes: &[u8], pos: &mut usize) -> Result<f64, CaskError> {
    let mut acc: f64 = 0.0;
    loop {
        let byte = take(bytes, pos)?;
        acc = acc * 128.0 + f64::from(reverse7(byte));
        if byte & CONTINUE == 0 {
            return Ok(acc);
        }
    }
}

/// Encodes the varint groups of an integral, finite, non-negative float.
///
/// Magnitudes below 2^128 take the exact integer path; larger ones stream
/// the mantissa bits into groups directly, so no arbitrary-precision
/// arithmetic is involved at any magnitude.
pub fn encode_f64(buf: &mut BytesMut, magnitude: f64) {
    debug_assert!(magnitude.is_finite() && magnitude >= 0.0 && magnitude.fract() == 0.0);
    if magnitude < u128::MAX as f64 {
        encode(buf, magnitude as u128);
        return;
    }
    let bits = magnitude.to_bits();
    let mantissa = (bits & ((1u64 << 52) - 1)) | (1u64 << 52);
    // value = mantissa * 2^shift; shift > 0 for any magnitude past 2^128
    let shift = ((bits >> 52) & 0x7FF) as i64 - 1075;
    let total_bits = 53 + shift;
    let groups = (total_bits + 6) / 7;
    for j in (0..groups).rev() {
        let lo = 7 * j - shift;
        let group = if lo >= 0 {
            ((mantissa >> lo) & 0x7F) as u8
        } else if lo > -7 {
            ((mantissa << -lo) & 0x7F) as u8
        } else {
            0
        };
        let flag = if j == 0 { 0 } else { CONTINUE };
        buf.put_u8(flag | reverse7(group));
    }
}

/// Encodes a binary fraction `0 <= frac < 1` as a varint payload.
///
/// Fraction bit `i` (the coefficient of 2^-i) is carried at payload bit
/// `i - 1`, so the payload's bit length names the deepest set fraction bit
/// and the expansion is self-describing. A zero fraction is one zero byte.
pub fn encode_fraction(buf: &mut BytesMut, frac: f64) {
    debug_assert!((0.0..1.0).contains(&frac));
    let mut bits = Vec::new();
    let mut rem = frac;
    while rem != 0.0 {
        rem *= 2.0;
        if rem >= 1.0 {
            rem -= 1.0;
            bits.push(true);
        } else {
            bits.push(false);
        }
    }
    let groups = bits.len().div_ceil(7).max(1);
    for j in (0..groups).rev() {
        let mut group = 0u8;
        for m in 0..7 {
            if bits.get(7 * j + m).copied().unwrap_or(false) {
                group |= 1 << m;
            }
        }
        let flag = if j == 0 { 0 } else { CONTINUE };
        buf.put_u8(flag | reverse7(group));
    }
}

/// Decodes a fraction payload, rebuilding the value by halving inward from
/// the deepest bit; every f64-representable fraction survives exactly.
pub fn decode_fraction(bytes: &[u8], pos: &mut usize) -> Result<f64, CaskError> {
    let mut acc: f64 = 0.0;
    loop {
        let byte = take(bytes, pos)?;
        let group = reverse7(byte);
        for t in (0..7).rev() {
            acc = (acc + f64::from((group >> t) & 1)) * 0.5;
        }
        if byte & CONTINUE == 0 {
            return Ok(acc);
        }
    }
}

fn take(bytes: &[u8], pos: &mut usize) -> Result<u8, CaskError> {
    let byte = bytes
        .get(*pos)
        .copied()
        .ok_or_else(|| CaskError::TruncatedInput("varint runs past end of buffer".into()))?;
    *pos += 1;
    Ok(byte)
}
