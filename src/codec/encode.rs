//! Cask encoding: `CaskValue` → bytes.

use bytes::{BufMut, BytesMut};

use super::{tag, varint};
use crate::types::{buffer, CaskValue};

/// Encodes a `CaskValue` into the buffer.
///
/// The value model is closed, so encoding is total; every failure mode of
/// the format lives on the decode side.
pub fn encode_value(buf: &mut BytesMut, value: &CaskValue) {
    match value {
        CaskValue::Undefined => buf.put_u8(tag::UNDEFINED),
        CaskValue::Null => buf.put_u8(tag::NULL),
        CaskValue::Boolean(b) => encode_bool(buf, *b),
        CaskValue::Integer(i) => encode_int(buf, *i),
        CaskValue::BigInt(i) => encode_bigint(buf, *i),
        CaskValue::Float(f) => encode_float(buf, *f),
        CaskValue::String(s) => encode_string(buf, s),
        CaskValue::Array(items) => encode_array(buf, items),
        CaskValue::Set(items) => encode_set(buf, items),
        CaskValue::Map(entries) => encode_map(buf, entries),
        CaskValue::Object(entries) => encode_object(buf, entries),
        CaskValue::Date(ms) => encode_date(buf, *ms),
        CaskValue::Buffer8(data) => encode_buffer8(buf, data),
        CaskValue::Buffer16(data) => encode_buffer16(buf, data),
        CaskValue::Buffer32(data) => encode_buffer32(buf, data),
    }
}

pub fn encode_bool(buf: &mut BytesMut, value: bool) {
    buf.put_u8(if value { tag::TRUE } else { tag::FALSE });
}

/// Encodes an integer; zero gets the dedicated literal tag.
pub fn encode_int(buf: &mut BytesMut, value: i64) {
    if value == 0 {
        buf.put_u8(tag::ZERO);
        return;
    }
    buf.put_u8(signed_tag(tag::INT, value < 0));
    varint::encode(buf, u128::from(value.unsigned_abs()));
}

/// Encodes a big integer. Zero keeps a varint body so the integer/bigint
/// distinction survives the round trip.
pub fn encode_bigint(buf: &mut BytesMut, value: i128) {
    buf.put_u8(signed_tag(tag::BIGINT, value < 0));
    varint::encode(buf, value.unsigned_abs());
}

pub fn encode_float(buf: &mut BytesMut, value: f64) {
    if value.is_nan() {
        buf.put_u8(tag::NAN);
        return;
    }
    if value.is_infinite() {
        buf.put_u8(signed_tag(tag::INFINITY, value < 0.0));
        return;
    }
    if value == 0.0 {
        if value.is_sign_negative() {
            // -0.0 keeps its sign through an explicit float body
            buf.put_u8(tag::FLOAT_NEG);
            varint::encode(buf, 0);
            varint::encode_fraction(buf, 0.0);
        } else {
            buf.put_u8(tag::ZERO);
        }
        return;
    }
    let negative = value < 0.0;
    let magnitude = value.abs();
    if magnitude.fract() == 0.0 {
        // Integral floats take the canonical integer form
        buf.put_u8(signed_tag(tag::INT, negative));
        varint::encode_f64(buf, magnitude);
        return;
    }
    buf.put_u8(signed_tag(tag::FLOAT, negative));
    // A non-integral f64 always has magnitude below 2^53
    varint::encode(buf, magnitude.trunc() as u128);
    varint::encode_fraction(buf, magnitude.fract());
}

/// Encodes a string, preferring the compact radix sub-encodings when the
/// text re-serializes canonically, with length-prefixed UTF-8 as the
/// fallback.
pub fn encode_string(buf: &mut BytesMut, value: &str) {
    if value.is_empty() {
        buf.put_u8(tag::STR_EMPTY);
        return;
    }
    if encode_compact_string(buf, value) {
        return;
    }
    buf.put_u8(tag::STR);
    varint::encode(buf, value.len() as u128);
    buf.put_slice(value.as_bytes());
}

/// Tries the radix sub-encodings; false means the text is not an exact
/// canonical rendering of a 128-bit magnitude and must travel as UTF-8.
fn encode_compact_string(buf: &mut BytesMut, value: &str) -> bool {
    let (digits, negative) = match value.strip_prefix('-') {
        Some(rest) => (rest, true),
        None => (value, false),
    };
    if digits.is_empty() {
        return false;
    }
    // Binary wins over decimal for strings of only 0s and 1s
    if digits.bytes().all(|b| b == b'0' || b == b'1') {
        if let Ok(mag) = u128::from_str_radix(digits, 2) {
            if format!("{mag:b}") == digits {
                buf.put_u8(signed_tag(tag::STR_BINARY, negative));
                varint::encode(buf, mag);
                return true;
            }
        }
    }
    if digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(mag) = digits.parse::<u128>() {
            if mag.to_string() == digits {
                buf.put_u8(signed_tag(tag::STR_DECIMAL, negative));
                varint::encode(buf, mag);
                return true;
            }
        }
    }
    if negative {
        // The hex forms carry no sign
        return false;
    }
    if digits.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
        if let Ok(mag) = u128::from_str_radix(digits, 16) {
            if format!("{mag:x}") == digits {
                buf.put_u8(tag::STR_HEX_LOWER);
                varint::encode(buf, mag);
                return true;
            }
        }
    }
    if digits.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)) {
        if let Ok(mag) = u128::from_str_radix(digits, 16) {
            if format!("{mag:X}") == digits {
                buf.put_u8(tag::STR_HEX_UPPER);
                varint::encode(buf, mag);
                return true;
            }
        }
    }
    false
}

pub fn encode_array(buf: &mut BytesMut, items: &[CaskValue]) {
    buf.put_u8(tag::ARRAY);
    for item in items {
        encode_value(buf, item);
    }
    buf.put_u8(tag::END);
}

pub fn encode_set(buf: &mut BytesMut, items: &[CaskValue]) {
    buf.put_u8(tag::SET);
    for item in items {
        encode_value(buf, item);
    }
    buf.put_u8(tag::END);
}

/// Encodes a map as alternating key/value nodes inside the sentinel frame.
pub fn encode_map(buf: &mut BytesMut, entries: &[(CaskValue, CaskValue)]) {
    buf.put_u8(tag::MAP);
    for (key, value) in entries {
        encode_value(buf, key);
        encode_value(buf, value);
    }
    buf.put_u8(tag::END);
}

/// Encodes an object; keys go through the string encoder, which compacts
/// numeric-looking keys on its own.
pub fn encode_object(buf: &mut BytesMut, entries: &[(String, CaskValue)]) {
    buf.put_u8(tag::OBJECT);
    for (key, value) in entries {
        encode_string(buf, key);
        encode_value(buf, value);
    }
    buf.put_u8(tag::END);
}

/// Encodes a date as signed milliseconds relative to the Unix epoch.
pub fn encode_date(buf: &mut BytesMut, millis: i64) {
    buf.put_u8(signed_tag(tag::DATE, millis < 0));
    varint::encode(buf, u128::from(millis.unsigned_abs()));
}

pub fn encode_buffer8(buf: &mut BytesMut, data: &[u8]) {
    buf.put_u8(tag::BUF8);
    varint::encode(buf, data.len() as u128);
    buf.put_slice(data);
}

/// Encodes 16-bit elements as an element count plus little-endian bytes.
pub fn encode_buffer16(buf: &mut BytesMut, data: &[u16]) {
    buf.put_u8(tag::BUF16);
    varint::encode(buf, data.len() as u128);
    buf.put_slice(&buffer::u16s_to_bytes(data));
}

/// Encodes 32-bit elements as an element count plus little-endian bytes.
pub fn encode_buffer32(buf: &mut BytesMut, data: &[u32]) {
    buf.put_u8(tag::BUF32);
    varint::encode(buf, data.len() as u128);
    buf.put_slice(&buffer::u32s_to_bytes(data));
}

fn signed_tag(base: u8, negative: bool) -> u8 {
    if negative { base + 1 } else { base }
}
