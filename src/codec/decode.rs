//! Cask decoding: bytes → `CaskValue`.
//!
//! Decoding consumes exactly one value starting at `pos` and leaves `pos`
//! on the byte after it, so callers can pull consecutive values from one
//! buffer. Untrusted input is handled throughout: every length claim is
//! checked against the remaining input before allocation, and oversized
//! integer magnitudes degrade to floats the same way the encoder produced
//! them.

use crate::error::CaskError;
use crate::types::{buffer, CaskValue};

use super::{tag, varint};

/// Decodes one value from `bytes` starting at `pos`.
pub fn decode_value(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = peek(bytes, *pos)?;
    match t / tag::RANGE {
        0 => decode_special(bytes, pos),
        1 => decode_number(bytes, pos),
        2 => decode_string(bytes, pos),
        3 => decode_container(bytes, pos),
        4 => decode_object(bytes, pos),
        5 => decode_buffer(bytes, pos),
        _ => Err(CaskError::InvalidTag(t)),
    }
}

fn decode_special(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    match t {
        tag::UNDEFINED => Ok(CaskValue::Undefined),
        tag::NULL => Ok(CaskValue::Null),
        tag::TRUE => Ok(CaskValue::Boolean(true)),
        tag::FALSE => Ok(CaskValue::Boolean(false)),
        _ => Err(CaskError::InvalidTag(t)),
    }
}

fn decode_number(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    match t {
        tag::ZERO => Ok(CaskValue::Integer(0)),
        tag::NAN => Ok(CaskValue::Float(f64::NAN)),
        tag::INFINITY => Ok(CaskValue::Float(f64::INFINITY)),
        tag::INFINITY_NEG => Ok(CaskValue::Float(f64::NEG_INFINITY)),
        tag::INT | tag::INT_NEG => decode_int_body(bytes, pos, t == tag::INT_NEG),
        tag::BIGINT | tag::BIGINT_NEG => decode_bigint_body(bytes, pos, t == tag::BIGINT_NEG),
        tag::FLOAT | tag::FLOAT_NEG => decode_float_body(bytes, pos, t == tag::FLOAT_NEG),
        _ => Err(CaskError::InvalidTag(t)),
    }
}

/// Decodes an integer body. Magnitudes beyond 128 bits rewind and re-read
/// the varint as a float, mirroring how the encoder streams oversized
/// integral floats.
fn decode_int_body(bytes: &[u8], pos: &mut usize, negative: bool) -> Result<CaskValue, CaskError> {
    let start = *pos;
    match varint::decode(bytes, pos) {
        Ok(magnitude) => Ok(int_from_magnitude(magnitude, negative)),
        Err(CaskError::IntegerOverflow(_)) => {
            *pos = start;
            let magnitude = varint::decode_f64(bytes, pos)?;
            Ok(CaskValue::Float(apply_sign(magnitude, negative)))
        }
        Err(e) => Err(e),
    }
}

fn int_from_magnitude(magnitude: u128, negative: bool) -> CaskValue {
    if negative {
        if magnitude <= i64::MIN.unsigned_abs() as u128 {
            CaskValue::Integer((magnitude as u64).wrapping_neg() as i64)
        } else {
            CaskValue::Float(-(magnitude as f64))
        }
    } else if magnitude <= i64::MAX as u128 {
        CaskValue::Integer(magnitude as i64)
    } else {
        CaskValue::Float(magnitude as f64)
    }
}

fn decode_bigint_body(
    bytes: &[u8],
    pos: &mut usize,
    negative: bool,
) -> Result<CaskValue, CaskError> {
    let magnitude = varint::decode(bytes, pos)?;
    let limit = if negative {
        i128::MIN.unsigned_abs()
    } else {
        i128::MAX as u128
    };
    if magnitude > limit {
        return Err(CaskError::IntegerOverflow(format!(
            "big integer magnitude {magnitude} exceeds the signed 128-bit range"
        )));
    }
    let value = if negative {
        (magnitude as i128).wrapping_neg()
    } else {
        magnitude as i128
    };
    Ok(CaskValue::BigInt(value))
}

fn decode_float_body(
    bytes: &[u8],
    pos: &mut usize,
    negative: bool,
) -> Result<CaskValue, CaskError> {
    let int_part = varint::decode_f64(bytes, pos)?;
    let fraction = varint::decode_fraction(bytes, pos)?;
    Ok(CaskValue::Float(apply_sign(int_part + fraction, negative)))
}

fn apply_sign(magnitude: f64, negative: bool) -> f64 {
    if negative { -magnitude } else { magnitude }
}

fn decode_string(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    let text = match t {
        tag::STR => {
            let len = decode_length(bytes, pos, 1)?;
            let data = take_slice(bytes, pos, len)?;
            String::from_utf8_lossy(data).into_owned()
        }
        tag::STR_EMPTY => String::new(),
        tag::STR_DECIMAL | tag::STR_DECIMAL_NEG => {
            let magnitude = varint::decode(bytes, pos)?;
            render_signed(magnitude.to_string(), t == tag::STR_DECIMAL_NEG)
        }
        tag::STR_HEX_UPPER => format!("{:X}", varint::decode(bytes, pos)?),
        tag::STR_HEX_LOWER => format!("{:x}", varint::decode(bytes, pos)?),
        tag::STR_BINARY | tag::STR_BINARY_NEG => {
            let magnitude = varint::decode(bytes, pos)?;
            render_signed(format!("{magnitude:b}"), t == tag::STR_BINARY_NEG)
        }
        _ => return Err(CaskError::InvalidTag(t)),
    };
    Ok(CaskValue::String(text))
}

fn render_signed(digits: String, negative: bool) -> String {
    if negative {
        format!("-{digits}")
    } else {
        digits
    }
}

fn decode_container(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    let elements = match t {
        tag::ARRAY | tag::SET | tag::MAP => decode_elements(bytes, pos)?,
        _ => return Err(CaskError::InvalidTag(t)),
    };
    match t {
        tag::ARRAY => Ok(CaskValue::Array(elements)),
        tag::SET => Ok(CaskValue::Set(elements)),
        _ => {
            let mut entries = Vec::with_capacity(elements.len() / 2);
            let mut items = elements.into_iter();
            // a trailing key without a value is dropped
            while let (Some(key), Some(value)) = (items.next(), items.next()) {
                entries.push((key, value));
            }
            Ok(CaskValue::Map(entries))
        }
    }
}

fn decode_elements(bytes: &[u8], pos: &mut usize) -> Result<Vec<CaskValue>, CaskError> {
    let mut elements = Vec::new();
    while !at_sentinel(bytes, pos)? {
        elements.push(decode_value(bytes, pos)?);
    }
    Ok(elements)
}

/// Consumes the end sentinel if it is next. Running out of input here
/// means the container was never terminated.
fn at_sentinel(bytes: &[u8], pos: &mut usize) -> Result<bool, CaskError> {
    if peek(bytes, *pos)? == tag::END {
        *pos += 1;
        Ok(true)
    } else {
        Ok(false)
    }
}

fn decode_object(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    match t {
        tag::OBJECT => {
            let mut entries = Vec::new();
            while !at_sentinel(bytes, pos)? {
                let key = object_key(decode_value(bytes, pos)?)?;
                let value = decode_value(bytes, pos)?;
                entries.push((key, value));
            }
            Ok(CaskValue::Object(entries))
        }
        tag::DATE | tag::DATE_NEG => decode_date_body(bytes, pos, t == tag::DATE_NEG),
        _ => Err(CaskError::InvalidTag(t)),
    }
}

/// Object keys are strings on the wire, but numeric nodes written by other
/// producers are accepted and stringified.
fn object_key(value: CaskValue) -> Result<String, CaskError> {
    match value {
        CaskValue::String(s) => Ok(s),
        CaskValue::Integer(i) => Ok(i.to_string()),
        CaskValue::BigInt(i) => Ok(i.to_string()),
        CaskValue::Float(f) => Ok(f.to_string()),
        other => Err(CaskError::UnsupportedType(format!("object key: {other}"))),
    }
}

fn decode_date_body(bytes: &[u8], pos: &mut usize, negative: bool) -> Result<CaskValue, CaskError> {
    let magnitude = varint::decode(bytes, pos)?;
    let limit = if negative {
        i64::MIN.unsigned_abs() as u128
    } else {
        i64::MAX as u128
    };
    if magnitude > limit {
        return Err(CaskError::IntegerOverflow(format!(
            "date offset {magnitude} exceeds the millisecond range"
        )));
    }
    let millis = if negative {
        (magnitude as u64).wrapping_neg() as i64
    } else {
        magnitude as i64
    };
    Ok(CaskValue::Date(millis))
}

fn decode_buffer(bytes: &[u8], pos: &mut usize) -> Result<CaskValue, CaskError> {
    let t = take(bytes, pos)?;
    match t {
        tag::BUF8 => {
            let len = decode_length(bytes, pos, 1)?;
            Ok(CaskValue::Buffer8(take_slice(bytes, pos, len)?.to_vec()))
        }
        tag::BUF16 => {
            let len = decode_length(bytes, pos, 2)?;
            let data = take_slice(bytes, pos, len * 2)?;
            Ok(CaskValue::Buffer16(buffer::u16s_from_bytes(data)?))
        }
        tag::BUF32 => {
            let len = decode_length(bytes, pos, 4)?;
            let data = take_slice(bytes, pos, len * 4)?;
            Ok(CaskValue::Buffer32(buffer::u32s_from_bytes(data)?))
        }
        _ => Err(CaskError::InvalidTag(t)),
    }
}

/// Reads an element count and verifies `count * width` bytes are actually
/// present before anything gets allocated.
fn decode_length(bytes: &[u8], pos: &mut usize, width: usize) -> Result<usize, CaskError> {
    let claim = varint::decode(bytes, pos)?;
    let remaining = (bytes.len() - *pos) as u128;
    match claim.checked_mul(width as u128) {
        Some(needed) if needed <= remaining => Ok(claim as usize),
        _ => Err(CaskError::TruncatedInput(format!(
            "claimed length {claim} exceeds remaining input ({remaining} bytes)"
        ))),
    }
}

fn take_slice<'a>(bytes: &'a [u8], pos: &mut usize, len: usize) -> Result<&'a [u8], CaskError> {
    let end = *pos + len;
    if end > bytes.len() {
        return Err(CaskError::TruncatedInput(format!(
            "need {len} bytes at offset {pos}, have {}",
            bytes.len() - *pos
        )));
    }
    let slice = &bytes[*pos..end];
    *pos = end;
    Ok(slice)
}

fn peek(bytes: &[u8], pos: usize) -> Result<u8, CaskError> {
    bytes
        .get(pos)
        .copied()
        .ok_or_else(|| CaskError::TruncatedInput(format!("unexpected end of input at byte {pos}")))
}

fn take(bytes: &[u8], pos: &mut usize) -> Result<u8, CaskError> {
    let byte = peek(bytes, *pos)?;
    *pos += 1;
    Ok(byte)
}

#[cfg(test)]
mod tests {
    use bytes::BytesMut;

    use super::super::encode::encode_value;
    use super::*;

    fn encode(value: &CaskValue) -> Vec<u8> {
        let mut buf = BytesMut::new();
        encode_value(&mut buf, value);
        buf.to_vec()
    }

    fn decode(bytes: &[u8]) -> Result<CaskValue, CaskError> {
        let mut pos = 0;
        let value = decode_value(bytes, &mut pos)?;
        assert_eq!(pos, bytes.len(), "decoder left trailing bytes");
        Ok(value)
    }

    fn round_trip(value: CaskValue) {
        let decoded = decode(&encode(&value)).unwrap();
        assert!(
            decoded.same_value(&value),
            "expected {value}, decoded {decoded}"
        );
    }

    #[test]
    fn specials_round_trip() {
        round_trip(CaskValue::Undefined);
        round_trip(CaskValue::Null);
        round_trip(CaskValue::Boolean(true));
        round_trip(CaskValue::Boolean(false));
    }

    #[test]
    fn integers_round_trip() {
        for i in [0, 1, -1, 5, -5, 127, 128, -128, 300, 16384, i64::MAX, i64::MIN] {
            round_trip(CaskValue::Integer(i));
        }
    }

    #[test]
    fn bigints_round_trip() {
        for i in [
            0,
            5,
            -5,
            i64::MAX as i128 + 1,
            i64::MIN as i128 - 1,
            i128::MAX,
            i128::MIN,
        ] {
            round_trip(CaskValue::BigInt(i));
        }
    }

    #[test]
    fn bigint_kind_survives_where_magnitude_fits_an_integer() {
        assert_eq!(decode(&encode(&CaskValue::BigInt(5))).unwrap(), CaskValue::BigInt(5));
    }

    #[test]
    fn huge_int_magnitude_decodes_as_float() {
        let mut bytes = vec![tag::INT];
        {
            let mut body = BytesMut::new();
            crate::codec::varint::encode(&mut body, 1u128 << 100);
            bytes.extend_from_slice(&body);
        }
        assert_eq!(
            decode(&bytes).unwrap(),
            CaskValue::Float((1u128 << 100) as f64)
        );
    }

    #[test]
    fn oversized_int_magnitude_falls_back_to_float_accumulation() {
        // 20 groups of 127: magnitude 2^140 - 1, beyond any native integer
        let mut bytes = vec![tag::INT];
        bytes.extend_from_slice(&[0xFF; 19]);
        bytes.push(0x7F);
        assert_eq!(decode(&bytes).unwrap(), CaskValue::Float(2f64.powi(140)));
    }

    #[test]
    fn oversized_bigint_magnitude_is_an_error() {
        let mut bytes = vec![tag::BIGINT];
        bytes.extend_from_slice(&[0xFF; 19]);
        bytes.push(0x7F);
        assert!(matches!(
            decode(&bytes),
            Err(CaskError::IntegerOverflow(_))
        ));

        // 2^127 is one past i128::MAX on the positive side
        let mut bytes = vec![tag::BIGINT];
        {
            let mut body = BytesMut::new();
            crate::codec::varint::encode(&mut body, 1u128 << 127);
            bytes.extend_from_slice(&body);
        }
        assert!(matches!(
            decode(&bytes),
            Err(CaskError::IntegerOverflow(_))
        ));
    }

    #[test]
    fn floats_round_trip() {
        for f in [
            0.1,
            0.2,
            2.5,
            -2.5,
            1e-9,
            1.0 / 3.0,
            f64::MIN_POSITIVE,
            f64::from_bits(1),
            1e300,
            f64::MAX,
            -f64::MAX,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
            -0.0,
        ] {
            round_trip(CaskValue::Float(f));
        }
    }

    #[test]
    fn integral_floats_canonicalize_to_integers() {
        assert_eq!(decode(&encode(&CaskValue::Float(0.0))).unwrap(), CaskValue::Integer(0));
        assert_eq!(decode(&encode(&CaskValue::Float(5.0))).unwrap(), CaskValue::Integer(5));
        assert_eq!(decode(&encode(&CaskValue::Float(-3.0))).unwrap(), CaskValue::Integer(-3));
    }

    #[test]
    fn strings_round_trip() {
        let over_128_bits = "9".repeat(40);
        for s in [
            "",
            "hello",
            "héllo wörld ∞",
            "\u{1F980} in the stream",
            "9",
            "-9",
            "0",
            "-0",
            "10",
            "010",
            "ff",
            "FF",
            "deadbeef",
            "DEADBEEF",
            "abc",
            "xyz",
            "1e3",
            "00",
            "+5",
            "12aF",
            "048374801248067",
            "48374801248067",
            over_128_bits.as_str(),
        ] {
            round_trip(CaskValue::from(s));
        }
    }

    #[test]
    fn invalid_utf8_decodes_lossily() {
        let bytes = [tag::STR, 0x20, 0xFF, 0xFE];
        assert_eq!(
            decode(&bytes).unwrap(),
            CaskValue::from("\u{FFFD}\u{FFFD}")
        );
    }

    #[test]
    fn arrays_round_trip() {
        round_trip(CaskValue::Array(vec![]));
        round_trip(CaskValue::Array(vec![
            CaskValue::Integer(1),
            CaskValue::from("two"),
            CaskValue::Null,
            CaskValue::Float(0.5),
            CaskValue::Array(vec![CaskValue::Boolean(true)]),
        ]));
    }

    #[test]
    fn sets_round_trip() {
        round_trip(CaskValue::Set(vec![]));
        round_trip(CaskValue::Set(vec![
            CaskValue::Integer(3),
            CaskValue::from("three"),
        ]));
    }

    #[test]
    fn maps_round_trip_with_mixed_keys() {
        round_trip(CaskValue::Map(vec![]));
        round_trip(CaskValue::Map(vec![
            (CaskValue::Integer(1), CaskValue::from("one")),
            (CaskValue::from("two"), CaskValue::Integer(2)),
            (
                CaskValue::Array(vec![CaskValue::Null]),
                CaskValue::Boolean(false),
            ),
        ]));
    }

    #[test]
    fn map_dangling_key_is_dropped() {
        let bytes = [tag::MAP, tag::ZERO, tag::END];
        assert_eq!(decode(&bytes).unwrap(), CaskValue::Map(vec![]));
    }

    #[test]
    fn objects_round_trip() {
        round_trip(CaskValue::Object(vec![]));
        round_trip(CaskValue::Object(vec![
            ("uid".to_string(), CaskValue::from("48374801248067")),
            (
                "tags".to_string(),
                CaskValue::Array(vec![CaskValue::from("a"), CaskValue::from("b")]),
            ),
            ("active".to_string(), CaskValue::Boolean(true)),
            (
                "meta".to_string(),
                CaskValue::Object(vec![("depth".to_string(), CaskValue::Integer(2))]),
            ),
        ]));
    }

    #[test]
    fn foreign_numeric_object_keys_stringify() {
        // An integer node in key position, as another producer might write
        let bytes = [tag::OBJECT, tag::INT, 0x2A, tag::TRUE, tag::END];
        assert_eq!(
            decode(&bytes).unwrap(),
            CaskValue::Object(vec![("42".to_string(), CaskValue::Boolean(true))])
        );

        let bytes = [tag::OBJECT, tag::FLOAT, 0x20, 0x40, tag::NULL, tag::END];
        assert_eq!(
            decode(&bytes).unwrap(),
            CaskValue::Object(vec![("2.5".to_string(), CaskValue::Null)])
        );
    }

    #[test]
    fn unsupported_object_key_is_rejected() {
        let bytes = [tag::OBJECT, tag::TRUE, tag::NULL, tag::END];
        assert!(matches!(
            decode(&bytes),
            Err(CaskError::UnsupportedType(_))
        ));
    }

    #[test]
    fn object_dangling_key_hits_the_sentinel() {
        let bytes = [tag::OBJECT, tag::STR_EMPTY, tag::END];
        assert!(matches!(decode(&bytes), Err(CaskError::InvalidTag(0xFF))));
    }

    #[test]
    fn dates_round_trip() {
        for ms in [0, 1, -1, 1724300000000, -62135596800000, i64::MAX, i64::MIN] {
            round_trip(CaskValue::Date(ms));
        }
    }

    #[test]
    fn date_overflow_is_rejected() {
        let mut bytes = vec![tag::DATE];
        {
            let mut body = BytesMut::new();
            crate::codec::varint::encode(&mut body, i64::MAX as u128 + 1);
            bytes.extend_from_slice(&body);
        }
        assert!(matches!(
            decode(&bytes),
            Err(CaskError::IntegerOverflow(_))
        ));
    }

    #[test]
    fn buffers_round_trip() {
        round_trip(CaskValue::Buffer8(vec![]));
        round_trip(CaskValue::Buffer8(vec![0, 1, 255]));
        round_trip(CaskValue::Buffer16(vec![0x0102, 0xFFFF]));
        round_trip(CaskValue::Buffer32(vec![1, 0xDEADBEEF]));
    }

    #[test]
    fn truncated_inputs_are_detected() {
        let cases: &[&[u8]] = &[
            &[],
            &[tag::ARRAY],
            &[tag::ARRAY, tag::ZERO],
            &[tag::MAP, tag::ZERO],
            &[tag::STR, 0x50, b'a'],
            &[tag::BUF16, 0x60, 0x00],
            &[tag::INT],
            &[tag::FLOAT, 0x20],
        ];
        for bytes in cases {
            assert!(
                matches!(decode(bytes), Err(CaskError::TruncatedInput(_))),
                "expected truncation error for {bytes:02X?}"
            );
        }
    }

    #[test]
    fn unassigned_tags_are_rejected() {
        for t in [
            4, 5, 31, 40, 56, 63, 70, 71, 74, 97, 99, 101, 127, 129, 132, 166, 200, 224, 255,
        ] {
            assert!(
                matches!(decode(&[t]), Err(CaskError::InvalidTag(b)) if b == t),
                "expected invalid tag error for 0x{t:02X}"
            );
        }
    }

    #[test]
    fn consecutive_values_share_a_cursor() {
        let mut buf = BytesMut::new();
        encode_value(&mut buf, &CaskValue::Integer(0));
        encode_value(&mut buf, &CaskValue::Null);
        let mut pos = 0;
        assert_eq!(decode_value(&buf, &mut pos).unwrap(), CaskValue::Integer(0));
        assert_eq!(pos, 1);
        assert_eq!(decode_value(&buf, &mut pos).unwrap(), CaskValue::Null);
        assert_eq!(pos, buf.len());
    }
}
