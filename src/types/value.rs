//! Cask value types.

use std::fmt;

/// A value representable in the cask wire format.
///
/// The number family canonicalizes on the wire: `Float(0.0)` and integral
/// floats whose magnitude fits decode back as `Integer`, while `-0.0`,
/// fractional values, and magnitudes past `i64` stay `Float`. `BigInt`
/// keeps its own tag family so the integer/big-integer distinction
/// survives a round trip, zero included.
#[derive(Debug, Clone, PartialEq)]
pub enum CaskValue {
    Undefined,
    Null,
    Boolean(bool),
    Integer(i64),
    BigInt(i128),
    Float(f64),
    String(String),
    Array(Vec<CaskValue>),
    /// Order-preserving set; element uniqueness is the caller's convention,
    /// the codec neither checks nor deduplicates.
    Set(Vec<CaskValue>),
    /// Order-preserving map with arbitrary keys.
    Map(Vec<(CaskValue, CaskValue)>),
    /// Order-preserving string-keyed object.
    Object(Vec<(String, CaskValue)>),
    /// Milliseconds relative to the Unix epoch.
    Date(i64),
    Buffer8(Vec<u8>),
    Buffer16(Vec<u16>),
    Buffer32(Vec<u32>),
}

impl CaskValue {
    /// Returns the value as a string reference, if it is a `String` variant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as an i64, if it is an `Integer` variant.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Structural equality that treats NaN as equal to itself and keeps
    /// `-0.0` distinct from `0.0`, unlike `PartialEq`.
    pub fn same_value(&self, other: &CaskValue) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => float_same_value(*a, *b),
            (Self::Array(a), Self::Array(b)) | (Self::Set(a), Self::Set(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_value(y))
            }
            (Self::Map(a), Self::Map(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka.same_value(kb) && va.same_value(vb))
            }
            (Self::Object(a), Self::Object(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_value(vb))
            }
            _ => self == other,
        }
    }
}

fn float_same_value(a: f64, b: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        a.is_nan() && b.is_nan()
    } else {
        a == b && a.is_sign_negative() == b.is_sign_negative()
    }
}

// -- Convenience conversions --

impl From<bool> for CaskValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<i64> for CaskValue {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for CaskValue {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<i128> for CaskValue {
    fn from(i: i128) -> Self {
        Self::BigInt(i)
    }
}

impl From<f64> for CaskValue {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<String> for CaskValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for CaskValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<Vec<u8>> for CaskValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Buffer8(b)
    }
}

impl From<Vec<u16>> for CaskValue {
    fn from(b: Vec<u16>) -> Self {
        Self::Buffer16(b)
    }
}

impl From<Vec<u32>> for CaskValue {
    fn from(b: Vec<u32>) -> Self {
        Self::Buffer32(b)
    }
}

impl From<Vec<CaskValue>> for CaskValue {
    fn from(v: Vec<CaskValue>) -> Self {
        Self::Array(v)
    }
}

impl From<Vec<(String, CaskValue)>> for CaskValue {
    fn from(entries: Vec<(String, CaskValue)>) -> Self {
        Self::Object(entries)
    }
}

impl fmt::Display for CaskValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => write!(f, "undefined"),
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::BigInt(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Array(items) => write_items(f, "[", items, "]"),
            Self::Set(items) => write_items(f, "set[", items, "]"),
            Self::Map(entries) => {
                write!(f, "map{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Self::Date(ms) => write!(f, "date({ms})"),
            Self::Buffer8(b) => write!(f, "<{} bytes>", b.len()),
            Self::Buffer16(b) => write!(f, "<{} u16>", b.len()),
            Self::Buffer32(b) => write!(f, "<{} u32>", b.len()),
        }
    }
}

fn write_items(
    f: &mut fmt::Formatter<'_>,
    open: &str,
    items: &[CaskValue],
    close: &str,
) -> fmt::Result {
    write!(f, "{open}")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    write!(f, "{close}")
}
