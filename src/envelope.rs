//! Packed casks.
//!
//! A cask is the product of the full pipeline: encode a value, shuffle
//! the bytes with the caller's seeds, and carry the result as an
//! immutable buffer with a base64 text form. The optional hash seal
//! nests one cask inside another next to its digest, so tampering with
//! the payload is detectable before anything gets decoded.

use std::fmt;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use bytes::{Bytes, BytesMut};

use crate::cipher;
use crate::codec;
use crate::digest::{self, Algorithm};
use crate::error::CaskError;
use crate::types::CaskValue;

/// Encodes `value` and shuffles the result with `seeds`.
pub fn pack(value: &CaskValue, seeds: &[i64]) -> Vec<u8> {
    let mut buf = BytesMut::new();
    codec::encode_value(&mut buf, value);
    let packed = cipher::shuffle(&buf, seeds);
    tracing::trace!(bytes = packed.len(), rounds = seeds.len(), "packed cask");
    packed
}

/// Unshuffles `bytes` with `seeds` and decodes the leading value.
pub fn unpack(bytes: &[u8], seeds: &[i64]) -> Result<CaskValue, CaskError> {
    let plain = cipher::unshuffle(bytes, seeds);
    let mut pos = 0;
    let value = codec::decode_value(&plain, &mut pos)?;
    tracing::trace!(bytes = bytes.len(), rounds = seeds.len(), "unpacked cask");
    Ok(value)
}

/// Packs `value` inside an integrity seal.
///
/// The inner cask is packed seedless, its digest is taken, and the
/// `[digest, bytes]` pair is packed with `seeds`.
pub fn pack_with_hash(value: &CaskValue, algorithm: Algorithm, seeds: &[i64]) -> Vec<u8> {
    Cask::pack_with_hash(value, algorithm, seeds).to_vec()
}

/// Opens an integrity-sealed buffer produced by [`pack_with_hash`].
pub fn unpack_with_hash(
    bytes: &[u8],
    algorithm: Algorithm,
    seeds: &[i64],
) -> Result<CaskValue, CaskError> {
    Cask::from(bytes.to_vec()).unpack_with_hash(algorithm, seeds)
}

/// A packed value held as immutable bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cask {
    bytes: Bytes,
}

impl Cask {
    /// Encodes `value` and shuffles it with `seeds`.
    pub fn pack(value: &CaskValue, seeds: &[i64]) -> Self {
        Self {
            bytes: Bytes::from(pack(value, seeds)),
        }
    }

    /// Unshuffles with `seeds` and decodes the leading value.
    ///
    /// With wrong seeds this usually fails to decode, but it can also
    /// produce an unrelated value; use [`Cask::unpack_with_hash`] when
    /// that distinction matters.
    pub fn unpack(&self, seeds: &[i64]) -> Result<CaskValue, CaskError> {
        unpack(&self.bytes, seeds)
    }

    /// Packs `value` inside an integrity seal, as [`pack_with_hash`].
    pub fn pack_with_hash(value: &CaskValue, algorithm: Algorithm, seeds: &[i64]) -> Self {
        let inner = Self::pack(value, &[]);
        let sealed = CaskValue::Array(vec![
            CaskValue::String(inner.digest(algorithm)),
            CaskValue::Buffer8(inner.to_vec()),
        ]);
        Self::pack(&sealed, seeds)
    }

    /// Opens an integrity-sealed cask: recomputes the payload digest and
    /// refuses to decode the payload if it disagrees with the stored one.
    pub fn unpack_with_hash(
        &self,
        algorithm: Algorithm,
        seeds: &[i64],
    ) -> Result<CaskValue, CaskError> {
        let sealed = self.unpack(seeds)?;
        let pair = match sealed {
            CaskValue::Array(items) => <[CaskValue; 2]>::try_from(items).ok(),
            _ => None,
        };
        let Some([CaskValue::String(stored), CaskValue::Buffer8(payload)]) = pair else {
            return Err(CaskError::InvalidEnvelope(
                "hash seal is not a [digest, payload] pair".to_string(),
            ));
        };
        let inner = Cask::from(payload);
        let computed = inner.digest(algorithm);
        if stored != computed {
            tracing::warn!(algorithm = ?algorithm, "cask digest mismatch");
            return Err(CaskError::HashMismatch { stored, computed });
        }
        inner.unpack(&[])
    }

    /// Digest of the printable form. Seals hash the base64 text rather
    /// than the raw bytes, so the text form is the canonical identity.
    pub fn digest(&self, algorithm: Algorithm) -> String {
        digest::hash_text(&self.to_base64(), algorithm)
    }

    pub fn from_bytes(bytes: Bytes) -> Self {
        Self { bytes }
    }

    /// Parses the printable form produced by [`Cask::to_base64`].
    pub fn from_base64(text: &str) -> Result<Self, CaskError> {
        let bytes = STANDARD_NO_PAD.decode(text)?;
        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }

    /// Renders the packed bytes as unpadded standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD_NO_PAD.encode(&self.bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Packed length in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl AsRef<[u8]> for Cask {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Vec<u8>> for Cask {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(bytes),
        }
    }
}

impl fmt::Display for Cask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}
