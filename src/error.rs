//! Error types for the cask codec.

/// Errors that can occur while decoding, unsealing, or transcoding a cask.
#[derive(Debug, thiserror::Error)]
pub enum CaskError {
    /// A tag byte outside all assigned ranges and values.
    #[error("invalid tag byte: 0x{0:02X}")]
    InvalidTag(u8),

    /// A length-prefixed or varint field claims more bytes than remain.
    #[error("truncated input: {0}")]
    TruncatedInput(String),

    /// A value kind that cannot be represented where it appears.
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// The stored digest of a hash-sealed cask does not match its payload.
    #[error("hash mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: String, computed: String },

    /// A typed-buffer byte length does not divide into whole elements.
    #[error("buffer of {len} bytes is not divisible into {width}-byte elements")]
    BufferSizeMismatch { len: usize, width: usize },

    /// A magnitude that must be exact does not fit 128 bits.
    #[error("integer overflow: {0}")]
    IntegerOverflow(String),

    /// A hash-sealed stream without the `[digest, payload]` pair shape.
    #[error("invalid envelope: {0}")]
    InvalidEnvelope(String),

    /// Printable text that is not valid unpadded standard base64.
    #[error("invalid base64 text: {0}")]
    Base64(#[from] base64::DecodeError),
}
