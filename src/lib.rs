//! caskr — a self-describing binary codec for dynamic values.
//!
//! Values (numbers, strings, containers, dates, typed buffers) encode into
//! a compact tagged byte stream with no header or schema. The stream can be
//! shuffled with a list of integer seeds for casual-inspection resistance,
//! wrapped in a digest seal for tamper detection, and rendered as base64
//! text for transport.
//!
//! # Architecture
//!
//! - **`types`** — the `CaskValue` model and typed-buffer width helpers
//! - **`codec`** — tag space, varint and fraction bodies, value encode/decode
//! - **`cipher`** — seed-keyed byte shuffling
//! - **`digest`** — hash algorithms backing integrity seals
//! - **`envelope`** — `Cask` packing, hash seals, base64 text form

pub mod cipher;
pub mod codec;
pub mod digest;
pub mod envelope;
pub mod error;
pub mod types;

pub use digest::Algorithm;
pub use envelope::{pack, pack_with_hash, unpack, unpack_with_hash, Cask};
pub use error::CaskError;
pub use types::CaskValue;
