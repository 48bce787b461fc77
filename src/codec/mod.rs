//! The cask wire format.
//!
//! A cask is a headerless byte stream: no version marker, no length
//! prefix, just a tag byte followed by the payload that tag implies.
//! Containers nest freely and close with a sentinel byte, so the stream
//! describes its own shape.
//!
//! `tag` defines the tag space, `varint` the shared integer and fraction
//! bodies, and `encode`/`decode` the value codec on top of them.

pub mod decode;
pub mod encode;
pub mod tag;
pub mod varint;

pub use decode::decode_value;
pub use encode::encode_value;
