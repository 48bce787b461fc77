//! Hash digests for cask integrity seals.
//!
//! Digests are computed over the base64 text of a cask, not its raw
//! bytes, and rendered as lowercase hex. MD5 is kept for compatibility
//! with existing seals; prefer the SHA-2 family for new ones.

use md5::Md5;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// Hash algorithm for a cask integrity seal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Md5,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

/// Hashes text with the given algorithm and renders the digest as
/// lowercase hex.
pub fn hash_text(text: &str, algorithm: Algorithm) -> String {
    let bytes = text.as_bytes();
    match algorithm {
        Algorithm::Md5 => format!("{:x}", Md5::digest(bytes)),
        Algorithm::Sha224 => format!("{:x}", Sha224::digest(bytes)),
        Algorithm::Sha256 => format!("{:x}", Sha256::digest(bytes)),
        Algorithm::Sha384 => format!("{:x}", Sha384::digest(bytes)),
        Algorithm::Sha512 => format!("{:x}", Sha512::digest(bytes)),
    }
}
