//! Seed-keyed byte shuffling.
//!
//! Each round permutes the buffer with an order drawn from one seed,
//! then rotates the whole buffer right by one bit. Rounds stack:
//! [`shuffle`] applies the seeds left to right and [`unshuffle`] undoes
//! them in reverse. The rotation treats the buffer as a single
//! big-endian bit string, so the low bit of the last byte wraps into
//! the high bit of the first.
//!
//! This is obfuscation, not encryption. The permutation comes from a
//! seeded PRNG rather than a key schedule, so it resists casual
//! inspection and nothing more. `rand` stays pinned to 0.8 because
//! `StdRng` does not promise the same stream across major versions,
//! and a cask shuffled today must unshuffle tomorrow.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Applies one shuffle round per seed, left to right.
///
/// An empty seed list returns the bytes unchanged.
pub fn shuffle(data: &[u8], seeds: &[i64]) -> Vec<u8> {
    let mut out = data.to_vec();
    for &seed in seeds {
        out = shuffle_round(&out, seed);
    }
    out
}

/// Undoes [`shuffle`] for the same seed list.
pub fn unshuffle(data: &[u8], seeds: &[i64]) -> Vec<u8> {
    let mut out = data.to_vec();
    for &seed in seeds.iter().rev() {
        out = unshuffle_round(&out, seed);
    }
    out
}

fn shuffle_round(data: &[u8], seed: i64) -> Vec<u8> {
    let order = permutation(data.len(), seed);
    let mut out = vec![0u8; data.len()];
    for (i, &from) in order.iter().enumerate() {
        out[i] = data[from];
    }
    rotate_right(&mut out);
    out
}

fn unshuffle_round(data: &[u8], seed: i64) -> Vec<u8> {
    let mut rotated = data.to_vec();
    rotate_left(&mut rotated);
    let order = permutation(data.len(), seed);
    let mut out = vec![0u8; data.len()];
    for (i, &from) in order.iter().enumerate() {
        out[from] = rotated[i];
    }
    out
}

/// Derives the byte order for one round. The seed is the whole key: the
/// same seed and length always produce the same order.
fn permutation(len: usize, seed: i64) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..len).collect();
    let mut rng = StdRng::seed_from_u64(seed as u64);
    indices.shuffle(&mut rng);
    indices
}

/// Rotates the buffer right by one bit across byte boundaries.
fn rotate_right(data: &mut [u8]) {
    if data.is_empty() {
        return;
    }
    let mut carry = data[data.len() - 1] & 1;
    for byte in data.iter_mut() {
        let low = *byte & 1;
        *byte = (carry << 7) | (*byte >> 1);
        carry = low;
    }
}

fn rotate_left(data: &mut [u8]) {
    if data.is_empty() {
        return;
    }
    let mut carry = data[0] >> 7;
    for byte in data.iter_mut().rev() {
        let high = *byte >> 7;
        *byte = (*byte << 1) | carry;
        carry = high;
    }
}
