//! Typed-buffer width conversion.
//!
//! Multi-byte buffer elements travel as little-endian bytes on the wire;
//! these helpers normalize between the 8-bit wire form and the 16/32-bit
//! element forms.

use crate::error::CaskError;

/// Reassembles little-endian wire bytes into 16-bit elements.
pub fn u16s_from_bytes(bytes: &[u8]) -> Result<Vec<u16>, CaskError> {
    if bytes.len() % 2 != 0 {
        return Err(CaskError::BufferSizeMismatch {
            len: bytes.len(),
            width: 2,
        });
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|c| u16::from_le_bytes([c[0], c[1]]))
        .collect())
}

/// Reassembles little-endian wire bytes into 32-bit elements.
pub fn u32s_from_bytes(bytes: &[u8]) -> Result<Vec<u32>, CaskError> {
    if bytes.len() % 4 != 0 {
        return Err(CaskError::BufferSizeMismatch {
            len: bytes.len(),
            width: 4,
        });
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Flattens 16-bit elements to their little-endian wire bytes.
pub fn u16s_to_bytes(elements: &[u16]) -> Vec<u8> {
    let mut out = Vec::with_capacity(elements.len() * 2);
    for e in elements {
        out.extend_from_slice(&e.to_le_bytes());
    }
    out
}

/// Flattens 32-bit elements to their little-endian wire bytes.
pub fn u32s_to_bytes(elements: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(elements.len() * 4);
    for e in elements {
        out.extend_from_slice(&e.to_le_bytes());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_round_trip() {
        let u16s = vec![0x0102, 0xFFFE, 0];
        assert_eq!(u16s_from_bytes(&u16s_to_bytes(&u16s)).unwrap(), u16s);

        let u32s = vec![0x01020304, u32::MAX];
        assert_eq!(u32s_from_bytes(&u32s_to_bytes(&u32s)).unwrap(), u32s);
    }

    #[test]
    fn elements_are_little_endian() {
        assert_eq!(u16s_to_bytes(&[0x0102]), [0x02, 0x01]);
        assert_eq!(u32s_to_bytes(&[0x01020304]), [0x04, 0x03, 0x02, 0x01]);
        assert_eq!(u16s_from_bytes(&[0x02, 0x01]).unwrap(), [0x0102]);
    }

    #[test]
    fn indivisible_lengths_are_rejected() {
        assert!(matches!(
            u16s_from_bytes(&[1, 2, 3]),
            Err(CaskError::BufferSizeMismatch { len: 3, width: 2 })
        ));
        assert!(matches!(
            u32s_from_bytes(&[1, 2]),
            Err(CaskError::BufferSizeMismatch { len: 2, width: 4 })
        ));
    }

    #[test]
    fn empty_buffers_convert() {
        assert_eq!(u16s_from_bytes(&[]).unwrap(), Vec::<u16>::new());
        assert_eq!(u32s_to_bytes(&[]), Vec::<u8>::new());
    }
}
