//! Binary layout of the vector artifact.
//!
//! Little-endian throughout:
//!
//! ```text
//! [magic: b"PXVS"][version: u32][count: u32][dim: u32][f32 * count * dim]
//! ```
//!
//! The identifier artifact is a plain JSON string array, positionally
//! aligned with the vectors; both are tied together by the manifest
//! (see [`crate::store`]).

use crate::error::{Result, VectorStoreError};
use crate::types::FeatureVector;

pub const MAGIC: [u8; 4] = *b"PXVS";
pub const FORMAT_VERSION: u32 = 1;
pub const HEADER_SIZE: usize = 16;

/// Serialize `vectors` into the binary artifact. All vectors must
/// share the dimension of the first; the caller validates that before
/// encoding.
pub fn encode_vectors(vectors: &[FeatureVector]) -> Vec<u8> {
    let dim = vectors.first().map_or(0, Vec::len);
    let mut buf = Vec::with_capacity(HEADER_SIZE + vectors.len() * dim * 4);
    buf.extend_from_slice(&MAGIC);
    buf.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    buf.extend_from_slice(&(vectors.len() as u32).to_le_bytes());
    buf.extend_from_slice(&(dim as u32).to_le_bytes());
    for vector in vectors {
        for value in vector {
            buf.extend_from_slice(&value.to_le_bytes());
        }
    }
    buf
}

/// Parse a binary vector artifact back into its vector table.
pub fn decode_vectors(bytes: &[u8]) -> Result<Vec<FeatureVector>> {
    if bytes.len() < HEADER_SIZE {
        return Err(VectorStoreError::CorruptData(format!(
            "vector artifact truncated: {} bytes, header needs {HEADER_SIZE}",
            bytes.len()
        )));
    }
    if bytes[0..4] != MAGIC {
        return Err(VectorStoreError::CorruptData(
            "bad magic in vector artifact".into(),
        ));
    }
    let version = read_u32(bytes, 4);
    if version != FORMAT_VERSION {
        return Err(VectorStoreError::CorruptData(format!(
            "unsupported vector artifact version {version}"
        )));
    }
    let count = read_u32(bytes, 8) as usize;
    let dim = read_u32(bytes, 12) as usize;

    let expected = HEADER_SIZE + count * dim * 4;
    if bytes.len() != expected {
        return Err(VectorStoreError::CorruptData(format!(
            "vector artifact size {} does not match header (count={count}, dim={dim})",
            bytes.len()
        )));
    }

    let mut vectors = Vec::with_capacity(count);
    let mut offset = HEADER_SIZE;
    for _ in 0..count {
        let mut vector = Vec::with_capacity(dim);
        for _ in 0..dim {
            let raw: [u8; 4] = bytes[offset..offset + 4].try_into().unwrap();
            vector.push(f32::from_le_bytes(raw));
            offset += 4;
        }
        vectors.push(vector);
    }
    Ok(vectors)
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trip_is_bit_identical() {
        let vectors = vec![
            vec![1.0_f32, 0.0, -0.5, f32::MIN_POSITIVE],
            vec![0.25, 0.75, 0.125, 1.0],
        ];
        let decoded = decode_vectors(&encode_vectors(&vectors)).unwrap();
        assert_eq!(decoded, vectors);
        for (a, b) in decoded.iter().flatten().zip(vectors.iter().flatten()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn empty_table_round_trips() {
        let decoded = decode_vectors(&encode_vectors(&[])).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn rejects_bad_magic() {
        let mut bytes = encode_vectors(&[vec![1.0, 2.0]]);
        bytes[0] = b'X';
        assert!(matches!(
            decode_vectors(&bytes),
            Err(VectorStoreError::CorruptData(_))
        ));
    }

    #[test]
    fn rejects_truncated_body() {
        let mut bytes = encode_vectors(&[vec![1.0, 2.0], vec![3.0, 4.0]]);
        bytes.truncate(bytes.len() - 4);
        assert!(matches!(
            decode_vectors(&bytes),
            Err(VectorStoreError::CorruptData(_))
        ));
    }
}
