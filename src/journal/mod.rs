pub mod entry;
pub mod heuristics;
pub mod profile;
pub mod search;
pub mod store;
pub mod types;

/// Little-endian f32 bytes, the blob layout sqlite-vec expects.
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|x| x.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_are_four_per_float() {
        let bytes = embedding_to_bytes(&[1.0, -2.5]);
        assert_eq!(bytes.len(), 8);
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..], &(-2.5f32).to_le_bytes());
    }
}
