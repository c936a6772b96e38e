// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! BLOB codec and similarity math for stored embedding vectors.

/// Convert f32 vector to bytes for SQLite BLOB storage.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    vec.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert SQLite BLOB back to f32 vector.
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes(chunk.try_into().unwrap()))
        .collect()
}

/// Compute cosine similarity between two vectors.
///
/// Vectors of different lengths are treated as maximally dissimilar
/// (similarity -1.0). Lengths only diverge when the embedding model
/// changed between ingestion and query, and stale rows should rank
/// behind every genuine match rather than abort the search.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return -1.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Cosine distance: lower is closer. Rows are ranked ascending by this.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_similarity(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_to_blob_roundtrip() {
        let original = vec![0.1_f32, 0.2, 0.3, -0.5, 1.0];
        let blob = vec_to_blob(&original);
        let recovered = blob_to_vec(&blob);
        assert_eq!(original.len(), recovered.len());
        for (a, b) in original.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < f32::EPSILON);
        }
    }

    #[test]
    fn blob_length_is_four_bytes_per_dim() {
        let vec384: Vec<f32> = (0..384).map(|i| i as f32 / 384.0).collect();
        let blob = vec_to_blob(&vec384);
        assert_eq!(blob.len(), 384 * 4);
    }

    #[test]
    fn cosine_similarity_identical() {
        let v = vec![0.3_f32, -0.4, 0.5];
        let sim = cosine_similarity(&v, &v);
        assert!((sim - 1.0).abs() < 1e-6, "identical vectors should have sim ~1.0, got {sim}");
    }

    #[test]
    fn cosine_similarity_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < f32::EPSILON);
    }

    #[test]
    fn cosine_similarity_zero_vector_is_zero() {
        let a = vec![0.0, 0.0];
        let b = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn mismatched_lengths_rank_behind_every_match() {
        let query = vec![1.0, 0.0, 0.0];
        let stale = vec![1.0, 0.0];
        assert_eq!(cosine_similarity(&query, &stale), -1.0);
        // Strictly farther than even an opposing vector of the right length.
        let opposite = vec![-1.0, 0.0, 0.0];
        assert!(cosine_distance(&query, &stale) >= cosine_distance(&query, &opposite));
    }

    #[test]
    fn cosine_distance_orders_ascending_by_closeness() {
        let query = vec![1.0, 0.0];
        let close = vec![0.9, 0.1];
        let far = vec![-1.0, 0.0];
        assert!(cosine_distance(&query, &close) < cosine_distance(&query, &far));
    }
}
