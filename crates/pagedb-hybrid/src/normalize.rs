//! Score normalization: map both engines' raw scores into one comparable
//! [0, 1] scale using only the current query's candidate set, so repeated
//! identical queries always normalize identically.

use std::collections::HashMap;

use pagedb_core::types::{ChunkId, SparseHit};

/// Remap a cosine similarity from [-1, 1] to [0, 1].
#[must_use]
pub fn normalize_dense(cos: f32) -> f32 {
    (cos + 1.0) / 2.0
}

/// Query-local max scaling of sparse relevance scores.
///
/// The best hit of the current query always maps to exactly 1.0. An empty
/// hit list, or one whose maximum score is zero, yields an empty map; the
/// merger then treats every chunk as absent on the sparse side (score 0).
/// The implicit minimum is 0, not the observed minimum, so weak hits keep
/// a proportionally weak score.
#[must_use]
pub fn normalize_sparse(hits: &[SparseHit]) -> HashMap<ChunkId, f32> {
    let max_score = hits.iter().map(|h| h.score).fold(0.0f32, f32::max);
    if max_score <= 0.0 {
        return HashMap::new();
    }
    hits.iter()
        .map(|h| (h.chunk_id.clone(), h.score / max_score))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f32) -> SparseHit {
        SparseHit {
            chunk_id: id.to_string(),
            url: None,
            score,
        }
    }

    #[test]
    fn dense_endpoints() {
        assert!((normalize_dense(-1.0) - 0.0).abs() < 1e-6);
        assert!((normalize_dense(0.0) - 0.5).abs() < 1e-6);
        assert!((normalize_dense(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dense_stays_in_unit_range() {
        let mut cos = -1.0f32;
        while cos <= 1.0 {
            let n = normalize_dense(cos);
            assert!((0.0..=1.0).contains(&n), "cos {cos} mapped to {n}");
            cos += 0.01;
        }
    }

    #[test]
    fn sparse_empty_input_yields_empty_map() {
        assert!(normalize_sparse(&[]).is_empty());
    }

    #[test]
    fn sparse_zero_max_yields_empty_map() {
        let hits = vec![hit("a", 0.0), hit("b", 0.0)];
        assert!(normalize_sparse(&hits).is_empty());
    }

    #[test]
    fn sparse_top_hit_is_exactly_one() {
        let hits = vec![hit("a", 3.0), hit("b", 12.0), hit("c", 6.0)];
        let norm = normalize_sparse(&hits);
        assert!((norm["b"] - 1.0).abs() < f32::EPSILON);
        assert!((norm["a"] - 0.25).abs() < 1e-6);
        assert!((norm["c"] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn sparse_scaling_is_query_local() {
        // The same raw score normalizes differently depending on the
        // query's own maximum.
        let strong = normalize_sparse(&[hit("a", 5.0), hit("b", 10.0)]);
        let weak = normalize_sparse(&[hit("a", 5.0), hit("b", 5.0)]);
        assert!((strong["a"] - 0.5).abs() < 1e-6);
        assert!((weak["a"] - 1.0).abs() < 1e-6);
    }
}
