use crate::types::{DenseHit, SparseHit};

/// Turns query text into an embedding vector. The execution strategy
/// (in-process model, worker pool, remote service) is the implementor's
/// concern; the pipeline only awaits the vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

/// Similarity search over stored chunk embeddings.
///
/// Returned scores are cosine similarities in [-1, 1]. `limit` is the
/// overfetch count requested by the pipeline.
pub trait DenseIndex: Send + Sync {
    fn search(&self, query_vec: &[f32], limit: usize) -> anyhow::Result<Vec<DenseHit>>;
}

/// Lexical (prefix/fuzzy) search over chunk text.
///
/// Implementations return their full candidate list, best first; the
/// hybrid pipeline truncates to its overfetch count itself.
pub trait SparseIndex: Send + Sync {
    fn search(&self, query: &str) -> anyhow::Result<Vec<SparseHit>>;
}
