//! Domain types shared by the hybrid pipeline and its index collaborators.

use serde::{Deserialize, Serialize};

pub type ChunkId = String;

/// A raw candidate from the dense (embedding) index.
///
/// `score` is a cosine similarity in [-1, 1] as produced by the index;
/// normalization into [0, 1] happens downstream, per query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenseHit {
    pub chunk_id: ChunkId,
    pub score: f32,
}

/// A raw candidate from the sparse (lexical) index.
///
/// `score` is an unbounded relevance score, higher is better. `url` is
/// whatever source metadata the index stored alongside the chunk, if any;
/// the merger uses it as a fallback when the caller supplied no metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseHit {
    pub chunk_id: ChunkId,
    pub url: Option<String>,
    pub score: f32,
}

/// Caller-supplied display metadata for a chunk, keyed by chunk id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChunkMeta {
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
}

/// A merged, scored chunk produced by one hybrid search call.
///
/// Invariants: `score_dense`, `score_sparse` and `score` are all in [0, 1],
/// with `score = alpha * score_dense + (1 - alpha) * score_sparse`. A side
/// that did not return the chunk contributes 0. `url` is empty when neither
/// caller metadata nor the sparse index resolved one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkResult {
    pub chunk_id: ChunkId,
    pub url: String,
    pub title: Option<String>,
    pub snippet: Option<String>,
    pub score_dense: f32,
    pub score_sparse: f32,
    pub score: f32,
}

/// All ranked chunks that share one source URL.
///
/// `top_chunks` is sorted descending by `score`; `best_score` equals the
/// top chunk's score and is the group's sort key. Chunks without a URL are
/// never grouped, so `url` is always non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlGroup {
    pub url: String,
    pub best_score: f32,
    pub best_snippet: String,
    pub top_chunks: Vec<ChunkResult>,
}

/// Per-phase wall-clock timings and candidate counts. Diagnostics only;
/// no correctness invariant beyond non-negativity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchStats {
    pub total_chunks_scanned: usize,
    pub dense_ms: f64,
    pub sparse_ms: f64,
    pub merge_ms: f64,
}

/// The full response to one hybrid search call. `groups` is sorted
/// descending by `best_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedResults {
    pub query: String,
    pub alpha: f32,
    pub groups: Vec<UrlGroup>,
    pub stats: SearchStats,
}
