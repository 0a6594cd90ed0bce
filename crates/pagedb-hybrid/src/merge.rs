//! Merge the two normalized candidate sets into one deterministic ranking.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use pagedb_core::types::{ChunkId, ChunkMeta, ChunkResult, SparseHit};

/// Union both candidate sets by chunk id, blend scores with `alpha`, and
/// rank. A chunk missing from one side scores 0 there; it is never
/// excluded, so a strong single-side match can still surface.
///
/// URL resolution per chunk: caller metadata (when non-empty), else the
/// url carried on the matching sparse hit, else empty string. Missing
/// metadata never fails, it just degrades to empty/`None` fields.
///
/// Ordering is score desc, then dense score desc, then chunk id asc. The
/// three-level tie-break makes repeated identical queries byte-identical,
/// which grouping relies on. The id union is collected into a sorted set
/// first so hash-map iteration order can never leak into the output.
pub fn merge_and_rank(
    dense_norm: &HashMap<ChunkId, f32>,
    sparse_norm: &HashMap<ChunkId, f32>,
    sparse_hits: &[SparseHit],
    metadata: Option<&HashMap<ChunkId, ChunkMeta>>,
    alpha: f32,
    top_k: usize,
) -> Vec<ChunkResult> {
    let mut sparse_urls: HashMap<&str, &str> = HashMap::new();
    for h in sparse_hits {
        if let Some(url) = h.url.as_deref() {
            sparse_urls.entry(h.chunk_id.as_str()).or_insert(url);
        }
    }

    let ids: BTreeSet<&ChunkId> = dense_norm.keys().chain(sparse_norm.keys()).collect();

    let mut merged: Vec<ChunkResult> = Vec::with_capacity(ids.len());
    for id in ids {
        let score_dense = dense_norm.get(id).copied().unwrap_or(0.0);
        let score_sparse = sparse_norm.get(id).copied().unwrap_or(0.0);
        let score = alpha * score_dense + (1.0 - alpha) * score_sparse;

        let meta = metadata.and_then(|m| m.get(id));
        let url = meta
            .map(|m| m.url.clone())
            .filter(|u| !u.is_empty())
            .or_else(|| sparse_urls.get(id.as_str()).map(|u| (*u).to_string()))
            .unwrap_or_default();

        merged.push(ChunkResult {
            chunk_id: id.clone(),
            url,
            title: meta.and_then(|m| m.title.clone()),
            snippet: meta.and_then(|m| m.snippet.clone()),
            score_dense,
            score_sparse,
            score,
        });
    }

    merged.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| {
                b.score_dense
                    .partial_cmp(&a.score_dense)
                    .unwrap_or(Ordering::Equal)
            })
            .then_with(|| a.chunk_id.cmp(&b.chunk_id))
    });
    merged.truncate(top_k);
    merged
}
