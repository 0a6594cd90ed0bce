//! Hybrid dense + sparse search over a locally indexed page corpus.
//!
//! One query flows through: embed the query, fetch dense candidates
//! (cosine, [-1, 1]) and sparse candidates (unbounded lexical scores),
//! normalize both sides into [0, 1], blend with `alpha`, rank with a
//! deterministic tie-break, then group the survivors by source URL.
//!
//! The engine owns no index internals. Embedding, the vector index and the
//! lexical index are injected behind the `pagedb-core` traits, so tests
//! and alternative hosts can swap them freely. The pipeline holds no state
//! between calls; concurrent queries against one engine are independent.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod group;
pub mod merge;
pub mod normalize;

pub use group::group_by_url;
pub use merge::merge_and_rank;
pub use normalize::{normalize_dense, normalize_sparse};
pub use pagedb_core::config::SearchOptions;
pub use pagedb_core::traits::{DenseIndex, Embedder, SparseIndex};
pub use pagedb_core::types::{
    ChunkId, ChunkMeta, ChunkResult, DenseHit, GroupedResults, SearchStats, SparseHit, UrlGroup,
};

use std::collections::HashMap;
use std::time::Instant;

use anyhow::Result;
use tracing::debug;

pub struct HybridSearchEngine<D, S>
where
    D: DenseIndex,
    S: SparseIndex,
{
    dense: D,
    sparse: S,
    embedder: Box<dyn Embedder>,
}

impl<D, S> HybridSearchEngine<D, S>
where
    D: DenseIndex,
    S: SparseIndex,
{
    pub fn new(dense: D, sparse: S, embedder: Box<dyn Embedder>) -> Self {
        Self {
            dense,
            sparse,
            embedder,
        }
    }

    /// Run the full pipeline for one query.
    ///
    /// `metadata` supplies display fields (url/title/snippet) per chunk id;
    /// chunks without it degrade to empty fields rather than failing. Any
    /// error from the embedder or either index propagates unchanged; there
    /// is no retry and no partial result. Empty queries and empty candidate
    /// sets are not errors, they produce empty `groups` with valid stats.
    ///
    /// The phases run sequentially: the dense search needs the embedding
    /// first, and the sparse search is issued after it. `stats` reports
    /// each phase's own wall-clock time, with embedding counted in the
    /// dense phase.
    pub fn query(
        &self,
        query: &str,
        opts: &SearchOptions,
        metadata: Option<&HashMap<ChunkId, ChunkMeta>>,
    ) -> Result<GroupedResults> {
        let overfetch = opts.overfetch_limit();

        let started = Instant::now();
        let query_vec = self.embedder.embed(query)?;
        let dense_hits = self.dense.search(&query_vec, overfetch)?;
        let dense_ms = elapsed_ms(started);

        let started = Instant::now();
        let mut sparse_hits = self.sparse.search(query)?;
        sparse_hits.truncate(overfetch);
        let sparse_ms = elapsed_ms(started);

        let started = Instant::now();
        let total_chunks_scanned = dense_hits.len() + sparse_hits.len();
        let dense_norm: HashMap<ChunkId, f32> = dense_hits
            .into_iter()
            .map(|h| (h.chunk_id, normalize_dense(h.score)))
            .collect();
        let sparse_norm = normalize_sparse(&sparse_hits);
        let ranked = merge_and_rank(
            &dense_norm,
            &sparse_norm,
            &sparse_hits,
            metadata,
            opts.alpha,
            opts.top_k,
        );
        let groups = group_by_url(ranked);
        let merge_ms = elapsed_ms(started);

        debug!(
            query,
            dense_ms,
            sparse_ms,
            merge_ms,
            groups = groups.len(),
            "hybrid search complete"
        );

        Ok(GroupedResults {
            query: query.to_string(),
            alpha: opts.alpha,
            groups,
            stats: SearchStats {
                total_chunks_scanned,
                dense_ms,
                sparse_ms,
                merge_ms,
            },
        })
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}
