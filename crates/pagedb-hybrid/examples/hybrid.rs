//! End-to-end demo with tiny in-memory collaborators: a keyword-counting
//! "embedder", a brute-force cosine index, and a naive lexical index.
//!
//! Run with: cargo run -p pagedb-hybrid --example hybrid

use std::cmp::Ordering;
use std::collections::HashMap;

use pagedb_hybrid::{
    ChunkMeta, DenseHit, DenseIndex, Embedder, HybridSearchEngine, SearchOptions, SparseHit,
    SparseIndex,
};

const VOCAB: [&str; 4] = ["rust", "ownership", "garden", "compost"];

struct Page {
    chunk_id: &'static str,
    url: &'static str,
    title: &'static str,
    text: &'static str,
}

const PAGES: [Page; 4] = [
    Page {
        chunk_id: "rust-book-4",
        url: "https://doc.rust-lang.org/book/ch04-00-understanding-ownership.html",
        title: "Understanding Ownership - The Rust Book",
        text: "ownership is rust's most unique feature, rust ownership rules",
    },
    Page {
        chunk_id: "rust-blog-1",
        url: "https://example.org/why-rust",
        title: "Why we rewrote it in Rust",
        text: "rust gave us memory safety without garbage collection",
    },
    Page {
        chunk_id: "garden-3",
        url: "https://example.org/composting",
        title: "Composting basics",
        text: "a garden thrives on compost, turn your compost weekly",
    },
    Page {
        chunk_id: "garden-7",
        url: "https://example.org/composting",
        title: "Composting basics",
        text: "compost bins belong in a shaded garden corner",
    },
];

/// Counts vocabulary terms; a stand-in for a real embedding model.
struct KeywordEmbedder;

impl KeywordEmbedder {
    fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        VOCAB
            .iter()
            .map(|term| lower.matches(term).count() as f32)
            .collect()
    }
}

impl Embedder for KeywordEmbedder {
    fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(Self::vector(text))
    }
}

/// Brute-force cosine search over the demo pages.
struct InMemoryDense {
    vectors: Vec<(String, Vec<f32>)>,
}

impl InMemoryDense {
    fn build() -> Self {
        let vectors = PAGES
            .iter()
            .map(|p| (p.chunk_id.to_string(), KeywordEmbedder::vector(p.text)))
            .collect();
        Self { vectors }
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

impl DenseIndex for InMemoryDense {
    fn search(&self, query_vec: &[f32], limit: usize) -> anyhow::Result<Vec<DenseHit>> {
        let mut hits: Vec<DenseHit> = self
            .vectors
            .iter()
            .map(|(chunk_id, v)| DenseHit {
                chunk_id: chunk_id.clone(),
                score: cosine(query_vec, v),
            })
            .collect();
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

/// Word-overlap scoring; a stand-in for a real prefix/fuzzy index.
struct InMemorySparse;

impl SparseIndex for InMemorySparse {
    fn search(&self, query: &str) -> anyhow::Result<Vec<SparseHit>> {
        let query_lower = query.to_lowercase();
        let words: Vec<&str> = query_lower.split_whitespace().collect();
        let mut hits = Vec::new();
        for page in &PAGES {
            let score = words.iter().filter(|w| page.text.contains(**w)).count() as f32;
            if score > 0.0 {
                hits.push(SparseHit {
                    chunk_id: page.chunk_id.to_string(),
                    url: Some(page.url.to_string()),
                    score,
                });
            }
        }
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        Ok(hits)
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let metadata: HashMap<String, ChunkMeta> = PAGES
        .iter()
        .map(|p| {
            (
                p.chunk_id.to_string(),
                ChunkMeta {
                    url: p.url.to_string(),
                    title: Some(p.title.to_string()),
                    snippet: None,
                },
            )
        })
        .collect();

    let engine = HybridSearchEngine::new(
        InMemoryDense::build(),
        InMemorySparse,
        Box::new(KeywordEmbedder),
    );

    let opts = SearchOptions::default();
    for query in ["rust ownership", "garden compost", "typewriter"] {
        let results = engine.query(query, &opts, Some(&metadata))?;
        println!("{}", serde_json::to_string_pretty(&results)?);
    }
    Ok(())
}
