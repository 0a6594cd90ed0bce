//! Reshape the flat ranking into per-URL groups for display. Relative
//! ranking is preserved: groups are ordered by their best chunk, and ties
//! keep the order in which the merger ranked those chunks.

use std::cmp::Ordering;
use std::collections::HashMap;

use pagedb_core::types::{ChunkResult, UrlGroup};

/// Longest fallback snippet, including the trailing ellipsis.
pub const SNIPPET_FALLBACK_MAX: usize = 150;

/// Partition ranked chunks by URL and pick each group's representative.
///
/// Chunks with an empty `url` cannot be grouped and are dropped, so no
/// group is ever empty and no group has an empty URL. Grouping preserves
/// first-appearance order and both sorts are stable, keeping the output
/// fully deterministic for identical input rankings.
#[must_use]
pub fn group_by_url(ranked: Vec<ChunkResult>) -> Vec<UrlGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<ChunkResult>> = HashMap::new();
    for chunk in ranked {
        if chunk.url.is_empty() {
            continue;
        }
        if !members.contains_key(&chunk.url) {
            order.push(chunk.url.clone());
        }
        members.entry(chunk.url.clone()).or_default().push(chunk);
    }

    let mut groups: Vec<UrlGroup> = Vec::with_capacity(order.len());
    for url in order {
        let Some(mut chunks) = members.remove(&url) else {
            continue;
        };
        chunks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        let top = &chunks[0];
        let best_snippet = top
            .snippet
            .clone()
            .unwrap_or_else(|| fallback_snippet(top.title.as_deref()));
        groups.push(UrlGroup {
            url,
            best_score: top.score,
            best_snippet,
            top_chunks: chunks,
        });
    }

    groups.sort_by(|a, b| {
        b.best_score
            .partial_cmp(&a.best_score)
            .unwrap_or(Ordering::Equal)
    });
    groups
}

/// Derive a display snippet from the title: its first line, truncated to
/// 150 chars (147 plus an ellipsis when longer). No title, no snippet.
fn fallback_snippet(title: Option<&str>) -> String {
    let Some(title) = title else {
        return String::new();
    };
    let first_line = title.lines().next().unwrap_or("");
    if first_line.chars().count() > SNIPPET_FALLBACK_MAX {
        let mut snippet: String = first_line.chars().take(SNIPPET_FALLBACK_MAX - 3).collect();
        snippet.push_str("...");
        snippet
    } else {
        first_line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(id: &str, url: &str, score: f32) -> ChunkResult {
        ChunkResult {
            chunk_id: id.to_string(),
            url: url.to_string(),
            title: None,
            snippet: None,
            score_dense: score,
            score_sparse: score,
            score,
        }
    }

    #[test]
    fn partitions_by_url_and_drops_empty() {
        let groups = group_by_url(vec![
            chunk("a", "http://x.com", 0.9),
            chunk("b", "", 0.8),
            chunk("c", "http://y.com", 0.7),
            chunk("d", "http://x.com", 0.6),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].url, "http://x.com");
        assert_eq!(groups[0].top_chunks.len(), 2);
        assert_eq!(groups[1].url, "http://y.com");
        assert!(groups.iter().all(|g| !g.url.is_empty()));
        assert!(groups.iter().all(|g| !g.top_chunks.is_empty()));
        // every grouped chunk landed in exactly one group
        let total: usize = groups.iter().map(|g| g.top_chunks.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn best_score_is_member_max_and_groups_sorted() {
        let groups = group_by_url(vec![
            chunk("a", "http://y.com", 0.5),
            chunk("b", "http://x.com", 0.9),
            chunk("c", "http://y.com", 0.7),
        ]);

        assert_eq!(groups[0].url, "http://x.com");
        for g in &groups {
            let max = g
                .top_chunks
                .iter()
                .map(|c| c.score)
                .fold(f32::MIN, f32::max);
            assert!((g.best_score - max).abs() < f32::EPSILON);
        }
        for pair in groups.windows(2) {
            assert!(pair[0].best_score >= pair[1].best_score);
        }
    }

    #[test]
    fn members_sorted_desc_within_group() {
        let groups = group_by_url(vec![
            chunk("low", "http://x.com", 0.2),
            chunk("high", "http://x.com", 0.9),
            chunk("mid", "http://x.com", 0.5),
        ]);
        let scores: Vec<f32> = groups[0].top_chunks.iter().map(|c| c.score).collect();
        assert_eq!(scores, [0.9, 0.5, 0.2]);
    }

    #[test]
    fn group_ties_keep_ranked_order() {
        // Both groups tie on best_score; the one whose best chunk ranked
        // first stays first.
        let groups = group_by_url(vec![
            chunk("a", "http://y.com", 0.5),
            chunk("b", "http://x.com", 0.5),
        ]);
        assert_eq!(groups[0].url, "http://y.com");
        assert_eq!(groups[1].url, "http://x.com");
    }

    #[test]
    fn best_snippet_prefers_top_chunk_snippet() {
        let mut with_snippet = chunk("a", "http://x.com", 0.9);
        with_snippet.snippet = Some("the best passage".to_string());
        with_snippet.title = Some("Ignored title".to_string());
        let groups = group_by_url(vec![with_snippet, chunk("b", "http://x.com", 0.1)]);
        assert_eq!(groups[0].best_snippet, "the best passage");
    }

    #[test]
    fn best_snippet_falls_back_to_title_first_line() {
        let mut titled = chunk("a", "http://x.com", 0.9);
        titled.title = Some("First line\nSecond line".to_string());
        let groups = group_by_url(vec![titled]);
        assert_eq!(groups[0].best_snippet, "First line");
    }

    #[test]
    fn best_snippet_empty_without_title_or_snippet() {
        let groups = group_by_url(vec![chunk("a", "http://x.com", 0.9)]);
        assert_eq!(groups[0].best_snippet, "");
    }

    #[test]
    fn long_title_fallback_is_truncated_with_ellipsis() {
        let mut titled = chunk("a", "http://x.com", 0.9);
        titled.title = Some("t".repeat(400));
        let groups = group_by_url(vec![titled]);
        let snippet = &groups[0].best_snippet;
        assert_eq!(snippet.chars().count(), SNIPPET_FALLBACK_MAX);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn title_at_limit_is_not_truncated() {
        let mut titled = chunk("a", "http://x.com", 0.9);
        titled.title = Some("t".repeat(SNIPPET_FALLBACK_MAX));
        let groups = group_by_url(vec![titled]);
        assert_eq!(groups[0].best_snippet.chars().count(), SNIPPET_FALLBACK_MAX);
        assert!(!groups[0].best_snippet.contains("..."));
    }

    #[test]
    fn no_groups_from_all_empty_urls() {
        assert!(group_by_url(vec![chunk("a", "", 0.9), chunk("b", "", 0.8)]).is_empty());
    }
}
