use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::graph::Graph;

/// Merges corpus term scores with authority ranks into one candidate order.
///
/// Ranked pages resolve to file paths through the graph's file binding;
/// pages that were never scanned as source files are dropped with a
/// diagnostic. Each side's weight is half of its own total mass, so the
/// contribution scales with the current query rather than a fixed per-term
/// constant. Only paths present in both sets survive (intersection); the
/// sort is stable, so ties keep their original relative order.
pub fn combine(
    term_scores: &[(PathBuf, f64)],
    page_ranks: &[(String, f64)],
    graph: &Graph,
) -> Vec<PathBuf> {
    let mut rank_by_path: HashMap<&PathBuf, f64> = HashMap::new();
    let mut sum_ranks = 0.0;
    for (page, rank) in page_ranks {
        match graph.node_by_id(page).and_then(|node| node.file.as_ref()) {
            Some(path) => {
                rank_by_path.insert(path, *rank);
                sum_ranks += rank;
            }
            None => {
                tracing::debug!(page = %page, "dropping rank for unresolved page reference");
            }
        }
    }

    let sum_scores: f64 = term_scores.iter().map(|(_, score)| score).sum();
    let score_weight = 0.5 * sum_scores;
    let rank_weight = 0.5 * sum_ranks;

    let mut combined: Vec<(PathBuf, f64)> = term_scores
        .iter()
        .filter_map(|(path, score)| {
            rank_by_path
                .get(path)
                .map(|rank| (path.clone(), score_weight * score + rank_weight * rank))
        })
        .collect();

    combined.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    combined.into_iter().map(|(path, _)| path).collect()
}
