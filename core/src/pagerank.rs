use std::cmp::Ordering;

use crate::graph::Graph;

pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_EPSILON: f64 = 1e-5;

/// Iterative authority ranker over a snapshot of the link graph.
///
/// The constructor deep-copies the graph and rewrites sink nodes (zero
/// out-degree) to link to every node, so rank mass cannot leak at dangling
/// pages and the indexing-time graph is never mutated.
#[derive(Debug)]
pub struct PageRank {
    graph: Graph,
}

impl PageRank {
    pub fn new(graph: &Graph) -> Self {
        let mut graph = graph.clone();
        let n = graph.len();
        let sinks: Vec<usize> =
            graph.nodes().filter(|node| node.out_count == 0).map(|node| node.index).collect();
        for sink in sinks {
            graph.node_mut(sink).out_count = n;
            for target in 0..n {
                graph.node_mut(target).in_links.insert(sink);
            }
        }
        Self { graph }
    }

    /// Power iteration with the default damping factor and epsilon.
    pub fn calculate(&self) -> (Vec<(String, f64)>, usize) {
        self.calculate_with(DEFAULT_DAMPING, DEFAULT_EPSILON)
    }

    /// Runs synchronous (Jacobi) power iteration until the L1 distance
    /// between successive rank vectors drops to `epsilon` or below. Returns
    /// `(page, rank)` pairs sorted descending plus the iteration count.
    ///
    /// The graph must be non-empty; ranking is never invoked otherwise.
    pub fn calculate_with(&self, damping: f64, epsilon: f64) -> (Vec<(String, f64)>, usize) {
        let n = self.graph.len();
        debug_assert!(n > 0, "ranking requires at least one node");
        let base = (1.0 - damping) / n as f64;

        let mut ranks = vec![1.0 / n as f64; n];
        let mut next_ranks = vec![0.0; n];
        let mut iterations = 0;

        loop {
            for node in self.graph.nodes() {
                let inbound: f64 = node
                    .in_links
                    .iter()
                    .map(|&j| ranks[j] / self.graph.node(j).out_count as f64)
                    .sum();
                next_ranks[node.index] = base + damping * inbound;
            }

            let delta: f64 =
                next_ranks.iter().zip(&ranks).map(|(next, cur)| (next - cur).abs()).sum();

            std::mem::swap(&mut ranks, &mut next_ranks);
            iterations += 1;

            if delta <= epsilon {
                break;
            }
        }

        let mut page_ranks: Vec<(String, f64)> = ranks
            .iter()
            .enumerate()
            .map(|(idx, &rank)| (self.graph.node(idx).id.clone(), rank))
            .collect();
        page_ranks.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

        tracing::debug!(nodes = n, iterations, "page rank converged");
        (page_ranks, iterations)
    }

    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> &Graph {
        &self.graph
    }
}
