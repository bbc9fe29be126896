pub mod engine;
pub mod indexer;
pub mod queue;
pub mod scanner;
pub mod session;
pub mod walker;

pub use engine::{ScanMessage, ScanWorker};
pub use indexer::ProjectIndex;
pub use queue::ResultQueue;
pub use scanner::{FileScanner, LineMatches, PLACEHOLDER_LINE};
pub use session::{SearchSession, SearchStatus, SearchSummary};

use anyhow::Result;
use docsearch_core::{rank, PageRank, SearchConfig};
use std::path::PathBuf;

/// Ranked search: index the roots (corpus + link graph) on a background
/// worker, wait for it, combine term scores with authority ranks, then scan
/// the combined candidate list in order.
pub fn search_ranked(
    roots: Vec<PathBuf>,
    query: &str,
    config: &SearchConfig,
) -> Result<SearchSession> {
    let handle = indexer::spawn(roots, config.clone());
    // Rendezvous: scanning starts only after indexing completes, and the
    // index ownership moves to this thread.
    let index = handle.join().expect("indexing worker panicked")?;

    let term_scores = index.table.search(query);
    let candidates = if index.graph.is_empty() {
        Vec::new()
    } else {
        let (page_ranks, iterations) = PageRank::new(&index.graph).calculate();
        tracing::debug!(
            candidates = term_scores.len(),
            pages = page_ranks.len(),
            iterations,
            "combining term scores with page ranks"
        );
        rank::combine(&term_scores, &page_ranks, &index.graph)
    };

    Ok(SearchSession::start(candidates, query, config))
}

/// Literal search: scan every file under the roots in traversal order, with
/// no ranking pass.
pub fn search_all(roots: &[PathBuf], query: &str, config: &SearchConfig) -> Result<SearchSession> {
    let candidates = walker::list_files(roots, config)?;
    Ok(SearchSession::start(candidates, query, config))
}
