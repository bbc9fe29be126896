use anyhow::Result;
use docsearch_core::{Graph, SearchConfig, TfIdfTable, Tokenizer};
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};

use crate::scanner;
use crate::walker;

/// Corpus index and link graph built together in one pass over the roots.
pub struct ProjectIndex {
    pub table: TfIdfTable,
    pub graph: Graph,
}

/// Walks every root and builds the term-frequency table and the link graph
/// in a single pass. Files that cannot be read or decoded are skipped with
/// a diagnostic; only an unusable root fails the pass.
pub fn index_tree(roots: &[PathBuf], config: &SearchConfig) -> Result<ProjectIndex> {
    let tokenizer = Tokenizer::from_config(config)?;
    let files = walker::list_files(roots, config)?;

    let mut table = TfIdfTable::new();
    let mut graph = Graph::new();
    for path in files {
        index_file(&path, config, &tokenizer, &mut table, &mut graph);
    }

    tracing::info!(documents = table.len(), pages = graph.len(), "indexed project");
    Ok(ProjectIndex { table, graph })
}

fn index_file(
    path: &Path,
    config: &SearchConfig,
    tokenizer: &Tokenizer,
    table: &mut TfIdfTable,
    graph: &mut Graph,
) {
    // No size guard here: oversized files still index and rank, and the
    // scan engine applies `max_file_size` when their turn comes.
    let text = match scanner::read_to_text(path, &config.encodings) {
        Some(text) => text,
        None => {
            tracing::debug!(path = %path.display(), "unable to decode file, not indexed");
            return;
        }
    };

    table.append_document(path, &tokenizer.terms(&text));

    let page = page_name(path);
    graph.add_node_with_refs(&page, tokenizer.page_refs(&text));
    graph.bind_file(&page, path);
}

/// Page name for the link graph: the file's base name without extension.
fn page_name(path: &Path) -> String {
    path.file_stem().unwrap_or_else(|| path.as_os_str()).to_string_lossy().into_owned()
}

/// Runs the indexing pass on a background worker. The caller joins the
/// handle to rendezvous with indexing completion and take ownership of the
/// built index.
pub fn spawn(roots: Vec<PathBuf>, config: SearchConfig) -> JoinHandle<Result<ProjectIndex>> {
    thread::spawn(move || index_tree(&roots, &config))
}
