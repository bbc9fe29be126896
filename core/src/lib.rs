pub mod config;
pub mod graph;
pub mod pagerank;
pub mod rank;
pub mod tfidf;
pub mod tokenizer;

pub use config::SearchConfig;
pub use graph::{Graph, GraphNode};
pub use pagerank::PageRank;
pub use tfidf::TfIdfTable;
pub use tokenizer::Tokenizer;
