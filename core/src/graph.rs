use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// A named page in the link graph. Indices are dense, assigned at first
/// insertion, and stable for the graph's lifetime.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub index: usize,
    pub id: String,
    /// Path of the source file this page was scanned from. `None` for pages
    /// that were only ever referenced (forward references).
    pub file: Option<PathBuf>,
    /// Indices of nodes linking to this one, deduplicated.
    pub in_links: HashSet<usize>,
    /// Number of distinct outbound links from this node.
    pub out_count: usize,
}

impl GraphNode {
    fn new(index: usize, id: String) -> Self {
        Self { index, id, file: None, in_links: HashSet::new(), out_count: 0 }
    }
}

/// Directed link graph built during the indexing pass. Construction never
/// fails: self links and repeated links degrade to no-ops, and links to
/// unseen pages create placeholder nodes.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    node_map: HashMap<String, usize>,
    nodes: Vec<GraphNode>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, index: usize) -> &GraphNode {
        &self.nodes[index]
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut GraphNode {
        &mut self.nodes[index]
    }

    pub fn node_by_id(&self, id: &str) -> Option<&GraphNode> {
        self.node_map.get(id).map(|&idx| &self.nodes[idx])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Returns the node's index, creating the node with the next dense index
    /// if it does not exist yet.
    pub fn add_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.node_map.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.node_map.insert(id.to_string(), idx);
        self.nodes.push(GraphNode::new(idx, id.to_string()));
        idx
    }

    /// Binds a node to the file it was scanned from, creating it if needed.
    /// Two files sharing a base name map to the same page; the last one
    /// scanned wins the binding, and the replacement is logged so the loser
    /// is diagnosable.
    pub fn bind_file(&mut self, id: &str, path: impl Into<PathBuf>) -> usize {
        let idx = self.add_node(id);
        let path = path.into();
        if let Some(previous) = &self.nodes[idx].file {
            if *previous != path {
                tracing::debug!(
                    page = %id,
                    previous = %previous.display(),
                    replacement = %path.display(),
                    "rebinding page to a different file"
                );
            }
        }
        self.nodes[idx].file = Some(path);
        idx
    }

    /// Adds a directed link. Self references are ignored; a repeated link
    /// between the same ordered pair is collapsed to one. The target may be
    /// a page that has not been seen yet.
    pub fn add_link(&mut self, source_id: &str, target_id: &str) {
        if source_id == target_id {
            return;
        }
        let source_idx = self.add_node(source_id);
        let target_idx = self.add_node(target_id);
        if self.nodes[target_idx].in_links.insert(source_idx) {
            self.nodes[source_idx].out_count += 1;
        }
    }

    /// Batch insertion of `(source, target)` pairs, creating both endpoints.
    pub fn add_links<'a>(&mut self, links: impl IntoIterator<Item = (&'a str, &'a str)>) {
        for (source, target) in links {
            self.add_node(source);
            self.add_node(target);
            self.add_link(source, target);
        }
    }

    /// Creates (or fetches) a node and adds one outbound link per reference.
    pub fn add_node_with_refs<I, S>(&mut self, id: &str, refs: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let idx = self.add_node(id);
        for page_ref in refs {
            self.add_link(id, page_ref.as_ref());
        }
        idx
    }
}
