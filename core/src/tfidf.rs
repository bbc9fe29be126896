use std::collections::HashMap;
use std::path::PathBuf;

/// One indexed file: its path and normalized term frequencies (raw count
/// divided by the document's total token count).
#[derive(Debug, Clone)]
pub struct Document {
    path: PathBuf,
    term_normals: HashMap<String, f64>,
}

impl Document {
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn term_normal(&self, term: &str) -> Option<f64> {
        self.term_normals.get(term).copied()
    }
}

/// Term-frequency corpus index. Documents are appended once during the
/// indexing pass and never mutated; `overall_term_counts` accumulates raw
/// (non-normalized) counts across every document seen.
///
/// The scoring formula is deliberately asymmetric: a shared term contributes
/// `(query_normal + doc_normal) / overall_count`, rewarding terms that are
/// frequent in the query or document but rare across the corpus. The
/// combined ranking depends on this exact scale, so it is not a cosine
/// TF-IDF and must not be replaced with one.
#[derive(Debug, Default)]
pub struct TfIdfTable {
    documents: Vec<Document>,
    overall_term_counts: HashMap<String, f64>,
}

impl TfIdfTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn overall_term_count(&self, term: &str) -> f64 {
        self.overall_term_counts.get(term).copied().unwrap_or(0.0)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.iter()
    }

    /// Appends one document. `terms` are the already lower-cased tokens in
    /// document order. An empty token list yields a document with no term
    /// mass; it can never match a query.
    pub fn append_document(&mut self, path: impl Into<PathBuf>, terms: &[String]) {
        let mut counts: HashMap<&str, f64> = HashMap::new();
        for term in terms {
            *counts.entry(term.as_str()).or_insert(0.0) += 1.0;
        }

        let length = terms.len() as f64;
        let mut term_normals = HashMap::with_capacity(counts.len());
        for (term, count) in &counts {
            term_normals.insert((*term).to_string(), *count / length);
        }

        for (term, count) in counts {
            *self.overall_term_counts.entry(term.to_string()).or_insert(0.0) += count;
        }

        self.documents.push(Document { path: path.into(), term_normals });
    }

    /// Scores every indexed document against `query` (whitespace-split,
    /// lower-cased). Documents sharing no term with the query are omitted.
    /// Results come back in index order; ordering is the rank combiner's job.
    pub fn search(&self, query: &str) -> Vec<(PathBuf, f64)> {
        let terms: Vec<String> = query.split_whitespace().map(|t| t.to_lowercase()).collect();
        if terms.is_empty() {
            return Vec::new();
        }

        let mut query_counts: HashMap<&str, f64> = HashMap::new();
        for term in &terms {
            *query_counts.entry(term.as_str()).or_insert(0.0) += 1.0;
        }
        let length = terms.len() as f64;
        let query_normals: HashMap<&str, f64> =
            query_counts.into_iter().map(|(t, c)| (t, c / length)).collect();

        let mut scores = Vec::new();
        for doc in &self.documents {
            let mut score = 0.0;
            for (term, query_normal) in &query_normals {
                if let Some(doc_normal) = doc.term_normals.get(*term) {
                    // Shared term implies a non-zero overall count.
                    let overall = self.overall_term_counts[*term];
                    score += (query_normal + doc_normal) / overall;
                }
            }
            if score > 0.0 {
                scores.push((doc.path.clone(), score));
            }
        }
        scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(text: &str) -> Vec<String> {
        text.split_whitespace().map(|t| t.to_lowercase()).collect()
    }

    #[test]
    fn documents_with_no_shared_terms_are_omitted() {
        let mut table = TfIdfTable::new();
        table.append_document("a.txt", &terms("cat dog"));
        let hits = table.search("bird");
        assert!(hits.is_empty());
    }

    #[test]
    fn scores_cat_dog_scenario() {
        let mut table = TfIdfTable::new();
        table.append_document("a.txt", &terms("cat dog"));
        table.append_document("b.txt", &terms("dog dog"));
        let hits = table.search("dog");
        assert_eq!(hits.len(), 2);

        // overall("dog") = 3. a.txt: (1.0 + 0.5) / 3 = 0.5; b.txt: (1.0 + 1.0) / 3.
        let a = hits.iter().find(|(p, _)| p.ends_with("a.txt")).unwrap().1;
        let b = hits.iter().find(|(p, _)| p.ends_with("b.txt")).unwrap().1;
        assert!((a - 0.5).abs() < 1e-12);
        assert!((b - 2.0 / 3.0).abs() < 1e-12);
        assert!(b > a);
    }

    #[test]
    fn overall_counts_are_order_independent() {
        let docs = [("a", "x y y"), ("b", "y z"), ("c", "z z z x")];

        let mut forward = TfIdfTable::new();
        for (name, text) in docs {
            forward.append_document(name, &terms(text));
        }
        let mut reverse = TfIdfTable::new();
        for (name, text) in docs.iter().rev() {
            reverse.append_document(*name, &terms(text));
        }

        for term in ["x", "y", "z"] {
            assert_eq!(forward.overall_term_count(term), reverse.overall_term_count(term));
        }
        assert_eq!(forward.overall_term_count("x"), 2.0);
        assert_eq!(forward.overall_term_count("y"), 3.0);
        assert_eq!(forward.overall_term_count("z"), 4.0);
    }

    #[test]
    fn empty_document_contributes_nothing() {
        let mut table = TfIdfTable::new();
        table.append_document("empty.txt", &[]);
        table.append_document("full.txt", &terms("alpha"));
        assert_eq!(table.len(), 2);
        let hits = table.search("alpha");
        assert_eq!(hits.len(), 1);
        assert!(hits[0].0.ends_with("full.txt"));
    }

    #[test]
    fn empty_query_matches_nothing() {
        let mut table = TfIdfTable::new();
        table.append_document("a.txt", &terms("cat"));
        assert!(table.search("   ").is_empty());
    }

    #[test]
    fn results_preserve_index_order() {
        let mut table = TfIdfTable::new();
        table.append_document("first", &terms("shared unique1"));
        table.append_document("second", &terms("shared shared shared"));
        table.append_document("third", &terms("shared"));
        let hits = table.search("shared");
        let order: Vec<_> = hits.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(order, vec![PathBuf::from("first"), "second".into(), "third".into()]);
    }
}
