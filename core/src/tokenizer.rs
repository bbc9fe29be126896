use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;

use crate::config::SearchConfig;

lazy_static! {
    static ref TERM_RE: Regex = Regex::new(crate::config::DEFAULT_TERM_PATTERN).expect("valid regex");
    static ref PAGE_REF_RE: Regex =
        Regex::new(crate::config::DEFAULT_PAGE_REF_PATTERN).expect("valid regex");
}

/// Splits text into lower-cased index terms and extracts page references
/// (`[[PageName]]` by default). Both patterns are overridable per session.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    term_re: Regex,
    page_ref_re: Regex,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self { term_re: TERM_RE.clone(), page_ref_re: PAGE_REF_RE.clone() }
    }
}

impl Tokenizer {
    pub fn from_patterns(term_pattern: &str, page_ref_pattern: &str) -> Result<Self> {
        let term_re = Regex::new(term_pattern)
            .with_context(|| format!("invalid term pattern: {term_pattern}"))?;
        let page_ref_re = Regex::new(page_ref_pattern)
            .with_context(|| format!("invalid page reference pattern: {page_ref_pattern}"))?;
        Ok(Self { term_re, page_ref_re })
    }

    pub fn from_config(config: &SearchConfig) -> Result<Self> {
        Self::from_patterns(&config.term_pattern, &config.page_ref_pattern)
    }

    /// Lower-cased terms in document order. Runs of non-word characters
    /// separate terms; empty tokens never appear.
    pub fn terms(&self, text: &str) -> Vec<String> {
        self.term_re.find_iter(text).map(|m| m.as_str().to_lowercase()).collect()
    }

    /// Page names referenced from `text`, in order of appearance. The
    /// reference pattern must expose the name as capture group 1.
    pub fn page_refs(&self, text: &str) -> Vec<String> {
        self.page_ref_re
            .captures_iter(text)
            .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}
