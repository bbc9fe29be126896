use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Default term-splitting pattern: runs of word characters, unicode-aware.
pub const DEFAULT_TERM_PATTERN: &str = r"(?u)\w+";

/// Default page-reference pattern: wiki-style `[[PageName]]`, name in group 1.
pub const DEFAULT_PAGE_REF_PATTERN: &str = r"\[\[([^\[\]]+)\]\]";

/// Per-session search settings. Hosts typically deserialize this from their
/// own settings store; every field has a default so partial JSON is fine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// File extensions to skip during scanning, matched case-insensitively
    /// without the leading dot.
    pub ignore_extensions: Vec<String>,
    /// Directory names pruned during traversal, matched case-insensitively.
    pub ignore_dirs: Vec<String>,
    /// Text encodings tried in order when opening a file for scanning.
    pub encodings: Vec<String>,
    /// Treat a file containing a null byte as binary and skip it.
    pub skip_binary: bool,
    /// Files larger than this many bytes are not scanned.
    pub max_file_size: u64,
    pub follow_symlinks: bool,
    /// Maximum displayed line length; longer matching lines are truncated
    /// around the match location.
    pub max_line_len: usize,
    /// Cancel the search once this many line hits have been seen. 0 disables.
    pub excessive_hits_count: u64,
    pub show_warning_on_open_fail: bool,
    pub show_warning_size_skip: bool,
    pub show_warning_binary_skip: bool,
    pub term_pattern: String,
    pub page_ref_pattern: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            ignore_extensions: Vec::new(),
            ignore_dirs: Vec::new(),
            encodings: vec!["utf-8".to_string()],
            skip_binary: true,
            max_file_size: 20_000_000,
            follow_symlinks: false,
            max_line_len: 100,
            excessive_hits_count: 5000,
            show_warning_on_open_fail: false,
            show_warning_size_skip: false,
            show_warning_binary_skip: false,
            term_pattern: DEFAULT_TERM_PATTERN.to_string(),
            page_ref_pattern: DEFAULT_PAGE_REF_PATTERN.to_string(),
        }
    }
}

impl SearchConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid search configuration")
    }

    pub fn ignores_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.ignore_extensions.iter().any(|i| i.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }

    pub fn ignores_dir(&self, name: &str) -> bool {
        self.ignore_dirs.iter().any(|i| i.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.encodings, vec!["utf-8"]);
        assert!(cfg.skip_binary);
        assert_eq!(cfg.max_file_size, 20_000_000);
        assert_eq!(cfg.max_line_len, 100);
        assert_eq!(cfg.excessive_hits_count, 5000);
        assert!(!cfg.follow_symlinks);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let cfg = SearchConfig::from_json_str(r#"{"max_line_len": 40, "ignore_dirs": [".git"]}"#)
            .unwrap();
        assert_eq!(cfg.max_line_len, 40);
        assert!(cfg.ignores_dir(".GIT"));
        assert_eq!(cfg.max_file_size, 20_000_000);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let cfg = SearchConfig {
            ignore_extensions: vec!["png".into(), "EXE".into()],
            ..SearchConfig::default()
        };
        assert!(cfg.ignores_extension(&PathBuf::from("img.PNG")));
        assert!(cfg.ignores_extension(&PathBuf::from("tool.exe")));
        assert!(!cfg.ignores_extension(&PathBuf::from("notes.txt")));
        assert!(!cfg.ignores_extension(&PathBuf::from("Makefile")));
    }
}
