use docsearch_core::SearchConfig;
use encoding_rs::Encoding;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Line number reserved for warning placeholders (size skip, binary skip,
/// open failure). Real matches always start at line 1.
pub const PLACEHOLDER_LINE: u64 = 0;

/// Matches in one file, ordered by line number.
pub type LineMatches = BTreeMap<u64, String>;

/// Marker inserted where truncation removed line content.
pub const ELLIPSIS: &str = "[…]";

/// Reads a file and decodes it with the first encoding in `labels` that
/// produces a clean decode. `None` if the file cannot be read or no
/// configured encoding fits. Unknown labels are skipped.
pub fn read_to_text(path: &Path, labels: &[String]) -> Option<String> {
    let bytes = fs::read(path).ok()?;
    decode(&bytes, labels)
}

fn decode(bytes: &[u8], labels: &[String]) -> Option<String> {
    for label in labels {
        let encoding = match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding,
            None => {
                tracing::warn!(label, "unknown encoding label");
                continue;
            }
        };
        if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
            return Some(text.into_owned());
        }
    }
    None
}

/// Scans single files for a query: prioritized encodings, binary detection
/// via embedded null bytes, case-insensitive any-term matching, and
/// truncation of over-long matching lines. One scanner is built per search
/// and shared by the scan worker across candidate files.
#[derive(Debug, Clone)]
pub struct FileScanner {
    terms: Vec<String>,
    encodings: Vec<String>,
    skip_binary: bool,
    max_line_len: usize,
    show_warning_on_open_fail: bool,
    show_warning_binary_skip: bool,
}

impl FileScanner {
    pub fn new(query: &str, config: &SearchConfig) -> Self {
        Self {
            terms: query.split_whitespace().map(|t| t.to_lowercase()).collect(),
            encodings: config.encodings.clone(),
            skip_binary: config.skip_binary,
            max_line_len: config.max_line_len,
            show_warning_on_open_fail: config.show_warning_on_open_fail,
            show_warning_binary_skip: config.show_warning_binary_skip,
        }
    }

    /// Scans one file. Decode and I/O failures surface only as optional
    /// placeholder entries, never as errors.
    pub fn scan_file(&self, path: &Path) -> LineMatches {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "unable to read file");
                return self.open_fail_placeholder();
            }
        };
        match decode(&bytes, &self.encodings) {
            Some(text) => self.scan_text(&text),
            None => {
                tracing::debug!(path = %path.display(), "no configured encoding decodes file");
                self.open_fail_placeholder()
            }
        }
    }

    fn open_fail_placeholder(&self) -> LineMatches {
        let mut ret = LineMatches::new();
        if self.show_warning_on_open_fail {
            ret.insert(
                PLACEHOLDER_LINE,
                "Failed to open file. This could be due to unknown/unspecified encoding."
                    .to_string(),
            );
        }
        ret
    }

    fn scan_text(&self, text: &str) -> LineMatches {
        let mut ret = LineMatches::new();
        for (idx, line) in text.lines().enumerate() {
            if self.skip_binary && line.contains('\0') {
                // Binary content voids any matches collected so far.
                ret.clear();
                if self.show_warning_binary_skip {
                    ret.insert(PLACEHOLDER_LINE, "Skipped binary file.".to_string());
                }
                return ret;
            }

            if let Some(loc) = self.line_match(line) {
                let shown = if line.chars().count() > self.max_line_len {
                    limit_line(line, loc, self.max_line_len)
                } else {
                    line.to_string()
                };
                ret.insert(idx as u64 + 1, shown);
            }
        }
        ret
    }

    /// Char position of the first term found in the line, case-insensitively.
    fn line_match(&self, line: &str) -> Option<usize> {
        let lower = line.to_lowercase();
        for term in &self.terms {
            if let Some(byte_pos) = lower.find(term.as_str()) {
                return Some(lower[..byte_pos].chars().count());
            }
        }
        None
    }
}

/// Truncates `line` to roughly `max_len` characters centered on the match
/// at char position `loc`, marking removed content on either side.
fn limit_line(line: &str, loc: usize, max_len: usize) -> String {
    let chars: Vec<char> = line.chars().collect();
    let half = max_len / 2;
    let loc = loc.min(chars.len());
    let start = loc.saturating_sub(half);
    let end = (loc + half).min(chars.len());

    let mut limited = String::new();
    if start != 0 {
        limited.push_str(ELLIPSIS);
    }
    limited.extend(&chars[start..end]);
    if end != chars.len() {
        limited.push_str(ELLIPSIS);
    }
    limited
}
