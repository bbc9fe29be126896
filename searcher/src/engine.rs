use docsearch_core::SearchConfig;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::queue::ResultQueue;
use crate::scanner::{FileScanner, LineMatches, PLACEHOLDER_LINE};

/// Minimum interval between bare progress messages.
pub const PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

/// One message on the result channel.
#[derive(Debug, Clone, Serialize)]
pub enum ScanMessage {
    /// Matches (or a warning placeholder) for one file.
    FileResult { path: PathBuf, matches: LineMatches, files_searched: u64 },
    /// Liveness update while files without matches are being scanned.
    Progress { files_searched: u64 },
}

impl ScanMessage {
    pub fn files_searched(&self) -> u64 {
        match self {
            ScanMessage::FileResult { files_searched, .. } => *files_searched,
            ScanMessage::Progress { files_searched } => *files_searched,
        }
    }
}

/// Background worker that scans the ranked candidate list and streams
/// results through the bounded queue. Cancellation is observed between
/// files; after the candidate list is exhausted or cancellation is seen,
/// the worker sends a final progress message and blocks until the consumer
/// has acknowledged every message before its thread ends.
pub struct ScanWorker {
    handle: JoinHandle<()>,
    cancel: Arc<AtomicBool>,
}

impl ScanWorker {
    pub fn spawn(
        candidates: Vec<PathBuf>,
        query: &str,
        config: &SearchConfig,
        queue: Arc<ResultQueue<ScanMessage>>,
    ) -> Self {
        let cancel = Arc::new(AtomicBool::new(false));
        let scanner = FileScanner::new(query, config);
        let config = config.clone();
        let flag = Arc::clone(&cancel);
        let handle = thread::spawn(move || run_scan(candidates, scanner, config, queue, flag));
        Self { handle, cancel }
    }

    /// Shared flag the consumer sets to stop the scan; the worker checks it
    /// before each file, so at most one in-flight file is still scanned.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Relaxed)
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn join(self) {
        self.handle.join().expect("scan worker panicked");
    }
}

fn run_scan(
    candidates: Vec<PathBuf>,
    scanner: FileScanner,
    config: SearchConfig,
    queue: Arc<ResultQueue<ScanMessage>>,
    cancel: Arc<AtomicBool>,
) {
    let mut files_searched: u64 = 0;
    let mut last_update: Option<Instant> = None;

    for path in candidates {
        if cancel.load(Ordering::Relaxed) {
            break;
        }

        if config.ignores_extension(&path) {
            continue;
        }

        let size = fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        let result = if size > config.max_file_size {
            // Does not count as a searched file.
            let mut matches = LineMatches::new();
            if config.show_warning_size_skip {
                matches.insert(
                    PLACEHOLDER_LINE,
                    format!("Skipped file due to size ({:.2} MB).", size as f64 / 1_000_000.0),
                );
            }
            matches
        } else {
            let matches = scanner.scan_file(&path);
            files_searched += 1;
            matches
        };

        if !result.is_empty() {
            queue.put(ScanMessage::FileResult { path, matches: result, files_searched });
            last_update = Some(Instant::now());
        } else if last_update.map_or(true, |at| at.elapsed() >= PROGRESS_INTERVAL) {
            queue.put(ScanMessage::Progress { files_searched });
            last_update = Some(Instant::now());
        }
    }

    // Final count, then the drain handshake: do not let this thread end
    // while messages are unacknowledged.
    queue.put(ScanMessage::Progress { files_searched });
    queue.join();
}
