use docsearch_core::SearchConfig;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::engine::{ScanMessage, ScanWorker};
use crate::queue::ResultQueue;
use crate::scanner::PLACEHOLDER_LINE;

/// Result channel capacity; the scan worker stalls once this many messages
/// are waiting, bounding memory when the consumer is slow.
pub const QUEUE_CAPACITY: usize = 128;

const DRAIN_POLL: Duration = Duration::from_millis(50);

/// How a search session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SearchStatus {
    Completed,
    Cancelled,
}

/// Final counters for the consumer's status line.
#[derive(Debug, Clone, Serialize)]
pub struct SearchSummary {
    pub status: SearchStatus,
    /// Matching lines seen, excluding warning placeholders.
    pub hits: u64,
    /// Files with at least one matching line.
    pub file_hits: u64,
    pub files_searched: u64,
    pub elapsed_secs: f64,
}

/// One search invocation: the scan worker, its result channel, and the
/// session counters. All fields are owned by the session; the only thing a
/// consumer on another thread may touch is the cancellation flag obtained
/// from [`SearchSession::cancel_handle`].
pub struct SearchSession {
    queue: Arc<ResultQueue<ScanMessage>>,
    worker: ScanWorker,
    excessive_hits_count: u64,
    hits: u64,
    file_hits: u64,
    files_searched: u64,
    started: Instant,
}

impl SearchSession {
    /// Spawns the scan worker over an already-ranked candidate list.
    pub fn start(candidates: Vec<PathBuf>, query: &str, config: &SearchConfig) -> Self {
        let queue = Arc::new(ResultQueue::bounded(QUEUE_CAPACITY));
        let worker = ScanWorker::spawn(candidates, query, config, Arc::clone(&queue));
        Self {
            queue,
            worker,
            excessive_hits_count: config.excessive_hits_count,
            hits: 0,
            file_hits: 0,
            files_searched: 0,
            started: Instant::now(),
        }
    }

    /// Flag a consumer-side thread (a UI, typically) may set to stop the
    /// search. This is the only session state the consumer may mutate.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.worker.cancel_handle()
    }

    pub fn cancel(&self) {
        self.worker.cancel();
    }

    /// Consumes the message stream until the worker reaches its drained
    /// terminal state, invoking `on_result` for every per-file result
    /// (including warning placeholders). Applies the excessive-hits cutoff
    /// and keeps draining after cancellation so the worker's final join
    /// handshake always completes.
    pub fn drain<F>(mut self, mut on_result: F) -> SearchSummary
    where
        F: FnMut(&PathBuf, &crate::scanner::LineMatches, u64),
    {
        while !self.worker.is_finished() || !self.queue.is_empty() {
            let Some(message) = self.queue.get_timeout(DRAIN_POLL) else {
                continue;
            };

            self.files_searched = message.files_searched();
            if let ScanMessage::FileResult { path, matches, files_searched } = &message {
                // Placeholder warnings never count toward the hit totals.
                if !matches.is_empty() && !matches.contains_key(&PLACEHOLDER_LINE) {
                    self.hits += matches.len() as u64;
                    self.file_hits += 1;
                }
                on_result(path, matches, *files_searched);
            }
            self.queue.task_done();

            if self.excessive_hits_count != 0 && self.hits > self.excessive_hits_count {
                tracing::info!(hits = self.hits, "excessive hits, cancelling search");
                self.worker.cancel();
            }
        }

        let cancelled = self.worker.is_cancelled();
        self.worker.join();
        SearchSummary {
            status: if cancelled { SearchStatus::Cancelled } else { SearchStatus::Completed },
            hits: self.hits,
            file_hits: self.file_hits,
            files_searched: self.files_searched,
            elapsed_secs: self.started.elapsed().as_secs_f64(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn drain_counts_hits_and_completes() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.txt", "hit one\nhit two\n");
        let b = write(dir.path(), "b.txt", "nothing here\n");

        let session = SearchSession::start(vec![a, b], "hit", &SearchConfig::default());
        let mut results = 0;
        let summary = session.drain(|_, _, _| results += 1);

        assert_eq!(summary.status, SearchStatus::Completed);
        assert_eq!(summary.hits, 2);
        assert_eq!(summary.file_hits, 1);
        assert_eq!(summary.files_searched, 2);
        assert_eq!(results, 1);
    }

    #[test]
    fn excessive_hits_cancel_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let mut candidates = Vec::new();
        for i in 0..30 {
            candidates.push(write(dir.path(), &format!("f{i}.txt"), "hit\nhit\nhit\n"));
        }

        let config = SearchConfig { excessive_hits_count: 5, ..SearchConfig::default() };
        let session = SearchSession::start(candidates, "hit", &config);
        let summary = session.drain(|_, _, _| {});

        assert_eq!(summary.status, SearchStatus::Cancelled);
        assert!(summary.hits > 5);
    }

    #[test]
    fn placeholder_results_do_not_count_as_hits() {
        let dir = tempfile::tempdir().unwrap();
        let big = write(dir.path(), "big.txt", &"hit\n".repeat(50));

        let config = SearchConfig {
            max_file_size: 8,
            show_warning_size_skip: true,
            ..SearchConfig::default()
        };
        let session = SearchSession::start(vec![big], "hit", &config);
        let mut placeholder_seen = false;
        let summary = session.drain(|_, matches, _| {
            placeholder_seen = matches.contains_key(&PLACEHOLDER_LINE);
        });

        assert!(placeholder_seen);
        assert_eq!(summary.hits, 0);
        assert_eq!(summary.file_hits, 0);
        assert_eq!(summary.files_searched, 0);
        assert_eq!(summary.status, SearchStatus::Completed);
    }

    #[test]
    fn external_cancel_handle_stops_the_search() {
        let dir = tempfile::tempdir().unwrap();
        let mut candidates = Vec::new();
        for i in 0..100 {
            candidates.push(write(dir.path(), &format!("f{i}.txt"), "hit\n"));
        }

        let session = SearchSession::start(candidates, "hit", &SearchConfig::default());
        session.cancel_handle().store(true, std::sync::atomic::Ordering::Relaxed);
        let summary = session.drain(|_, _, _| {});
        assert_eq!(summary.status, SearchStatus::Cancelled);
    }
}
