use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Duration;

struct QueueState<T> {
    items: VecDeque<T>,
    /// Messages put but not yet acknowledged via `task_done`.
    unfinished: usize,
}

/// Bounded blocking queue with per-message acknowledgment.
///
/// `put` blocks while the queue is at capacity (backpressure), `get` blocks
/// while it is empty, and `join` blocks until every put message has been
/// acknowledged with `task_done`. The producer calls `join` before its
/// thread ends, so a consumer never observes a finished worker while
/// messages are still in flight.
pub struct ResultQueue<T> {
    capacity: usize,
    state: Mutex<QueueState<T>>,
    not_full: Condvar,
    not_empty: Condvar,
    all_done: Condvar,
}

impl<T> ResultQueue<T> {
    pub fn bounded(capacity: usize) -> Self {
        assert!(capacity > 0, "queue capacity must be at least 1");
        Self {
            capacity,
            state: Mutex::new(QueueState { items: VecDeque::new(), unfinished: 0 }),
            not_full: Condvar::new(),
            not_empty: Condvar::new(),
            all_done: Condvar::new(),
        }
    }

    /// Blocking insert; stalls while the queue is at capacity.
    pub fn put(&self, item: T) {
        let mut state = self.state.lock();
        while state.items.len() >= self.capacity {
            self.not_full.wait(&mut state);
        }
        state.items.push_back(item);
        state.unfinished += 1;
        self.not_empty.notify_one();
    }

    /// Blocking removal.
    pub fn get(&self) -> T {
        let mut state = self.state.lock();
        while state.items.is_empty() {
            self.not_empty.wait(&mut state);
        }
        let item = state.items.pop_front().expect("queue is non-empty");
        self.not_full.notify_one();
        item
    }

    /// Non-blocking removal.
    pub fn try_get(&self) -> Option<T> {
        let mut state = self.state.lock();
        let item = state.items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    /// Removal with a wait bound, for consumer poll loops.
    pub fn get_timeout(&self, timeout: Duration) -> Option<T> {
        let mut state = self.state.lock();
        if state.items.is_empty() {
            self.not_empty.wait_for(&mut state, timeout);
        }
        let item = state.items.pop_front();
        if item.is_some() {
            self.not_full.notify_one();
        }
        item
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Acknowledges one previously gotten message.
    pub fn task_done(&self) {
        let mut state = self.state.lock();
        debug_assert!(state.unfinished > 0, "task_done without matching put");
        state.unfinished = state.unfinished.saturating_sub(1);
        if state.unfinished == 0 {
            self.all_done.notify_all();
        }
    }

    /// Blocks until every put message has been acknowledged.
    pub fn join(&self) {
        let mut state = self.state.lock();
        while state.unfinished > 0 {
            self.all_done.wait(&mut state);
        }
    }
}
