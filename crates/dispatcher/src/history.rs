//! Bounded FIFO entry history

use std::collections::VecDeque;
use std::sync::Arc;

use contracts::LogEntry;

/// Bounded in-memory ring of recent entries
///
/// Drop-oldest on overflow; length never exceeds capacity. Capacity 0
/// keeps the history empty.
#[derive(Debug)]
pub struct History {
    entries: VecDeque<Arc<LogEntry>>,
    capacity: usize,
}

impl History {
    /// Create a history ring with the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest when full
    ///
    /// At most one eviction per push since the length grows by one at a
    /// time.
    pub fn push(&mut self, entry: Arc<LogEntry>) {
        if self.capacity == 0 {
            return;
        }
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Cloned snapshot, oldest-first
    ///
    /// Callers get owned entries; internal state cannot be reached
    /// through the returned sequence.
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.iter().map(|e| (**e).clone()).collect()
    }

    /// Shared references to the current entries, oldest-first
    pub(crate) fn entries(&self) -> Vec<Arc<LogEntry>> {
        self.entries.iter().cloned().collect()
    }

    /// Current length
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::{Level, Metadata};

    fn entry(n: usize) -> Arc<LogEntry> {
        Arc::new(LogEntry {
            id: format!("h-{}", n),
            level: Level::Info,
            message: format!("entry {}", n),
            metadata: Metadata::new(),
            timestamp: n as i64,
        })
    }

    #[test]
    fn test_insertion_order() {
        let mut history = History::new(10);
        for n in 0..3 {
            history.push(entry(n));
        }
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].id, "h-0");
        assert_eq!(snapshot[2].id, "h-2");
    }

    #[test]
    fn test_drop_oldest() {
        let mut history = History::new(3);
        for n in 0..7 {
            history.push(entry(n));
        }
        let snapshot = history.snapshot();
        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot[0].id, "h-4");
        assert_eq!(snapshot[2].id, "h-6");
    }

    #[test]
    fn test_zero_capacity() {
        let mut history = History::new(0);
        history.push(entry(0));
        assert!(history.is_empty());
        assert!(history.snapshot().is_empty());
    }
}
