//! The bounded history stack.

use std::collections::VecDeque;

/// Maximum number of entries retained; the oldest is evicted first.
pub(crate) const CAPACITY: usize = 100;

const ROOT: &str = "/";

/// A bounded log of previously visited URLs, used by programmatic
/// back-navigation.
#[derive(Debug, Default)]
pub(crate) struct HistoryStack {
    entries: VecDeque<String>,
}

impl HistoryStack {
    /// Appends a URL. Adjacent duplicates are skipped; the oldest entry is
    /// evicted once the stack exceeds its capacity.
    pub(crate) fn push(&mut self, url: &str) {
        if self.entries.back().map(String::as_str) == Some(url) {
            return;
        }
        self.entries.push_back(url.to_string());
        if self.entries.len() > CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Removes and returns the most recent entry, or the root fallback if
    /// the stack is empty.
    pub(crate) fn pop(&mut self) -> String {
        self.entries.pop_back().unwrap_or_else(|| ROOT.to_string())
    }

    pub(crate) fn snapshot(&self) -> Vec<String> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{HistoryStack, CAPACITY};

    #[test]
    fn adjacent_duplicates_are_skipped() {
        let mut stack = HistoryStack::default();
        stack.push("/a");
        stack.push("/a");
        stack.push("/b");
        stack.push("/a");
        assert_eq!(stack.snapshot(), ["/a", "/b", "/a"]);
    }

    #[test]
    fn oldest_entry_is_evicted_first() {
        let mut stack = HistoryStack::default();
        for i in 0..CAPACITY + 25 {
            stack.push(&format!("/page/{i}"));
        }
        let snapshot = stack.snapshot();
        assert_eq!(snapshot.len(), CAPACITY);
        assert_eq!(snapshot[0], "/page/25");
        assert_eq!(snapshot[CAPACITY - 1], format!("/page/{}", CAPACITY + 24));
    }

    #[test]
    fn pop_falls_back_to_the_root() {
        let mut stack = HistoryStack::default();
        assert_eq!(stack.pop(), "/");
        stack.push("/a");
        assert_eq!(stack.pop(), "/a");
        assert_eq!(stack.pop(), "/");
    }
}
