//! Command history recalled with Up/Down and F3 during a cooked read.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// History shared between the host and the reads it starts.
///
/// A read locks it only while handling a single history keystroke or
/// when recording its completed line.
pub type SharedHistory = Arc<Mutex<CommandHistory>>;

/// Previously completed lines, oldest first.
///
/// When the user starts browsing, the line being edited is saved as a
/// draft so it can be restored by browsing past the newest entry.
///
/// # Example
///
/// ```
/// use cookline_core::history::CommandHistory;
///
/// let mut history = CommandHistory::new(50);
/// history.push("dir");
/// history.push("cd src");
///
/// assert_eq!(history.older("typ"), Some("cd src"));
/// assert_eq!(history.older("typ"), Some("dir"));
/// assert_eq!(history.newer(), Some("cd src"));
/// assert_eq!(history.newer(), Some("typ"));
/// assert_eq!(history.newer(), None);
/// ```
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    /// `None` while not browsing, `Some(i)` while showing `entries[i]`.
    index: Option<usize>,
    draft: String,
    max_entries: usize,
}

impl CommandHistory {
    /// Create a history keeping at most `max_entries` lines.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            index: None,
            draft: String::new(),
            max_entries,
        }
    }

    /// Create a history wrapped for sharing with reads.
    pub fn shared(max_entries: usize) -> SharedHistory {
        Arc::new(Mutex::new(Self::new(max_entries)))
    }

    /// Record a completed line.
    ///
    /// Empty lines and repeats of the newest entry are skipped. Always ends
    /// browsing.
    pub fn push(&mut self, entry: impl Into<String>) {
        let entry = entry.into();
        self.reset_browse();
        if entry.is_empty() || self.entries.back() == Some(&entry) || self.max_entries == 0 {
            return;
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    /// Step to the next older entry.
    ///
    /// The first step saves `current` as the draft. Returns `None` when
    /// already at the oldest entry or when the history is empty.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.index {
            None => {
                self.draft = current.to_string();
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.index = Some(idx);
        self.entries.get(idx).map(String::as_str)
    }

    /// Step to the next newer entry, or back to the draft.
    ///
    /// Returns `None` when not browsing.
    pub fn newer(&mut self) -> Option<&str> {
        let i = self.index?;
        if i + 1 < self.entries.len() {
            self.index = Some(i + 1);
            self.entries.get(i + 1).map(String::as_str)
        } else {
            self.index = None;
            Some(&self.draft)
        }
    }

    /// The most recent entry.
    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    /// Leave browsing mode without touching entries.
    pub fn reset_browse(&mut self) {
        self.index = None;
        self.draft.clear();
    }

    pub fn is_browsing(&self) -> bool {
        self.index.is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}
