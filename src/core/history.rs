//! Bounded recall store for previously accepted lines.

/// Default capacity; oldest entries are evicted beyond it.
pub const DEFAULT_HISTORY_LIMIT: usize = 100;

/// What a "newer" navigation landed on.
#[derive(Debug, PartialEq, Eq)]
pub enum Recall<'a> {
    /// A stored entry.
    Entry(&'a str),
    /// Past the newest entry: back to the empty live line.
    Live,
}

/// Ordered list of accepted lines, oldest first, plus a browse cursor.
///
/// `browse` is `None` while not browsing (the live line). Entries are stored
/// trimmed; empty lines and consecutive duplicates are never stored.
#[derive(Debug)]
pub struct History {
    entries: Vec<String>,
    limit: usize,
    browse: Option<usize>,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: limit.max(1),
            browse: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record an accepted line. Trims whitespace; drops empty results and
    /// lines equal to the current last entry; evicts the oldest past the
    /// capacity bound.
    pub fn add(&mut self, line: &str) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }
        if self.entries.last().map(String::as_str) == Some(trimmed) {
            return;
        }
        self.entries.push(trimmed.to_string());
        if self.entries.len() > self.limit {
            self.entries.remove(0);
        }
    }

    /// Move one entry older; enters browsing at the newest entry. Stays put
    /// at the oldest entry. `None` with empty history.
    pub fn older(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        self.browse = match self.browse {
            None => Some(self.entries.len() - 1),
            Some(0) => Some(0),
            Some(index) => Some(index - 1),
        };
        self.browse.map(|index| self.entries[index].as_str())
    }

    /// Move one entry newer; past the newest entry, browsing ends and the
    /// live line is restored. `None` when not browsing.
    pub fn newer(&mut self) -> Option<Recall<'_>> {
        let index = self.browse?;
        if index + 1 < self.entries.len() {
            self.browse = Some(index + 1);
            Some(Recall::Entry(self.entries[index + 1].as_str()))
        } else {
            self.browse = None;
            Some(Recall::Live)
        }
    }

    /// Back to the live line; called at the start of each input cycle.
    pub fn reset_browse(&mut self) {
        self.browse = None;
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
