//! In-memory session history.
//!
//! Mirrors the semantics of the browser history API closely enough for the navigator:
//! pushing truncates any forward entries, replacing rewrites the current one, and
//! `back`/`forward` move the cursor and hand back the entry to pop to.

use crate::screen::HistoryState;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub url: Url,
    pub title: String,
    /// `None` for entries the navigator did not create (like the initial page)
    pub state: Option<HistoryState>,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    pub fn new(initial: Url) -> Self {
        Self {
            entries: vec![HistoryEntry {
                url: initial,
                title: String::new(),
                state: None,
            }],
            index: 0,
        }
    }

    pub fn push_state(&mut self, state: HistoryState, title: impl Into<String>, url: Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            url,
            title: title.into(),
            state: Some(state),
        });
        self.index = self.entries.len() - 1;
    }

    pub fn replace_state(&mut self, state: HistoryState, title: impl Into<String>, url: Url) {
        self.entries[self.index] = HistoryEntry {
            url,
            title: title.into(),
            state: Some(state),
        };
    }

    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        self.entries.get(self.index)
    }

    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        self.entries.get(self.index)
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
