//! Navigation channel the fragment is committed to and read from.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

/// How a commit lands in the navigation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Add a new history entry.
    Push,
    /// Overwrite the current history entry.
    #[default]
    Replace,
}

/// Host binding for the externally visible fragment.
///
/// The host forwards its own "fragment changed" notifications to
/// [`Hashbang::handle_external_change`](crate::Hashbang::handle_external_change);
/// the store never polls.
pub trait History {
    /// The fragment as currently shown, including the leading `#`.
    fn current(&self) -> String;

    /// Make `fragment` the current fragment.
    fn write(&mut self, fragment: &str, mode: CommitMode);

    /// Whether the host can deliver change notifications at all.
    fn supports_change_events(&self) -> bool {
        true
    }

    /// Mark the environment as hosting a live store. Returns `false` when a
    /// store was already installed.
    fn claim(&mut self) -> bool;
}

#[derive(Debug)]
struct MemoryState {
    entries: Vec<String>,
    claimed: bool,
    change_events: bool,
}

/// In-process [`History`] backed by a list of entries.
///
/// Clones share the same entries, so a test can keep a handle to navigate
/// and inspect while the store owns another.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                entries: vec![initial.into()],
                claimed: false,
                change_events: true,
            })),
        }
    }

    /// A history whose host cannot report fragment changes.
    pub fn without_change_events(self) -> Self {
        self.state.borrow_mut().change_events = false;
        self
    }

    /// Simulate the user navigating to `fragment`.
    ///
    /// The caller still has to deliver the change notification.
    pub fn navigate(&self, fragment: impl Into<String>) {
        self.state.borrow_mut().entries.push(fragment.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.state.borrow().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.state.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("")
    }
}

impl History for MemoryHistory {
    fn current(&self) -> String {
        self.state.borrow().entries.last().cloned().unwrap_or_default()
    }

    fn write(&mut self, fragment: &str, mode: CommitMode) {
        let mut state = self.state.borrow_mut();
        let entries = &mut state.entries;
        if entries.last().map(String::as_str) == Some(fragment) {
            return;
        }
        if mode == CommitMode::Replace {
            if let Some(last) = entries.last_mut() {
                *last = fragment.to_owned();
                return;
            }
        }
        entries.push(fragment.to_owned());
    }

    fn supports_change_events(&self) -> bool {
        self.state.borrow().change_events
    }

    fn claim(&mut self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.claimed {
            return false;
        }
        state.claimed = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_overwrites_current_entry() {
        let mut history = MemoryHistory::new("#!a=1");
        history.write("#!a=2", CommitMode::Replace);
        assert_eq!(history.entries(), vec!["#!a=2"]);
    }

    #[test]
    fn push_appends_entry() {
        let mut history = MemoryHistory::new("#!a=1");
        history.write("#!a=2", CommitMode::Push);
        assert_eq!(history.entries(), vec!["#!a=1", "#!a=2"]);
        assert_eq!(history.current(), "#!a=2");
    }

    #[test]
    fn identical_write_is_a_no_op() {
        let mut history = MemoryHistory::new("#!a=1");
        history.write("#!a=1", CommitMode::Push);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn claim_only_once() {
        let mut history = MemoryHistory::default();
        let mut other = history.clone();
        assert!(history.claim());
        assert!(!other.claim());
    }
}
