//! Echo suppression for fragment change notifications.
//!
//! Every fragment the store writes, and every fragment it has already
//! processed, is remembered. A change notification reporting that same
//! fragment is an echo and is ignored.

use hashbang_codec::FragmentFormat;

use crate::LifecycleEvent;

#[derive(Debug, Default)]
pub struct ChangeGate {
    last: Option<String>,
    initialized: bool,
}

impl ChangeGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fragment most recently written or accepted.
    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_echo(&self, fragment: &str) -> bool {
        self.last.as_deref() == Some(fragment)
    }

    /// Remember a fragment this store is about to commit.
    pub fn record(&mut self, fragment: &str) {
        if !self.is_echo(fragment) {
            self.last = Some(fragment.to_owned());
        }
    }

    /// Accept an external fragment and pick the lifecycle event for it.
    pub fn accept(&mut self, fragment: &str, format: FragmentFormat) -> LifecycleEvent {
        self.record(fragment);
        match format {
            FragmentFormat::Unparsable => LifecycleEvent::Unparsable,
            FragmentFormat::Hashbang if !self.initialized => {
                self.initialized = true;
                LifecycleEvent::Initialized
            }
            FragmentFormat::Hashbang => LifecycleEvent::UpdatedExternally,
        }
    }
}
