use std::fmt;

use bitflags::bitflags;

/// Lifecycle signals emitted by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEvent {
    /// First successful parse since startup.
    Initialized,
    /// A later external fragment change was parsed.
    UpdatedExternally,
    /// A burst of mutations settled after the coalescing delay.
    UpdatedInternally,
    /// The current fragment does not follow the hashbang grammar.
    Unparsable,
}

impl LifecycleEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LifecycleEvent::Initialized => "initialized",
            LifecycleEvent::UpdatedExternally => "updated-externally",
            LifecycleEvent::UpdatedInternally => "updated-internally",
            LifecycleEvent::Unparsable => "unparsable",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags! {
    /// Events an observer is evaluated on.
    ///
    /// `IMMEDIATE` is a pseudo-event: the observer runs once, synchronously,
    /// when it is registered.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventSet: u8 {
        const IMMEDIATE = 1 << 0;
        const INITIALIZED = 1 << 1;
        const UPDATED_EXTERNALLY = 1 << 2;
        const UPDATED_INTERNALLY = 1 << 3;
        const UNPARSABLE = 1 << 4;
        const LIFECYCLE = Self::INITIALIZED.bits()
            | Self::UPDATED_EXTERNALLY.bits()
            | Self::UPDATED_INTERNALLY.bits()
            | Self::UNPARSABLE.bits();
    }
}

impl Default for EventSet {
    fn default() -> Self {
        EventSet::LIFECYCLE
    }
}

impl From<LifecycleEvent> for EventSet {
    fn from(event: LifecycleEvent) -> Self {
        match event {
            LifecycleEvent::Initialized => EventSet::INITIALIZED,
            LifecycleEvent::UpdatedExternally => EventSet::UPDATED_EXTERNALLY,
            LifecycleEvent::UpdatedInternally => EventSet::UPDATED_INTERNALLY,
            LifecycleEvent::Unparsable => EventSet::UNPARSABLE,
        }
    }
}
