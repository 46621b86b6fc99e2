//! The sync controller.
//!
//! [`Hashbang`] owns the value tree and keeps it consistent with the
//! fragment held by a [`History`]:
//!
//! - external change → echo check → parse → install tree → lifecycle event,
//! - internal mutation → serialize → record → commit → (re)arm the
//!   coalescing timer → `updated-internally` once the burst settles.
//!
//! The host delivers the two kinds of wake-ups it owns: fragment change
//! notifications ([`Hashbang::handle_external_change`]) and timer ticks
//! ([`Hashbang::run_timers`], due at [`Hashbang::next_deadline`]).

use std::collections::BTreeMap;
use std::time::Duration;

use hashbang_codec::{decode, serialize_with, Separator};
use serde_json::Value;

use crate::clock::{Clock, CoalescingTimer, SystemClock};
use crate::gate::ChangeGate;
use crate::live::LiveNode;
use crate::observer::{ObserveOptions, ObserverId, ObserverRegistry};
use crate::path::PathStep;
use crate::store::Store;
use crate::{Config, HashbangError, History, LifecycleEvent};

/// Where the fragment channel stands relative to this store's writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState<'a> {
    /// Nothing written since the last external change.
    Idle,
    /// Mutations were committed but `updated-internally` has not fired yet.
    PendingCommit(&'a str),
    /// The last burst of mutations settled on this fragment.
    Committed(&'a str),
}

type Listener = Box<dyn FnMut(LifecycleEvent)>;

pub struct Hashbang<H: History> {
    config: Config,
    separator: Separator,
    history: H,
    clock: Box<dyn Clock>,
    store: Store,
    gate: ChangeGate,
    timer: CoalescingTimer,
    wrote_since_external: bool,
    observers: ObserverRegistry,
    next_listener_id: u64,
    listeners: BTreeMap<u64, Listener>,
}

impl<H: History> Hashbang<H> {
    /// Create a store and process the current fragment.
    pub fn install(history: H, config: Config) -> Result<Self, HashbangError> {
        let mut hashbang = Self::new(history, config)?;
        hashbang.start();
        Ok(hashbang)
    }

    pub fn install_with_clock<C>(history: H, config: Config, clock: C) -> Result<Self, HashbangError>
    where
        C: Clock + 'static,
    {
        let mut hashbang = Self::with_clock(history, config, clock)?;
        hashbang.start();
        Ok(hashbang)
    }

    /// Create a store without reading the fragment yet, so observers and
    /// listeners can be attached before [`Hashbang::start`] fires
    /// `initialized`.
    pub fn new(history: H, config: Config) -> Result<Self, HashbangError> {
        Self::with_clock(history, config, SystemClock::new())
    }

    pub fn with_clock<C>(mut history: H, config: Config, clock: C) -> Result<Self, HashbangError>
    where
        C: Clock + 'static,
    {
        let separator = config.separator.clone();
        if !history.supports_change_events() {
            tracing::error!("fragment change notifications are not supported");
            return Err(HashbangError::MissingCapability);
        }
        if !history.claim() {
            tracing::error!("hashbang store already installed");
            return Err(HashbangError::DoubleInitialization);
        }
        tracing::debug!(separator = %separator, "hashbang store created");
        Ok(Self {
            timer: CoalescingTimer::new(config.coalesce_delay()),
            config,
            separator,
            history,
            clock: Box::new(clock),
            store: Store::new(),
            gate: ChangeGate::new(),
            wrote_since_external: false,
            observers: ObserverRegistry::new(),
            next_listener_id: 1,
            listeners: BTreeMap::new(),
        })
    }

    /// Run the first external-change cycle.
    pub fn start(&mut self) -> Option<LifecycleEvent> {
        self.handle_external_change()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn separator(&self) -> &Separator {
        &self.separator
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    // ──────────────────────────────────────────────────────────────────────
    // Reading
    // ──────────────────────────────────────────────────────────────────────

    pub fn value(&self) -> &Value {
        self.store.value()
    }

    pub fn get(&self, path: &[PathStep]) -> Option<&Value> {
        self.store.get(path)
    }

    /// The fragment most recently written or accepted.
    pub fn fragment(&self) -> Option<&str> {
        self.gate.last()
    }

    /// Serialize the current tree without committing it.
    pub fn to_fragment(&self) -> String {
        serialize_with(self.store.value(), &self.separator)
    }

    pub fn is_initialized(&self) -> bool {
        self.gate.is_initialized()
    }

    pub fn state(&self) -> ChannelState<'_> {
        match self.gate.last() {
            Some(fragment) if self.timer.is_pending() => ChannelState::PendingCommit(fragment),
            Some(fragment) if self.wrote_since_external => ChannelState::Committed(fragment),
            _ => ChannelState::Idle,
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Writing
    // ──────────────────────────────────────────────────────────────────────

    /// Handle for mutating the tree. Every mutation made through it is
    /// committed to the history.
    pub fn root(&mut self) -> LiveNode<'_, H> {
        LiveNode::new(self)
    }

    /// Shorthand for `root().at(path)`.
    pub fn at(&mut self, path: &[PathStep]) -> LiveNode<'_, H> {
        LiveNode::new(self).at(path)
    }

    /// Replace the whole tree. A non-object root becomes `{}`.
    pub fn replace_root(&mut self, value: Value) -> Value {
        let old = self.store.replace(value);
        self.after_mutation();
        old
    }

    /// Apply `f` to the root and, if it succeeds, run the internal
    /// mutation path. The root stays an object whatever `f` does.
    pub(crate) fn mutate<T, F>(&mut self, f: F) -> Result<T, HashbangError>
    where
        F: FnOnce(&mut Value) -> Result<T, HashbangError>,
    {
        let out = f(self.store.root_mut())?;
        if !self.store.value().is_object() {
            let root = std::mem::take(self.store.root_mut());
            self.store.replace(root);
        }
        self.after_mutation();
        Ok(out)
    }

    fn after_mutation(&mut self) {
        let fragment = serialize_with(self.store.value(), &self.separator);
        self.gate.record(&fragment);
        self.wrote_since_external = true;
        if self.history.current() != fragment {
            self.history.write(&fragment, self.config.commit_mode);
            tracing::debug!(fragment = %fragment, "committed new fragment");
        }
        if self.timer.schedule(self.clock.now()) {
            tracing::trace!("coalescing timer extended");
        }
    }

    // ──────────────────────────────────────────────────────────────────────
    // Host wake-ups
    // ──────────────────────────────────────────────────────────────────────

    /// Process a fragment change reported by the host. Returns the event
    /// fired, or `None` when the change was this store's own echo.
    pub fn handle_external_change(&mut self) -> Option<LifecycleEvent> {
        let fragment = self.history.current();
        if self.gate.is_echo(&fragment) {
            tracing::trace!(fragment = %fragment, "ignoring own fragment");
            return None;
        }
        let decoded = decode(&fragment, &self.separator);
        let event = self.gate.accept(&fragment, decoded.format);
        self.store.replace(decoded.value);
        self.wrote_since_external = false;
        tracing::debug!(%event, fragment = %fragment, "object updated");
        self.emit(event);
        Some(event)
    }

    /// Fire the coalesced `updated-internally` event if it is due.
    pub fn run_timers(&mut self) -> Option<LifecycleEvent> {
        if !self.timer.fire_if_due(self.clock.now()) {
            return None;
        }
        let event = LifecycleEvent::UpdatedInternally;
        tracing::debug!(%event, "mutations settled");
        self.emit(event);
        Some(event)
    }

    /// Time until the pending timer is due, if one is armed.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timer
            .deadline()
            .map(|deadline| deadline.saturating_sub(self.clock.now()))
    }

    // ──────────────────────────────────────────────────────────────────────
    // Notifications
    // ──────────────────────────────────────────────────────────────────────

    pub fn on_event<F>(&mut self, listener: F) -> u64
    where
        F: FnMut(LifecycleEvent) + 'static,
    {
        let id = self.next_listener_id;
        self.next_listener_id = self.next_listener_id.saturating_add(1);
        self.listeners.insert(id, Box::new(listener));
        id
    }

    pub fn off_event(&mut self, listener_id: u64) -> bool {
        self.listeners.remove(&listener_id).is_some()
    }

    /// Watch `path` on every lifecycle event.
    pub fn observe<F>(&mut self, path: Vec<PathStep>, callback: F) -> ObserverId
    where
        F: FnMut(Option<&Value>, Option<&Value>) + 'static,
    {
        self.observe_with(path, callback, ObserveOptions::default())
    }

    pub fn observe_with<F>(
        &mut self,
        path: Vec<PathStep>,
        callback: F,
        options: ObserveOptions,
    ) -> ObserverId
    where
        F: FnMut(Option<&Value>, Option<&Value>) + 'static,
    {
        self.observers
            .observe(self.store.value(), path, callback, options)
    }

    pub fn unobserve(&mut self, path: Option<&[PathStep]>, id: ObserverId) -> bool {
        self.observers.unobserve(path, id)
    }

    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    fn emit(&mut self, event: LifecycleEvent) {
        for listener in self.listeners.values_mut() {
            listener(event);
        }
        let fired = self.observers.notify(event, self.store.value());
        if fired > 0 {
            tracing::debug!(%event, fired, "observers notified");
        }
    }
}
