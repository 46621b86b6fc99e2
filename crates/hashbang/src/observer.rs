//! Path-scoped observers evaluated on lifecycle events.
//!
//! Each observer remembers the last snapshot of its subtree it has seen.
//! On an event it subscribed to, the subtree is resolved again; when the
//! compact JSON snapshot differs, the filter decides whether the callback
//! runs. The snapshot is refreshed either way, so the `old` value handed to
//! a callback is always the one current at the previous evaluation.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde_json::Value;

use crate::path::{path_matches, value_at_path, PathStep};
use crate::{EventSet, LifecycleEvent};

/// Observer callback: `(new, old)`. `None` means the path did not resolve.
pub type Callback = Box<dyn FnMut(Option<&Value>, Option<&Value>)>;

type Predicate = Box<dyn FnMut(Option<&Value>, Option<&Value>) -> bool>;

/// Decides whether a detected change reaches the callback.
#[derive(Default)]
pub enum Filter {
    #[default]
    Any,
    Predicate(Predicate),
    /// Matched against the new value as text: strings as-is, other values
    /// as compact JSON, a missing value as the empty string.
    Pattern(Regex),
}

impl Filter {
    pub fn predicate<F>(f: F) -> Self
    where
        F: FnMut(Option<&Value>, Option<&Value>) -> bool + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Filter::Pattern(Regex::new(pattern)?))
    }

    fn accepts(&mut self, new: Option<&Value>, old: Option<&Value>) -> bool {
        match self {
            Filter::Any => true,
            Filter::Predicate(f) => f(new, old),
            Filter::Pattern(re) => re.is_match(&text_of(new)),
        }
    }
}

impl From<Regex> for Filter {
    fn from(re: Regex) -> Self {
        Filter::Pattern(re)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Any => f.write_str("Any"),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
            Filter::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
        }
    }
}

fn text_of(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed(""),
        Some(Value::String(s)) => Cow::Borrowed(s),
        Some(other) => Cow::Owned(other.to_string()),
    }
}

#[derive(Debug, Default)]
pub struct ObserveOptions {
    pub filter: Filter,
    pub events: EventSet,
    /// Remove the observer after its callback first runs.
    pub once: bool,
}

impl ObserveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_events(mut self, events: EventSet) -> Self {
        self.events = events;
        self
    }

    pub fn once(mut self) -> Self {
        self.once = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObserverId(u64);

struct ObserverRecord {
    path: Vec<PathStep>,
    events: EventSet,
    filter: Filter,
    once: bool,
    last_seen: Option<String>,
    last_value: Option<Value>,
    callback: Callback,
}

impl ObserverRecord {
    /// Returns `true` when the callback ran.
    fn evaluate(&mut self, current: Option<&Value>, force: bool) -> bool {
        let snapshot = current.map(Value::to_string);
        if !force && snapshot == self.last_seen {
            return false;
        }
        let accepted = self.filter.accepts(current, self.last_value.as_ref());
        if accepted {
            (self.callback)(current, self.last_value.as_ref());
        }
        self.last_seen = snapshot;
        self.last_value = current.cloned();
        accepted
    }
}

#[derive(Default)]
pub struct ObserverRegistry {
    next_id: u64,
    records: BTreeMap<u64, ObserverRecord>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer on `path` of `root`.
    ///
    /// With [`EventSet::IMMEDIATE`] the callback runs before this returns,
    /// with `old` set to `None`. An observer registered for `IMMEDIATE`
    /// alone is not kept afterwards.
    pub fn observe<F>(
        &mut self,
        root: &Value,
        path: Vec<PathStep>,
        callback: F,
        options: ObserveOptions,
    ) -> ObserverId
    where
        F: FnMut(Option<&Value>, Option<&Value>) + 'static,
    {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);

        let current = value_at_path(root, &path);
        let immediate = options.events.contains(EventSet::IMMEDIATE);
        let mut record = ObserverRecord {
            last_seen: if immediate { None } else { current.map(Value::to_string) },
            last_value: if immediate { None } else { current.cloned() },
            path,
            events: options.events,
            filter: options.filter,
            once: options.once || options.events == EventSet::IMMEDIATE,
            callback: Box::new(callback),
        };

        if immediate {
            let fired = record.evaluate(current, true);
            if options.events == EventSet::IMMEDIATE || (fired && record.once) {
                tracing::debug!(observer = id, "immediate observer finished");
                return ObserverId(id);
            }
        }
        self.records.insert(id, record);
        ObserverId(id)
    }

    /// Remove an observer. When `path` is given it must select the
    /// observer's path, with [`PathStep::Any`] matching any single step.
    pub fn unobserve(&mut self, path: Option<&[PathStep]>, id: ObserverId) -> bool {
        let selected = match (self.records.get(&id.0), path) {
            (None, _) => false,
            (Some(_), None) => true,
            (Some(record), Some(pattern)) => path_matches(pattern, &record.path),
        };
        selected && self.records.remove(&id.0).is_some()
    }

    /// Evaluate every observer subscribed to `event`. Returns how many
    /// callbacks ran.
    pub fn notify(&mut self, event: LifecycleEvent, root: &Value) -> usize {
        let kind = EventSet::from(event);
        let mut fired = 0;
        let mut finished = Vec::new();
        for (id, record) in self.records.iter_mut() {
            if !record.events.contains(kind) {
                continue;
            }
            let current = value_at_path(root, &record.path);
            if record.evaluate(current, false) {
                fired += 1;
                if record.once {
                    finished.push(*id);
                }
            }
        }
        for id in finished {
            self.records.remove(&id);
            tracing::debug!(observer = id, %event, "once observer removed");
        }
        fired
    }

    pub fn contains(&self, id: ObserverId) -> bool {
        self.records.contains_key(&id.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("next_id", &self.next_id)
            .field("observers", &self.records.len())
            .finish()
    }
}
