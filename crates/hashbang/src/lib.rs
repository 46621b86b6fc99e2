//! Live two-way binding between a nested value and a hashbang fragment.
//!
//! A [`Hashbang`] store keeps a value tree in sync with the URL fragment of
//! a [`History`]. Changes to the fragment are parsed into the tree; changes
//! made through a [`LiveNode`] are serialized back into the fragment at
//! once, and observers hear about them when a burst of mutations settles.
//!
//! ```
//! use std::time::Duration;
//!
//! use hashbang::{parse_path, Config, Hashbang, History, ManualClock, MemoryHistory};
//! use serde_json::json;
//!
//! let history = MemoryHistory::new("#!mod[id]=1&mod[name]=foo");
//! let clock = ManualClock::new();
//! let mut store =
//!     Hashbang::install_with_clock(history.clone(), Config::default(), clock.clone()).unwrap();
//!
//! store.at(&parse_path("mod.id")).set(json!("2")).unwrap();
//! assert_eq!(history.current(), "#!mod[id]=2&mod[name]=foo");
//!
//! clock.advance(Duration::from_millis(50));
//! assert!(store.run_timers().is_some());
//! ```

pub mod cli;
mod clock;
mod config;
mod error;
mod event;
mod gate;
mod history;
mod live;
mod observer;
mod path;
mod store;
mod sync;

pub use clock::{Clock, CoalescingTimer, ManualClock, SystemClock};
pub use config::Config;
pub use error::HashbangError;
pub use event::{EventSet, LifecycleEvent};
pub use gate::ChangeGate;
pub use history::{CommitMode, History, MemoryHistory};
pub use live::LiveNode;
pub use observer::{Callback, Filter, ObserveOptions, ObserverId, ObserverRegistry};
pub use path::{parse_path, path_matches, split_parent, value_at_path, value_at_path_mut, PathStep};
pub use store::Store;
pub use sync::{ChannelState, Hashbang};

pub use hashbang_codec::{
    decode, parse, parse_with, serialize, serialize_with, CodecError, Decoded, FragmentFormat,
    Separator, DEFAULT_SEPARATOR, PATH_KEY,
};
