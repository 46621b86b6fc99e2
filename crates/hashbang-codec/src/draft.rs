//! Construction-time tree used while decoding.
//!
//! Branches live in an arena so the per-branch array hint counter can be
//! kept in a side table (`hints[id]`) instead of on the produced values.
//! [`Draft::finish`] runs the array heuristic bottom-up and drops both.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::decode_component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BranchId(usize);

const ROOT: BranchId = BranchId(0);

#[derive(Debug)]
enum Slot {
    Leaf(String),
    Branch(BranchId),
}

#[derive(Debug)]
pub(crate) struct Draft {
    branches: Vec<IndexMap<String, Slot>>,
    /// Number of fresh numeric keys inserted into each branch.
    hints: Vec<usize>,
}

impl Draft {
    pub(crate) fn new() -> Self {
        Self {
            branches: vec![IndexMap::new()],
            hints: vec![0],
        }
    }

    /// Set a root entry without decoding or hinting.
    pub(crate) fn insert_root(&mut self, key: impl Into<String>, value: String) {
        self.branches[ROOT.0].insert(key.into(), Slot::Leaf(value));
    }

    /// Walk the raw bracket `segments` from the root and store `value` at
    /// the end. An empty segment stands for the parent's next index.
    pub(crate) fn assign(&mut self, segments: &[&str], value: String) {
        let Some(last) = segments.len().checked_sub(1) else {
            return;
        };
        let mut cursor = ROOT;
        let mut value = Some(value);
        for (i, raw) in segments.iter().enumerate() {
            let decoded = decode_component(raw);
            let key = if decoded.is_empty() {
                self.hints[cursor.0].to_string()
            } else {
                decoded.into_owned()
            };
            if is_index(&key) && !self.branches[cursor.0].contains_key(&key) {
                self.hints[cursor.0] += 1;
            }
            if i < last {
                cursor = match self.branches[cursor.0].get(&key) {
                    Some(Slot::Branch(child)) => *child,
                    _ => {
                        let child = self.push_branch();
                        self.branches[cursor.0].insert(key, Slot::Branch(child));
                        child
                    }
                };
            } else if let Some(value) = value.take() {
                self.branches[cursor.0].insert(key, Slot::Leaf(value));
            }
        }
    }

    /// Produce the final value. The root always stays an object.
    pub(crate) fn finish(mut self) -> Value {
        self.build(ROOT)
    }

    fn push_branch(&mut self) -> BranchId {
        self.branches.push(IndexMap::new());
        self.hints.push(0);
        BranchId(self.branches.len() - 1)
    }

    fn build(&mut self, id: BranchId) -> Value {
        let hint = self.hints[id.0];
        let entries = std::mem::take(&mut self.branches[id.0]);
        let mut map = Map::with_capacity(entries.len());
        for (key, slot) in entries {
            let value = match slot {
                Slot::Leaf(text) => Value::String(text),
                Slot::Branch(child) => self.build(child),
            };
            map.insert(key, value);
        }
        if id != ROOT && is_sequence(&map, hint) {
            let mut items = Vec::with_capacity(hint);
            for i in 0..hint {
                if let Some(item) = map.remove(&i.to_string()) {
                    items.push(item);
                }
            }
            return Value::Array(items);
        }
        Value::Object(map)
    }
}

/// A branch is a sequence when every key was a fresh numeric insertion and
/// together they cover `0..hint` exactly. Sparse or offset indices keep the
/// object form. An object whose keys are exactly `"0".."n-1"` is
/// indistinguishable from a sequence and converts too.
fn is_sequence(map: &Map<String, Value>, hint: usize) -> bool {
    map.len() == hint && (0..hint).all(|i| map.contains_key(&i.to_string()))
}

pub(crate) fn is_index(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
}
