use serde_json::{Map, Value};

use crate::path::{value_at_path, PathStep};

/// Owner of the value tree.
///
/// The root is always an object; anything else handed to [`Store::replace`]
/// is coerced to an empty object.
#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    root: Value,
}

impl Store {
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    pub fn value(&self) -> &Value {
        &self.root
    }

    pub fn get(&self, path: &[PathStep]) -> Option<&Value> {
        value_at_path(&self.root, path)
    }

    /// Swap in a new tree and return the old one.
    pub fn replace(&mut self, value: Value) -> Value {
        let value = match value {
            Value::Object(_) => value,
            other => {
                tracing::warn!(root = %other, "root must be an object, using an empty one");
                Value::Object(Map::new())
            }
        };
        std::mem::replace(&mut self.root, value)
    }

    pub(crate) fn root_mut(&mut self) -> &mut Value {
        &mut self.root
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
