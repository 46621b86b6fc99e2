//! Mutation handle over the live tree.
//!
//! A [`LiveNode`] addresses one node by path and borrows the store
//! mutably. Each mutator applies its write through
//! [`Hashbang::mutate`], which commits the new fragment and arms the
//! coalescing timer; there is no other way to change the tree in place.

use hashbang_codec::PATH_KEY;
use serde_json::Value;

use crate::path::{split_parent, value_at_path, value_at_path_mut, PathStep};
use crate::{Hashbang, HashbangError, History};

pub struct LiveNode<'a, H: History> {
    hashbang: &'a mut Hashbang<H>,
    path: Vec<PathStep>,
}

impl<'a, H: History> LiveNode<'a, H> {
    pub(crate) fn new(hashbang: &'a mut Hashbang<H>) -> Self {
        Self {
            hashbang,
            path: Vec::new(),
        }
    }

    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.path.push(PathStep::Key(key.into()));
        self
    }

    pub fn at_index(mut self, index: usize) -> Self {
        self.path.push(PathStep::Index(index));
        self
    }

    pub fn at(mut self, path: &[PathStep]) -> Self {
        self.path.extend_from_slice(path);
        self
    }

    pub fn path(&self) -> &[PathStep] {
        &self.path
    }

    pub fn read(&self) -> Option<&Value> {
        value_at_path(self.hashbang.value(), &self.path)
    }

    /// Write `value` at this node, creating the final object key or
    /// appending when the index equals the array length. Returns the
    /// previous value.
    pub fn set(&mut self, value: Value) -> Result<Option<Value>, HashbangError> {
        if self.path.is_empty() {
            return Ok(Some(self.hashbang.replace_root(value)));
        }
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let (parent, leaf) = split_parent(path)?;
            let parent = target(root, parent)?;
            match (parent, leaf) {
                (Value::Object(map), PathStep::Key(key)) => Ok(map.insert(key.clone(), value)),
                (Value::Object(map), PathStep::Index(idx)) => Ok(map.insert(idx.to_string(), value)),
                (Value::Array(arr), PathStep::Index(idx)) => set_index(arr, *idx, value),
                (Value::Array(arr), PathStep::Key(key)) => {
                    let idx = key.parse().map_err(|_| HashbangError::InvalidPathOp)?;
                    set_index(arr, idx, value)
                }
                _ => Err(HashbangError::InvalidPathOp),
            }
        })
    }

    /// Insert `key` into the object at this node.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Result<Option<Value>, HashbangError> {
        let key = key.into();
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let map = target(root, path)?
                .as_object_mut()
                .ok_or(HashbangError::NotObject)?;
            Ok(map.insert(key, value))
        })
    }

    /// Delete `key` from the object at this node. The remaining keys keep
    /// their order.
    pub fn remove(&mut self, key: &str) -> Result<Option<Value>, HashbangError> {
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let map = target(root, path)?
                .as_object_mut()
                .ok_or(HashbangError::NotObject)?;
            Ok(map.shift_remove(key))
        })
    }

    pub fn push(&mut self, value: Value) -> Result<(), HashbangError> {
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let arr = target(root, path)?
                .as_array_mut()
                .ok_or(HashbangError::NotArray)?;
            arr.push(value);
            Ok(())
        })
    }

    pub fn remove_index(&mut self, index: usize) -> Result<Value, HashbangError> {
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let arr = target(root, path)?
                .as_array_mut()
                .ok_or(HashbangError::NotArray)?;
            if index >= arr.len() {
                return Err(HashbangError::PathNotFound);
            }
            Ok(arr.remove(index))
        })
    }

    /// Set or clear the path component on the root, whatever node this
    /// handle addresses.
    pub fn set_path(&mut self, path: Option<&str>) -> Result<(), HashbangError> {
        self.hashbang.mutate(|root| {
            let map = root.as_object_mut().ok_or(HashbangError::NotObject)?;
            match path {
                Some(path) => {
                    map.insert(PATH_KEY.to_owned(), Value::String(path.to_owned()));
                }
                None => {
                    map.shift_remove(PATH_KEY);
                }
            }
            Ok(())
        })
    }

    /// Remove this node from its parent.
    pub fn delete(&mut self) -> Result<Option<Value>, HashbangError> {
        let path = &self.path;
        self.hashbang.mutate(|root| {
            let (parent, leaf) = split_parent(path)?;
            match (target(root, parent)?, leaf) {
                (Value::Object(map), PathStep::Key(key)) => Ok(map.shift_remove(key)),
                (Value::Object(map), PathStep::Index(idx)) => Ok(map.shift_remove(&idx.to_string())),
                (Value::Array(arr), PathStep::Index(idx)) if *idx < arr.len() => Ok(Some(arr.remove(*idx))),
                (Value::Array(_), PathStep::Index(_)) => Ok(None),
                _ => Err(HashbangError::InvalidPathOp),
            }
        })
    }
}

fn target<'v>(root: &'v mut Value, path: &[PathStep]) -> Result<&'v mut Value, HashbangError> {
    value_at_path_mut(root, path).ok_or(HashbangError::PathNotFound)
}

fn set_index(arr: &mut Vec<Value>, idx: usize, value: Value) -> Result<Option<Value>, HashbangError> {
    let len = arr.len();
    match arr.get_mut(idx) {
        Some(slot) => Ok(Some(std::mem::replace(slot, value))),
        None if idx == len => {
            arr.push(value);
            Ok(None)
        }
        None => Err(HashbangError::PathNotFound),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_path, Config, MemoryHistory};
    use serde_json::json;

    fn installed(fragment: &str) -> (Hashbang<MemoryHistory>, MemoryHistory) {
        let history = MemoryHistory::new(fragment);
        let hashbang = Hashbang::install(history.clone(), Config::default()).unwrap();
        (hashbang, history)
    }

    #[test]
    fn nested_set_commits() {
        let (mut hashbang, history) = installed("#!mod[id]=1&mod[name]=foo");
        let old = hashbang.root().at_key("mod").at_key("id").set(json!("2")).unwrap();
        assert_eq!(old, Some(json!("1")));
        assert_eq!(history.current(), "#!mod[id]=2&mod[name]=foo");
    }

    #[test]
    fn set_creates_missing_leaf_key() {
        let (mut hashbang, history) = installed("#!mod[id]=1");
        hashbang.root().at_key("mod").at_key("tag").set(json!("x")).unwrap();
        assert_eq!(history.current(), "#!mod[id]=1&mod[tag]=x");
    }

    #[test]
    fn set_under_missing_parent_fails_without_commit() {
        let (mut hashbang, history) = installed("#!a=1");
        let err = hashbang.at(&parse_path("no.such")).set(json!("x")).unwrap_err();
        assert!(matches!(err, HashbangError::PathNotFound));
        assert_eq!(history.current(), "#!a=1");
        assert_eq!(hashbang.next_deadline(), None);
    }

    #[test]
    fn array_mutators() {
        let (mut hashbang, history) = installed("#!y[]=2&y[]=3");
        hashbang.root().at_key("y").push(json!("4")).unwrap();
        assert_eq!(history.current(), "#!y[]=2&y[]=3&y[]=4");
        let removed = hashbang.root().at_key("y").remove_index(0).unwrap();
        assert_eq!(removed, json!("2"));
        hashbang.root().at_key("y").at_index(2).set(json!("5")).unwrap();
        assert_eq!(hashbang.value(), &json!({"y": ["3", "4", "5"]}));
        assert!(matches!(
            hashbang.root().at_key("y").at_index(9).set(json!("x")),
            Err(HashbangError::PathNotFound)
        ));
    }

    #[test]
    fn set_index_replaces_or_appends() {
        let (mut hashbang, history) = installed("#!y[]=a");
        let old = hashbang.root().at_key("y").at_index(0).set(json!("b")).unwrap();
        assert_eq!(old, Some(json!("a")));
        let old = hashbang.root().at_key("y").at_index(1).set(json!("c")).unwrap();
        assert_eq!(old, None);
        assert_eq!(history.current(), "#!y[]=b&y[]=c");
    }

    #[test]
    fn remove_keeps_sibling_order() {
        let (mut hashbang, history) = installed("#!a=1&b=2&c=3");
        assert_eq!(hashbang.root().remove("a").unwrap(), Some(json!("1")));
        assert_eq!(history.current(), "#!b=2&c=3");
    }

    #[test]
    fn delete_node() {
        let (mut hashbang, history) = installed("#!m[a]=1&m[b]=2");
        hashbang.at(&parse_path("m.b")).delete().unwrap();
        assert_eq!(history.current(), "#!m[a]=1");
    }

    #[test]
    fn wrong_container_kind() {
        let (mut hashbang, _) = installed("#!a=1");
        assert!(matches!(hashbang.root().at_key("a").push(json!("x")), Err(HashbangError::NotArray)));
        assert!(matches!(
            hashbang.root().at_key("a").insert("k", json!("x")),
            Err(HashbangError::NotObject)
        ));
    }

    #[test]
    fn insert_composite_value() {
        let (mut hashbang, history) = installed("#!");
        hashbang
            .root()
            .insert("something", json!({"any": 1, "else": [{"a": 1}, {"b": 2}]}))
            .unwrap();
        assert_eq!(
            history.current(),
            "#!something[any]=1&something[else][0][a]=1&something[else][1][b]=2"
        );
    }

    #[test]
    fn set_on_root_replaces_tree() {
        let (mut hashbang, history) = installed("#!a=1");
        hashbang.root().set(json!({"#path": "/x", "b": "2"})).unwrap();
        assert_eq!(history.current(), "#!/x?b=2");
    }

    #[test]
    fn set_path_goes_first() {
        let (mut hashbang, history) = installed("#!a=1");
        hashbang.root().at_key("a").set_path(Some("/docs")).unwrap();
        assert_eq!(history.current(), "#!/docs?a=1");
        hashbang.root().set_path(None).unwrap();
        assert_eq!(history.current(), "#!a=1");
    }

    #[test]
    fn read_follows_path() {
        let (mut hashbang, _) = installed("#!m[a]=1");
        let node = hashbang.root().at_key("m").at_key("a");
        assert_eq!(node.read(), Some(&json!("1")));
        assert_eq!(node.path(), &parse_path("m.a")[..]);
    }
}
