//! Addressing nodes inside the value tree.

use serde_json::Value;

use crate::HashbangError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathStep {
    Key(String),
    Index(usize),
    /// Matches any step when selecting observers to remove. Never resolves
    /// to a value.
    Any,
}

impl PathStep {
    /// Whether this step, used as a pattern, selects `other`.
    pub fn matches(&self, other: &PathStep) -> bool {
        matches!(self, PathStep::Any) || self == other
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_owned())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

/// Parse a dotted path such as `mod.items.0.id`.
///
/// Purely numeric steps become indices and empty steps become
/// [`PathStep::Any`]. The empty string is the root path.
///
/// # Example
///
/// ```
/// use hashbang::{parse_path, PathStep};
///
/// assert_eq!(
///     parse_path("mod.0"),
///     vec![PathStep::Key("mod".into()), PathStep::Index(0)],
/// );
/// assert!(parse_path("").is_empty());
/// ```
pub fn parse_path(path: &str) -> Vec<PathStep> {
    if path.is_empty() {
        return Vec::new();
    }
    path.split('.')
        .map(|step| {
            if step.is_empty() {
                PathStep::Any
            } else if let Some(index) = parse_index(step) {
                PathStep::Index(index)
            } else {
                PathStep::Key(step.to_owned())
            }
        })
        .collect()
}

fn parse_index(step: &str) -> Option<usize> {
    if step.bytes().all(|b| b.is_ascii_digit()) {
        step.parse().ok()
    } else {
        None
    }
}

/// Resolve `path` against `value`. Missing steps resolve to `None`.
///
/// Indices look up the decimal key on objects and numeric keys look up
/// the index on arrays, since decoded objects and arrays share key syntax.
pub fn value_at_path<'a>(value: &'a Value, path: &[PathStep]) -> Option<&'a Value> {
    let mut cur = value;
    for step in path {
        cur = match (step, cur) {
            (PathStep::Key(key), Value::Object(map)) => map.get(key)?,
            (PathStep::Index(idx), Value::Object(map)) => map.get(&idx.to_string())?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get(*idx)?,
            (PathStep::Key(key), Value::Array(arr)) => arr.get(parse_index(key)?)?,
            _ => return None,
        };
    }
    Some(cur)
}

pub fn value_at_path_mut<'a>(value: &'a mut Value, path: &[PathStep]) -> Option<&'a mut Value> {
    let mut cur = value;
    for step in path {
        cur = match (step, cur) {
            (PathStep::Key(key), Value::Object(map)) => map.get_mut(key)?,
            (PathStep::Index(idx), Value::Object(map)) => map.get_mut(&idx.to_string())?,
            (PathStep::Index(idx), Value::Array(arr)) => arr.get_mut(*idx)?,
            (PathStep::Key(key), Value::Array(arr)) => arr.get_mut(parse_index(key)?)?,
            _ => return None,
        };
    }
    Some(cur)
}

pub fn split_parent(path: &[PathStep]) -> Result<(&[PathStep], &PathStep), HashbangError> {
    match path.split_last() {
        Some((leaf, parent)) => Ok((parent, leaf)),
        None => Err(HashbangError::InvalidPathOp),
    }
}

/// Whether `pattern` selects `path`, treating [`PathStep::Any`] as a
/// wildcard for one step.
pub fn path_matches(pattern: &[PathStep], path: &[PathStep]) -> bool {
    pattern.len() == path.len() && pattern.iter().zip(path).all(|(p, s)| p.matches(s))
}
