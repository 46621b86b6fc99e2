//! Value → fragment encoding.
//!
//! Object keys are emitted in iteration (insertion) order. Scalar array
//! members use an anonymous segment (`key[]=v`); object and array members
//! use their index (`key[0][x]=v`) so the nesting survives a round trip.

use serde_json::Value;

use crate::{encode_component, Separator, PATH_KEY};

/// Key substituted when a scalar has no key segment of its own.
const NO_KEY: &str = "nokey";

/// Serialize with the default `#!` separator.
///
/// # Example
///
/// ```
/// use hashbang_codec::serialize;
/// use serde_json::json;
///
/// let value = json!({"#path": "/a/b", "x": "1", "y": ["2", "3"]});
/// assert_eq!(serialize(&value), "#!/a/b?x=1&y[]=2&y[]=3");
/// assert_eq!(serialize(&json!({})), "#!");
/// ```
pub fn serialize(value: &Value) -> String {
    serialize_with(value, &Separator::default())
}

/// Serialize `value` as `separator + path? + ('?' + query)?`.
pub fn serialize_with(value: &Value, separator: &Separator) -> String {
    let mut pairs = Vec::new();
    let mut keys = Vec::new();
    collect_pairs(value, &mut keys, &mut pairs);
    let query = pairs.join("&");
    let path = root_path(value);

    let mut out = String::with_capacity(separator.as_str().len() + path.len() + query.len() + 1);
    out.push_str(separator.as_str());
    out.push_str(&path);
    if !path.is_empty() && !query.is_empty() {
        out.push('?');
    }
    out.push_str(&query);
    out
}

/// Text form of a scalar: `true` is `"1"`, `false` and `null` are empty.
///
/// Returns `None` for arrays and objects.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => Some(String::new()),
        Value::Bool(true) => Some("1".to_owned()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn root_path(value: &Value) -> String {
    match value.get(PATH_KEY) {
        None => String::new(),
        Some(path) => scalar_text(path).unwrap_or_else(|| {
            tracing::warn!(path = %path, "unsupported `#path` value skipped");
            String::new()
        }),
    }
}

fn collect_pairs(value: &Value, keys: &mut Vec<String>, out: &mut Vec<String>) {
    match value {
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                let segment = match item {
                    Value::Array(_) | Value::Object(_) => i.to_string(),
                    _ => String::new(),
                };
                keys.push(segment);
                collect_pairs(item, keys, out);
                keys.pop();
            }
        }
        Value::Object(map) => {
            for (key, item) in map {
                if key == PATH_KEY {
                    continue;
                }
                keys.push(encode_component(key).into_owned());
                collect_pairs(item, keys, out);
                keys.pop();
            }
        }
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            out.push(format_pair(keys, &text));
        }
    }
}

fn format_pair(keys: &[String], text: &str) -> String {
    let mut pair = match keys.split_first() {
        Some((first, _)) if !first.is_empty() => first.clone(),
        _ => NO_KEY.to_owned(),
    };
    if keys.len() > 1 {
        pair.push('[');
        pair.push_str(&keys[1..].join("]["));
        pair.push(']');
    }
    if !text.is_empty() {
        pair.push('=');
        pair.push_str(&encode_component(text));
    }
    pair
}
