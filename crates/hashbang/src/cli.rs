//! Core logic behind the `hashbang-parse` and `hashbang-serialize` binaries.

use hashbang_codec::{decode, serialize_with, Separator};
use serde_json::Value;

use crate::HashbangError;

fn separator_or_default(separator: Option<&str>) -> Result<Separator, HashbangError> {
    match separator {
        Some(s) => Ok(Separator::new(s)?),
        None => Ok(Separator::default()),
    }
}

/// Parse a fragment into pretty-printed JSON.
///
/// A fragment without the separator is reported on stderr by the caller
/// and still yields `{}`, matching what the store installs for it.
pub fn parse_fragment(fragment: &str, separator: Option<&str>) -> Result<(String, bool), HashbangError> {
    let separator = separator_or_default(separator)?;
    let decoded = decode(fragment, &separator);
    let text = serde_json::to_string_pretty(&decoded.value)?;
    Ok((text, decoded.format.is_hashbang()))
}

/// Serialize a JSON document into a fragment.
pub fn serialize_json(json: &str, separator: Option<&str>) -> Result<String, HashbangError> {
    let separator = separator_or_default(separator)?;
    let value: Value = serde_json::from_str(json)?;
    if !value.is_object() {
        return Err(HashbangError::NotObject);
    }
    Ok(serialize_with(&value, &separator))
}
