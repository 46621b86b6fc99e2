//! Hashbang fragment codec.
//!
//! Converts between a URL fragment written in bracket notation and a nested
//! [`serde_json::Value`]:
//!
//! - `#!/PATH/PART?VARIABLES` and `#!VARIABLES` fragment forms,
//! - arrays: `var[]=val&var[]=val` or `var[0][a]=val&var[1][a]=val`,
//! - objects: `var[prop]=val&var[prop2]=val`.
//!
//! A leading path component is kept under the reserved [`PATH_KEY`] entry of
//! the root object. Decoded scalars are always strings.
//!
//! # Example
//!
//! ```
//! use hashbang_codec::{parse, serialize};
//! use serde_json::json;
//!
//! let value = parse("#!/a/b?x=1&y[]=2&y[]=3");
//! assert_eq!(value, json!({"#path": "/a/b", "x": "1", "y": ["2", "3"]}));
//!
//! assert_eq!(serialize(&json!({"a": true, "b": false, "c": ""})), "#!a=1&b&c");
//! ```

use thiserror::Error;

mod draft;
pub mod encoding;
pub mod parse;
pub mod separator;
pub mod serialize;

pub use encoding::{decode_component, encode_component};
pub use parse::{decode, parse, parse_with, Decoded};
pub use separator::{FragmentFormat, Separator, DEFAULT_SEPARATOR};
pub use serialize::{scalar_text, serialize, serialize_with};

/// Reserved root key holding the positional path component (`/a/b`).
pub const PATH_KEY: &str = "#path";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("separator must not be empty")]
    EmptySeparator,
}
