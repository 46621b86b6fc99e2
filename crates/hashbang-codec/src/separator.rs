//! Fragment prefix handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::CodecError;

/// Prefix used when no separator is configured.
pub const DEFAULT_SEPARATOR: &str = "#!";

/// Classification of a fragment against the hashbang grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentFormat {
    /// Empty, a lone `#`, or starts with the separator.
    Hashbang,
    /// Anything else. Decodes to an empty object.
    Unparsable,
}

impl FragmentFormat {
    pub fn is_hashbang(self) -> bool {
        self == FragmentFormat::Hashbang
    }
}

/// The prefix both `parse` requires and `serialize` emits.
///
/// Deserializing goes through [`Separator::new`], so an empty separator is
/// rejected at load time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Separator(String);

impl Separator {
    /// Create a separator, rejecting the empty string.
    ///
    /// # Example
    ///
    /// ```
    /// use hashbang_codec::Separator;
    ///
    /// assert_eq!(Separator::new("#").unwrap().as_str(), "#");
    /// assert!(Separator::new("").is_err());
    /// ```
    pub fn new(separator: impl Into<String>) -> Result<Self, CodecError> {
        let separator = separator.into();
        if separator.is_empty() {
            return Err(CodecError::EmptySeparator);
        }
        Ok(Self(separator))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the fragment body after the separator, or `None` when the
    /// fragment does not follow the hashbang grammar.
    ///
    /// Browsers drop the `#` of an empty fragment, so `""` and `"#"` are both
    /// accepted as an empty hashbang.
    pub fn strip<'a>(&self, fragment: &'a str) -> Option<&'a str> {
        if fragment.is_empty() || fragment == "#" {
            return Some("");
        }
        fragment.strip_prefix(self.0.as_str())
    }

    pub fn classify(&self, fragment: &str) -> FragmentFormat {
        match self.strip(fragment) {
            Some(_) => FragmentFormat::Hashbang,
            None => FragmentFormat::Unparsable,
        }
    }

    pub fn is_hashbang(&self, fragment: &str) -> bool {
        self.classify(fragment).is_hashbang()
    }
}

impl Default for Separator {
    fn default() -> Self {
        Self(DEFAULT_SEPARATOR.to_owned())
    }
}

impl FromStr for Separator {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Separator {
    type Error = CodecError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Separator> for String {
    fn from(separator: Separator) -> Self {
        separator.0
    }
}

impl AsRef<str> for Separator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
