//! URL component escaping.
//!
//! Encoding matches `encodeURIComponent`: everything except
//! `A-Z a-z 0-9 - _ . ! ~ * ' ( )` is percent-encoded as UTF-8.
//! Decoding never fails; malformed escapes are kept verbatim and invalid
//! UTF-8 is replaced with U+FFFD. `+` is not a space.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::borrow::Cow;

const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a key segment or value.
///
/// # Example
///
/// ```
/// use hashbang_codec::encode_component;
///
/// assert_eq!(encode_component("a b&c"), "a%20b%26c");
/// assert_eq!(encode_component("it's-fine!"), "it's-fine!");
/// ```
pub fn encode_component(input: &str) -> Cow<'_, str> {
    utf8_percent_encode(input, COMPONENT).into()
}

/// Decode a percent-encoded key segment or value.
///
/// # Example
///
/// ```
/// use hashbang_codec::decode_component;
///
/// assert_eq!(decode_component("a%20b%26c"), "a b&c");
/// assert_eq!(decode_component("100%"), "100%");
/// ```
pub fn decode_component(input: &str) -> Cow<'_, str> {
    percent_decode_str(input).decode_utf8_lossy()
}
