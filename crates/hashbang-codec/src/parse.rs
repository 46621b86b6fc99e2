//! Fragment → value decoding.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::draft::Draft;
use crate::{decode_component, FragmentFormat, Separator, PATH_KEY};

/// Result of [`decode`]: the value plus the grammar classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub value: Value,
    pub format: FragmentFormat,
}

/// Leading path component. `&` and `=` are excluded even though a URL path
/// would allow them.
fn path_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(/[/A-Za-z0-9. %_~!$'()*+,;:@-]*)(\?|$)").expect("path pattern is valid")
    })
}

/// Parse a fragment using the default `#!` separator.
///
/// # Example
///
/// ```
/// use hashbang_codec::parse;
/// use serde_json::json;
///
/// assert_eq!(
///     parse("#!mod[id]=5&mod[name]=foo"),
///     json!({"mod": {"id": "5", "name": "foo"}}),
/// );
/// assert_eq!(parse("#section"), json!({}));
/// ```
pub fn parse(fragment: &str) -> Value {
    parse_with(fragment, &Separator::default())
}

/// Parse a fragment that starts with `separator`.
///
/// Never fails: a fragment outside the hashbang grammar yields `{}`.
pub fn parse_with(fragment: &str, separator: &Separator) -> Value {
    decode(fragment, separator).value
}

/// Parse a fragment and report whether it followed the hashbang grammar.
pub fn decode(fragment: &str, separator: &Separator) -> Decoded {
    let Some(body) = separator.strip(fragment) else {
        tracing::debug!(fragment, "fragment is not a hashbang");
        return Decoded {
            value: Value::Object(Map::new()),
            format: FragmentFormat::Unparsable,
        };
    };

    let mut draft = Draft::new();
    let mut query = body;
    if let Some(caps) = path_pattern().captures(body) {
        draft.insert_root(PATH_KEY, caps[1].to_owned());
        query = &body[caps[0].len()..];
    }

    for token in query.split('&').filter(|token| !token.is_empty()) {
        let (raw_key, raw_value) = token.split_once('=').unwrap_or((token, ""));
        let value = decode_component(raw_value).into_owned();
        let key = raw_key.strip_suffix(']').unwrap_or(raw_key).replace("][", "[");
        let segments: Vec<&str> = key.split('[').collect();
        draft.assign(&segments, value);
    }

    Decoded {
        value: draft.finish(),
        format: FragmentFormat::Hashbang,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_hashbangs() {
        assert_eq!(parse("#!"), json!({}));
        assert_eq!(parse("#"), json!({}));
        assert_eq!(parse(""), json!({}));
        assert_eq!(decode("#", &Separator::default()).format, FragmentFormat::Hashbang);
    }

    #[test]
    fn path_and_query() {
        assert_eq!(
            parse("#!/a/b?x=1&y[]=2&y[]=3"),
            json!({"#path": "/a/b", "x": "1", "y": ["2", "3"]})
        );
    }

    #[test]
    fn path_only() {
        assert_eq!(parse("#!/my/path"), json!({"#path": "/my/path"}));
    }

    #[test]
    fn path_with_ampersand_is_not_a_path() {
        assert_eq!(parse("#!/a&b=1"), json!({"/a": "", "b": "1"}));
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        assert_eq!(parse("#!q=a=b"), json!({"q": "a=b"}));
    }

    #[test]
    fn bare_key_is_empty_string() {
        assert_eq!(parse("#!flag"), json!({"flag": ""}));
    }

    #[test]
    fn stray_trailing_bracket() {
        assert_eq!(parse("#!a[b]]=1"), json!({"a": {"b]": "1"}}));
        assert_eq!(parse("#!a]=1"), json!({"a": "1"}));
    }

    #[test]
    fn encoded_keys_and_values() {
        assert_eq!(parse("#!a%20b[c%5Bd]=x%26y"), json!({"a b": {"c[d": "x&y"}}));
    }

    #[test]
    fn last_writer_wins() {
        assert_eq!(parse("#!a=1&a=2"), json!({"a": "2"}));
    }

    #[test]
    fn empty_tokens_are_skipped() {
        assert_eq!(parse("#!a=1&&b=2&"), json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn unparsable_yields_empty_object() {
        let decoded = decode("#top", &Separator::default());
        assert_eq!(decoded.value, json!({}));
        assert_eq!(decoded.format, FragmentFormat::Unparsable);
    }

    #[test]
    fn custom_separator() {
        let sep = Separator::new("#").unwrap();
        assert_eq!(parse_with("#/p?a=1", &sep), json!({"#path": "/p", "a": "1"}));
    }
}
