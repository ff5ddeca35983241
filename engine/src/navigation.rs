//! Navigation fragment encoding.
//!
//! Turns a target location plus optional query parameters into the relative
//! fragment the history collaborator expects:
//!
//! ```text
//! navigate("/foo", params {a: 1, b: 2})  ->  "foo?a=1&b=2"  (trigger: true)
//! ```
//!
//! Parameters serialize in insertion order. Nested values use bracket
//! notation (`filter[name]=x`, `ids[0]=7`) and everything outside the RFC 3986
//! unreserved set is percent-encoded.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use thiserror::Error;

use scout_types::{HistoryNavigateOptions, QueryParams};

use crate::history::HistoryError;

/// Everything except `A-Z a-z 0-9 - . _ ~`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigateError {
    #[error("empty query parameter key{}", .parent.as_deref().map(|p| format!(" under `{p}`")).unwrap_or_default())]
    EmptyParamKey { parent: Option<String> },
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Caller-facing options for [`crate::ApplicationState::navigate`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
    /// Suppress the route callback.
    pub silent: bool,
    pub params: Option<QueryParams>,
}

impl NavigateOptions {
    #[must_use]
    pub fn silent() -> Self {
        Self {
            silent: true,
            params: None,
        }
    }

    #[must_use]
    pub fn with_params(params: QueryParams) -> Self {
        Self {
            silent: false,
            params: Some(params),
        }
    }
}

/// A single navigation, built per call and consumed immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationRequest {
    pub fragment: String,
    pub params: Option<QueryParams>,
    pub silent: bool,
}

/// The normalized path and history options a request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedNavigation {
    pub path: String,
    pub options: HistoryNavigateOptions,
}

impl NavigationRequest {
    #[must_use]
    pub fn new(fragment: impl Into<String>, options: NavigateOptions) -> Self {
        Self {
            fragment: fragment.into(),
            params: options.params,
            silent: options.silent,
        }
    }

    pub fn encode(self) -> Result<EncodedNavigation, NavigateError> {
        let path = encode_fragment(&self.fragment, self.params.as_ref())?;
        Ok(EncodedNavigation {
            path,
            options: HistoryNavigateOptions::new(!self.silent),
        })
    }
}

/// Append serialized `params` to `fragment` and normalize to relative form.
pub fn encode_fragment(fragment: &str, params: Option<&QueryParams>) -> Result<String, NavigateError> {
    let mut target = fragment.to_string();
    if let Some(params) = params.filter(|params| !params.is_empty()) {
        let query = stringify_params(params)?;
        target.push('?');
        target.push_str(&query);
    }
    Ok(strip_leading_slash(&target).to_string())
}

/// Strip exactly one leading `/`.
#[must_use]
pub fn strip_leading_slash(fragment: &str) -> &str {
    fragment.strip_prefix('/').unwrap_or(fragment)
}

/// Serialize `params` as `key=value` pairs joined by `&`, in insertion order.
pub fn stringify_params(params: &QueryParams) -> Result<String, NavigateError> {
    let mut pairs = Vec::with_capacity(params.len());
    for (key, value) in params {
        if key.is_empty() {
            return Err(NavigateError::EmptyParamKey { parent: None });
        }
        push_pairs(key, value, &mut pairs)?;
    }
    Ok(pairs.join("&"))
}

fn push_pairs(prefix: &str, value: &Value, pairs: &mut Vec<String>) -> Result<(), NavigateError> {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                if key.is_empty() {
                    return Err(NavigateError::EmptyParamKey {
                        parent: Some(prefix.to_string()),
                    });
                }
                push_pairs(&format!("{prefix}[{key}]"), child, pairs)?;
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                push_pairs(&format!("{prefix}[{index}]"), child, pairs)?;
            }
        }
        Value::Null => pairs.push(format!("{}=", encode_component(prefix))),
        Value::Bool(flag) => pairs.push(pair(prefix, &flag.to_string())),
        Value::Number(number) => pairs.push(pair(prefix, &number.to_string())),
        Value::String(text) => pairs.push(pair(prefix, text)),
    }
    Ok(())
}

fn pair(key: &str, value: &str) -> String {
    format!("{}={}", encode_component(key), encode_component(value))
}

fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, QUERY_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> QueryParams {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn params_append_in_insertion_order() {
        let p = params(json!({"a": 1, "b": 2}));
        assert_eq!(encode_fragment("foo", Some(&p)).unwrap(), "foo?a=1&b=2");

        let p = params(json!({"b": 2, "a": 1}));
        assert_eq!(encode_fragment("foo", Some(&p)).unwrap(), "foo?b=2&a=1");
    }

    #[test]
    fn absolute_and_relative_fragments_normalize_identically() {
        assert_eq!(encode_fragment("/foo", None).unwrap(), "foo");
        assert_eq!(encode_fragment("foo", None).unwrap(), "foo");
    }

    #[test]
    fn only_one_leading_slash_is_stripped() {
        assert_eq!(encode_fragment("//foo", None).unwrap(), "/foo");
        assert_eq!(encode_fragment("/", None).unwrap(), "");
    }

    #[test]
    fn empty_params_leave_fragment_alone() {
        let p = QueryParams::new();
        assert_eq!(encode_fragment("/foo", Some(&p)).unwrap(), "foo");
    }

    #[test]
    fn params_that_serialize_to_nothing_keep_the_separator() {
        let p = params(json!({"ids": [], "filter": {}}));
        assert_eq!(encode_fragment("foo", Some(&p)).unwrap(), "foo?");
    }

    #[test]
    fn values_are_percent_encoded() {
        let p = params(json!({"uri": "mongodb://host:1", "q": "a b&c", "t": "~x_y.z-"}));
        assert_eq!(
            stringify_params(&p).unwrap(),
            "uri=mongodb%3A%2F%2Fhost%3A1&q=a%20b%26c&t=~x_y.z-"
        );
    }

    #[test]
    fn nested_values_use_bracket_notation() {
        let p = params(json!({"filter": {"name": "x"}, "ids": [7, 8]}));
        assert_eq!(
            stringify_params(&p).unwrap(),
            "filter%5Bname%5D=x&ids%5B0%5D=7&ids%5B1%5D=8"
        );
    }

    #[test]
    fn scalars_use_json_text() {
        let p = params(json!({"on": true, "n": null, "f": 1.5}));
        assert_eq!(stringify_params(&p).unwrap(), "on=true&n=&f=1.5");
    }

    #[test]
    fn empty_top_level_key_is_malformed() {
        let p = params(json!({"": 1}));
        assert_eq!(
            encode_fragment("foo", Some(&p)),
            Err(NavigateError::EmptyParamKey { parent: None })
        );
    }

    #[test]
    fn empty_nested_key_names_its_parent() {
        let p = params(json!({"filter": {"": 1}}));
        let err = stringify_params(&p).unwrap_err();
        assert_eq!(err.to_string(), "empty query parameter key under `filter`");
    }

    #[test]
    fn silent_request_disables_trigger() {
        let encoded = NavigationRequest::new("foo", NavigateOptions::silent())
            .encode()
            .unwrap();
        assert_eq!(encoded.path, "foo");
        assert!(!encoded.options.trigger);
    }

    #[test]
    fn default_request_triggers() {
        let encoded = NavigationRequest::new("/foo", NavigateOptions::default())
            .encode()
            .unwrap();
        assert_eq!(encoded.options, HistoryNavigateOptions::new(true));
    }
}
