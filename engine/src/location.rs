//! Reading the initial connection seed from the launch location.

use url::{Url, form_urlencoded};

use scout_types::DEFAULT_CONNECTION_URI;

const URI_PARAM: &str = "uri";

/// Pick the initial connection seed.
///
/// The `uri` query parameter of `location` wins, then `configured`, then
/// `mongodb://localhost:27017`. Blank values fall through to the next source.
#[must_use]
pub fn initial_seed(location: Option<&str>, configured: Option<&str>) -> String {
    location
        .and_then(uri_from_location)
        .or_else(|| non_blank(configured).map(str::to_string))
        .unwrap_or_else(|| DEFAULT_CONNECTION_URI.to_string())
}

/// The first non-blank `uri` query parameter of `location`.
///
/// Accepts a full URL (`scout:///?uri=...`) or a bare query (`?uri=...`).
#[must_use]
pub fn uri_from_location(location: &str) -> Option<String> {
    let query = location_query(location)?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == URI_PARAM)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn location_query(location: &str) -> Option<String> {
    let trimmed = location.trim();
    if let Some(query) = trimmed.strip_prefix('?') {
        return Some(query.to_string());
    }
    match Url::parse(trimmed) {
        Ok(url) => url.query().map(str::to_string),
        Err(err) => {
            tracing::warn!(location = trimmed, %err, "ignoring unparseable launch location");
            None
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default() {
        assert_eq!(initial_seed(None, None), "mongodb://localhost:27017");
    }

    #[test]
    fn location_parameter_wins() {
        assert_eq!(
            initial_seed(Some("scout:///?uri=mongodb://host:1"), Some("mongodb://cfg:2")),
            "mongodb://host:1"
        );
    }

    #[test]
    fn configured_value_used_without_location_parameter() {
        assert_eq!(
            initial_seed(Some("scout:///?other=1"), Some("mongodb://cfg:2")),
            "mongodb://cfg:2"
        );
    }

    #[test]
    fn bare_query_is_accepted_and_decoded() {
        assert_eq!(
            uri_from_location("?uri=mongodb%3A%2F%2Fhost%3A1&x=y").as_deref(),
            Some("mongodb://host:1")
        );
    }

    #[test]
    fn first_parameter_wins() {
        assert_eq!(
            uri_from_location("?uri=mongodb://a:1&uri=mongodb://b:2").as_deref(),
            Some("mongodb://a:1")
        );
    }

    #[test]
    fn blank_parameter_falls_through() {
        assert_eq!(initial_seed(Some("?uri="), Some("  ")), "mongodb://localhost:27017");
    }

    #[test]
    fn unparseable_location_falls_through() {
        assert_eq!(initial_seed(Some("not a url"), None), "mongodb://localhost:27017");
    }
}
