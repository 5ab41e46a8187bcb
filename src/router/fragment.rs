use reqwest::Url;
use std::collections::HashMap;

/// Flat query mapping handed to view controllers.
pub type QueryParams = HashMap<String, String>;

/// ParsedFragment
///
/// A location fragment split into its route path and raw query string.
/// `path` is `None` for the home fragments (`""`, `"#"`, `"#/"`).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedFragment {
    pub path: Option<String>,
    pub query: Option<String>,
}

/// split
///
/// Parses `#/<path>[?<query>]`. The leading `#` and `/` are optional.
pub fn split(fragment: &str) -> ParsedFragment {
    let raw = fragment.strip_prefix('#').unwrap_or(fragment);
    let (path, query) = match raw.split_once('?') {
        Some((path, query)) => (path, Some(query.to_string())),
        None => (raw, None),
    };

    let path = match path.trim() {
        "" | "/" => None,
        p if p.starts_with('/') => Some(p.to_string()),
        p => Some(format!("/{p}")),
    };

    ParsedFragment {
        path,
        query: query.filter(|q| !q.is_empty()),
    }
}

/// parse_query
///
/// Decodes `a=1&b=2` into a flat map. `+` and percent escapes are decoded,
/// a key without `=` maps to an empty string and the last repeated key wins.
pub fn parse_query(query: &str) -> QueryParams {
    let query = query.strip_prefix('?').unwrap_or(query);
    if query.is_empty() {
        return QueryParams::new();
    }

    match Url::parse(&format!("http://localhost/?{query}")) {
        Ok(url) => url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, query, "unparseable query string ignored");
            QueryParams::new()
        }
    }
}
