//! Result deduplication — unique by URL or id within one response.
//!
//! First occurrence wins; providers already order results by backend
//! relevance, so no re-ranking happens here. Web and news results compare
//! by normalised URL so redirect-wrapped and tracking-tagged duplicates of
//! the same page collapse.

use std::collections::HashSet;
use std::hash::Hash;

use url::Url;

/// Query parameters stripped before URLs are compared.
const TRACKING_PARAMS: &[&str] = &["utm_source", "utm_medium", "utm_campaign", "fbclid", "gclid"];

/// Drop items whose key has been seen before, preserving order.
pub fn dedup_by_key<T, K, F>(items: Vec<T>, mut key: F) -> Vec<T>
where
    K: Eq + Hash,
    F: FnMut(&T) -> K,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

/// Canonicalise a URL for comparison.
///
/// Lowercases scheme and host, removes the fragment and known tracking
/// parameters, and trims a trailing slash. Unparseable input is compared
/// verbatim.
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    parsed.set_fragment(None);

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if kept.is_empty() {
        parsed.set_query(None);
    } else {
        let qs = kept
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        parsed.set_query(Some(&qs));
    }

    let path = parsed.path().to_string();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(&path[..path.len() - 1]);
    }

    parsed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence() {
        let items = vec![("a", 1), ("b", 2), ("a", 3)];
        let deduped = dedup_by_key(items, |(k, _)| *k);
        assert_eq!(deduped, vec![("a", 1), ("b", 2)]);
    }

    #[test]
    fn dedup_empty_input() {
        let deduped: Vec<i32> = dedup_by_key(vec![], |n| *n);
        assert!(deduped.is_empty());
    }

    #[test]
    fn normalize_lowercases_host() {
        assert_eq!(
            normalize_url("https://Example.COM/Path"),
            "https://example.com/Path"
        );
    }

    #[test]
    fn normalize_strips_fragment_and_trailing_slash() {
        assert_eq!(
            normalize_url("https://example.com/page/#top"),
            "https://example.com/page"
        );
    }

    #[test]
    fn normalize_preserves_root_slash() {
        assert_eq!(normalize_url("https://example.com/"), "https://example.com/");
    }

    #[test]
    fn normalize_removes_tracking_params_only() {
        assert_eq!(
            normalize_url("https://example.com/p?q=rust&utm_source=x&gclid=1"),
            "https://example.com/p?q=rust"
        );
    }

    #[test]
    fn normalize_invalid_url_verbatim() {
        assert_eq!(normalize_url("not a url"), "not a url");
    }

    #[test]
    fn equivalent_urls_compare_equal() {
        assert_eq!(
            normalize_url("https://Example.com/page/?utm_medium=m#sec"),
            normalize_url("https://example.com/page")
        );
    }
}
