//! URL helpers shared by screens and the app.
//!
//! Paths handed around by the navigator are *relative* paths (`/path?query#hash`).
//! These helpers resolve them against the current location and cut URLs back down
//! to the parts that matter for routing, caching and history.

use rand::distr::Alphanumeric;
use rand::Rng;
use url::Url;

/// Query parameter carrying the cache-busting marker.
pub const UNIQUE_PARAM: &str = "zx";

/// Resolves a possibly relative `path` against `base`.
pub fn resolve(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    base.join(path)
}

/// Returns `pathname + search + hash` of the url.
pub fn url_path(url: &Url) -> String {
    let mut out = url_path_without_hash(url);
    if let Some(fragment) = url.fragment() {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Returns `pathname + search` of the url.
pub fn url_path_without_hash(url: &Url) -> String {
    let mut out = url.path().to_string();
    if let Some(query) = url.query() {
        out.push('?');
        out.push_str(query);
    }
    out
}

/// Returns only the pathname of the url.
pub fn url_path_without_hash_and_search(url: &Url) -> String {
    url.path().to_string()
}

/// Path of the current location, including the hash.
pub fn current_browser_path(location: &Url) -> String {
    url_path(location)
}

/// Path of the current location, without the hash.
pub fn current_browser_path_without_hash(location: &Url) -> String {
    url_path_without_hash(location)
}

/// Returns true when `path` points at the current location, ignoring the hash.
pub fn is_current_browser_path(location: &Url, path: &str) -> bool {
    if path.is_empty() {
        return false;
    }
    match resolve(location, path) {
        Ok(url) => url_path_without_hash(&url) == current_browser_path_without_hash(location),
        Err(_) => false,
    }
}

/// Appends a random [`UNIQUE_PARAM`] so browser caches cannot reuse an earlier response.
pub fn make_unique(url: &mut Url) {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();
    url.query_pairs_mut().append_pair(UNIQUE_PARAM, &token);
}

/// Strips the [`UNIQUE_PARAM`] added by [`make_unique`], leaving every other parameter in order.
pub fn remove_unique_param(url: &Url) -> Url {
    let Some(query) = url.query() else {
        return url.clone();
    };

    // Works on the raw segments so the remaining query keeps its original encoding
    let marker = format!("{UNIQUE_PARAM}=");
    let is_unique = |segment: &str| segment == UNIQUE_PARAM || segment.starts_with(&marker);
    if !query.split('&').any(is_unique) {
        return url.clone();
    }

    let kept: Vec<&str> = query.split('&').filter(|segment| !is_unique(*segment)).collect();
    let mut out = url.clone();
    if kept.is_empty() {
        out.set_query(None);
    } else {
        out.set_query(Some(&kept.join("&")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> Url {
        Url::parse("http://localhost:8080/current?a=1#top").unwrap()
    }

    #[test]
    fn path_helpers() {
        let url = Url::parse("http://example.com/path/to?x=1&y=2#frag").unwrap();
        assert_eq!(url_path(&url), "/path/to?x=1&y=2#frag");
        assert_eq!(url_path_without_hash(&url), "/path/to?x=1&y=2");
        assert_eq!(url_path_without_hash_and_search(&url), "/path/to");
    }

    #[test]
    fn current_path_ignores_hash() {
        assert_eq!(current_browser_path(&loc()), "/current?a=1#top");
        assert!(is_current_browser_path(&loc(), "/current?a=1#other"));
        assert!(!is_current_browser_path(&loc(), "/current?a=2"));
        assert!(!is_current_browser_path(&loc(), ""));
    }

    #[test]
    fn resolve_relative_paths() {
        let url = resolve(&loc(), "next?b=2").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/next?b=2");
    }

    #[test]
    fn unique_param_is_added_and_removed() {
        let mut url = Url::parse("http://localhost/url?keep=1").unwrap();
        make_unique(&mut url);
        assert!(url.query().unwrap().contains("zx="));
        assert_eq!(remove_unique_param(&url).as_str(), "http://localhost/url?keep=1");

        let mut bare = Url::parse("http://localhost/url").unwrap();
        make_unique(&mut bare);
        assert_eq!(remove_unique_param(&bare).as_str(), "http://localhost/url");
    }

    #[test]
    fn removing_unique_param_keeps_query_encoding() {
        let untouched = Url::parse("http://localhost/search?q=a%20b&flag").unwrap();
        assert_eq!(remove_unique_param(&untouched).as_str(), "http://localhost/search?q=a%20b&flag");

        let mut url = untouched.clone();
        make_unique(&mut url);
        assert_eq!(remove_unique_param(&url).as_str(), "http://localhost/search?q=a%20b&flag");

        let inner = Url::parse("http://localhost/search?q=a+b&zx=abc&flag&empty=").unwrap();
        assert_eq!(remove_unique_param(&inner).as_str(), "http://localhost/search?q=a+b&flag&empty=");
    }
}
