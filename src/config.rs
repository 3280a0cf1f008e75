//! Navigator configuration.
//!
//! `NavigatorConfig` holds the defaults every [`RequestScreen`](crate::screen::RequestScreen)
//! and the [`HttpFetcher`](crate::net::HttpFetcher) start from: the request timeout, the
//! headers sent with each navigation request, the base path the app lives under and the
//! HTTP client identity.
//!
//! # Examples
//!
//! ## Use defaults
//! ```rust
//! use gosub_navigator::config::NavigatorConfig;
//! let cfg = NavigatorConfig::default();
//! assert_eq!(cfg.timeout_ms, 30000);
//! ```
//!
//! ## Customize with the builder
//! ```rust
//! use gosub_navigator::config::NavigatorConfig;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let cfg = NavigatorConfig::builder()
//!     .timeout_ms(5000)
//!     .base_path("/app")
//!     .http_header("X-Client", "docs")
//!     .build()?; // returns Result<NavigatorConfig, ConfigError>
//! # Ok(()) }
//! ```
//!
//! # Errors
//!
//! Builder validation returns [`ConfigError`] for a malformed base path, an invalid
//! header name or value, or a redirect limit above [`MAX_REDIRECT_LIMIT`].

use http::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;

const DEFAULT_USER_AGENT: &str = "Gosub/1.0 (X11; Linux x86_64) Gecko/20250802 GosubBrowser/1.0";

/// Default timeout for a navigation request, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30000;

/// Upper bound accepted for `max_redirects`.
pub const MAX_REDIRECT_LIMIT: usize = 20;

/// Headers every navigation request carries unless replaced.
pub fn default_http_headers() -> Vec<(String, String)> {
    vec![
        ("X-PJAX".to_string(), "true".to_string()),
        ("X-Requested-With".to_string(), "XMLHttpRequest".to_string()),
    ]
}

#[derive(Debug, Clone)]
pub struct NavigatorConfig {
    /// Request timeout in milliseconds. `0` times out as soon as the runtime yields.
    pub timeout_ms: u64,
    /// Headers sent with each navigation request, in order.
    pub http_headers: Vec<(String, String)>,
    /// Path prefix the app is mounted on (`""` or `/prefix`).
    pub base_path: String,
    /// User agent the HTTP fetcher identifies with
    pub user_agent: String,
    /// How many redirects the HTTP fetcher follows
    pub max_redirects: usize,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            http_headers: default_http_headers(),
            base_path: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_redirects: 10,
        }
    }
}

impl NavigatorConfig {
    pub fn builder() -> NavigatorConfigBuilder {
        NavigatorConfigBuilder::default()
    }

    /// Returns the configured headers as a header map. Invalid entries are skipped;
    /// configs built through the builder never contain any.
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in &self.http_headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(n), Ok(v)) => {
                    map.insert(n, v);
                }
                _ => log::warn!("NavigatorConfig: skipping invalid header {name:?}"),
            }
        }
        map
    }
}

/// Builder for [`NavigatorConfig`].
#[derive(Debug, Clone, Default)]
pub struct NavigatorConfigBuilder {
    inner: NavigatorConfig,
}

impl NavigatorConfigBuilder {
    #[inline]
    fn map(mut self, f: impl FnOnce(&mut NavigatorConfig)) -> Self {
        f(&mut self.inner);
        self
    }

    pub fn timeout_ms(self, ms: u64) -> Self { self.map(|c| c.timeout_ms = ms) }
    pub fn base_path<S: Into<String>>(self, path: S) -> Self { self.map(|c| c.base_path = path.into()) }
    pub fn user_agent<S: Into<String>>(self, ua: S) -> Self { self.map(|c| c.user_agent = ua.into()) }
    pub fn max_redirects(self, n: usize) -> Self { self.map(|c| c.max_redirects = n) }

    /// Adds (or replaces, case-insensitively) a single header.
    pub fn http_header<N: Into<String>, V: Into<String>>(self, name: N, value: V) -> Self {
        let (name, value) = (name.into(), value.into());
        self.map(|c| {
            c.http_headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
            c.http_headers.push((name, value));
        })
    }

    /// Replaces all headers, including the defaults.
    pub fn http_headers(self, headers: Vec<(String, String)>) -> Self { self.map(|c| c.http_headers = headers) }

    /// Apply multiple changes in one go.
    pub fn with(self, f: impl FnOnce(&mut NavigatorConfig)) -> Self { self.map(f) }

    /// Validate and build the final config.
    pub fn build(self) -> Result<NavigatorConfig, ConfigError> {
        validate(&self.inner)?;
        Ok(self.inner)
    }
}

// ---------- Validation ----------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidBasePath(String),
    InvalidHeader(String),
    TooManyRedirects(usize),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidBasePath(p) =>
                write!(f, "base_path {p:?} must be empty or start with '/' and not end with '/'"),
            ConfigError::InvalidHeader(h) =>
                write!(f, "header {h:?} is not a valid HTTP header"),
            ConfigError::TooManyRedirects(n) =>
                write!(f, "max_redirects {n} exceeds the limit of {MAX_REDIRECT_LIMIT}"),
        }
    }
}
impl std::error::Error for ConfigError {}

fn validate(c: &NavigatorConfig) -> Result<(), ConfigError> {
    if !c.base_path.is_empty() && (!c.base_path.starts_with('/') || c.base_path.ends_with('/')) {
        return Err(ConfigError::InvalidBasePath(c.base_path.clone()));
    }
    for (name, value) in &c.http_headers {
        if HeaderName::try_from(name.as_str()).is_err() || HeaderValue::try_from(value.as_str()).is_err() {
            return Err(ConfigError::InvalidHeader(name.clone()));
        }
    }
    if c.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::TooManyRedirects(c.max_redirects));
    }
    Ok(())
}
