//! Screen that loads its content over HTTP.
//!
//! `RequestScreen` is where a navigation decides how content is resolved:
//!
//! 1. The path is resolved against the current location and forced onto the
//!    location's protocol, host and port. A pending form submission turns the
//!    request into a multipart POST.
//! 2. GET loads for a path already in the screen's cache resolve from the cache.
//!    POST loads never read or fill it.
//! 3. Otherwise the request is fetched on its own task and raced against the
//!    timeout. A timed-out fetch keeps running; its result is discarded.
//! 4. Responses outside 200..=399 fail with the status attached. Successful GET
//!    content is cached under the normalized path.
//!
//! The response's final URL and headers stay on the [`Request`] handle so the
//! history path can follow server-side redirects.

use crate::config::{NavigatorConfig, DEFAULT_TIMEOUT_MS};
use crate::context::BrowsingContext;
use crate::dom::Document;
use crate::errors::LoadError;
use crate::net::{FormData, Fetcher, HttpMethod, Request, RequestBody};
use crate::screen::{HistoryState, Screen, ScreenCache, ScreenContent, ScreenId};
use crate::useragent::BrowserQuirks;
use crate::utils;
use futures::future::BoxFuture;
use http::header::IF_NONE_MATCH;
use http::{HeaderMap, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Response header a server sets to announce the URL a request ended up on.
pub const REQUEST_URL_HEADER: &str = "X-Request-URL";

pub struct RequestScreen {
    id: ScreenId,
    fetcher: Arc<dyn Fetcher>,
    http_method: HttpMethod,
    http_headers: HeaderMap,
    /// Timeout in milliseconds
    timeout_ms: u64,
    cache: ScreenCache,
    /// Most recent request, with its response once settled
    request: Option<Request>,
    /// Content of the most recent successful load
    content: Option<ScreenContent>,
}

impl RequestScreen {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            id: ScreenId::new(),
            fetcher,
            http_method: HttpMethod::Get,
            http_headers: NavigatorConfig::default().header_map(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cache: ScreenCache::new(true),
            request: None,
            content: None,
        }
    }

    pub fn with_config(config: &NavigatorConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let mut screen = Self::new(fetcher);
        screen.http_headers = config.header_map();
        screen.timeout_ms = config.timeout_ms;
        screen
    }

    pub fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    pub fn set_http_method(&mut self, method: HttpMethod) {
        self.http_method = method;
    }

    pub fn http_headers(&self) -> &HeaderMap {
        &self.http_headers
    }

    /// Replaces all request headers, defaults included.
    pub fn set_http_headers(&mut self, headers: HeaderMap) {
        self.http_headers = headers;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout_ms
    }

    /// Sets the timeout in milliseconds. `0` fails any load that does not settle
    /// before the runtime gets to run other tasks.
    pub fn set_timeout(&mut self, timeout_ms: u64) {
        self.timeout_ms = timeout_ms;
    }

    /// Caches `content` under the path of the most recent request. Without a prior
    /// request the entry answers the next GET load for any path.
    pub fn add_cache(&mut self, content: ScreenContent) {
        let path = self.request_path();
        self.cache.add(path.as_deref(), content);
    }

    pub fn cache(&self) -> &ScreenCache {
        &self.cache
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Most recent request issued by this screen.
    pub fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }

    /// Normalized path of the most recent request, without any cache-busting marker.
    pub fn request_path(&self) -> Option<String> {
        self.request
            .as_ref()
            .map(|r| utils::url_path(&utils::remove_unique_param(&r.url)))
    }

    /// Content of the most recent successful load.
    pub fn content(&self) -> Option<&ScreenContent> {
        self.content.as_ref()
    }

    /// Resolves `path` into the URL to request: same protocol, host and port as the
    /// current location, no fragment, plus a cache-busting marker for GETs on
    /// browsers that need one.
    fn format_load_path(&self, path: &str, ctx: &BrowsingContext, method: HttpMethod) -> Result<Url, LoadError> {
        let location = ctx.location();
        let invalid = |what: &str| LoadError::Request {
            message: format!("cannot {what} for {path:?}"),
        };

        let mut url = utils::resolve(location, path).map_err(|_| invalid("resolve path"))?;
        if url.scheme() != location.scheme() {
            url.set_scheme(location.scheme()).map_err(|_| invalid("apply page protocol"))?;
        }
        url.set_host(location.host_str()).map_err(|_| invalid("apply page host"))?;
        url.set_port(location.port()).map_err(|_| invalid("apply page port"))?;
        url.set_fragment(None);

        if method == HttpMethod::Get && ctx.user_agent().needs_cache_busting() {
            utils::make_unique(&mut url);
        }
        Ok(url)
    }

    /// Loads the content for `path`. See the module documentation for the algorithm.
    pub async fn load_content(&mut self, path: &str, ctx: &BrowsingContext) -> Result<ScreenContent, LoadError> {
        let form = ctx.captured_form();
        let method = if form.is_some() { HttpMethod::Post } else { self.http_method };

        let url = self.format_load_path(path, ctx, method)?;
        let cache_key = utils::url_path_without_hash(&utils::remove_unique_param(&url));

        if method == HttpMethod::Get {
            if let Some(cached) = self.cache.get(&cache_key) {
                log::debug!("RequestScreen[{}]: cache hit for {}", self.id, cache_key);
                self.content = Some(cached.clone());
                return Ok(cached);
            }
        }

        let mut request = Request::new(method, url);
        request.headers = self.http_headers.clone();
        if let Some(form) = form {
            request.body = Some(RequestBody::Multipart(FormData::from_form(form)));
            if ctx.user_agent().needs_redirect_validator() {
                request.headers.insert(IF_NONE_MATCH, HeaderValue::from_static("\"0\""));
            }
        }
        self.request = Some(request.clone());

        log::debug!("RequestScreen[{}]: {} {}", self.id, method, request.url);

        // The fetch runs on its own task; on timeout the handle is dropped, which
        // detaches the task without aborting it.
        let mut task = tokio::spawn(self.fetcher.fetch(request));
        let joined = tokio::select! {
            biased;
            joined = &mut task => joined,
            _ = expire(self.timeout_ms) => {
                log::warn!("RequestScreen[{}]: timed out after {}ms loading {}", self.id, self.timeout_ms, path);
                return Err(LoadError::Timeout { timeout_ms: self.timeout_ms });
            }
        };

        let response = match joined {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                log::warn!("RequestScreen[{}]: request error loading {}: {}", self.id, path, e);
                return Err(LoadError::Request { message: e.to_string() });
            }
            Err(e) => {
                log::error!("RequestScreen[{}]: fetch task failed: {}", self.id, e);
                return Err(LoadError::Request { message: e.to_string() });
            }
        };

        if let Some(request) = self.request.as_mut() {
            request.response = Some(response.meta());
        }

        if !is_valid_status(response.status) {
            log::warn!("RequestScreen[{}]: invalid status {} for {}", self.id, response.status, path);
            return Err(LoadError::InvalidStatus { status_code: response.status });
        }

        let content: ScreenContent = Arc::from(response.text());
        if method == HttpMethod::Get {
            self.cache.add(Some(&cache_key), content.clone());
        }
        self.content = Some(content.clone());
        Ok(content)
    }
}

fn is_valid_status(status: u16) -> bool {
    (200..=399).contains(&status)
}

async fn expire(timeout_ms: u64) {
    if timeout_ms == 0 {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
    }
}

impl Screen for RequestScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn is_cacheable(&self) -> bool {
        true
    }

    fn load<'a>(
        &'a mut self,
        path: &'a str,
        ctx: &'a BrowsingContext,
    ) -> BoxFuture<'a, Result<ScreenContent, LoadError>> {
        Box::pin(self.load_content(path, ctx))
    }

    fn flip(&mut self, document: &mut Document) {
        if let Some(content) = &self.content {
            document.body.inner_html = content.to_string();
        }
    }

    /// Prefers the `X-Request-URL` header, then the post-redirect response URL, then
    /// the requested path.
    fn before_update_history_path(&self, path: &str) -> String {
        let Some(request) = &self.request else {
            return path.to_string();
        };
        let Some(response) = &request.response else {
            return path.to_string();
        };

        let announced = response
            .headers
            .get(REQUEST_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| response.url.join(v).ok());
        if let Some(url) = announced {
            return utils::url_path(&url);
        }

        let requested = utils::remove_unique_param(&request.url);
        let landed = utils::remove_unique_param(&response.url);
        if landed != requested {
            log::debug!("RequestScreen[{}]: {} redirected to {}", self.id, requested, landed);
            return utils::url_path(&landed);
        }

        path.to_string()
    }

    fn before_update_history_state(&self, state: HistoryState) -> Option<HistoryState> {
        if state.is_post_without_redirect_get() {
            return None;
        }
        Some(state)
    }

    fn dispose(&mut self) {
        self.cache.clear();
        self.content = None;
        self.request = None;
    }
}
