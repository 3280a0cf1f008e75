//! Minimal HTTP response model.
//!
//! This struct represents a **fully buffered** HTTP response returned by a
//! [`Fetcher`](crate::net::Fetcher). It contains the final URL (after redirects, if the
//! client follows them), status code + reason, response headers, and the raw body bytes.
//!
//! ## Notes
//! - `headers` is an `http::HeaderMap`, which is **case-insensitive** for
//!   header names.
//! - `status_text` is typically derived from the status code’s canonical
//!   reason phrase and may be `"Unknown"` for non-standard codes.
//!
use http::header::CONTENT_TYPE;
use http::HeaderMap;
use url::Url;

/// Simple structure for HTTP responses.
#[derive(Debug, Clone)]
pub struct Response {
    /// Final URL of the response (after redirects, if any).
    pub url: Url,

    /// Numeric HTTP status code (e.g., `200`, `404`).
    pub status: u16,

    /// Human-readable reason phrase (e.g., `"OK"`, `"Not Found"`).
    pub status_text: String,

    /// Response headers as a case-insensitive map.
    pub headers: HeaderMap,

    /// Raw response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Builds a response with the canonical reason phrase for `status` and no headers.
    pub fn new(url: Url, status: u16, body: impl Into<Vec<u8>>) -> Self {
        let status_text = http::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("Unknown")
            .to_string();

        Self {
            url,
            status,
            status_text,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }

    /// Body decoded as text.
    pub fn text(&self) -> String {
        decode_response_body(&self.headers, &self.body)
    }

    /// Everything about the response except the body.
    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            url: self.url.clone(),
            status: self.status,
            headers: self.headers.clone(),
        }
    }
}

/// Response metadata kept on a request handle after the body has been consumed.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Final URL after redirects
    pub url: Url,
    pub status: u16,
    pub headers: HeaderMap,
}

/// Best-effort response body decoder:
/// - honors `Content-Type: ...; charset=...` when present
/// - falls back to lossy UTF-8
fn decode_response_body(headers: &HeaderMap, body: &[u8]) -> String {
    let mut charset: Option<String> = None;
    if let Some(ct) = headers.get(CONTENT_TYPE) {
        if let Ok(ct) = ct.to_str() {
            // small, permissive parse: look for "charset=..."
            if let Some(idx) = ct.to_ascii_lowercase().find("charset=") {
                let after = &ct[idx + "charset=".len()..];
                let end = after.find([';', ' ', '\t']).unwrap_or(after.len());
                charset = Some(after[..end].trim_matches('"').to_string());
            }
        }
    }

    match charset.as_deref() {
        Some(cs) if cs.eq_ignore_ascii_case("iso-8859-1") || cs.eq_ignore_ascii_case("latin1") => {
            body.iter().map(|&b| b as char).collect()
        }
        // UTF-8 and anything we have no decoder for
        _ => String::from_utf8_lossy(body).into_owned(),
    }
}
