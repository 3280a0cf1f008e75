use crate::net::{FormData, ResponseMeta};
use http::HeaderMap;
use std::fmt::{Display, Formatter};
use url::Url;

/// HTTP method a screen issues its navigation request with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
        }
    }
}

impl Display for HttpMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for http::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => http::Method::GET,
            HttpMethod::Post => http::Method::POST,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Multipart(FormData),
}

/// A navigation request and, once it settled, the response it produced.
///
/// The request part is fixed once the fetch starts. `response` is filled in when the
/// network call returns, whatever the status.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: HttpMethod,
    /// URL as sent, including any cache-busting parameter
    pub url: Url,
    pub headers: HeaderMap,
    pub body: Option<RequestBody>,
    pub response: Option<ResponseMeta>,
}

impl Request {
    pub fn new(method: HttpMethod, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
            response: None,
        }
    }

    /// Returns the form payload of a form submission.
    pub fn form_data(&self) -> Option<&FormData> {
        match &self.body {
            Some(RequestBody::Multipart(data)) => Some(data),
            None => None,
        }
    }
}
