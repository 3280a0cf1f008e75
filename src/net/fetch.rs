use crate::config::NavigatorConfig;
use crate::net::{FormData, FormValue, Request, RequestBody, Response};
use futures::future::BoxFuture;
use reqwest::multipart::{Form, Part};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Net(#[from] reqwest::Error),
    #[error("{0}")]
    Other(String),
}

/// The fetch primitive screens load through.
///
/// Implementations resolve with a response for any status code; only transport
/// failures are errors. The returned future must not borrow the fetcher so it can
/// outlive the load that started it.
pub trait Fetcher: Send + Sync {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, FetchError>>;
}

/// [`Fetcher`] backed by a `reqwest` client.
///
/// Cookies are kept in the client's own store, so every request carries the
/// credentials of the origin it targets. Redirects are followed and the final URL
/// is reported on the response.
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(config: &NavigatorConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, request: Request) -> BoxFuture<'static, Result<Response, FetchError>> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(RequestBody::Multipart(data)) = &request.body {
            match multipart_form(data) {
                Ok(form) => builder = builder.multipart(form),
                Err(e) => return Box::pin(async move { Err(e) }),
            }
        }

        Box::pin(async move {
            let res = builder.send().await?;

            // Fetch results
            let final_url = res.url().clone();
            let status = res.status().as_u16();
            let status_text = res.status().canonical_reason().unwrap_or("Unknown").to_string();
            let headers = res.headers().clone();

            // Fetch body. We don't do streaming yet
            let body = res.bytes().await?.to_vec();

            Ok(Response {
                url: final_url,
                status,
                status_text,
                headers,
                body,
            })
        })
    }
}

/// Builds the `multipart/form-data` body for `data`, keeping entry order.
fn multipart_form(data: &FormData) -> Result<Form, FetchError> {
    let mut form = Form::new();
    for (name, value) in data.entries() {
        form = match value {
            FormValue::Text(text) => form.text(name.clone(), text.clone()),
            FormValue::File {
                filename,
                content_type,
                data,
            } => {
                let part = Part::bytes(data.clone())
                    .file_name(filename.clone())
                    .mime_str(content_type)?;
                form.part(name.clone(), part)
            }
        };
    }
    Ok(form)
}
