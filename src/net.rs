//! Network layer: the request/response model and the fetch primitive screens load through.

mod fetch;
mod form;
mod request;
mod response;

pub use fetch::{FetchError, Fetcher, HttpFetcher};
pub use form::{CapturedForm, FieldKind, FormData, FormField, FormValue};
pub use request::{HttpMethod, Request, RequestBody};
pub use response::{Response, ResponseMeta};
