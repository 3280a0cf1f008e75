pub mod app;
pub mod config;
pub mod context;
pub mod dom;
pub mod errors;
pub mod net;
pub mod screen;
pub mod useragent;
pub mod utils;

pub use app::{App, NavigationEvent, Route};
pub use config::NavigatorConfig;
pub use context::BrowsingContext;
pub use errors::{LoadError, NavigationError};
pub use screen::{BaseScreen, HtmlScreen, RequestScreen, Screen};
