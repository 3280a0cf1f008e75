//! Screens: the units of navigable content.
//!
//! A [`Screen`] resolves content for a path and attaches it to the document when the
//! navigation commits. The [`App`](crate::app::App) drives every screen through the same
//! lifecycle:
//!
//! ```text
//! load(path) -> [old.deactivate] -> flip(document) -> evaluate(document)
//!            -> before_update_history_path / before_update_history_state -> activate
//! ```
//!
//! Three variants ship with the crate:
//!
//! - [`BaseScreen`]: resolves empty content; useful for client-only views.
//! - [`RequestScreen`]: fetches content over HTTP with caching, timeout and
//!   redirect-aware history paths.
//! - [`HtmlScreen`]: a [`RequestScreen`] whose content is markup; it swaps the
//!   matching surfaces, title and body attributes into the document.

use crate::context::BrowsingContext;
use crate::dom::Document;
use crate::errors::LoadError;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use uuid::Uuid;

mod cache;
mod html;
mod request;

pub use cache::ScreenCache;
pub use html::{HtmlScreen, VirtualDocument};
pub use request::RequestScreen;

/// Content a screen resolved. Opaque to the navigation layer; shared so a cache hit
/// hands out the very same payload that was stored.
pub type ScreenContent = Arc<str>;

/// A unique identifier for a screen instance.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScreenId(Uuid);

impl ScreenId {
    /// Create a new unique `ScreenId` using a random UUID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScreenId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ScreenId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "screen_{}", self.0.simple())
    }
}

/// State stored with a history entry the navigator created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryState {
    /// Marks entries owned by the navigator
    pub senna: bool,
    /// Was the entry produced by a form submission
    pub form: bool,
    /// Path that was requested
    pub path: String,
    /// Path the request landed on after redirects
    pub redirect_path: String,
}

impl HistoryState {
    pub fn new(path: impl Into<String>, redirect_path: impl Into<String>, form: bool) -> Self {
        Self {
            senna: true,
            form,
            path: path.into(),
            redirect_path: redirect_path.into(),
        }
    }

    /// A form post that landed on its own path: the server did not redirect after the
    /// POST, so replaying this entry would resubmit the form.
    pub fn is_post_without_redirect_get(&self) -> bool {
        self.senna && self.form && self.redirect_path == self.path
    }
}

/// Lifecycle contract every navigable screen implements.
pub trait Screen: Send {
    fn id(&self) -> ScreenId;

    /// Title the document should take once this screen is active.
    fn title(&self) -> Option<&str> {
        None
    }

    /// May the app keep this screen around and reuse it for the same path?
    fn is_cacheable(&self) -> bool {
        false
    }

    /// Resolves the content for `path`.
    fn load<'a>(
        &'a mut self,
        path: &'a str,
        ctx: &'a BrowsingContext,
    ) -> BoxFuture<'a, Result<ScreenContent, LoadError>>;

    /// Attaches the loaded content to the document.
    fn flip(&mut self, _document: &mut Document) {}

    /// Registers scripts and styles the flipped content needs.
    fn evaluate(&mut self, _document: &mut Document) {}

    /// Path to record in history for a navigation that requested `path`.
    fn before_update_history_path(&self, path: &str) -> String {
        path.to_string()
    }

    /// State to push for this navigation, or `None` to leave history untouched.
    fn before_update_history_state(&self, state: HistoryState) -> Option<HistoryState> {
        Some(state)
    }

    fn before_activate(&mut self) {}

    fn activate(&mut self) {}

    /// Return `true` to cancel navigating away from this screen.
    fn before_deactivate(&mut self) -> bool {
        false
    }

    fn deactivate(&mut self) {}

    /// Releases everything the screen holds. Called before the app drops it.
    fn dispose(&mut self) {}
}

/// The plain screen: no content, not cacheable.
#[derive(Debug, Default)]
pub struct BaseScreen {
    id: ScreenId,
    title: Option<String>,
}

impl BaseScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }
}

impl Screen for BaseScreen {
    fn id(&self) -> ScreenId {
        self.id
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn load<'a>(
        &'a mut self,
        _path: &'a str,
        _ctx: &'a BrowsingContext,
    ) -> BoxFuture<'a, Result<ScreenContent, LoadError>> {
        Box::pin(async { Ok(ScreenContent::from("")) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn screen_ids_are_unique() {
        let a = ScreenId::new();
        let b = ScreenId::new();
        assert_ne!(a, b);
        assert!(a.to_string().starts_with("screen_"));
    }

    #[test]
    fn history_state_uses_browser_field_names() {
        let state = HistoryState::new("/post", "/post", true);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"senna": true, "form": true, "path": "/post", "redirectPath": "/post"})
        );

        let back: HistoryState = serde_json::from_value(json).unwrap();
        assert!(back.is_post_without_redirect_get());
        assert!(!HistoryState::new("/post", "/done", true).is_post_without_redirect_get());
        assert!(!HistoryState::new("/page", "/page", false).is_post_without_redirect_get());
    }

    #[tokio::test]
    async fn base_screen_defaults() {
        let mut screen = BaseScreen::new();
        let ctx = BrowsingContext::new(Url::parse("http://localhost/").unwrap());

        let content = screen.load("/anything", &ctx).await.unwrap();
        assert_eq!(&*content, "");
        assert!(!screen.is_cacheable());
        assert!(!screen.before_deactivate());
        assert_eq!(screen.before_update_history_path("/path"), "/path");

        let state = HistoryState::new("/post", "/post", true);
        assert_eq!(screen.before_update_history_state(state.clone()), Some(state));

        screen.set_title("Home");
        assert_eq!(screen.title(), Some("Home"));
    }
}
