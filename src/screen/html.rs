//! Screen whose content is markup.
//!
//! `HtmlScreen` loads exactly like a [`RequestScreen`] (same cache, timeout, redirect
//! and form handling). What it adds is the interpretation: the fetched markup becomes a
//! [`VirtualDocument`], and flipping copies the matching surfaces, the title and the
//! `<body>` attributes into the live document.

use crate::config::NavigatorConfig;
use crate::context::BrowsingContext;
use crate::dom::{clear_node_attributes, copy_node_attributes, Document};
use crate::errors::LoadError;
use crate::net::Fetcher;
use crate::screen::{HistoryState, RequestScreen, Screen, ScreenContent, ScreenId};
use futures::future::BoxFuture;
use std::sync::Arc;

mod document;

pub use document::VirtualDocument;

pub struct HtmlScreen {
    inner: RequestScreen,
    virtual_document: Option<VirtualDocument>,
    title: Option<String>,
}

impl HtmlScreen {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::from_request_screen(RequestScreen::new(fetcher))
    }

    pub fn with_config(config: &NavigatorConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self::from_request_screen(RequestScreen::with_config(config, fetcher))
    }

    pub fn from_request_screen(inner: RequestScreen) -> Self {
        Self {
            inner,
            virtual_document: None,
            title: None,
        }
    }

    /// The request machinery this screen loads through.
    pub fn request_screen(&self) -> &RequestScreen {
        &self.inner
    }

    pub fn request_screen_mut(&mut self) -> &mut RequestScreen {
        &mut self.inner
    }

    pub fn virtual_document(&self) -> Option<&VirtualDocument> {
        self.virtual_document.as_ref()
    }

    /// Parses `content` and resolves the title from it.
    pub fn allocate_virtual_document_for_content(&mut self, content: &str) {
        let document = VirtualDocument::parse(content);
        self.title = document.title();
        self.virtual_document = Some(document);
    }

    /// Inner markup of the element with id `surface_id` in the loaded content.
    pub fn surface_content(&self, surface_id: &str) -> Option<String> {
        self.virtual_document
            .as_ref()
            .and_then(|doc| doc.element_by_id(surface_id))
            .map(|el| el.inner_html)
    }

    async fn load_markup(&mut self, path: &str, ctx: &BrowsingContext) -> Result<ScreenContent, LoadError> {
        let content = self.inner.load_content(path, ctx).await?;
        self.allocate_virtual_document_for_content(&content);
        Ok(content)
    }
}

impl Screen for HtmlScreen {
    fn id(&self) -> ScreenId {
        self.inner.id()
    }

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn is_cacheable(&self) -> bool {
        self.inner.is_cacheable()
    }

    fn load<'a>(
        &'a mut self,
        path: &'a str,
        ctx: &'a BrowsingContext,
    ) -> BoxFuture<'a, Result<ScreenContent, LoadError>> {
        Box::pin(self.load_markup(path, ctx))
    }

    fn flip(&mut self, document: &mut Document) {
        let Some(virtual_document) = &self.virtual_document else {
            return;
        };

        for (id, surface) in document.surfaces.iter_mut() {
            match virtual_document.element_by_id(id) {
                Some(el) => surface.inner_html = el.inner_html,
                None => log::debug!("HtmlScreen[{}]: no content for surface {}", self.id(), id),
            }
        }

        if let Some(title) = &self.title {
            document.title = title.clone();
        }

        if let Some(body) = virtual_document.body() {
            let current_id = document.body.id().map(str::to_string);
            clear_node_attributes(&mut document.body);
            copy_node_attributes(&body, &mut document.body);
            if let (None, Some(id)) = (body.id(), current_id) {
                document.body.set_attribute("id", id);
            }
        }
    }

    fn evaluate(&mut self, document: &mut Document) {
        document.resources = self
            .virtual_document
            .as_ref()
            .map(|doc| doc.resources())
            .unwrap_or_default();
    }

    fn before_update_history_path(&self, path: &str) -> String {
        self.inner.before_update_history_path(path)
    }

    fn before_update_history_state(&self, state: HistoryState) -> Option<HistoryState> {
        self.inner.before_update_history_state(state)
    }

    fn dispose(&mut self) {
        self.inner.dispose();
        self.virtual_document = None;
        self.title = None;
    }
}
