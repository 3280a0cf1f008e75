//! Thin navigation driver.
//!
//! The [`App`] decides which link clicks and form submissions to intercept, picks the
//! screen for a path from its route table and walks it through the [`Screen`]
//! lifecycle. It owns the browsing context, the document and the session history, so
//! one navigation runs at a time.

use crate::config::NavigatorConfig;
use crate::context::BrowsingContext;
use crate::dom::Document;
use crate::errors::NavigationError;
use crate::net::CapturedForm;
use crate::screen::{HistoryState, Screen};
use crate::utils::{
    current_browser_path, is_current_browser_path, resolve, url_path, url_path_without_hash,
    url_path_without_hash_and_search,
};
use std::collections::HashMap;
use tokio::sync::broadcast;
use url::Url;

mod events;
mod history;
mod route;

pub use events::NavigationEvent;
pub use history::{History, HistoryEntry};
pub use route::{PathPredicate, Route, RouteMatcher, ScreenFactory};

const EVENT_CHANNEL_CAPACITY: usize = 64;

pub struct App {
    config: NavigatorConfig,
    context: BrowsingContext,
    document: Document,
    history: History,
    routes: Vec<Route>,
    /// Screens kept alive, keyed by path without hash. Holds the active screen too.
    screens: HashMap<String, Box<dyn Screen>>,
    active_path: Option<String>,
    event_tx: broadcast::Sender<NavigationEvent>,
}

impl App {
    pub fn new(config: NavigatorConfig, context: BrowsingContext, document: Document) -> Result<Self, NavigationError> {
        if !context.is_history_supported() {
            log::warn!("App: {}", NavigationError::HistoryUnsupported);
            return Err(NavigationError::HistoryUnsupported);
        }

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let history = History::new(context.location().clone());

        Ok(Self {
            config,
            context,
            document,
            history,
            routes: Vec::new(),
            screens: HashMap::new(),
            active_path: None,
            event_tx,
        })
    }

    pub fn add_route(&mut self, route: Route) -> &mut Self {
        self.routes.push(route);
        self
    }

    pub fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn context(&self) -> &BrowsingContext {
        &self.context
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    pub fn active_screen(&self) -> Option<&dyn Screen> {
        self.active_path
            .as_ref()
            .and_then(|path| self.screens.get(path))
            .map(|screen| screen.as_ref())
    }

    fn active_screen_mut(&mut self) -> Option<&mut Box<dyn Screen>> {
        let path = self.active_path.as_ref()?;
        self.screens.get_mut(path)
    }

    /// The screen kept for `path` (without hash), active or cached.
    pub fn screen(&self, path: &str) -> Option<&dyn Screen> {
        self.screens.get(path).map(|screen| screen.as_ref())
    }

    /// Disposes a kept screen. The active screen cannot be removed.
    pub fn remove_screen(&mut self, path: &str) -> bool {
        if self.active_path.as_deref() == Some(path) {
            return false;
        }
        match self.screens.remove(path) {
            Some(mut screen) => {
                screen.dispose();
                true
            }
            None => false,
        }
    }

    /// Disposes every kept screen except the active one.
    pub fn clear_screens_cache(&mut self) {
        let active = self.active_path.clone();
        self.screens.retain(|path, screen| {
            if Some(path) == active.as_ref() {
                return true;
            }
            screen.dispose();
            false
        });
    }

    /// Returns true when following `href` should be handled by the app instead of the
    /// browser: same origin, under the base path, routed and not a hash change on the
    /// current page.
    pub fn can_navigate(&self, href: &str) -> bool {
        let location = self.context.location();
        let Ok(url) = resolve(location, href) else {
            return false;
        };
        if url.origin() != self.context.origin() {
            return false;
        }
        if url.fragment().is_some() && is_current_browser_path(location, href) {
            return false;
        }
        self.find_route(&url).is_some()
    }

    /// Pathname of `url` relative to the base path, or `None` when outside of it.
    fn route_path(&self, url: &Url) -> Option<String> {
        let pathname = url_path_without_hash_and_search(url);
        let base = self.config.base_path.as_str();
        if base.is_empty() {
            return Some(pathname);
        }
        match pathname.strip_prefix(base)? {
            "" => Some("/".to_string()),
            rest if rest.starts_with('/') => Some(rest.to_string()),
            _ => None,
        }
    }

    fn find_route(&self, url: &Url) -> Option<usize> {
        let path = self.route_path(url)?;
        self.routes.iter().position(|route| route.matches_path(&path))
    }

    fn resolve_path(&self, path: &str) -> Result<Url, NavigationError> {
        resolve(self.context.location(), path).map_err(|e| NavigationError::InvalidUrl(format!("{path}: {e}")))
    }

    /// Intercepts a click on a link. Returns `Ok(false)` when the browser should follow
    /// the link itself.
    pub async fn handle_link_click(&mut self, href: &str) -> Result<bool, NavigationError> {
        if !self.can_navigate(href) {
            log::debug!("App: not intercepting link to {href}");
            return Ok(false);
        }
        self.navigate(href, false).await.map(|_| true)
    }

    /// Intercepts a form submission. The form is captured on the context for the
    /// duration of the navigation, so the screen posts it.
    pub async fn handle_form_submit(&mut self, form: CapturedForm) -> Result<bool, NavigationError> {
        let action = form
            .action
            .clone()
            .unwrap_or_else(|| current_browser_path(self.context.location()));
        if !self.can_navigate(&action) {
            log::debug!("App: not intercepting form submission to {action}");
            return Ok(false);
        }
        self.context.capture_form(form);
        self.navigate(&action, false).await.map(|_| true)
    }

    /// Replays a history entry by loading the path it landed on, so redirects and form
    /// posts are not repeated. Entries the navigator did not create are left to the
    /// browser and yield `Ok(false)`.
    pub async fn handle_pop_state(&mut self, state: Option<HistoryState>) -> Result<bool, NavigationError> {
        let Some(state) = state.filter(|s| s.senna) else {
            return Ok(false);
        };
        self.navigate(&state.redirect_path, true).await.map(|_| true)
    }

    pub async fn back(&mut self) -> Result<bool, NavigationError> {
        match self.history.back().cloned() {
            Some(entry) => self.pop_to(entry.url, entry.state).await,
            None => Ok(false),
        }
    }

    pub async fn forward(&mut self) -> Result<bool, NavigationError> {
        match self.history.forward().cloned() {
            Some(entry) => self.pop_to(entry.url, entry.state).await,
            None => Ok(false),
        }
    }

    async fn pop_to(&mut self, url: Url, state: Option<HistoryState>) -> Result<bool, NavigationError> {
        self.context.set_location(url);
        self.handle_pop_state(state).await
    }

    /// Navigates to the current location again, replacing its history entry.
    pub async fn reload(&mut self) -> Result<(), NavigationError> {
        let path = current_browser_path(self.context.location());
        self.navigate(&path, true).await
    }

    /// Loads the screen for `path` without activating it. Cacheable screens are kept so
    /// a later navigation to `path` reuses their content.
    pub async fn prefetch(&mut self, path: &str) -> Result<(), NavigationError> {
        let url = self.resolve_path(path)?;
        let route = self
            .find_route(&url)
            .ok_or_else(|| NavigationError::NoRouteFound(path.to_string()))?;
        let key = url_path_without_hash(&url);
        if self.active_path.as_deref() == Some(key.as_str()) {
            log::debug!("App: {key} is active, nothing to prefetch");
            return Ok(());
        }

        let mut screen = match self.screens.remove(&key) {
            Some(screen) => screen,
            None => self.routes[route].create_screen(),
        };

        match screen.load(&url_path(&url), &self.context).await {
            Ok(_) if screen.is_cacheable() => {
                self.screens.insert(key, screen);
                Ok(())
            }
            Ok(_) => {
                screen.dispose();
                Ok(())
            }
            Err(e) => {
                log::warn!("App: prefetch of {path} failed: {e}");
                screen.dispose();
                Err(e.into())
            }
        }
    }

    /// Navigates to `path`, pushing a history entry unless `replace_history` is set.
    pub async fn navigate(&mut self, path: &str, replace_history: bool) -> Result<(), NavigationError> {
        let form = self.context.captured_form().is_some();
        let _ = self.event_tx.send(NavigationEvent::StartNavigate {
            path: path.to_string(),
            replace_history,
            form,
        });
        log::debug!("App: navigating to {path}");

        let result = self.do_navigate(path, replace_history).await;
        self.context.clear_captured_form();

        let (redirect_path, error) = match &result {
            Ok(redirect_path) => (Some(redirect_path.clone()), None),
            Err(e) => {
                log::error!("App: navigation to {path} failed: {e}");
                (None, Some(e.clone()))
            }
        };
        let _ = self.event_tx.send(NavigationEvent::EndNavigate {
            path: path.to_string(),
            redirect_path,
            error,
        });

        result.map(|_| ())
    }

    async fn do_navigate(&mut self, path: &str, replace_history: bool) -> Result<String, NavigationError> {
        if let Some(active) = self.active_screen_mut() {
            if active.before_deactivate() {
                return Err(NavigationError::CancelledByActiveScreen);
            }
        }

        let url = self.resolve_path(path)?;
        let route = self
            .find_route(&url)
            .ok_or_else(|| NavigationError::NoRouteFound(path.to_string()))?;
        let key = url_path_without_hash(&url);
        let path = url_path(&url);
        let reloading_active = self.active_path.as_deref() == Some(key.as_str());

        let mut screen = match self.screens.remove(&key) {
            Some(screen) => screen,
            None => self.routes[route].create_screen(),
        };

        if let Err(e) = screen.load(&path, &self.context).await {
            self.release_unused(key, screen, reloading_active);
            return Err(e.into());
        }

        // Nothing may fail once the old screen is deactivated
        let redirect_path = screen.before_update_history_path(&path);
        let history_url = match self.resolve_path(&redirect_path) {
            Ok(url) => url,
            Err(e) => {
                self.release_unused(key, screen, reloading_active);
                return Err(e);
            }
        };

        if !reloading_active {
            if let Some(active) = self.active_screen_mut() {
                active.deactivate();
            }
        }

        screen.before_activate();
        screen.flip(&mut self.document);
        screen.evaluate(&mut self.document);
        if let Some(title) = screen.title() {
            self.document.title = title.to_string();
        }

        let state = HistoryState::new(path.as_str(), redirect_path.as_str(), self.context.captured_form().is_some());
        match screen.before_update_history_state(state) {
            Some(state) => self.update_history(state, history_url, replace_history),
            None => log::debug!("App: history left untouched for {path}"),
        }

        screen.activate();

        if let Some(previous) = self.active_path.take() {
            if previous != key {
                self.evict_if_not_cacheable(&previous);
            }
        }
        self.screens.insert(key.clone(), screen);
        self.active_path = Some(key);

        Ok(redirect_path)
    }

    /// Puts back or disposes a screen whose navigation failed before activation.
    fn release_unused(&mut self, key: String, mut screen: Box<dyn Screen>, reloading_active: bool) {
        if reloading_active {
            self.screens.insert(key, screen);
        } else {
            screen.dispose();
        }
    }

    fn update_history(&mut self, state: HistoryState, url: Url, replace: bool) {
        let title = self.document.title.clone();
        if replace {
            self.history.replace_state(state, title, url.clone());
        } else {
            self.history.push_state(state, title, url.clone());
        }
        self.context.set_location(url);
    }

    fn evict_if_not_cacheable(&mut self, path: &str) {
        if self.screens.get(path).is_some_and(|screen| !screen.is_cacheable()) {
            if let Some(mut screen) = self.screens.remove(path) {
                screen.dispose();
            }
        }
    }
}
