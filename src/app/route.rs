use crate::screen::Screen;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Creates the screen that serves a route.
pub type ScreenFactory = Arc<dyn Fn() -> Box<dyn Screen> + Send + Sync>;

/// Predicate over a route pathname (base path already stripped).
pub type PathPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

#[derive(Clone)]
pub enum RouteMatcher {
    Exact(String),
    Predicate(PathPredicate),
}

/// Maps paths onto the screen type that serves them.
#[derive(Clone)]
pub struct Route {
    matcher: RouteMatcher,
    factory: ScreenFactory,
}

impl Route {
    pub fn new(matcher: RouteMatcher, factory: ScreenFactory) -> Self {
        Self { matcher, factory }
    }

    pub fn exact<F>(path: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Screen> + Send + Sync + 'static,
    {
        Self::new(RouteMatcher::Exact(path.into()), Arc::new(factory))
    }

    pub fn matching<P, F>(predicate: P, factory: F) -> Self
    where
        P: Fn(&str) -> bool + Send + Sync + 'static,
        F: Fn() -> Box<dyn Screen> + Send + Sync + 'static,
    {
        Self::new(RouteMatcher::Predicate(Arc::new(predicate)), Arc::new(factory))
    }

    pub fn matches_path(&self, path: &str) -> bool {
        match &self.matcher {
            RouteMatcher::Exact(expected) => path == expected,
            RouteMatcher::Predicate(predicate) => predicate(path),
        }
    }

    pub fn create_screen(&self) -> Box<dyn Screen> {
        (self.factory)()
    }
}

impl Debug for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.matcher {
            RouteMatcher::Exact(path) => write!(f, "Route({path})"),
            RouteMatcher::Predicate(_) => write!(f, "Route(<predicate>)"),
        }
    }
}
