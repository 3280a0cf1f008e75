use crate::errors::NavigationError;

/// Events the [`App`](crate::app::App) broadcasts around each navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationEvent {
    /// A navigation to `path` started.
    StartNavigate {
        path: String,
        replace_history: bool,
        /// Navigation is a form submission
        form: bool,
    },
    /// A navigation to `path` finished, successfully when `error` is `None`.
    EndNavigate {
        path: String,
        /// Path recorded in history (after redirects)
        redirect_path: Option<String>,
        error: Option<NavigationError>,
    },
}

impl NavigationEvent {
    pub fn path(&self) -> &str {
        match self {
            NavigationEvent::StartNavigate { path, .. } => path,
            NavigationEvent::EndNavigate { path, .. } => path,
        }
    }
}
