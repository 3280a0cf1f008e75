//! Error types surfaced by screens and by the navigation layer.
//!
//! [`LoadError`] is what a [`Screen`](crate::screen::Screen) load can fail with. The three
//! kinds are distinguishable without looking at the message, so a caller can render a
//! "page not found" view for a 404 and a generic failure banner for a dropped connection.
//!
//! [`NavigationError`] wraps load failures together with the reasons the
//! [`App`](crate::app::App) itself can refuse a navigation.

/// Failure of a single screen load.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The load did not settle within the configured timeout.
    #[error("Request timeout")]
    Timeout { timeout_ms: u64 },

    /// A response was received but its status is outside of 200..=399.
    #[error("Invalid status code")]
    InvalidStatus { status_code: u16 },

    /// The network call itself failed (connection refused, DNS, aborted...).
    #[error("Request error: {message}")]
    Request { message: String },
}

impl LoadError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, LoadError::Timeout { .. })
    }

    pub fn is_invalid_status(&self) -> bool {
        matches!(self, LoadError::InvalidStatus { .. })
    }

    pub fn is_request_error(&self) -> bool {
        matches!(self, LoadError::Request { .. })
    }

    /// Numeric HTTP status for [`LoadError::InvalidStatus`], `None` otherwise.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LoadError::InvalidStatus { status_code } => Some(*status_code),
            _ => None,
        }
    }
}

/// Reasons a navigation driven by the [`App`](crate::app::App) did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("No route for {0}")]
    NoRouteFound(String),

    #[error("Cancelled by active screen")]
    CancelledByActiveScreen,

    #[error("HTML5 History is not supported. Navigation will not be intercepted.")]
    HistoryUnsupported,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}

impl NavigationError {
    /// Returns the underlying load failure, if the navigation failed while loading.
    pub fn load_error(&self) -> Option<&LoadError> {
        match self {
            NavigationError::Load(e) => Some(e),
            _ => None,
        }
    }
}
