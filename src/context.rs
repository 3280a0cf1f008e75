use crate::net::CapturedForm;
use crate::useragent::UserAgent;
use url::Url;

/// Browsing context a navigation runs against.
///
/// Holds the browser state screens would otherwise read from globals: the current
/// location, the form submission being navigated (if any), the user agent and whether
/// the host exposes a history API. The [`App`](crate::app::App) owns one and updates the
/// location as history entries are pushed; screens only ever borrow it.
#[derive(Debug, Clone)]
pub struct BrowsingContext {
    /// Current document location
    location: Url,
    /// Form whose submission is being navigated
    captured_form: Option<CapturedForm>,
    /// User agent of the host browser
    user_agent: UserAgent,
    /// Does the host support `pushState`?
    history_supported: bool,
}

impl BrowsingContext {
    pub fn new(location: Url) -> Self {
        Self {
            location,
            captured_form: None,
            user_agent: UserAgent::default(),
            history_supported: true,
        }
    }

    pub fn with_user_agent(mut self, user_agent: UserAgent) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn with_history_supported(mut self, supported: bool) -> Self {
        self.history_supported = supported;
        self
    }

    #[inline]
    pub fn location(&self) -> &Url {
        &self.location
    }

    pub fn set_location(&mut self, location: Url) {
        self.location = location;
    }

    /// `scheme://host:port` of the current location.
    pub fn origin(&self) -> url::Origin {
        self.location.origin()
    }

    pub fn captured_form(&self) -> Option<&CapturedForm> {
        self.captured_form.as_ref()
    }

    pub fn capture_form(&mut self, form: CapturedForm) {
        self.captured_form = Some(form);
    }

    pub fn clear_captured_form(&mut self) -> Option<CapturedForm> {
        self.captured_form.take()
    }

    #[inline]
    pub fn user_agent(&self) -> &UserAgent {
        &self.user_agent
    }

    pub fn is_history_supported(&self) -> bool {
        self.history_supported
    }
}
