//! User agent sniffing, reduced to the capability flags the navigator branches on.
//!
//! Legacy Internet Explorer and legacy (EdgeHTML) Edge reuse cached responses for
//! navigation requests and can replay a stale `304` after a redirected form post. The
//! request layer never looks at the user agent string itself; it asks a
//! [`BrowserQuirks`] implementation whether those workarounds are needed.

use bitflags::bitflags;

bitflags! {
    /// Workarounds a browser needs when fetching navigation content.
    pub struct Quirks: u8 {
        /// GET requests must carry a unique marker so the HTTP cache is bypassed.
        const CACHE_BUSTING      = 0b0001;
        /// Redirected (form) requests need `If-None-Match: "0"`.
        const REDIRECT_VALIDATOR = 0b0010;
    }
}

/// Capability predicates consumed by [`RequestScreen`](crate::screen::RequestScreen).
pub trait BrowserQuirks: Send + Sync {
    fn needs_cache_busting(&self) -> bool;
    fn needs_redirect_validator(&self) -> bool;
}

/// Parsed user agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAgent {
    raw: String,
    is_ie: bool,
    is_edge: bool,
}

impl UserAgent {
    pub fn parse(ua: &str) -> Self {
        let is_edge = ua.contains("Edge/");
        let is_ie = !is_edge && (ua.contains("MSIE ") || ua.contains("Trident/"));

        Self {
            raw: ua.to_string(),
            is_ie,
            is_edge,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_ie(&self) -> bool {
        self.is_ie
    }

    pub fn is_edge(&self) -> bool {
        self.is_edge
    }

    pub fn is_ie_or_edge(&self) -> bool {
        self.is_ie || self.is_edge
    }

    pub fn quirks(&self) -> Quirks {
        if self.is_ie_or_edge() {
            Quirks::CACHE_BUSTING | Quirks::REDIRECT_VALIDATOR
        } else {
            Quirks::empty()
        }
    }
}

impl Default for UserAgent {
    fn default() -> Self {
        Self::parse("")
    }
}

impl BrowserQuirks for UserAgent {
    fn needs_cache_busting(&self) -> bool {
        self.quirks().contains(Quirks::CACHE_BUSTING)
    }

    fn needs_redirect_validator(&self) -> bool {
        self.quirks().contains(Quirks::REDIRECT_VALIDATOR)
    }
}
