//! # UI-Automation Session
//!
//! The capability the vendor consoles are driven through. rebootr does not care
//! which automation engine sits behind it; the core only ever sees this trait, and
//! tests substitute a scripted double that serves canned pages.
//!
//! A single session is shared by every detector attempt of a run. Callers must not
//! rely on navigation state surviving between two detector calls: every console
//! starts by loading its own page.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// How to find an element on the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    Css(String),
    /// Matches the `name` attribute.
    Name(String),
    /// Matches the `id` attribute.
    Id(String),
    Tag(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn name(name: impl Into<String>) -> Self {
        Locator::Name(name.into())
    }

    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Locator::Tag(tag.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css '{s}'"),
            Locator::Name(s) => write!(f, "name '{s}'"),
            Locator::Id(s) => write!(f, "id '{s}'"),
            Locator::Tag(s) => write!(f, "tag '{s}'"),
        }
    }
}

/// Opaque handle to an element of the current page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Element(String);

impl Element {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("element not found: {0}")]
    ElementNotFound(Locator),

    #[error("timed out after {}s waiting for {what}", timeout.as_secs())]
    Timeout { what: String, timeout: Duration },

    #[error("unexpected page: {0}")]
    UnexpectedPage(String),

    #[error("webdriver error '{error}': {message}")]
    WebDriver { error: String, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("malformed driver response: {0}")]
    Protocol(String),
}

#[async_trait]
pub trait Session: Send {
    /// Loads `url` and blocks until the driver reports the page loaded.
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError>;

    async fn page_source(&mut self) -> Result<String, SessionError>;

    async fn title(&mut self) -> Result<String, SessionError>;

    /// First element matching `locator`, or [`SessionError::ElementNotFound`].
    async fn find(&mut self, locator: &Locator) -> Result<Element, SessionError>;

    /// Like [`Session::find`], scoped to the descendants of `parent`.
    async fn find_within(
        &mut self,
        parent: &Element,
        locator: &Locator,
    ) -> Result<Element, SessionError>;

    async fn click(&mut self, element: &Element) -> Result<(), SessionError>;

    async fn clear(&mut self, element: &Element) -> Result<(), SessionError>;

    async fn type_text(&mut self, element: &Element, text: &str) -> Result<(), SessionError>;

    async fn text(&mut self, element: &Element) -> Result<String, SessionError>;

    /// Computed value of a CSS property, e.g. `display`.
    async fn css_value(&mut self, element: &Element, property: &str)
    -> Result<String, SessionError>;

    /// Displayed and enabled.
    async fn is_clickable(&mut self, element: &Element) -> Result<bool, SessionError>;

    /// Moves the pointer over `element`, opening hover menus.
    async fn hover(&mut self, element: &Element) -> Result<(), SessionError>;
}

impl From<crate::error::ConfigError> for SessionError {
    fn from(err: crate::error::ConfigError) -> Self {
        SessionError::InvalidUrl(err.to_string())
    }
}
