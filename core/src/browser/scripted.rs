//! In-memory [`Session`] that serves canned pages.
//!
//! Used as the test double for the consoles and the orchestrator: pages are keyed by
//! URL, elements by a name chosen by the test, and every interaction is logged so
//! tests can assert what was typed and clicked.

use std::collections::HashMap;

use async_trait::async_trait;
use rebootr_common::session::{Element, Locator, Session, SessionError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(String),
    Click(String),
    Clear(String),
    Type(String, String),
    Hover(String),
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    source: String,
    title: String,
    elements: Vec<(Locator, String)>,
}

impl FakePage {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            ..Self::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Makes the element named `key` findable through `locator` on this page.
    pub fn element(mut self, locator: Locator, key: impl Into<String>) -> Self {
        self.elements.push((locator, key.into()));
        self
    }
}

#[derive(Debug, Clone)]
pub struct FakeElement {
    text: String,
    clickable: bool,
    css: HashMap<String, String>,
    children: Vec<(Locator, String)>,
    on_click: Option<String>,
    on_hover: Vec<(String, String)>,
}

impl Default for FakeElement {
    fn default() -> Self {
        Self {
            text: String::new(),
            clickable: true,
            css: HashMap::new(),
            children: Vec::new(),
            on_click: None,
            on_hover: Vec::new(),
        }
    }
}

impl FakeElement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.clickable = false;
        self
    }

    pub fn css(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.css.insert(property.into(), value.into());
        self
    }

    pub fn child(mut self, locator: Locator, key: impl Into<String>) -> Self {
        self.children.push((locator, key.into()));
        self
    }

    /// Clicking loads the page at `url`.
    pub fn navigates_to(mut self, url: impl Into<String>) -> Self {
        self.on_click = Some(url.into());
        self
    }

    /// Hovering sets a CSS property of another element, like a dropdown menu opening.
    pub fn reveals_on_hover(mut self, key: impl Into<String>, display: impl Into<String>) -> Self {
        self.on_hover.push((key.into(), display.into()));
        self
    }
}

#[derive(Debug, Default)]
pub struct ScriptedSession {
    pages: HashMap<String, FakePage>,
    elements: HashMap<String, FakeElement>,
    current: Option<String>,
    actions: Vec<Action>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(&mut self, url: impl Into<String>, page: FakePage) -> &mut Self {
        self.pages.insert(url.into(), page);
        self
    }

    pub fn element(&mut self, key: impl Into<String>, element: FakeElement) -> &mut Self {
        self.elements.insert(key.into(), element);
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn clicked(&self, key: &str) -> bool {
        self.actions
            .iter()
            .any(|a| matches!(a, Action::Click(k) if k == key))
    }

    /// Text typed into `key`, if any.
    pub fn typed(&self, key: &str) -> Option<&str> {
        self.actions.iter().rev().find_map(|a| match a {
            Action::Type(k, text) if k == key => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn visited(&self) -> Vec<&str> {
        self.actions
            .iter()
            .filter_map(|a| match a {
                Action::Navigate(url) => Some(url.as_str()),
                _ => None,
            })
            .collect()
    }

    fn current_page(&self) -> Result<&FakePage, SessionError> {
        self.current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .ok_or_else(|| SessionError::UnexpectedPage("no page loaded".into()))
    }

    fn known(&self, element: &Element) -> Result<&FakeElement, SessionError> {
        self.elements
            .get(element.id())
            .ok_or_else(|| SessionError::WebDriver {
                error: "stale element reference".into(),
                message: element.id().to_string(),
            })
    }

    fn resolve(candidates: &[(Locator, String)], locator: &Locator) -> Result<Element, SessionError> {
        candidates
            .iter()
            .find(|(l, _)| l == locator)
            .map(|(_, key)| Element::new(key.clone()))
            .ok_or_else(|| SessionError::ElementNotFound(locator.clone()))
    }
}

#[async_trait]
impl Session for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<(), SessionError> {
        self.actions.push(Action::Navigate(url.to_string()));
        if !self.pages.contains_key(url) {
            self.current = None;
            return Err(SessionError::WebDriver {
                error: "unknown error".into(),
                message: "net::ERR_CONNECTION_REFUSED".into(),
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        Ok(self.current_page()?.source.clone())
    }

    async fn title(&mut self) -> Result<String, SessionError> {
        Ok(self.current_page()?.title.clone())
    }

    async fn find(&mut self, locator: &Locator) -> Result<Element, SessionError> {
        Self::resolve(&self.current_page()?.elements, locator)
    }

    async fn find_within(&mut self, parent: &Element, locator: &Locator) -> Result<Element, SessionError> {
        Self::resolve(&self.known(parent)?.children, locator)
    }

    async fn click(&mut self, element: &Element) -> Result<(), SessionError> {
        let target = self.known(element)?.on_click.clone();
        self.actions.push(Action::Click(element.id().to_string()));
        if let Some(url) = target {
            self.current = Some(url);
        }
        Ok(())
    }

    async fn clear(&mut self, element: &Element) -> Result<(), SessionError> {
        self.known(element)?;
        self.actions.push(Action::Clear(element.id().to_string()));
        Ok(())
    }

    async fn type_text(&mut self, element: &Element, text: &str) -> Result<(), SessionError> {
        self.known(element)?;
        self.actions
            .push(Action::Type(element.id().to_string(), text.to_string()));
        Ok(())
    }

    async fn text(&mut self, element: &Element) -> Result<String, SessionError> {
        Ok(self.known(element)?.text.clone())
    }

    async fn css_value(&mut self, element: &Element, property: &str) -> Result<String, SessionError> {
        Ok(self
            .known(element)?
            .css
            .get(property)
            .cloned()
            .unwrap_or_default())
    }

    async fn is_clickable(&mut self, element: &Element) -> Result<bool, SessionError> {
        Ok(self.known(element)?.clickable)
    }

    async fn hover(&mut self, element: &Element) -> Result<(), SessionError> {
        let reveals = self.known(element)?.on_hover.clone();
        self.actions.push(Action::Hover(element.id().to_string()));
        for (key, display) in reveals {
            if let Some(revealed) = self.elements.get_mut(&key) {
                revealed.css.insert("display".into(), display);
            }
        }
        Ok(())
    }
}
