//! Vendor fingerprints.
//!
//! Phone consoles have no documented identity endpoint, so each vendor carries an
//! ordered list of heuristics: the first one that matches decides, and a list where
//! nothing matches means "not this vendor". All text comparisons ignore case.

use std::time::Duration;

use rebootr_common::session::{Locator, Session, SessionError};

use crate::browser::wait::{Readiness, wait_for_element};

#[derive(Debug, Clone)]
pub enum Fingerprint {
    /// The element appears within `timeout` and its text contains `needle`.
    ElementText {
        locator: Locator,
        needle: &'static str,
        timeout: Duration,
    },
    SourceContains(&'static str),
    /// Every marker occurs somewhere in the page source.
    SourceContainsAll(&'static [&'static str]),
    TitleContains(&'static str),
    /// Every locator resolves on the current page.
    ElementsPresent(Vec<Locator>),
}

impl Fingerprint {
    /// Evaluates the heuristic against the current page.
    ///
    /// A missing element or an expired wait is an ordinary non-match.
    pub async fn matches(&self, session: &mut dyn Session) -> Result<bool, SessionError> {
        match self.evaluate(session).await {
            Err(SessionError::ElementNotFound(_) | SessionError::Timeout { .. }) => Ok(false),
            other => other,
        }
    }

    async fn evaluate(&self, session: &mut dyn Session) -> Result<bool, SessionError> {
        match self {
            Fingerprint::ElementText {
                locator,
                needle,
                timeout,
            } => {
                let element =
                    wait_for_element(session, locator, Readiness::Present, *timeout).await?;
                let text = session.text(&element).await?;
                Ok(contains(&text, needle))
            }
            Fingerprint::SourceContains(needle) => {
                let source = session.page_source().await?;
                Ok(contains(&source, needle))
            }
            Fingerprint::SourceContainsAll(markers) => {
                let source = session.page_source().await?.to_lowercase();
                Ok(markers.iter().all(|m| source.contains(&m.to_lowercase())))
            }
            Fingerprint::TitleContains(needle) => {
                let title = session.title().await?;
                Ok(contains(&title, needle))
            }
            Fingerprint::ElementsPresent(locators) => {
                for locator in locators {
                    session.find(locator).await?;
                }
                Ok(true)
            }
        }
    }
}

/// Tries `fingerprints` in order and stops at the first match.
pub async fn first_match(
    session: &mut dyn Session,
    fingerprints: &[Fingerprint],
) -> Result<Option<usize>, SessionError> {
    for (idx, fingerprint) in fingerprints.iter().enumerate() {
        if fingerprint.matches(session).await? {
            return Ok(Some(idx));
        }
    }
    Ok(None)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
