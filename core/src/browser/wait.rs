use std::fmt;
use std::time::Duration;

use rebootr_common::session::{Element, Locator, Session, SessionError};
use tokio::time::{Instant, sleep};

const POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// In the DOM.
    Present,
    /// In the DOM, displayed and enabled.
    Clickable,
}

impl fmt::Display for Readiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Readiness::Present => f.write_str("present"),
            Readiness::Clickable => f.write_str("clickable"),
        }
    }
}

/// Re-queries `locator` until the element reaches `readiness` or `timeout` passes.
pub async fn wait_for_element(
    session: &mut dyn Session,
    locator: &Locator,
    readiness: Readiness,
    timeout: Duration,
) -> Result<Element, SessionError> {
    let deadline = Instant::now() + timeout;
    loop {
        match session.find(locator).await {
            Ok(element) => match readiness {
                Readiness::Present => return Ok(element),
                Readiness::Clickable => match session.is_clickable(&element).await {
                    Ok(true) => return Ok(element),
                    Ok(false) => {}
                    Err(err) if is_stale(&err) => {}
                    Err(err) => return Err(err),
                },
            },
            Err(SessionError::ElementNotFound(_)) => {}
            Err(err) => return Err(err),
        }

        if Instant::now() >= deadline {
            return Err(SessionError::Timeout {
                what: format!("{locator} to be {readiness}"),
                timeout,
            });
        }
        sleep(POLL).await;
    }
}

/// Waits until the current page has a non-empty title, i.e. a post-login page rendered.
pub async fn wait_for_title(
    session: &mut dyn Session,
    timeout: Duration,
) -> Result<String, SessionError> {
    let deadline = Instant::now() + timeout;
    loop {
        let title = session.title().await?;
        if !title.trim().is_empty() {
            return Ok(title);
        }
        if Instant::now() >= deadline {
            return Err(SessionError::Timeout {
                what: "page title".to_string(),
                timeout,
            });
        }
        sleep(POLL).await;
    }
}

fn is_stale(err: &SessionError) -> bool {
    matches!(err, SessionError::WebDriver { error, .. } if error == "stale element reference")
}
