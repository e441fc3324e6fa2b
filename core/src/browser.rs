//! Helpers over the UI-automation [`Session`](rebootr_common::session::Session)
//! capability, plus the WebDriver implementation of it.

pub mod scripted;
pub mod wait;
pub mod webdriver;

use std::time::Duration;

use rebootr_common::session::{Locator, Session, SessionError};

/// Clears the field at `locator` and types `text` into it.
pub async fn fill(
    session: &mut dyn Session,
    locator: &Locator,
    text: &str,
) -> Result<(), SessionError> {
    let field = session.find(locator).await?;
    session.clear(&field).await?;
    session.type_text(&field, text).await
}

/// Finds the element at `locator` and clicks it.
pub async fn click(session: &mut dyn Session, locator: &Locator) -> Result<(), SessionError> {
    let element = session.find(locator).await?;
    session.click(&element).await
}

/// Gives a console's scripts time to render after a page load.
pub async fn settle(pause: Duration) {
    tokio::time::sleep(pause).await;
}
