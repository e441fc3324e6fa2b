use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::credentials::Credential;
use rebootr_common::network::target::TargetAddress;
use rebootr_common::session::{Locator, Session, SessionError};
use rebootr_common::vendor::Vendor;

use crate::browser::fill;
use crate::browser::wait::{Readiness, wait_for_element, wait_for_title};
use crate::detector::VendorConsole;
use crate::detector::fingerprint::{Fingerprint, first_match};

const STEP_TIMEOUT: Duration = Duration::from_secs(5);

const FOOTER: &str = "div.gwt-HTML";
const USERNAME: &str = "input.gwt-TextBox";
const PASSWORD: &str = "input.gwt-PasswordTextBox";
const LOGIN: &str = "button.gwt-Button";
const REBOOT_LINK: &str = "a.feature[name=\"reboot\"]";
const REBOOT_CONFIRM: &str = "button.button.green";

/// GWT based console of Grandstream phones.
pub struct Grandstream {
    fingerprints: Vec<Fingerprint>,
}

impl Default for Grandstream {
    fn default() -> Self {
        Self {
            fingerprints: vec![
                Fingerprint::ElementText {
                    locator: Locator::css(FOOTER),
                    needle: "grandstream",
                    timeout: STEP_TIMEOUT,
                },
                // login form widgets, for firmwares without the branded footer
                Fingerprint::SourceContainsAll(&["gwt-textbox", "gwt-butt", "gwt-passwordtextbox"]),
            ],
        }
    }
}

#[async_trait]
impl VendorConsole for Grandstream {
    fn vendor(&self) -> Vendor {
        Vendor::Grandstream
    }

    async fn identify(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        _credential: &Credential,
    ) -> Result<bool, SessionError> {
        session.navigate(target.base_url()?.as_str()).await?;
        Ok(first_match(session, &self.fingerprints).await?.is_some())
    }

    async fn authenticate(
        &self,
        session: &mut dyn Session,
        _target: &TargetAddress,
        credential: &Credential,
    ) -> Result<(), SessionError> {
        let username = Locator::css(USERNAME);
        wait_for_element(session, &username, Readiness::Present, STEP_TIMEOUT).await?;
        fill(session, &username, &credential.username).await?;
        fill(session, &Locator::css(PASSWORD), &credential.password).await?;

        let login = session.find(&Locator::css(LOGIN)).await?;
        session.click(&login).await?;
        wait_for_title(session, STEP_TIMEOUT).await?;
        Ok(())
    }

    async fn trigger_reboot(
        &self,
        session: &mut dyn Session,
        _target: &TargetAddress,
    ) -> Result<(), SessionError> {
        let link = wait_for_element(session, &Locator::css(REBOOT_LINK), Readiness::Clickable, STEP_TIMEOUT).await?;
        session.click(&link).await?;

        let confirm = wait_for_element(session, &Locator::css(REBOOT_CONFIRM), Readiness::Clickable, STEP_TIMEOUT).await?;
        session.click(&confirm).await
    }
}
