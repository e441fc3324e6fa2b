use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::credentials::Credential;
use rebootr_common::network::target::TargetAddress;
use rebootr_common::session::{Locator, Session, SessionError};
use rebootr_common::vendor::Vendor;

use crate::browser::wait::{Readiness, wait_for_element};
use crate::browser::{click, fill, settle};
use crate::detector::VendorConsole;
use crate::detector::fingerprint::{Fingerprint, first_match};

const STEP_TIMEOUT: Duration = Duration::from_secs(10);
const SETTLE: Duration = Duration::from_secs(1);

const ADMIN_RADIO: &str = "input[type=\"radio\"][value=\"Polycom\"]";
const PASSWORD: &str = "password";
const SUBMIT: &str = "input[type=\"submit\"]";
const UTILITIES_MENU: &str = "topMenuItem6";
const RESTART_LINK: &str = "li[src=\"restartPhone.htm\"] a";
const POPUP_YES: &str = "popupbtn0";

/// Web Configuration Utility of Polycom SoundPoint phones.
pub struct Polycom {
    fingerprints: Vec<Fingerprint>,
}

impl Default for Polycom {
    fn default() -> Self {
        Self {
            fingerprints: vec![
                Fingerprint::SourceContains("polycom web configuration utility"),
                Fingerprint::ElementsPresent(vec![
                    Locator::css(ADMIN_RADIO),
                    Locator::name(PASSWORD),
                ]),
            ],
        }
    }
}

#[async_trait]
impl VendorConsole for Polycom {
    fn vendor(&self) -> Vendor {
        Vendor::Polycom
    }

    async fn identify(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        _credential: &Credential,
    ) -> Result<bool, SessionError> {
        session.navigate(target.base_url()?.as_str()).await?;
        settle(SETTLE).await;
        Ok(first_match(session, &self.fingerprints).await?.is_some())
    }

    /// The login form picks the account with a radio button; only the password is typed.
    async fn authenticate(
        &self,
        session: &mut dyn Session,
        _target: &TargetAddress,
        credential: &Credential,
    ) -> Result<(), SessionError> {
        click(session, &Locator::css(ADMIN_RADIO)).await?;
        fill(session, &Locator::name(PASSWORD), &credential.password).await?;
        click(session, &Locator::css(SUBMIT)).await
    }

    async fn trigger_reboot(
        &self,
        session: &mut dyn Session,
        _target: &TargetAddress,
    ) -> Result<(), SessionError> {
        let menu = wait_for_element(session, &Locator::id(UTILITIES_MENU), Readiness::Present, STEP_TIMEOUT).await?;
        session.hover(&menu).await?;
        settle(SETTLE).await;

        // some firmwares only open the dropdown on click
        let submenu = session.find_within(&menu, &Locator::tag("ul")).await?;
        if session.css_value(&submenu, "display").await? == "none" {
            session.click(&menu).await?;
            settle(SETTLE).await;
        }

        let restart = session.find_within(&submenu, &Locator::css(RESTART_LINK)).await?;
        session.click(&restart).await?;

        let yes = wait_for_element(session, &Locator::id(POPUP_YES), Readiness::Clickable, STEP_TIMEOUT).await?;
        session.click(&yes).await
    }
}
