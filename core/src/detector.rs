//! # Vendor Detection
//!
//! A detector both recognizes a vendor's web console and drives it to a reboot.
//! The vendor specific knowledge lives in [`VendorConsole`] implementations; the
//! sequence every vendor goes through lives in [`RebootDetector`]:
//!
//! 1. **Identify**: load the console, apply the vendor's fingerprints.
//! 2. **Authenticate**: fill and submit the login form (or rely on basic auth).
//! 3. **Trigger**: walk the menus to the reboot action and confirm it.
//! 4. **Confirm departure**: poll until the phone stops answering.
//! 5. **Time the return**: bounded poll until the phone answers again.
//!
//! A failed fingerprint is the normal "wrong vendor" path, not an error.

pub mod fingerprint;
pub mod grandstream;
pub mod polycom;
pub mod snom;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::config::Config;
use rebootr_common::credentials::{Credential, CredentialTable};
use rebootr_common::network::target::TargetAddress;
use rebootr_common::outcome::DetectionOutcome;
use rebootr_common::session::{Session, SessionError};
use rebootr_common::sink::{Mark, ResultSink};
use rebootr_common::vendor::Vendor;
use tracing::debug;

use crate::network::waiter::{DesiredState, Waiter};
use crate::orchestrator::DetectorEntry;

/// Vendor specific steps of the reboot sequence.
#[async_trait]
pub trait VendorConsole: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Loads the console and applies the fingerprints. `Ok(false)` means another vendor.
    async fn identify(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        credential: &Credential,
    ) -> Result<bool, SessionError>;

    async fn authenticate(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        credential: &Credential,
    ) -> Result<(), SessionError>;

    /// Reaches the reboot action and confirms it.
    async fn trigger_reboot(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
    ) -> Result<(), SessionError>;
}

/// What the orchestrator runs for each vendor it tries.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        credential: &Credential,
    ) -> DetectionOutcome;
}

/// Drives a [`VendorConsole`] through the whole reboot sequence.
pub struct RebootDetector {
    console: Box<dyn VendorConsole>,
    waiter: Arc<Waiter>,
    sink: Arc<dyn ResultSink>,
    offline_timeout: Option<Duration>,
    online_timeout: Duration,
}

impl RebootDetector {
    pub fn new(
        console: Box<dyn VendorConsole>,
        waiter: Arc<Waiter>,
        sink: Arc<dyn ResultSink>,
        offline_timeout: Option<Duration>,
        online_timeout: Duration,
    ) -> Self {
        Self {
            console,
            waiter,
            sink,
            offline_timeout,
            online_timeout,
        }
    }

    async fn login_and_reboot(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        credential: &Credential,
    ) -> Result<(), SessionError> {
        self.console
            .authenticate(session, target, credential)
            .await?;
        debug!(%target, vendor = %self.console.vendor(), "logged in");
        self.console.trigger_reboot(session, target).await
    }
}

#[async_trait]
impl Detector for RebootDetector {
    async fn detect(
        &self,
        session: &mut dyn Session,
        target: &TargetAddress,
        credential: &Credential,
    ) -> DetectionOutcome {
        let label = self.console.vendor().label();
        let port = self.waiter.port();
        self.sink.record(
            Mark::Step,
            &format!("Checking if {target} is a supported {label} device..."),
        );

        match self.console.identify(session, target, credential).await {
            Ok(true) => self
                .sink
                .record(Mark::Success, &format!("Detected {label} device at {target}")),
            Ok(false) => {
                self.sink
                    .record(Mark::Step, &format!("{target} is not a {label} device"));
                return DetectionOutcome::NotMatched;
            }
            Err(err) => {
                self.sink
                    .record(Mark::Step, &format!("{target} is not a {label} device ({err})"));
                return DetectionOutcome::NotMatched;
            }
        }

        if let Err(err) = self.login_and_reboot(session, target, credential).await {
            self.sink.record(
                Mark::Failure,
                &format!("{label} login or reboot failed on {target}: {err}"),
            );
            return DetectionOutcome::MatchedActionFailed {
                reason: err.to_string(),
            };
        }
        self.sink
            .record(Mark::Success, &format!("{label} reboot confirmed for {target}."));

        let offline = self
            .waiter
            .wait_until(target, DesiredState::Down, self.offline_timeout)
            .await;
        if !offline.reached {
            let reason = format!(
                "still reachable on port {port} {}s after the reboot was confirmed",
                offline.elapsed_secs()
            );
            self.sink
                .record(Mark::Failure, &format!("{target} {reason}"));
            return DetectionOutcome::MatchedActionFailed { reason };
        }
        self.sink.record(
            Mark::Success,
            &format!("Device {target} is now OFFLINE. Starting reboot timer..."),
        );

        self.sink.record(
            Mark::Step,
            &format!("Waiting for {target} port {port} to become accessible..."),
        );
        let online = self
            .waiter
            .wait_until(target, DesiredState::Up, Some(self.online_timeout))
            .await;
        if online.reached {
            self.sink.record(
                Mark::Success,
                &format!(
                    "Device {target} port {port} accessible after {} seconds.",
                    online.elapsed_secs()
                ),
            );
        } else {
            self.sink.record(
                Mark::Failure,
                &format!("Timeout waiting for port {port} on {target}."),
            );
        }

        DetectionOutcome::MatchedRebootConfirmed { online }
    }
}

/// Console implementation for `vendor`.
pub fn console_for(vendor: Vendor) -> Box<dyn VendorConsole> {
    match vendor {
        Vendor::Grandstream => Box::new(grandstream::Grandstream::default()),
        Vendor::Snom => Box::new(snom::Snom::default()),
        Vendor::Polycom => Box::new(polycom::Polycom::default()),
    }
}

/// Builds the detectors for `order`, each paired with its vendor's credential.
pub fn lineup(
    order: &[Vendor],
    credentials: &CredentialTable,
    waiter: Arc<Waiter>,
    sink: Arc<dyn ResultSink>,
    cfg: &Config,
) -> anyhow::Result<Vec<DetectorEntry>> {
    order
        .iter()
        .map(|&vendor| {
            let Some(credential) = credentials.get(vendor) else {
                anyhow::bail!("no credentials configured for {vendor}");
            };
            let detector = RebootDetector::new(
                console_for(vendor),
                waiter.clone(),
                sink.clone(),
                cfg.offline_timeout,
                cfg.online_timeout,
            );
            Ok(DetectorEntry::new(vendor, credential.clone(), Box::new(detector)))
        })
        .collect()
}
