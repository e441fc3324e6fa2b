//! # Device Orchestrator
//!
//! Walks the address list one phone at a time and, per phone, the detector list one
//! vendor at a time. The first detector that recognizes the phone decides its fate;
//! the remaining detectors are never tried. Whatever happens to one address, the
//! run moves on to the next.

use std::sync::Arc;
use std::time::Duration;

use rebootr_common::credentials::Credential;
use rebootr_common::network::target::TargetAddress;
use rebootr_common::outcome::DetectionOutcome;
use rebootr_common::report::{DeviceRunResult, RunSummary};
use rebootr_common::session::Session;
use rebootr_common::sink::{Mark, ResultSink};
use rebootr_common::utils::duration::format_duration;
use rebootr_common::vendor::Vendor;
use tokio::time::sleep;
use tracing::{debug, info_span, Instrument};

use crate::detector::Detector;

/// One vendor to try, with the login to try it with.
pub struct DetectorEntry {
    pub vendor: Vendor,
    pub credential: Credential,
    pub detector: Box<dyn Detector>,
}

impl DetectorEntry {
    pub fn new(vendor: Vendor, credential: Credential, detector: Box<dyn Detector>) -> Self {
        Self {
            vendor,
            credential,
            detector,
        }
    }
}

pub struct Orchestrator {
    detectors: Vec<DetectorEntry>,
    sink: Arc<dyn ResultSink>,
    pause: Duration,
}

impl Orchestrator {
    pub fn new(detectors: Vec<DetectorEntry>, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            detectors,
            sink,
            pause: Duration::ZERO,
        }
    }

    /// Sleeps `pause` before every detector attempt.
    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    /// Runs the detectors against `address` until one recognizes it.
    pub async fn process_address(
        &self,
        session: &mut dyn Session,
        address: &TargetAddress,
    ) -> DeviceRunResult {
        self.sink.record(Mark::Step, &format!("Scanning IP: {address}"));

        for entry in &self.detectors {
            if !self.pause.is_zero() {
                sleep(self.pause).await;
            }

            let outcome = entry
                .detector
                .detect(session, address, &entry.credential)
                .instrument(info_span!("detect", vendor = %entry.vendor))
                .await;
            debug!(%address, vendor = %entry.vendor, ?outcome, "detector finished");

            if outcome.is_match() {
                return self.conclude(address, entry.vendor, outcome);
            }
        }

        self.sink.record(
            Mark::Warning,
            &format!("Could not detect device type or login failed for {address}."),
        );
        DeviceRunResult::undetected(address.clone())
    }

    /// Processes every address in order and totals the downtime.
    pub async fn process_all(
        &self,
        session: &mut dyn Session,
        addresses: &[TargetAddress],
    ) -> RunSummary {
        let mut results = Vec::with_capacity(addresses.len());
        for (idx, address) in addresses.iter().enumerate() {
            self.sink
                .progress(&format!("[{}/{}] {address}", idx + 1, addresses.len()));
            results.push(self.process_address(session, address).await);
        }

        let summary: RunSummary = results.into_iter().collect();
        self.sink.record(
            Mark::Step,
            &format!(
                "Total reboot time for all devices: {}",
                format_duration(summary.total_downtime_secs)
            ),
        );
        self.sink.record(
            Mark::Step,
            &format!(
                "{} rebooted, {} failed, {} undetected",
                summary.succeeded(),
                summary.failed(),
                summary.undetected()
            ),
        );
        summary
    }

    fn conclude(&self, address: &TargetAddress, vendor: Vendor, outcome: DetectionOutcome) -> DeviceRunResult {
        match outcome {
            DetectionOutcome::MatchedRebootConfirmed { online } if online.reached => {
                let downtime = online.elapsed_secs();
                self.sink.record(
                    Mark::Success,
                    &format!(
                        "Device {address} ({vendor}) rebooted successfully in {}.",
                        format_duration(downtime)
                    ),
                );
                DeviceRunResult::success(address.clone(), vendor, downtime)
            }
            DetectionOutcome::MatchedRebootConfirmed { online } => {
                self.sink.record(
                    Mark::Failure,
                    &format!("Device {address} ({vendor}) reboot failed or timed out."),
                );
                DeviceRunResult::failed(
                    address.clone(),
                    vendor,
                    format!("did not come back online within {}s", online.elapsed_secs()),
                )
            }
            DetectionOutcome::MatchedActionFailed { reason } => {
                self.sink.record(
                    Mark::Failure,
                    &format!("Device {address} ({vendor}) reboot failed: {reason}"),
                );
                DeviceRunResult::failed(address.clone(), vendor, reason)
            }
            DetectionOutcome::NotMatched => DeviceRunResult::undetected(address.clone()),
        }
    }
}
