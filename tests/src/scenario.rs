#![cfg(test)]
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::config::Config;
use rebootr_common::credentials::CredentialTable;
use rebootr_common::network::target::TargetAddress;
use rebootr_common::report::DeviceStatus;
use rebootr_common::session::Locator;
use rebootr_common::sink::{Mark, MemorySink, ResultSink};
use rebootr_common::vendor::Vendor;
use rebootr_core::browser::scripted::{FakeElement, FakePage, ScriptedSession};
use rebootr_core::detector;
use rebootr_core::network::tcp::Prober;
use rebootr_core::network::waiter::Waiter;
use rebootr_core::orchestrator::Orchestrator;

/// Per address list of probe answers; once a list runs out the phone stays up.
#[derive(Default)]
struct PhoneLab {
    scripts: Mutex<HashMap<String, Vec<bool>>>,
}

impl PhoneLab {
    /// Answers `up` probes with "open", then `down` probes with "closed".
    fn phone(self, address: &str, up: usize, down: usize) -> Self {
        let mut script = vec![true; up];
        script.extend(vec![false; down]);
        script.reverse();
        self.scripts.lock().unwrap().insert(address.to_string(), script);
        self
    }
}

#[async_trait]
impl Prober for PhoneLab {
    async fn is_reachable(&self, target: &TargetAddress, _port: u16) -> bool {
        self.scripts
            .lock()
            .unwrap()
            .get_mut(target.as_str())
            .and_then(Vec::pop)
            .unwrap_or(true)
    }
}

/// A Snom web console at `address`, reachable with the factory login.
fn snom_console(session: &mut ScriptedSession, address: &str) {
    let confirm = format!("{address}-confirm");
    let reboot = format!("{address}-reboot");
    session
        .page(
            format!("http://admin:admin@{address}/"),
            FakePage::new("<title>snom D785</title>").title("snom D785"),
        )
        .page(
            format!("http://{address}/advanced_update.htm"),
            FakePage::new("")
                .element(Locator::name("CONFIRM_REBOOT"), confirm.clone())
                .element(Locator::name("REBOOT"), reboot.clone()),
        )
        .element(confirm, FakeElement::new())
        .element(reboot, FakeElement::new());
}

fn config() -> Config {
    Config {
        poll_interval: Duration::from_secs(1),
        offline_timeout: Some(Duration::from_secs(30)),
        ..Config::default()
    }
}

fn orchestrator(lab: PhoneLab, sink: Arc<MemorySink>) -> Orchestrator {
    let cfg = config();
    let sink: Arc<dyn ResultSink> = sink;
    let waiter = Arc::new(Waiter::new(
        Arc::new(lab),
        cfg.probe_port,
        cfg.poll_interval,
        sink.clone(),
    ));
    let detectors = detector::lineup(
        &Vendor::ALL,
        &CredentialTable::default(),
        waiter,
        sink.clone(),
        &cfg,
    )
    .unwrap();
    Orchestrator::new(detectors, sink).with_pause(cfg.detector_pause)
}

fn targets(addresses: &[&str]) -> Vec<TargetAddress> {
    addresses.iter().map(|a| a.parse().unwrap()).collect()
}

#[tokio::test(start_paused = true)]
async fn snom_found_after_grandstream_miss_and_unknown_device_skipped() {
    let sink = Arc::new(MemorySink::new());
    let lab = PhoneLab::default().phone("10.0.0.6", 2, 46);
    let mut session = ScriptedSession::new();
    snom_console(&mut session, "10.0.0.6");

    let summary = orchestrator(lab, sink.clone())
        .process_all(&mut session, &targets(&["10.0.0.6", "10.0.0.7"]))
        .await;

    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.results[0].vendor, Some(Vendor::Snom));
    assert_eq!(summary.results[0].status, DeviceStatus::Success);
    assert_eq!(summary.results[0].downtime_secs, Some(45));
    assert_eq!(summary.results[1].status, DeviceStatus::Undetected);
    assert_eq!(summary.total_downtime_secs, 45);

    assert!(sink.contains("accessible after 45 seconds"));
    assert!(sink.contains("0 minutes and 45 seconds"));
    assert!(sink.lines().iter().any(|(mark, line)| *mark == Mark::Warning && line.contains("10.0.0.7")));
    assert!(session.clicked("10.0.0.6-reboot"));
}

#[tokio::test(start_paused = true)]
async fn phone_that_never_drops_off_is_a_failure() {
    let sink = Arc::new(MemorySink::new());
    let lab = PhoneLab::default();
    let mut session = ScriptedSession::new();
    snom_console(&mut session, "10.0.0.6");

    let summary = orchestrator(lab, sink.clone())
        .process_all(&mut session, &targets(&["10.0.0.6"]))
        .await;

    let DeviceStatus::Failed { reason } = &summary.results[0].status else {
        panic!("expected a failure, got {:?}", summary.results[0]);
    };
    assert!(reason.contains("still reachable"));
    assert_eq!(summary.results[0].vendor, Some(Vendor::Snom));
    assert_eq!(summary.total_downtime_secs, 0);
    assert_eq!(summary.failed(), 1);
}

#[tokio::test(start_paused = true)]
async fn every_address_is_reported_once_in_order() {
    let sink = Arc::new(MemorySink::new());
    let lab = PhoneLab::default()
        .phone("10.0.0.6", 1, 10)
        .phone("10.0.0.8", 1, 20);
    let mut session = ScriptedSession::new();
    snom_console(&mut session, "10.0.0.6");
    snom_console(&mut session, "10.0.0.8");

    let addresses = targets(&["10.0.0.6", "10.0.0.7", "10.0.0.8"]);
    let summary = orchestrator(lab, sink.clone())
        .process_all(&mut session, &addresses)
        .await;

    let reported: Vec<&TargetAddress> = summary.results.iter().map(|r| &r.address).collect();
    assert_eq!(reported, addresses.iter().collect::<Vec<_>>());
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.undetected(), 1);
    assert_eq!(summary.total_downtime_secs, 9 + 19);
    assert_eq!(sink.progress_updates().iter().filter(|p| p.starts_with('[')).count(), 3);
}
