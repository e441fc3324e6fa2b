use std::time::Duration;

/// Tunables of a reboot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port that must close after a reboot click and reopen once the phone is back.
    pub probe_port: u16,
    /// Connect timeout of a single reachability probe.
    pub probe_timeout: Duration,
    /// Sleep between two probes of the polling waiter.
    pub poll_interval: Duration,
    /// How long a rebooted phone gets to come back online.
    pub online_timeout: Duration,
    /// Ceiling on the wait for a phone to drop off after the reboot click.
    ///
    /// `None` waits forever.
    pub offline_timeout: Option<Duration>,
    /// Pause before every detector attempt, so the previous console can settle.
    pub detector_pause: Duration,
    /// Run the browser without a window.
    pub headless: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_port: 80,
            probe_timeout: Duration::from_secs(2),
            poll_interval: Duration::from_millis(500),
            online_timeout: Duration::from_secs(200),
            offline_timeout: Some(Duration::from_secs(300)),
            detector_pause: Duration::from_secs(2),
            headless: true,
        }
    }
}
