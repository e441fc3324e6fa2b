use std::time::Duration;

/// What a polling waiter observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollResult {
    /// Last reachability answer of the prober.
    pub reachable: bool,
    /// Time spent waiting. Equals the timeout when `reached` is false.
    pub elapsed: Duration,
    /// Whether the desired state was observed before the timeout.
    pub reached: bool,
}

impl PollResult {
    pub fn reached(reachable: bool, elapsed: Duration) -> Self {
        Self {
            reachable,
            elapsed,
            reached: true,
        }
    }

    pub fn timed_out(reachable: bool, timeout: Duration) -> Self {
        Self {
            reachable,
            elapsed: timeout,
            reached: false,
        }
    }

    /// Whole seconds waited.
    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.as_secs()
    }
}

/// Result of running one vendor detector against one address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectionOutcome {
    /// The vendor's fingerprint is absent; try the next one.
    NotMatched,
    /// The reboot was triggered and the phone dropped off the network.
    /// `online` tells whether, and after how long, it came back.
    MatchedRebootConfirmed { online: PollResult },
    /// The vendor matched but logging in or triggering the reboot failed.
    MatchedActionFailed { reason: String },
}

impl DetectionOutcome {
    pub fn is_match(&self) -> bool {
        !matches!(self, DetectionOutcome::NotMatched)
    }
}
