//! # Polling Waiter
//!
//! Probes an address at a fixed interval until its port reaches the desired state.
//! Bounded waits give up at the timeout; an unbounded wait (no timeout) keeps
//! polling until the state is observed.

use std::sync::Arc;
use std::time::Duration;

use rebootr_common::network::target::TargetAddress;
use rebootr_common::outcome::PollResult;
use rebootr_common::sink::ResultSink;
use tokio::time::{Instant, sleep, timeout_at};
use tracing::debug;

use crate::network::tcp::Prober;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DesiredState {
    Up,
    Down,
}

impl DesiredState {
    fn is_reachable(self) -> bool {
        matches!(self, DesiredState::Up)
    }

    fn progress_line(self, target: &TargetAddress, port: u16, elapsed: Duration) -> String {
        match self {
            DesiredState::Up => format!(
                "Waiting for {target} port {port}... {}s",
                elapsed.as_secs()
            ),
            DesiredState::Down => format!("{target} still reachable on port {port}..."),
        }
    }
}

pub struct Waiter {
    prober: Arc<dyn Prober>,
    port: u16,
    interval: Duration,
    sink: Arc<dyn ResultSink>,
}

impl Waiter {
    pub fn new(
        prober: Arc<dyn Prober>,
        port: u16,
        interval: Duration,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            prober,
            port,
            interval,
            sink,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Polls `target` until it is in the `desired` state.
    ///
    /// With `Some(limit)` the call returns no later than `limit` after it started:
    /// sleeps are clipped to the remaining time and an in-flight probe is abandoned at
    /// the deadline. On success `elapsed` is the time of the first matching probe and
    /// is strictly below `limit`.
    pub async fn wait_until(
        &self,
        target: &TargetAddress,
        desired: DesiredState,
        limit: Option<Duration>,
    ) -> PollResult {
        let start = Instant::now();
        let deadline = limit.map(|limit| start + limit);
        let mut reachable = !desired.is_reachable();

        loop {
            let elapsed = start.elapsed();
            if let (Some(limit), Some(deadline)) = (limit, deadline) {
                if elapsed >= limit {
                    debug!(%target, ?desired, "gave up after {}s", limit.as_secs());
                    return PollResult::timed_out(reachable, limit);
                }
                match timeout_at(deadline, self.prober.is_reachable(target, self.port)).await {
                    Ok(answer) => reachable = answer,
                    Err(_deadline) => return PollResult::timed_out(reachable, limit),
                }
            } else {
                reachable = self.prober.is_reachable(target, self.port).await;
            }

            if reachable == desired.is_reachable() {
                return PollResult::reached(reachable, elapsed);
            }

            self.sink
                .progress(&desired.progress_line(target, self.port, elapsed));

            let pause = match deadline {
                Some(deadline) => self
                    .interval
                    .min(deadline.saturating_duration_since(Instant::now())),
                None => self.interval,
            };
            sleep(pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rebootr_common::sink::MemorySink;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Answers from a script, then repeats the last answer forever.
    struct ScriptedProber {
        answers: Mutex<Vec<bool>>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl ScriptedProber {
        fn new(answers: &[bool]) -> Self {
            Self {
                answers: Mutex::new(answers.iter().rev().copied().collect()),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn slow(answers: &[bool], delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(answers)
            }
        }
    }

    #[async_trait]
    impl Prober for ScriptedProber {
        async fn is_reachable(&self, _target: &TargetAddress, _port: u16) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            let mut answers = self.answers.lock().unwrap();
            if answers.len() > 1 {
                answers.pop().unwrap()
            } else {
                answers.last().copied().unwrap_or(false)
            }
        }
    }

    fn target() -> TargetAddress {
        "10.0.0.5".parse().unwrap()
    }

    fn waiter(prober: Arc<ScriptedProber>, sink: Arc<MemorySink>) -> Waiter {
        Waiter::new(prober, 80, Duration::from_millis(500), sink)
    }

    #[tokio::test(start_paused = true)]
    async fn reports_time_until_port_opens() {
        let prober = Arc::new(ScriptedProber::new(&[false, false, false, false, true]));
        let sink = Arc::new(MemorySink::new());

        let result = waiter(prober.clone(), sink.clone())
            .wait_until(&target(), DesiredState::Up, Some(Duration::from_secs(200)))
            .await;

        assert!(result.reached);
        assert!(result.reachable);
        assert_eq!(result.elapsed, Duration::from_secs(2));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 5);
        assert_eq!(sink.progress_updates().len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn already_in_desired_state_returns_immediately() {
        let prober = Arc::new(ScriptedProber::new(&[false]));
        let sink = Arc::new(MemorySink::new());

        let result = waiter(prober, sink.clone())
            .wait_until(&target(), DesiredState::Down, Some(Duration::from_secs(5)))
            .await;

        assert!(result.reached);
        assert_eq!(result.elapsed, Duration::ZERO);
        assert!(sink.progress_updates().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_wait_times_out_with_last_observation() {
        let prober = Arc::new(ScriptedProber::new(&[false]));
        let sink = Arc::new(MemorySink::new());
        let limit = Duration::from_secs(3);
        let started = Instant::now();

        let result = waiter(prober, sink)
            .wait_until(&target(), DesiredState::Up, Some(limit))
            .await;

        assert!(!result.reached);
        assert!(!result.reachable);
        assert_eq!(result.elapsed, limit);
        assert!(started.elapsed() <= limit + Duration::from_millis(500));
    }

    #[tokio::test(start_paused = true)]
    async fn bounded_wait_never_overshoots_with_slow_probes() {
        let limits = [1u64, 3, 7, 10];
        for secs in limits {
            let limit = Duration::from_secs(secs);
            let prober = Arc::new(ScriptedProber::slow(&[false], Duration::from_secs(2)));
            let started = Instant::now();

            let result = waiter(prober, Arc::new(MemorySink::new()))
                .wait_until(&target(), DesiredState::Up, Some(limit))
                .await;

            assert!(!result.reached);
            assert!(
                started.elapsed() <= limit + Duration::from_millis(500),
                "limit {secs}s overshot: {:?}",
                started.elapsed()
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn success_is_always_before_the_timeout() {
        for opens_after in 1..8usize {
            let mut script = vec![false; opens_after];
            script.push(true);
            let prober = Arc::new(ScriptedProber::new(&script));
            let limit = Duration::from_secs(3);

            let result = waiter(prober, Arc::new(MemorySink::new()))
                .wait_until(&target(), DesiredState::Up, Some(limit))
                .await;

            if result.reached {
                assert!(result.elapsed < limit);
            } else {
                assert_eq!(result.elapsed, limit);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn unbounded_wait_keeps_polling_until_port_closes() {
        let mut script = vec![true; 1_000];
        script.push(false);
        let prober = Arc::new(ScriptedProber::new(&script));
        let sink = Arc::new(MemorySink::new());

        let result = waiter(prober.clone(), sink.clone())
            .wait_until(&target(), DesiredState::Down, None)
            .await;

        assert!(result.reached);
        assert!(!result.reachable);
        assert_eq!(result.elapsed, Duration::from_millis(500) * 1_000);
        assert!(
            sink.progress_updates()
                .iter()
                .all(|line| line.contains("still reachable"))
        );
    }
}
