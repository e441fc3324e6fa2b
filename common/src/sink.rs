//! # Result Sink
//!
//! Where the core reports what it is doing. Recorded lines form the durable,
//! append-only result log; progress lines are transient status updates that may be
//! overwritten by the next one and never reach the log.

use std::sync::Mutex;

/// Kind of a recorded line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    Step,
    Success,
    Failure,
    Warning,
}

impl Mark {
    pub fn symbol(&self) -> &'static str {
        match self {
            Mark::Step => "[>]",
            Mark::Success => "[+]",
            Mark::Failure => "[-]",
            Mark::Warning => "[*]",
        }
    }
}

pub trait ResultSink: Send + Sync {
    /// Appends a line to the result log. Best effort: never fails the run.
    fn record(&self, mark: Mark, line: &str);

    /// Replaces the current status line.
    fn progress(&self, line: &str);
}

/// Keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Mark, String)>>,
    progress: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<(Mark, String)> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn progress_updates(&self) -> Vec<String> {
        self.progress.lock().map(|p| p.clone()).unwrap_or_default()
    }

    /// True if any recorded line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|(_, line)| line.contains(needle))
    }
}

impl ResultSink for MemorySink {
    fn record(&self, mark: Mark, line: &str) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push((mark, line.to_string()));
        }
    }

    fn progress(&self, line: &str) {
        if let Ok(mut progress) = self.progress.lock() {
            progress.push(line.to_string());
        }
    }
}
