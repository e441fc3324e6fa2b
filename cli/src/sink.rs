//! Result log on disk, mirrored to the terminal.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;
use rebootr_common::sink::{Mark, ResultSink};
use tracing::{Span, error, info, warn};

use crate::terminal::{print, spinner};

/// Appends every recorded line to a results file, truncated when the sink is
/// created. Progress only drives the spinner of `status`.
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
    status: Span,
}

impl FileSink {
    pub fn create(path: &Path, status: Span) -> anyhow::Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("cannot create results file {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
            status,
        })
    }

    fn append(&self, mark: Mark, line: &str) {
        let Ok(mut file) = self.file.lock() else {
            return;
        };
        if let Err(e) = writeln!(file, "{} {}", mark.symbol(), line).and_then(|_| file.flush()) {
            warn!("could not write to {}: {e}", self.path.display());
        }
    }
}

impl ResultSink for FileSink {
    fn record(&self, mark: Mark, line: &str) {
        self.append(mark, line);
        match mark {
            Mark::Step => print::print_status(line),
            Mark::Success => info!("{line}"),
            Mark::Failure => error!("{line}"),
            Mark::Warning => warn!("{line}"),
        }
    }

    fn progress(&self, line: &str) {
        spinner::set_status(&self.status, line);
    }
}
