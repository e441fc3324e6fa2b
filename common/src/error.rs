use std::path::PathBuf;

use thiserror::Error;

use crate::vendor::Vendor;

/// Failures while loading the static inputs of a run.
///
/// All of these happen before the first address is touched, so they are
/// allowed to abort the program.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid credentials file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown vendor '{0}' (expected grandstream, snom or polycom)")]
    UnknownVendor(String),

    #[error("vendor '{0}' listed more than once")]
    DuplicateVendor(Vendor),

    #[error("no vendors to try")]
    EmptyOrder,

    #[error("invalid target address '{0}'")]
    InvalidTarget(String),
}
