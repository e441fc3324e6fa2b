//! # Rebootr Common
//!
//! Types shared by every crate in the workspace: the data model of a reboot run,
//! configuration, the credential table, and the two capabilities the core consumes
//! but does not implement (the UI-automation [`session::Session`] and the
//! [`sink::ResultSink`]).

pub mod config;
pub mod credentials;
pub mod error;
pub mod network;
pub mod outcome;
pub mod report;
pub mod session;
pub mod sink;
pub mod utils;
pub mod vendor;
