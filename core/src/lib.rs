//! # Rebootr Core
//!
//! The per-address state machine: probe an unknown phone against an ordered set of
//! vendor detectors, drive the matching console through login and reboot, and time
//! how long the phone stays off the network.
//!
//! * [`network`]: TCP reachability probing and the polling waiter built on it.
//! * [`browser`]: waiting helpers over a [`rebootr_common::session::Session`] and the
//!   WebDriver implementation of it.
//! * [`detector`]: fingerprints, the vendor consoles and the reboot state machine.
//! * [`orchestrator`]: tries detectors per address and aggregates the run.

pub mod browser;
pub mod detector;
pub mod network;
pub mod orchestrator;
