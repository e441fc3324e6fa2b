//! Cross-crate checks: the real detector lineup driven against scripted consoles,
//! and the TCP prober against loopback sockets.

mod reachability;
mod scenario;
