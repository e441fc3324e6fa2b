use std::time::Duration;

use async_trait::async_trait;
use rebootr_common::network::target::TargetAddress;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::trace;

/// Answers "is this port open right now?".
///
/// A closed, filtered or unresolvable endpoint is a plain `false`; probing never fails.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn is_reachable(&self, target: &TargetAddress, port: u16) -> bool;
}

/// Full TCP handshake with a connect timeout.
#[derive(Debug, Clone, Copy)]
pub struct TcpProber {
    connect_timeout: Duration,
}

impl TcpProber {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait]
impl Prober for TcpProber {
    async fn is_reachable(&self, target: &TargetAddress, port: u16) -> bool {
        is_reachable(target, port, self.connect_timeout).await
    }
}

pub async fn is_reachable(target: &TargetAddress, port: u16, connect_timeout: Duration) -> bool {
    match timeout(connect_timeout, TcpStream::connect((target.as_str(), port))).await {
        Ok(Ok(_)) => true,
        Ok(Err(err)) => {
            trace!(%target, port, %err, "connect refused");
            false
        }
        Err(_elapsed) => false,
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
