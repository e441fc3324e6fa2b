#![cfg(test)]
use std::sync::Arc;
use std::time::Duration;

use rebootr_common::network::target::TargetAddress;
use rebootr_common::sink::MemorySink;
use rebootr_core::network::tcp::TcpProber;
use rebootr_core::network::waiter::{DesiredState, Waiter};
use tokio::net::TcpListener;

fn loopback() -> TargetAddress {
    "127.0.0.1".parse().unwrap()
}

fn waiter(port: u16) -> Waiter {
    Waiter::new(
        Arc::new(TcpProber::new(Duration::from_millis(500))),
        port,
        Duration::from_millis(50),
        Arc::new(MemorySink::new()),
    )
}

#[tokio::test]
async fn listening_port_is_up_at_once() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let result = waiter(port)
        .wait_until(&loopback(), DesiredState::Up, Some(Duration::from_secs(5)))
        .await;

    assert!(result.reached);
    assert!(result.reachable);
    assert_eq!(result.elapsed_secs(), 0);
}

#[tokio::test]
async fn closed_listener_is_seen_going_down() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let result = waiter(port)
        .wait_until(&loopback(), DesiredState::Down, Some(Duration::from_secs(5)))
        .await;

    assert!(result.reached);
    assert!(!result.reachable);
}

#[tokio::test]
async fn closed_port_never_comes_up_within_the_limit() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let limit = Duration::from_millis(300);
    let result = waiter(port)
        .wait_until(&loopback(), DesiredState::Up, Some(limit))
        .await;

    assert!(!result.reached);
    assert_eq!(result.elapsed, limit);
}
