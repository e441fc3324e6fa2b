use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{Instrument, info, info_span};

use crate::commands::ProbeArgs;
use crate::terminal::{format, print, spinner};
use rebootr_common::network::target::{self, TargetAddress};
use rebootr_core::network::tcp;

pub async fn probe(args: ProbeArgs) -> anyhow::Result<()> {
    let targets: Vec<TargetAddress> = target::load_list(&args.targets)?;
    if targets.is_empty() {
        print::header("no targets");
        print::no_targets();
        return Ok(());
    }

    let span = info_span!("probe", indicatif.pb_show = true);
    spinner::set_status(
        &span,
        &format!("probing {} targets on port {}", targets.len(), args.port),
    );
    let states = probe_all(&targets, args.port, Duration::from_millis(args.timeout_ms))
        .instrument(span)
        .await;

    let open = states.iter().filter(|open| **open).count();
    print::header("reachability");
    let key_width = targets.iter().map(|t| t.as_str().len()).max().unwrap_or(0);
    for (target, open) in targets.iter().zip(&states) {
        print::aligned_line(target.as_str(), key_width, format::reachability(*open));
    }
    print::fat_separator();
    info!("{open} of {} targets answer on port {}", targets.len(), args.port);
    print::end_of_program();
    Ok(())
}

/// Probes every target concurrently; the answer keeps the input order.
pub async fn probe_all(targets: &[TargetAddress], port: u16, connect_timeout: Duration) -> Vec<bool> {
    let mut set = JoinSet::new();
    for (idx, target) in targets.iter().cloned().enumerate() {
        set.spawn(async move { (idx, tcp::is_reachable(&target, port, connect_timeout).await) });
    }

    let mut states = vec![false; targets.len()];
    while let Some(joined) = set.join_next().await {
        if let Ok((idx, open)) = joined {
            states[idx] = open;
        }
    }
    states
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn keeps_input_order() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open_port = listener.local_addr().unwrap().port();

        let targets: Vec<TargetAddress> = vec![
            "127.0.0.1".parse().unwrap(),
            "unreachable.invalid".parse().unwrap(),
            "127.0.0.1".parse().unwrap(),
        ];
        let states = probe_all(&targets, open_port, Duration::from_millis(500)).await;
        assert_eq!(states, vec![true, false, true]);
    }
}
