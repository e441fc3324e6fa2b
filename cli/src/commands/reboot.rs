use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use tracing::{Instrument, Span, info, info_span, warn};

use crate::commands::RebootArgs;
use crate::rprint;
use crate::sink::FileSink;
use crate::terminal::{colors, format, print};
use rebootr_common::config::Config;
use rebootr_common::credentials::CredentialTable;
use rebootr_common::network::target::{self, TargetAddress};
use rebootr_common::report::RunSummary;
use rebootr_common::sink::ResultSink;
use rebootr_common::utils::duration::format_duration;
use rebootr_common::vendor;
use rebootr_core::browser::webdriver::{BrowserOptions, WebDriverSession};
use rebootr_core::detector;
use rebootr_core::network::tcp::{Prober, TcpProber};
use rebootr_core::network::waiter::Waiter;
use rebootr_core::orchestrator::Orchestrator;

pub async fn reboot(args: RebootArgs) -> anyhow::Result<()> {
    let cfg = args.config();
    vendor::check_order(&args.order)?;

    let targets: Vec<TargetAddress> = target::load_list(&args.targets)?;
    if targets.is_empty() {
        print::header("no targets");
        print::no_targets();
        return Ok(());
    }
    let credentials = CredentialTable::load(args.credentials.as_deref())?;

    // the results file is only truncated once the browser is up
    let options = BrowserOptions {
        headless: cfg.headless,
        ..BrowserOptions::default()
    };
    let mut session = WebDriverSession::connect(&args.webdriver, &options)
        .await
        .with_context(|| format!("cannot start a browser session at {}", args.webdriver))?;
    info!(
        "browser session {} ready, {} targets queued",
        session.session_id(),
        targets.len()
    );

    let span = info_span!("reboot", indicatif.pb_show = true);
    let orchestrator = match build_orchestrator(&args, &cfg, &credentials, &span) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            close_session(session).await;
            return Err(e);
        }
    };

    let start_time = Instant::now();
    let summary = orchestrator
        .process_all(&mut session, &targets)
        .instrument(span.clone())
        .await;
    // closes the spinner: the sink holds the last clone of the span
    drop(orchestrator);
    drop(span);

    close_session(session).await;

    reboot_ends(&summary, start_time);
    info!("results written to {}", args.results.display());
    Ok(())
}

fn build_orchestrator(
    args: &RebootArgs,
    cfg: &Config,
    credentials: &CredentialTable,
    span: &Span,
) -> anyhow::Result<Orchestrator> {
    let sink: Arc<dyn ResultSink> = Arc::new(FileSink::create(&args.results, span.clone())?);
    let prober: Arc<dyn Prober> = Arc::new(TcpProber::new(cfg.probe_timeout));
    let waiter = Arc::new(Waiter::new(prober, cfg.probe_port, cfg.poll_interval, sink.clone()));
    let detectors = detector::lineup(&args.order, credentials, waiter, sink.clone(), cfg)?;
    Ok(Orchestrator::new(detectors, sink).with_pause(cfg.detector_pause))
}

async fn close_session(session: WebDriverSession) {
    if let Err(e) = session.close().await {
        warn!("could not close the browser session: {e}");
    }
}

fn reboot_ends(summary: &RunSummary, start_time: Instant) {
    rprint!();
    print::header("reboot results");
    for (idx, result) in summary.results.iter().enumerate() {
        print::tree_head(idx, result.address.as_str());
        print::as_tree_one_level(format::result_to_details(result));
        if idx + 1 != summary.results.len() {
            rprint!();
        }
    }
    print_summary(summary, start_time);
    print::end_of_program();
}

fn print_summary(summary: &RunSummary, start_time: Instant) {
    let rebooted: ColoredString = format!("{} rebooted", summary.succeeded()).bold().green();
    let failed: ColoredString = format!("{} failed", summary.failed()).bold().red();
    let undetected: ColoredString = format!("{} undetected", summary.undetected()).yellow();
    let downtime: ColoredString = format_duration(summary.total_downtime_secs).bold().yellow();
    let wall: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold();

    print::fat_separator();
    print::centerln(&format!("{rebooted}, {failed}, {undetected}"));
    print::centerln(&format!(
        "{} {downtime}{} {wall}",
        "Total downtime".color(colors::TEXT_DEFAULT),
        ", run took".color(colors::TEXT_DEFAULT)
    ));
}
