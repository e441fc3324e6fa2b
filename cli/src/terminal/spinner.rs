use indicatif::ProgressStyle;
use tracing::Span;
use tracing_indicatif::IndicatifLayer;
use tracing_indicatif::filter::{IndicatifFilter, hide_indicatif_span_fields};
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_subscriber::fmt::format::DefaultFields;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::terminal::logging::RebootrFormatter;

const TICKS: &[&str] = &[
    "▁▁▁▁▁",
    "▁▂▂▂▁",
    "▁▄▂▄▁",
    "▂▄▆▄▂",
    "▄▆█▆▄",
    "▂▄▆▄▂",
    "▁▄▂▄▁",
    "▁▂▂▂▁",
];

fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.blue} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(TICKS)
}

/// Installs the global subscriber.
///
/// Only spans created with `indicatif.pb_show = true` get a spinner; every other
/// event is printed above it through the indicatif writer.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,rebootr={level},rebootr_core={level},rebootr_common={level}"
        ))
    });

    let indicatif_layer = IndicatifLayer::new()
        .with_progress_style(spinner_style())
        .with_span_field_formatter(hide_indicatif_span_fields(DefaultFields::new()));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .event_format(RebootrFormatter)
        .fmt_fields(hide_indicatif_span_fields(DefaultFields::new()))
        .with_writer(indicatif_layer.get_stdout_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .with(indicatif_layer.with_filter(IndicatifFilter::new(false)))
        .init();
}

/// Replaces the spinner message of `span`. No-op for spans without a spinner.
pub fn set_status(span: &Span, msg: &str) {
    span.pb_set_message(msg);
}
