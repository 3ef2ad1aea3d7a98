use colored::*;
use indicatif::ProgressStyle;
use tracing::{Span, info_span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::terminal::colors;

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

pub fn style() -> anyhow::Result<ProgressStyle> {
    Ok(ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}")?.tick_strings(TICKS))
}

/// A spinner that lives as long as the returned span is entered or instrumented.
pub fn working(message: &str) -> Span {
    let span = info_span!("backend", indicatif.pb_show = true);
    span.pb_set_message(&format!("{}", message.color(colors::TEXT_DEFAULT)));
    span
}

pub fn port_scan(ip: &str) -> Span {
    working(&format!(
        "Scanning {} on all ports, this can take several minutes...",
        ip.color(colors::IPV4_ADDR).bold()
    ))
}
