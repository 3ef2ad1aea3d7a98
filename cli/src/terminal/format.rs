use colored::*;
use lanwatch_common::inventory::{
    Device, DeviceCounts, DeviceStatus, HttpProbeResult, PortScanResult, Timestamp,
};

use crate::terminal::colors;

type Detail = (String, ColoredString);

const MISSING: &str = "-";
const BODY_PREVIEW_LINES: usize = 8;

pub fn optional(value: Option<&str>) -> ColoredString {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(text) => text.color(colors::TEXT_DEFAULT),
        None => MISSING.dimmed(),
    }
}

pub fn status(status: &DeviceStatus) -> ColoredString {
    match status {
        DeviceStatus::Online => status.label().color(colors::ONLINE).bold(),
        DeviceStatus::Offline => status.label().color(colors::OFFLINE).bold(),
        DeviceStatus::Unknown => status.label().color(colors::UNKNOWN).bold(),
        DeviceStatus::Other(label) => label.dimmed(),
    }
}

pub fn timestamp(ts: &Timestamp) -> ColoredString {
    ts.to_local_string().color(colors::TEXT_DEFAULT)
}

pub fn counts_line(counts: &DeviceCounts) -> String {
    format!(
        "{} devices: {} online, {} offline, {} unknown",
        counts.total.to_string().bold(),
        counts.online.to_string().color(colors::ONLINE).bold(),
        counts.offline.to_string().color(colors::OFFLINE).bold(),
        counts.unknown.to_string().color(colors::UNKNOWN).bold(),
    )
}

pub fn device_title(device: &Device) -> String {
    match device.hostname.as_deref().map(str::trim).filter(|h| !h.is_empty()) {
        Some(hostname) => format!("{} ({hostname})", device.ip_address),
        None => device.ip_address.clone(),
    }
}

pub fn device_to_details(device: &Device) -> Vec<Detail> {
    let mac = match device.mac_address.as_deref() {
        Some(mac) if !mac.trim().is_empty() => mac.to_uppercase().color(colors::MAC_ADDR),
        _ => MISSING.dimmed(),
    };
    vec![
        ("IPv4".to_string(), device.ip_address.color(colors::IPV4_ADDR)),
        ("MAC".to_string(), mac),
        ("Vendor".to_string(), optional(device.vendor.as_deref())),
        ("OS".to_string(), optional(device.os_info.as_deref())),
        ("Status".to_string(), status(&device.status)),
        ("First seen".to_string(), timestamp(&device.first_detected)),
        ("Last seen".to_string(), timestamp(&device.last_seen)),
    ]
}

pub fn port_table_header() -> String {
    format!(
        "{:>5}  {:<10}  {:<16}  {:<6}  {}",
        "PORT", "TYPE", "SERVICE", "STATE", "SCANNED"
    )
    .color(colors::SEPARATOR)
    .to_string()
}

pub fn port_row(scan: &PortScanResult) -> String {
    let state = if scan.is_open {
        format!("{:<6}", "open").color(colors::PORT_OPEN)
    } else {
        format!("{:<6}", "closed").color(colors::PORT_CLOSED)
    };
    format!(
        "{}  {:<10}  {:<16}  {}  {}",
        format!("{:>5}", scan.port).color(colors::ACCENT),
        cell(scan.service.as_deref()),
        cell(scan.service_name.as_deref()),
        state,
        scan.scan_time.to_local_string().dimmed(),
    )
}

fn cell(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(MISSING)
        .to_string()
}

pub fn http_status(code: Option<u16>) -> ColoredString {
    match code {
        Some(code @ 200..=299) => code.to_string().color(colors::ONLINE).bold(),
        Some(code @ 300..=399) => code.to_string().color(colors::SECONDARY).bold(),
        Some(code) => code.to_string().color(colors::OFFLINE).bold(),
        None => "N/A".dimmed(),
    }
}

pub fn http_to_details(probe: &HttpProbeResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Status".to_string(), http_status(probe.status_code)),
        ("Scanned".to_string(), timestamp(&probe.scan_time)),
    ];

    for (name, value) in probe.headers.iter().flatten() {
        details.push((name.clone(), value.color(colors::TEXT_DEFAULT)));
    }

    if let Some(body) = probe.body_preview.as_deref().filter(|b| !b.trim().is_empty()) {
        let preview: Vec<&str> = body.lines().take(BODY_PREVIEW_LINES).collect();
        details.push(("Body".to_string(), preview.join(" ⏎ ").dimmed()));
    }

    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
