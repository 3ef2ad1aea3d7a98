use colored::*;
use lanwatch_common::config::Config;
use lanwatch_common::inventory::{Device, DeviceDetail, HttpProbeResult, PortScanResult};
use lanwatch_common::network::range::ACCEPTED_FORMS;
use lanwatch_core::views::device_detail::{DetailPhase, DetailSnapshot, FULL_SCAN_NOTICE, Panel};
use lanwatch_core::views::inventory::{InventoryPhase, InventorySnapshot};
use lanwatch_core::views::scan_request::{PickerChoice, RangePicker};
use tracing::warn;

use crate::mprint;
use crate::terminal::{colors, format, print};

pub const NO_PORT_SCANS: &str = "No port scan results";
pub const NO_HTTP_RESPONSES: &str = "No HTTP responses";

/// What one panel of the detail screen has to show.
#[derive(Debug, PartialEq)]
pub enum PanelBody<'a> {
    Empty(&'static str),
    Ports(&'a [PortScanResult]),
    Http(&'a [HttpProbeResult]),
}

pub fn panel_body(detail: &DeviceDetail, panel: Panel) -> PanelBody<'_> {
    match panel {
        Panel::PortScans if detail.port_scans.is_empty() => PanelBody::Empty(NO_PORT_SCANS),
        Panel::PortScans => PanelBody::Ports(&detail.port_scans),
        Panel::HttpResponses if detail.http_responses.is_empty() => {
            PanelBody::Empty(NO_HTTP_RESPONSES)
        }
        Panel::HttpResponses => PanelBody::Http(&detail.http_responses),
    }
}

pub fn inventory(snapshot: &InventorySnapshot, cfg: &Config) {
    print::header("device inventory", cfg.quiet);

    if let Some(error) = &snapshot.error {
        print::view_error(error);
    }

    match &snapshot.devices {
        None if snapshot.phase == InventoryPhase::Loading => print::print_status("Loading devices..."),
        None => {}
        Some(devices) if devices.is_empty() => print::no_results("No devices discovered yet"),
        Some(devices) => print_devices(devices, cfg),
    }

    let summary: String = format::counts_line(&snapshot.counts);
    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&summary);
        }
        _ => print::print_status(summary),
    }
}

fn print_devices(devices: &[Device], cfg: &Config) {
    for (idx, device) in devices.iter().enumerate() {
        match cfg.quiet {
            2 => print::print_status(format!(
                "{:<16} {}",
                device.ip_address,
                format::status(&device.status)
            )),
            _ => {
                print::tree_head(idx, &format::device_title(device));
                print::as_tree_one_level(format::device_to_details(device));
                if idx + 1 != devices.len() {
                    mprint!();
                }
            }
        }
    }
}

pub fn detail(snapshot: &DetailSnapshot, cfg: &Config) {
    let Some(ip) = &snapshot.ip else {
        return;
    };
    print::header(&format!("device {ip}"), cfg.quiet);

    if snapshot.phase == DetailPhase::Loading {
        print::print_status("Loading device details...");
    }
    if let Some(error) = &snapshot.error {
        print::view_error(error);
    }
    if snapshot.scanning {
        warn!("{FULL_SCAN_NOTICE}");
    }

    let Some(detail) = &snapshot.detail else {
        return;
    };

    print::tree_head(0, &format::device_title(&detail.device));
    let mut details = format::device_to_details(&detail.device);
    details.push((
        "Open ports".to_string(),
        detail.open_ports().count().to_string().color(colors::PORT_OPEN),
    ));
    print::as_tree_one_level(details);
    mprint!();

    print::header(
        match snapshot.panel {
            Panel::PortScans => "port scans",
            Panel::HttpResponses => "http responses",
        },
        cfg.quiet,
    );
    match panel_body(detail, snapshot.panel) {
        PanelBody::Empty(what) => print::no_results(what),
        PanelBody::Ports(scans) => port_scans(scans),
        PanelBody::Http(probes) => http_responses(probes),
    }
}

fn port_scans(scans: &[PortScanResult]) {
    print::print(&format::port_table_header());
    for scan in scans {
        print::print(&format::port_row(scan));
    }
}

fn http_responses(probes: &[HttpProbeResult]) {
    for (idx, probe) in probes.iter().enumerate() {
        print::tree_head(idx, &probe.url);
        print::as_tree_one_level(format::http_to_details(probe));
        if idx + 1 != probes.len() {
            mprint!();
        }
    }
}

pub fn presets(picker: &RangePicker) {
    for (idx, preset) in picker.presets().iter().enumerate() {
        let marker = if picker.choice() == PickerChoice::Preset(idx) {
            "*".color(colors::ACCENT).bold()
        } else {
            " ".normal()
        };
        print::print(&format!(
            "{} [{}] {}",
            marker,
            idx.to_string().color(colors::ACCENT),
            preset.label.color(colors::TEXT_DEFAULT),
        ));
    }
    if picker.choice() == PickerChoice::Custom {
        print::print_status("Custom range selected");
    }
    print::print_status(format!("Accepted forms: {ACCEPTED_FORMS}"));
}
