use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::device_detail::{DeviceDetailView, FULL_SCAN_LABEL, FULL_SCAN_NOTICE};
use lanwatch_core::views::{DETAIL_FAILED, PORT_SCAN_FAILED};
use tracing::{Instrument, info, warn};

use crate::commands::conclude;
use crate::terminal::{print, render, spinner};

pub async fn ports(service: Arc<dyn DeviceService>, ip: &str, cfg: &Config) -> anyhow::Result<ExitCode> {
    let view = DeviceDetailView::new(service);

    let loaded = view
        .show(ip)
        .instrument(spinner::working(&format!("Loading {ip}")))
        .await;
    if loaded.is_err() {
        let snapshot = view.snapshot();
        render::detail(&snapshot, cfg);
        return Ok(conclude(&loaded, snapshot.error.as_deref(), true, DETAIL_FAILED));
    }

    print::header(FULL_SCAN_LABEL, cfg.quiet);
    warn!("{FULL_SCAN_NOTICE}");

    let scanned = view.run_port_scan().instrument(spinner::port_scan(ip)).await;
    if scanned.is_ok() {
        info!("Port scan of {ip} finished");
    }

    let snapshot = view.snapshot();
    render::detail(&snapshot, cfg);
    Ok(conclude(&scanned, snapshot.error.as_deref(), true, PORT_SCAN_FAILED))
}
