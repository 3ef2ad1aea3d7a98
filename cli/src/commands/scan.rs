use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::inventory::InventoryView;
use lanwatch_core::views::scan_request::{RangePicker, ScanRequestView};
use lanwatch_core::views::{SCAN_FAILED, ViewError};
use tracing::{Instrument, info};

use crate::commands::conclude;
use crate::terminal::{print, render, spinner};

/// Scans `range`, a preset, or the backend's default range when neither is given.
pub async fn scan(
    service: Arc<dyn DeviceService>,
    range: Option<String>,
    preset: Option<usize>,
    list_presets: bool,
    cfg: &Config,
) -> anyhow::Result<ExitCode> {
    if list_presets {
        print::header("range presets", cfg.quiet);
        render::presets(&RangePicker::default());
        return Ok(ExitCode::SUCCESS);
    }

    let view = InventoryView::new(service);

    let scanned: Result<(), ViewError> = match (range, preset) {
        (Some(range), _) => {
            view.scan_network(&range)
                .instrument(spinner::working(&format!("Scanning {}", range.trim())))
                .await
        }
        (None, Some(idx)) => {
            let mut picker = RangePicker::default();
            match picker.select_preset(idx) {
                Ok(preset) => {
                    let span = spinner::working(&format!("Scanning {}", preset.value));
                    let mut request = ScanRequestView::new(picker);
                    view.scan_with(&mut request).instrument(span).await
                }
                Err(err) => Err(err.into()),
            }
        }
        (None, None) => {
            view.quick_scan()
                .instrument(spinner::working("Scanning the default range"))
                .await
        }
    };

    let snapshot = view.snapshot();
    if scanned.is_ok() {
        info!("Scan finished, {} devices in the inventory", snapshot.counts.total);
        render::inventory(&snapshot, cfg);
    }
    Ok(conclude(&scanned, snapshot.error.as_deref(), scanned.is_ok(), SCAN_FAILED))
}
