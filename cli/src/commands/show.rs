use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::DETAIL_FAILED;
use lanwatch_core::views::device_detail::{DeviceDetailView, Panel};
use tracing::Instrument;

use crate::commands::conclude;
use crate::terminal::{render, spinner};

pub async fn show(
    service: Arc<dyn DeviceService>,
    ip: &str,
    http: bool,
    cfg: &Config,
) -> anyhow::Result<ExitCode> {
    let view = DeviceDetailView::new(service);

    let loaded = view
        .show(ip)
        .instrument(spinner::working(&format!("Loading {ip}")))
        .await;
    if http {
        view.select_panel(Panel::HttpResponses);
    }

    let snapshot = view.snapshot();
    render::detail(&snapshot, cfg);
    Ok(conclude(&loaded, snapshot.error.as_deref(), true, DETAIL_FAILED))
}
