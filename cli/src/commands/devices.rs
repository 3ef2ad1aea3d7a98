use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::LOAD_FAILED;
use lanwatch_core::views::inventory::InventoryView;
use tracing::Instrument;

use crate::commands::conclude;
use crate::terminal::{render, spinner};

pub async fn devices(service: Arc<dyn DeviceService>, cfg: &Config) -> anyhow::Result<ExitCode> {
    let view = InventoryView::new(service);

    let loaded = view
        .mount()
        .instrument(spinner::working("Loading devices"))
        .await;

    let snapshot = view.snapshot();
    render::inventory(&snapshot, cfg);
    Ok(conclude(&loaded, snapshot.error.as_deref(), true, LOAD_FAILED))
}
