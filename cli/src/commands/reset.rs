use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_core::service::DeviceService;
use lanwatch_core::views::RESET_FAILED;
use lanwatch_core::views::inventory::{InventoryView, ResetOutcome};
use tracing::info;

use crate::commands::conclude;
use crate::terminal::input::KeyConfirm;
use crate::terminal::render;

pub async fn reset(service: Arc<dyn DeviceService>, cfg: &Config) -> anyhow::Result<ExitCode> {
    let view = InventoryView::new(service);
    let confirm = KeyConfirm::new(cfg.assume_yes);

    let outcome = view.reset(&confirm).await;
    match &outcome {
        Ok(ResetOutcome::Declined) => info!("Reset cancelled, nothing was deleted"),
        Ok(ResetOutcome::Completed) => {
            info!("Inventory cleared");
            render::inventory(&view.snapshot(), cfg);
        }
        Err(_) => {}
    }

    Ok(conclude(&outcome, view.error().as_deref(), false, RESET_FAILED))
}
