use std::process::ExitCode;
use std::sync::Arc;

use lanwatch_common::config::Config;
use lanwatch_common::inventory::{DeviceStatus, DeviceUpdate};
use lanwatch_core::service::DeviceService;
use tracing::{Instrument, info};

use crate::terminal::{print, spinner};

const UPDATE_FAILED: &str = "Failed to update the device";
const NOTHING_TO_UPDATE: &str = "Nothing to update, pass at least one field";

/// Operator-supplied values, as typed.
#[derive(Debug, Default)]
pub struct Fields {
    pub hostname: Option<String>,
    pub vendor: Option<String>,
    pub os_info: Option<String>,
    pub mac_address: Option<String>,
    pub status: Option<String>,
}

impl From<Fields> for DeviceUpdate {
    fn from(fields: Fields) -> Self {
        DeviceUpdate {
            mac_address: fields.mac_address,
            hostname: fields.hostname,
            vendor: fields.vendor,
            os_info: fields.os_info,
            status: fields.status.map(|s| DeviceStatus::from(s.trim().to_lowercase())),
        }
    }
}

pub async fn update(
    service: Arc<dyn DeviceService>,
    ip: &str,
    fields: Fields,
    cfg: &Config,
) -> anyhow::Result<ExitCode> {
    let update = DeviceUpdate::from(fields);
    if update.is_empty() {
        print::view_error(NOTHING_TO_UPDATE);
        return Ok(ExitCode::FAILURE);
    }

    print::header(&format!("update {ip}"), cfg.quiet);
    let result = service
        .update_device(ip, &update)
        .instrument(spinner::working(&format!("Updating {ip}")))
        .await;

    match result {
        Ok(ack) => {
            info!("{}", ack.message.as_deref().unwrap_or("Device updated"));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            print::view_error(&err.describe(UPDATE_FAILED));
            Ok(ExitCode::FAILURE)
        }
    }
}
