//! # Device Detail View
//!
//! One device with its port-scan and HTTP-probe history, plus the full port
//! scan action. The port scan has its own flag so the detail already on
//! screen stays visible while the backend works.

use std::sync::{Arc, Mutex};

use lanwatch_common::error::ServiceError;
use lanwatch_common::inventory::DeviceDetail;
use tracing::{debug, info};

use crate::service::DeviceService;
use crate::views::{Activity, DETAIL_FAILED, PORT_SCAN_FAILED, ViewError, lock};

pub const FULL_SCAN_LABEL: &str = "Full port scan (1-65535)";
pub const FULL_SCAN_NOTICE: &str = "Scanning all 65535 ports. This can take several minutes.";
pub const NO_DEVICE_MESSAGE: &str = "No device selected";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    PortScans,
    HttpResponses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailPhase {
    #[default]
    Hidden,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailSnapshot {
    pub ip: Option<String>,
    pub phase: DetailPhase,
    pub detail: Option<DeviceDetail>,
    pub error: Option<String>,
    pub scanning: bool,
    pub panel: Panel,
}

#[derive(Debug, Default)]
struct DetailState {
    ip: Option<String>,
    phase: DetailPhase,
    detail: Option<DeviceDetail>,
    error: Option<String>,
    scanning: bool,
    panel: Panel,
    /// Bumped whenever the displayed device changes.
    generation: u64,
    /// Bumped on every fetch; only the latest fetch may land.
    fetch_seq: u64,
}

struct ScanGuard<'a> {
    state: &'a Mutex<DetailState>,
    generation: u64,
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        let mut state = lock(self.state);
        if state.generation == self.generation {
            state.scanning = false;
        }
    }
}

pub struct DeviceDetailView {
    service: Arc<dyn DeviceService>,
    state: Mutex<DetailState>,
}

impl DeviceDetailView {
    pub fn new(service: Arc<dyn DeviceService>) -> Self {
        Self {
            service,
            state: Mutex::new(DetailState::default()),
        }
    }

    pub fn ip(&self) -> Option<String> {
        lock(&self.state).ip.clone()
    }

    pub fn phase(&self) -> DetailPhase {
        lock(&self.state).phase
    }

    pub fn panel(&self) -> Panel {
        lock(&self.state).panel
    }

    pub fn is_scanning(&self) -> bool {
        lock(&self.state).scanning
    }

    pub fn detail(&self) -> Option<DeviceDetail> {
        lock(&self.state).detail.clone()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn snapshot(&self) -> DetailSnapshot {
        let state = lock(&self.state);
        DetailSnapshot {
            ip: state.ip.clone(),
            phase: state.phase,
            detail: state.detail.clone(),
            error: state.error.clone(),
            scanning: state.scanning,
            panel: state.panel,
        }
    }

    /// Makes `ip` the displayed device and loads its detail.
    ///
    /// Replaces whatever was shown before; a response for the previous device
    /// that arrives later is dropped.
    pub async fn show(&self, ip: &str) -> Result<(), ViewError> {
        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.ip = Some(ip.to_string());
            state.detail = None;
            state.error = None;
            state.scanning = false;
            state.panel = Panel::default();
            state.generation
        };
        self.fetch(ip, generation, true).await
    }

    /// Loads the displayed device again. The detail on screen stays until the
    /// answer arrives and survives a failed reload next to its error.
    pub async fn reload(&self) -> Result<(), ViewError> {
        let (ip, generation) = self.selected()?;
        self.fetch(&ip, generation, false).await
    }

    pub fn hide(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        *state = DetailState {
            generation: state.generation,
            fetch_seq: state.fetch_seq,
            ..DetailState::default()
        };
    }

    /// Switches panels. Both come from the same fetch, nothing is requested.
    pub fn select_panel(&self, panel: Panel) {
        lock(&self.state).panel = panel;
    }

    /// Runs a full port scan of the displayed device and reloads its history.
    ///
    /// The backend reports no progress; the call may take minutes and a slow
    /// answer is not a failure.
    pub async fn run_port_scan(&self) -> Result<(), ViewError> {
        let (ip, generation) = {
            let mut state = lock(&self.state);
            if state.scanning {
                return Err(ViewError::Busy(Activity::Scanning));
            }
            let ip = state
                .ip
                .clone()
                .ok_or_else(|| ServiceError::Validation(NO_DEVICE_MESSAGE.to_string()))?;
            state.scanning = true;
            state.error = None;
            (ip, state.generation)
        };
        let _guard = ScanGuard {
            state: &self.state,
            generation,
        };

        info!("Starting a full port scan of {ip}");
        if let Err(err) = self.service.scan_ports(&ip).await {
            let mut state = lock(&self.state);
            if state.generation == generation {
                state.error = Some(err.describe(PORT_SCAN_FAILED));
            }
            return Err(err.into());
        }

        self.fetch(&ip, generation, false).await
    }

    fn selected(&self) -> Result<(String, u64), ViewError> {
        let state = lock(&self.state);
        let ip = state
            .ip
            .clone()
            .ok_or_else(|| ServiceError::Validation(NO_DEVICE_MESSAGE.to_string()))?;
        Ok((ip, state.generation))
    }

    /// `from_scratch` drops the current detail; otherwise it stays on screen
    /// until the new one replaces it. Loading is shown only with nothing to show.
    async fn fetch(&self, ip: &str, generation: u64, from_scratch: bool) -> Result<(), ViewError> {
        let seq = {
            let mut state = lock(&self.state);
            state.fetch_seq += 1;
            if from_scratch {
                state.detail = None;
            }
            if state.detail.is_none() {
                state.phase = DetailPhase::Loading;
            }
            state.fetch_seq
        };

        let fetched = self.service.get_device_detail(ip).await;

        let mut state = lock(&self.state);
        if state.generation != generation || state.fetch_seq != seq {
            debug!(%ip, "discarding a stale device detail");
            return Ok(());
        }
        match fetched {
            Ok(detail) => {
                debug!(
                    %ip,
                    ports = detail.port_scans.len(),
                    http = detail.http_responses.len(),
                    "device detail loaded"
                );
                state.detail = Some(detail);
                state.phase = DetailPhase::Ready;
                state.error = None;
                Ok(())
            }
            Err(err) => {
                state.error = Some(err.describe(DETAIL_FAILED));
                if state.detail.is_none() {
                    state.phase = DetailPhase::Failed;
                }
                Err(err.into())
            }
        }
    }
}
