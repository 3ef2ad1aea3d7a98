//! # Inventory View
//!
//! Top-level coordinator of the console. Holds the device list, derives the
//! aggregate counts and orchestrates scan-then-reload.
//!
//! All backend actions of this view are serialized through one [`Activity`]:
//! while anything is in flight every other action is refused with
//! [`ViewError::Busy`]. The activity is reset by a drop guard, so a failing
//! or cancelled action never leaves the view stuck.

use std::sync::{Arc, Mutex};

use lanwatch_common::error::ServiceError;
use lanwatch_common::inventory::{Device, DeviceCounts};
use tracing::{debug, info};

use crate::service::DeviceService;
use crate::views::device_detail::DeviceDetailView;
use crate::views::scan_request::{InlineRange, RangeSource, ScanRequestView};
use crate::views::{Activity, LOAD_FAILED, RESET_FAILED, SCAN_FAILED, ViewError, lock};

pub const RESET_PROMPT: &str = "Delete every device from the inventory?";

/// Asks the operator before a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    Completed,
    Declined,
}

/// Coarse lifecycle, derived from the activity and whether a list was loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryPhase {
    Idle,
    Loading,
    Ready,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    pub phase: InventoryPhase,
    pub activity: Activity,
    pub devices: Option<Vec<Device>>,
    pub counts: DeviceCounts,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct InventoryState {
    devices: Option<Vec<Device>>,
    activity: Activity,
    error: Option<String>,
    generation: u64,
}

impl InventoryState {
    fn phase(&self) -> InventoryPhase {
        match (self.activity, &self.devices) {
            (Activity::Idle, None) => InventoryPhase::Idle,
            (Activity::Idle, Some(_)) => InventoryPhase::Ready,
            _ => InventoryPhase::Loading,
        }
    }
}

/// Puts the view back to [`Activity::Idle`] when the action ends, however it ends.
struct ActivityGuard<'a> {
    state: &'a Mutex<InventoryState>,
}

impl Drop for ActivityGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).activity = Activity::Idle;
    }
}

pub struct InventoryView {
    service: Arc<dyn DeviceService>,
    state: Mutex<InventoryState>,
}

impl InventoryView {
    pub fn new(service: Arc<dyn DeviceService>) -> Self {
        Self {
            service,
            state: Mutex::new(InventoryState::default()),
        }
    }

    pub async fn mount(&self) -> Result<(), ViewError> {
        self.refresh().await
    }

    /// Forgets the displayed data. Responses still in flight are dropped on arrival.
    pub fn unmount(&self) {
        let mut state = lock(&self.state);
        state.generation += 1;
        state.devices = None;
        state.error = None;
    }

    pub fn activity(&self) -> Activity {
        lock(&self.state).activity
    }

    pub fn is_busy(&self) -> bool {
        self.activity() != Activity::Idle
    }

    pub fn phase(&self) -> InventoryPhase {
        lock(&self.state).phase()
    }

    pub fn devices(&self) -> Option<Vec<Device>> {
        lock(&self.state).devices.clone()
    }

    /// Counts of the list currently displayed. Empty before the first load.
    pub fn counts(&self) -> DeviceCounts {
        lock(&self.state)
            .devices
            .as_deref()
            .map(DeviceCounts::from_devices)
            .unwrap_or_default()
    }

    pub fn error(&self) -> Option<String> {
        lock(&self.state).error.clone()
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        let state = lock(&self.state);
        InventorySnapshot {
            phase: state.phase(),
            activity: state.activity,
            counts: state
                .devices
                .as_deref()
                .map(DeviceCounts::from_devices)
                .unwrap_or_default(),
            devices: state.devices.clone(),
            error: state.error.clone(),
        }
    }

    pub async fn refresh(&self) -> Result<(), ViewError> {
        let (_guard, generation) = self.begin(Activity::Refreshing)?;
        let loaded = self.reload(generation).await;
        self.settle(loaded, generation, LOAD_FAILED)
    }

    /// Scans `range` as typed into the inline form, then reloads the list.
    ///
    /// Blank input is refused before the view changes state.
    pub async fn scan_network(&self, range: &str) -> Result<(), ViewError> {
        let mut request = ScanRequestView::new(InlineRange::new(range));
        self.scan_with(&mut request).await
    }

    /// Submits any scan request through this view, so the scan and the reload
    /// that follows it are covered by the shared activity.
    pub async fn scan_with<R: RangeSource>(
        &self,
        request: &mut ScanRequestView<R>,
    ) -> Result<(), ViewError> {
        request.validate()?;
        let (_guard, generation) = self.begin(Activity::Scanning)?;

        match request
            .submit(self.service.as_ref(), || self.reload(generation))
            .await
        {
            Ok(loaded) => self.settle(loaded, generation, LOAD_FAILED),
            Err(err) => self.settle(Err(err), generation, SCAN_FAILED),
        }
    }

    /// Scans the backend's default range, then reloads the list.
    pub async fn quick_scan(&self) -> Result<(), ViewError> {
        let (_guard, generation) = self.begin(Activity::Scanning)?;
        info!("Requesting a network scan of the default range");

        let acked = self.service.scan_network(None).await.map(|_| ());
        self.settle(acked, generation, SCAN_FAILED)?;

        let loaded = self.reload(generation).await;
        self.settle(loaded, generation, LOAD_FAILED)
    }

    /// Clears the backend inventory once the operator agreed, then reloads.
    pub async fn reset(&self, confirm: &dyn Confirm) -> Result<ResetOutcome, ViewError> {
        let activity = self.activity();
        if activity != Activity::Idle {
            return Err(ViewError::Busy(activity));
        }
        if !confirm.confirm(RESET_PROMPT) {
            debug!("inventory reset declined");
            return Ok(ResetOutcome::Declined);
        }

        let (_guard, generation) = self.begin(Activity::Resetting)?;
        info!("Resetting the device inventory");

        let cleared = self.service.reset_devices().await.map(|_| ());
        self.settle(cleared, generation, RESET_FAILED)?;

        let loaded = self.reload(generation).await;
        self.settle(loaded, generation, LOAD_FAILED)?;
        Ok(ResetOutcome::Completed)
    }

    /// Runs the full port scan of the device shown in `detail` under this
    /// view's activity. Nothing else in the inventory may start until the
    /// scan and the detail reload behind it are done.
    pub async fn scan_ports_of(&self, detail: &DeviceDetailView) -> Result<(), ViewError> {
        let (_guard, _) = self.begin(Activity::PortScanning)?;
        detail.run_port_scan().await
    }

    fn begin(&self, activity: Activity) -> Result<(ActivityGuard<'_>, u64), ViewError> {
        let mut state = lock(&self.state);
        if state.activity != Activity::Idle {
            return Err(ViewError::Busy(state.activity));
        }
        state.activity = activity;
        state.error = None;
        Ok((ActivityGuard { state: &self.state }, state.generation))
    }

    /// Fetches the list and replaces the displayed one, unless the view moved on.
    async fn reload(&self, generation: u64) -> Result<(), ServiceError> {
        let devices = self.service.get_devices().await?;

        let mut state = lock(&self.state);
        if state.generation != generation {
            debug!("discarding a device list for a view that is gone");
            return Ok(());
        }
        debug!(count = devices.len(), "device list loaded");
        state.devices = Some(devices);
        Ok(())
    }

    /// Records a failure next to the list that was already displayed.
    fn settle(
        &self,
        result: Result<(), ServiceError>,
        generation: u64,
        fallback: &str,
    ) -> Result<(), ViewError> {
        result.map_err(|err| {
            let mut state = lock(&self.state);
            if state.generation == generation {
                state.error = Some(err.describe(fallback));
            }
            ViewError::Service(err)
        })
    }
}
