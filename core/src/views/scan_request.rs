//! Collects a network range and submits a discovery scan.
//!
//! The inline form of the inventory screen and the preset picker are two
//! [`RangeSource`]s feeding the same [`ScanRequestView`], so validation,
//! normalization and error wording live in one place.

use lanwatch_common::error::ServiceError;
use lanwatch_common::network::range::{self, DEFAULT_RANGE, PRESETS, RangePreset};
use tracing::{debug, info};

use crate::service::DeviceService;
use crate::views::SCAN_FAILED;

pub const BLANK_RANGE_MESSAGE: &str = "Please specify a network range";

/// Anything that can tell which range the operator currently wants scanned.
pub trait RangeSource {
    fn current_range(&self) -> String;
}

/// Free text typed straight into the inventory screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineRange(String);

impl InlineRange {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.0 = text.into();
    }
}

impl RangeSource for InlineRange {
    fn current_range(&self) -> String {
        self.0.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerChoice {
    Preset(usize),
    Custom,
}

/// Picklist of common networks with a free-text fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePicker {
    choice: PickerChoice,
    custom: String,
}

impl Default for RangePicker {
    fn default() -> Self {
        let default_idx = PRESETS
            .iter()
            .position(|preset| preset.value == DEFAULT_RANGE)
            .unwrap_or(0);
        Self {
            choice: PickerChoice::Preset(default_idx),
            custom: String::new(),
        }
    }
}

impl RangePicker {
    pub fn presets(&self) -> &'static [RangePreset] {
        PRESETS
    }

    pub fn choice(&self) -> PickerChoice {
        self.choice
    }

    pub fn select_preset(&mut self, idx: usize) -> Result<&'static RangePreset, ServiceError> {
        let preset = PRESETS.get(idx).ok_or_else(|| {
            ServiceError::Validation(format!(
                "No preset #{idx}, choose between 0 and {}",
                PRESETS.len() - 1
            ))
        })?;
        self.choice = PickerChoice::Preset(idx);
        Ok(preset)
    }

    /// Switches to free text. Previously typed text is kept.
    pub fn select_custom(&mut self) {
        self.choice = PickerChoice::Custom;
    }

    pub fn set_custom(&mut self, text: impl Into<String>) {
        self.custom = text.into();
    }
}

impl RangeSource for RangePicker {
    fn current_range(&self) -> String {
        match self.choice {
            PickerChoice::Preset(idx) => PRESETS
                .get(idx)
                .map(|preset| preset.value.to_string())
                .unwrap_or_default(),
            PickerChoice::Custom => self.custom.clone(),
        }
    }
}

/// One scan request dialog: open until a scan succeeds or it is dismissed.
#[derive(Debug)]
pub struct ScanRequestView<R> {
    source: R,
    open: bool,
    scanning: bool,
    error: Option<String>,
}

impl<R: RangeSource> ScanRequestView<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            open: true,
            scanning: false,
            error: None,
        }
    }

    pub fn source(&self) -> &R {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut R {
        &mut self.source
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss(&mut self) {
        self.open = false;
    }

    /// The normalized range, or a validation error when nothing was entered.
    pub fn prepare(&self) -> Result<String, ServiceError> {
        let raw = self.source.current_range();
        if range::is_blank(&raw) {
            return Err(ServiceError::Validation(BLANK_RANGE_MESSAGE.to_string()));
        }
        Ok(range::normalize(&raw))
    }

    /// Like [`Self::prepare`], but a rejection is also shown in the dialog.
    pub fn validate(&mut self) -> Result<String, ServiceError> {
        self.prepare().inspect_err(|err| {
            self.error = Some(err.describe(SCAN_FAILED));
        })
    }

    /// Submits the scan and, once the backend acknowledged it, runs
    /// `on_complete` before the dialog closes.
    ///
    /// Blank input never reaches the backend. On failure the dialog stays open
    /// with the error shown.
    pub async fn submit<F, Fut, T>(
        &mut self,
        service: &dyn DeviceService,
        on_complete: F,
    ) -> Result<T, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        self.error = None;
        let range = self.validate()?;

        info!("Requesting a network scan of {range}");
        self.scanning = true;
        let outcome = service.scan_network(Some(&range)).await;
        self.scanning = false;

        match outcome {
            Ok(ack) => {
                debug!(message = ?ack.message, "network scan acknowledged");
                let completed = on_complete().await;
                self.open = false;
                Ok(completed)
            }
            Err(err) => {
                self.error = Some(err.describe(SCAN_FAILED));
                Err(err)
            }
        }
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
