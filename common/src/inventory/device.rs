use std::fmt;

use serde::{Deserialize, Serialize};

use crate::inventory::timestamp::Timestamp;

/// Reachability label attached to a device by the backend.
///
/// Labels the console does not know are kept verbatim in [`DeviceStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceStatus {
    Online,
    Offline,
    #[default]
    Unknown,
    Other(String),
}

impl DeviceStatus {
    pub fn label(&self) -> &str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unknown => "unknown",
            DeviceStatus::Other(label) => label,
        }
    }
}

impl From<String> for DeviceStatus {
    fn from(label: String) -> Self {
        match label.as_str() {
            "online" => DeviceStatus::Online,
            "offline" => DeviceStatus::Offline,
            "unknown" => DeviceStatus::Unknown,
            _ => DeviceStatus::Other(label),
        }
    }
}

impl From<&str> for DeviceStatus {
    fn from(label: &str) -> Self {
        DeviceStatus::from(label.to_string())
    }
}

impl From<DeviceStatus> for String {
    fn from(status: DeviceStatus) -> Self {
        match status {
            DeviceStatus::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One host tracked by the backend inventory, keyed by its IP address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub ip_address: String,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub hostname: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub os_info: Option<String>,
    #[serde(default)]
    pub status: DeviceStatus,
    pub first_detected: Timestamp,
    pub last_seen: Timestamp,
}

impl Device {
    /// `first_detected <= last_seen`, when both timestamps parse.
    pub fn has_consistent_timeline(&self) -> bool {
        match (self.first_detected.parse(), self.last_seen.parse()) {
            (Some(first), Some(last)) => first <= last,
            _ => true,
        }
    }
}

/// Aggregate counts shown above the device table.
///
/// Always derived from a device list, never stored on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceCounts {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
    pub unknown: usize,
}

impl DeviceCounts {
    pub fn from_devices(devices: &[Device]) -> Self {
        devices.iter().fold(
            DeviceCounts {
                total: devices.len(),
                ..Default::default()
            },
            |mut counts, device| {
                match device.status {
                    DeviceStatus::Online => counts.online += 1,
                    DeviceStatus::Offline => counts.offline += 1,
                    DeviceStatus::Unknown => counts.unknown += 1,
                    DeviceStatus::Other(_) => {}
                }
                counts
            },
        )
    }

    /// Devices whose label matched none of the named buckets.
    pub fn unlabelled(&self) -> usize {
        self.total - self.online - self.offline - self.unknown
    }
}

/// Operator-edited fields for `PUT /api/devices/{ip}`. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os_info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<DeviceStatus>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        self.mac_address.is_none()
            && self.hostname.is_none()
            && self.vendor.is_none()
            && self.os_info.is_none()
            && self.status.is_none()
    }
}
