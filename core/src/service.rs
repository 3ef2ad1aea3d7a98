//! # Device Service Port
//!
//! The console's only way to reach the inventory backend.
//!
//! Every call is a single request/response exchange: no retries, no caching,
//! no timeout overrides. Mutating calls (`scan_*`, `reset_devices`) return as
//! soon as the backend acknowledges them, which says nothing about whether the
//! work is finished. Callers observe the effects with a follow-up read.

use async_trait::async_trait;
use lanwatch_common::error::ServiceError;
use lanwatch_common::inventory::{Ack, Device, DeviceDetail, DeviceUpdate};

#[async_trait]
pub trait DeviceService: Send + Sync {
    /// Every known device, in backend order.
    async fn get_devices(&self) -> Result<Vec<Device>, ServiceError>;

    /// One device with its port and HTTP history. A 404 means no such device.
    async fn get_device_detail(&self, ip: &str) -> Result<DeviceDetail, ServiceError>;

    /// Starts network discovery. `None` lets the backend pick its default range.
    async fn scan_network(&self, range: Option<&str>) -> Result<Ack, ServiceError>;

    /// Starts a full 1-65535 port scan of one device. Can take minutes.
    async fn scan_ports(&self, ip: &str) -> Result<Ack, ServiceError>;

    async fn update_device(&self, ip: &str, update: &DeviceUpdate) -> Result<Ack, ServiceError>;

    /// Clears the whole inventory on the backend.
    async fn reset_devices(&self) -> Result<Ack, ServiceError>;
}
