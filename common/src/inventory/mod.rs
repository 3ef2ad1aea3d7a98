//! # Inventory Models
//!
//! Read views of the backend inventory as the console receives them. None of
//! these are owned by the console; every value is replaced wholesale on the
//! next fetch.
//!
//! * [`device::Device`]: one tracked host, identified by its IP address.
//! * [`scan::DeviceDetail`]: a device plus its port and HTTP probe history.
//! * [`device::DeviceCounts`]: status buckets derived from a device list.

pub mod device;
pub mod scan;
pub mod timestamp;

pub use device::{Device, DeviceCounts, DeviceStatus, DeviceUpdate};
pub use scan::{Ack, DeviceDetail, HttpProbeResult, NetworkScanRequest, PortScanRequest, PortScanResult};
pub use timestamp::Timestamp;
