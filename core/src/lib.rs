//! # Lanwatch Core
//!
//! The console's behaviour, independent of how it is drawn.
//!
//! * **[`service`]**: the [`service::DeviceService`] port to the inventory backend.
//! * **[`client`]**: the HTTP adapter implementing that port.
//! * **[`views`]**: state machines for the inventory, scan request and device
//!   detail screens.

pub mod client;
pub mod service;
pub mod views;
