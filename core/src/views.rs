//! # View State Machines
//!
//! Each view owns its transient state behind a lock that is never held across
//! a backend call, so the handlers take `&self` and can be driven from one
//! cooperative task. State changes between two awaits are atomic from the
//! caller's point of view.
//!
//! Responses are tagged with the generation that was current when the request
//! left. A view that has been replaced or unmounted since then bumps its
//! generation and the late response is dropped instead of applied.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use lanwatch_common::error::ServiceError;
use thiserror::Error;

pub mod device_detail;
pub mod inventory;
pub mod scan_request;

pub const LOAD_FAILED: &str = "Failed to load devices";
pub const SCAN_FAILED: &str = "Network scan failed";
pub const RESET_FAILED: &str = "Failed to reset the device inventory";
pub const DETAIL_FAILED: &str = "Failed to load device details";
pub const PORT_SCAN_FAILED: &str = "Port scan failed";

/// The backend action a view is currently waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Activity {
    #[default]
    Idle,
    Refreshing,
    Scanning,
    PortScanning,
    Resetting,
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Activity::Idle => "idle",
            Activity::Refreshing => "refresh",
            Activity::Scanning => "scan",
            Activity::PortScanning => "port scan",
            Activity::Resetting => "reset",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// Another action of the same view is still in flight.
    #[error("a {0} is already in progress")]
    Busy(Activity),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ViewError {
    /// Inline text for the operator, see [`ServiceError::describe`].
    pub fn describe(&self, fallback: &str) -> String {
        match self {
            ViewError::Busy(activity) => format!("Please wait, a {activity} is still running"),
            ViewError::Service(err) => err.describe(fallback),
        }
    }
}

/// Lock that shrugs off poisoning; the state is plain data and stays usable.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
