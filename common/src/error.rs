//! # Console Error Taxonomy
//!
//! Every failure a backend interaction can produce, classified by where it
//! happened: before a request left the console, after the backend answered
//! with a non-success status, or somewhere in between.

use serde_json::Value;
use thiserror::Error;

/// Shown when the backend could not be reached at all.
pub const UNREACHABLE_MESSAGE: &str = "Unable to connect to the server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Application,
    Transport,
    Unknown,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Rejected locally, no request was issued.
    #[error("{0}")]
    Validation(String),

    /// The backend answered with a non-success status.
    #[error("backend rejected the request with status {status}{}", message_suffix(.message))]
    Application { status: u16, message: Option<String> },

    /// The request was dispatched but no response came back.
    #[error("no response from backend: {0}")]
    Transport(String),

    /// The request could not be built or sent, or the answer was unreadable.
    #[error("request failed: {0}")]
    Unknown(String),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Validation(_) => ErrorKind::Validation,
            ServiceError::Application { .. } => ErrorKind::Application,
            ServiceError::Transport(_) => ErrorKind::Transport,
            ServiceError::Unknown(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Application { status: 404, .. })
    }

    /// Builds an application error from a response status and raw body.
    pub fn from_response(status: u16, body: &str) -> Self {
        ServiceError::Application {
            status,
            message: extract_message(body),
        }
    }

    /// The inline message an operator sees for this failure.
    ///
    /// `fallback` names the action that failed and is used whenever the
    /// backend did not supply a message of its own.
    pub fn describe(&self, fallback: &str) -> String {
        match self {
            ServiceError::Validation(msg) => msg.clone(),
            ServiceError::Application { message, .. } => {
                format!("Error: {}", message.as_deref().unwrap_or(fallback))
            }
            ServiceError::Transport(_) => UNREACHABLE_MESSAGE.to_string(),
            ServiceError::Unknown(_) => fallback.to_string(),
        }
    }
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

/// Pulls a human readable message out of an error body.
///
/// Looks at `detail` first, then `message`. A `detail` list (request
/// validation failures) is flattened into its `msg` entries.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    let from_field = |field: &str| -> Option<String> {
        match value.get(field)? {
            Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            Value::Array(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(text) => Some(text.clone()),
                        other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                    })
                    .collect();
                (!parts.is_empty()).then(|| parts.join("; "))
            }
            _ => None,
        }
    };

    from_field("detail").or_else(|| from_field("message"))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
