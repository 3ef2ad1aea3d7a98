//! # Network Range Expressions
//!
//! Free-text range input as typed by the operator, and its canonical form as
//! accepted by the inventory backend.
//!
//! Supported shapes (validation is left to the backend):
//! * **CIDR**: `192.168.1.0/24`, passed through unchanged.
//! * **Host**: `192.168.1.100`, widened to `192.168.1.100/32`.
//! * **Range**: `192.168.1.1-20`, passed through unchanged.

use std::sync::LazyLock;

use regex::Regex;

/// Range scanned when the operator keeps the picker's initial selection.
pub const DEFAULT_RANGE: &str = "192.168.1.0/24";

static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{1,3}(\.[0-9]{1,3}){3}$").expect("invalid dotted-quad pattern")
});

/// A preset offered by the range picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangePreset {
    pub label: &'static str,
    pub value: &'static str,
}

/// Common private networks, in the order the picker lists them.
pub const PRESETS: &[RangePreset] = &[
    RangePreset { label: "192.168.1.0/24 (typical home network)", value: "192.168.1.0/24" },
    RangePreset { label: "192.168.0.0/24 (typical home network)", value: "192.168.0.0/24" },
    RangePreset { label: "10.0.0.0/24 (enterprise)", value: "10.0.0.0/24" },
    RangePreset { label: "172.16.0.0/24 (enterprise)", value: "172.16.0.0/24" },
    RangePreset { label: "192.168.1.1-20 (address range)", value: "192.168.1.1-20" },
];

/// Help line listing the accepted input forms.
pub const ACCEPTED_FORMS: &str =
    "CIDR (192.168.1.0/24), range (192.168.1.1-20), single IP (192.168.1.100)";

/// Converts a range expression into the form the backend expects.
///
/// Never fails. Blank input comes back blank, so callers have to reject it
/// before a request is built (see [`is_blank`]).
pub fn normalize(input: &str) -> String {
    let trimmed = input.trim();

    if trimmed.contains('/') {
        return trimmed.to_string();
    }

    if DOTTED_QUAD.is_match(trimmed) {
        return format!("{trimmed}/32");
    }

    trimmed.to_string()
}

/// True when nothing but whitespace was entered.
pub fn is_blank(input: &str) -> bool {
    input.trim().is_empty()
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
