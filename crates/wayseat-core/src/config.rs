//! Serde model of the seat configuration document.
//!
//! The document is the exchange format between the seat manager and
//! whatever transport the host uses to persist it (a config file, an IPC
//! blob, a settings daemon). Its JSON shape is:
//!
//! ```json
//! { "seats": [
//!     { "name": "seat0", "fallback": true,
//!       "deviceRules": ["^Logitech.*"],
//!       "outputs": ["DP-1"] }
//! ] }
//! ```
//!
//! `outputs` is write-only from the manager's point of view: export lists
//! the output names currently attached to each seat so the document is a
//! faithful snapshot, but import never reattaches them — outputs must be
//! re-assigned by the caller after a load.

use serde::{Deserialize, Serialize};

/// Top-level seat configuration document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeatsDocument {
    #[serde(default)]
    pub seats: Vec<SeatEntry>,
}

/// One seat in the configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatEntry {
    /// Unique seat name.
    pub name: String,
    /// Whether this seat is the fallback target for unroutable devices.
    #[serde(default)]
    pub fallback: bool,
    /// Device rule pattern texts in evaluation order.
    #[serde(rename = "deviceRules", default)]
    pub device_rules: Vec<String>,
    /// Output names attached at export time. Informational only on import.
    #[serde(default)]
    pub outputs: Vec<String>,
}

impl SeatEntry {
    /// Creates an entry with no rules and no outputs.
    pub fn new(name: impl Into<String>, fallback: bool) -> Self {
        Self {
            name: name.into(),
            fallback,
            device_rules: Vec::new(),
            outputs: Vec::new(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
