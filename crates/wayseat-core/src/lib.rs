//! # wayseat-core
//!
//! Shared domain types for the wayseat multi-seat toolkit.
//!
//! A *seat* is a named grouping of input devices and output displays that
//! represents one logical user session endpoint. The compositor-facing crate
//! (`wayseat-server`) owns the seats themselves; this crate holds the pure
//! policy types that decide *where* a device belongs:
//!
//! - **`rules`** – Device routing rules. Each rule is a compiled regular
//!   expression kept together with its original source text, grouped per
//!   seat name in insertion order.
//!
//! - **`config`** – The serde model of the seat configuration document that
//!   the manager imports and exports.
//!
//! This crate has zero dependencies on OS APIs, the Wayland protocol, or any
//! compositor backend.

pub mod config;
pub mod rules;

// Re-export the most-used types at the crate root so callers can write
// `wayseat_core::DeviceRule` instead of `wayseat_core::rules::DeviceRule`.
pub use config::{SeatEntry, SeatsDocument};
pub use rules::{DeviceRule, RuleError, RuleMap};
