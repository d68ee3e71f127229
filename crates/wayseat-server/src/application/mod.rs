//! Application layer of the seat manager.
//!
//! This layer owns the routing policy and the registry state. It depends on
//! the capability traits in [`crate::infrastructure::seats`] and on the
//! domain types in `wayseat-core`, never on a concrete compositor backend.
//!
//! # Sub-modules
//!
//! - **`seat_registry`** – The name-keyed seat table and the
//!   single-fallback invariant (demote on insert, promote on remove).
//!
//! - **`seat_manager`** – The subsystem facade: seat lifecycle, manual and
//!   rule-driven device assignment, output assignment, rule management,
//!   configuration import/export, and the server attach/detach hooks.

pub mod seat_manager;
pub mod seat_registry;
