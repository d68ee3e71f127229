//! Infrastructure layer: host-facing adapters.
//!
//! Contains the capability traits the compositor backend implements, the
//! production and mock seat adapters, and the file transport for the seat
//! configuration document.
//!
//! **Dependency rule**: this layer may be depended on by `application`
//! (for the trait definitions), but adapter *implementations* are only
//! selected at wiring time — policy code never names a concrete adapter.

pub mod seats;
pub mod storage;
