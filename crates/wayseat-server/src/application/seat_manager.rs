//! SeatManager: seat lifecycle and rule-driven device routing.
//!
//! This is the subsystem facade the compositor talks to. It composes the
//! [`SeatRegistry`] with the per-seat [`RuleMap`] and exposes:
//!
//! - seat lifecycle (`create_seat` / `remove_seat` / `remove_seat_ref`);
//! - manual and automatic device assignment, output assignment;
//! - rule management (`add_device_rule` / `remove_device_rule`);
//! - configuration import/export (`load_config` / `save_config`);
//! - the server attach/detach hooks (`create` / `destroy`).
//!
//! # Resolution order
//!
//! `find_seat_for_device` resolves a device in three steps: the seat it is
//! already attached to wins outright; otherwise the non-fallback seats are
//! scanned in registry order for the first rule match; otherwise the
//! fallback seat is returned whenever one exists. The fallback seat's own
//! rules are evaluated in that last step but do not gate the result — a
//! fallback seat whose rules match nothing is still the seat of last
//! resort. Downstream behavior depends on this, so it must not change.
//!
//! All operations are synchronous and complete before returning; the host
//! serializes calls on its event-dispatch thread.

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, warn};

use wayseat_core::config::{SeatEntry, SeatsDocument};
use wayseat_core::rules::{DeviceRule, RuleError, RuleMap};

use crate::application::seat_registry::SeatRegistry;
use crate::infrastructure::seats::{
    same_device, same_output, DeviceRef, Output, OutputRef, Seat, SeatFactory, SeatRef,
    ServerHandle,
};

/// Name of the seat created when a loaded configuration contains none.
pub const DEFAULT_SEAT_NAME: &str = "seat0";

/// Error type for device rule management.
#[derive(Debug, Error)]
pub enum DeviceRuleError {
    #[error("seat name must not be empty")]
    EmptySeatName,
    #[error("no seat named {0:?} exists")]
    UnknownSeat(String),
    #[error(transparent)]
    Rule(#[from] RuleError),
}

/// Owns all seats and the routing policy between them.
pub struct SeatManager {
    registry: SeatRegistry,
    rules: RuleMap,
    factory: Arc<dyn SeatFactory>,
}

impl SeatManager {
    /// Creates an empty manager. `factory` supplies the seat objects; the
    /// production wiring passes the native factory, tests a recording one.
    pub fn new(factory: Arc<dyn SeatFactory>) -> Self {
        Self {
            registry: SeatRegistry::new(),
            rules: RuleMap::new(),
            factory,
        }
    }

    // ── Seat lifecycle ────────────────────────────────────────────────────────

    /// Creates a seat named `name`, or returns the existing one.
    ///
    /// Idempotent: when the name is already registered the existing seat is
    /// returned unchanged and `is_fallback` is ignored. Creating a fallback
    /// seat demotes every other seat's fallback flag.
    pub fn create_seat(&mut self, name: &str, is_fallback: bool) -> SeatRef {
        if let Some(existing) = self.registry.get(name) {
            return existing;
        }
        let seat = self.factory.create_seat(name);
        self.registry.insert(Arc::clone(&seat), is_fallback);
        seat
    }

    /// Removes the seat named `name`. A no-op when absent.
    ///
    /// Fallback status transfers to the first remaining seat before any
    /// redistribution happens. The removed seat's devices are detached and
    /// re-routed through auto-assignment against the updated registry; its
    /// outputs are detached and transferred to the fallback seat.
    pub fn remove_seat(&mut self, name: &str) {
        let Some(seat) = self.registry.take(name) else {
            return;
        };

        for device in seat.devices() {
            seat.detach_device(&device);
            if !self.registry.is_empty() {
                self.auto_assign_device(&device);
            }
        }

        for output in seat.outputs() {
            seat.detach_output(&output);
            if let Some(fallback) = self.registry.fallback_seat() {
                fallback.attach_output(&output);
            }
        }
    }

    /// Removes a seat by identity rather than name.
    ///
    /// Logs and skips when the seat was not created through this manager.
    pub fn remove_seat_ref(&mut self, seat: &SeatRef) {
        match self.registry.name_of(seat) {
            Some(name) => self.remove_seat(&name),
            None => {
                warn!(
                    seat = seat.name(),
                    "attempted to remove a seat that is not managed by this seat manager"
                );
            }
        }
    }

    /// Returns the seat registered under `name`.
    pub fn seat(&self, name: &str) -> Option<SeatRef> {
        self.registry.get(name)
    }

    /// Snapshot of all seats in registry iteration order.
    pub fn seats(&self) -> Vec<SeatRef> {
        self.registry.seats()
    }

    /// The seat currently flagged as fallback, if any.
    pub fn fallback_seat(&self) -> Option<SeatRef> {
        self.registry.fallback_seat()
    }

    // ── Device assignment ─────────────────────────────────────────────────────

    /// Assigns `device` to the seat named `seat_name`.
    ///
    /// The device is detached from its current seat first. When `seat_name`
    /// names no existing seat the fallback seat is silently substituted;
    /// without a fallback seat the device is left detached.
    pub fn assign_device_to_seat(&mut self, device: &DeviceRef, seat_name: &str) {
        for seat in self.registry.seats() {
            if seat
                .devices()
                .iter()
                .any(|attached| same_device(attached, device))
            {
                if seat.name() == seat_name {
                    return;
                }
                seat.detach_device(device);
                break;
            }
        }

        if let Some(seat) = self.registry.get(seat_name) {
            seat.attach_device(device);
        } else if let Some(fallback) = self.registry.fallback_seat() {
            fallback.attach_device(device);
        }
    }

    /// Routes `device` to a seat using the device rules.
    ///
    /// Idempotent: a device that is already attached anywhere stays put and
    /// the call succeeds. Returns `false` only when no seat is available at
    /// all.
    pub fn auto_assign_device(&mut self, device: &DeviceRef) -> bool {
        for seat in self.registry.seats() {
            if seat
                .devices()
                .iter()
                .any(|attached| same_device(attached, device))
            {
                return true;
            }
        }

        if let Some(seat) = self.find_seat_for_device(device) {
            seat.attach_device(device);
            return true;
        }
        if let Some(fallback) = self.registry.fallback_seat() {
            fallback.attach_device(device);
            return true;
        }
        false
    }

    /// Returns `true` when one of the seat's rules matches the device.
    /// A seat with no rules matches nothing.
    pub fn device_matches_seat(&self, device: &DeviceRef, seat: &SeatRef) -> bool {
        let rules = self.rules.rules_for(seat.name());
        if rules.is_empty() {
            return false;
        }
        seat.matches_device(device, rules)
    }

    /// Resolves the seat a device belongs to, without mutating anything.
    ///
    /// See the module docs for the resolution order, including the
    /// fallback-of-last-resort behavior.
    pub fn find_seat_for_device(&self, device: &DeviceRef) -> Option<SeatRef> {
        for seat in self.registry.seats() {
            if seat
                .devices()
                .iter()
                .any(|attached| same_device(attached, device))
            {
                return Some(seat);
            }
        }

        for (_, seat) in self.registry.iter() {
            if seat.is_fallback() {
                continue;
            }
            if self.device_matches_seat(device, seat) {
                return Some(Arc::clone(seat));
            }
        }

        let fallback = self.registry.fallback_seat();
        if let Some(seat) = &fallback {
            // The fallback seat's rules are evaluated but never gate the
            // result: it is returned either way.
            if !self.rules.rules_for(seat.name()).is_empty()
                && self.device_matches_seat(device, seat)
            {
                return Some(Arc::clone(seat));
            }
        }
        fallback
    }

    // ── Output assignment ─────────────────────────────────────────────────────

    /// Assigns `output` to the seat named `seat_name`.
    ///
    /// Mirrors [`Self::assign_device_to_seat`]: detach-then-attach, with
    /// silent fallback substitution for unknown names. Outputs have no
    /// rule-driven counterpart; they are always explicitly routed.
    pub fn assign_output_to_seat(&mut self, output: &OutputRef, seat_name: &str) {
        for seat in self.registry.seats() {
            if seat
                .outputs()
                .iter()
                .any(|attached| same_output(attached, output))
            {
                if seat.name() == seat_name {
                    return;
                }
                seat.detach_output(output);
                break;
            }
        }

        if let Some(seat) = self.registry.get(seat_name) {
            seat.attach_output(output);
        } else if let Some(fallback) = self.registry.fallback_seat() {
            fallback.attach_output(output);
        }
    }

    /// The seat currently owning `output`, else the fallback seat, else
    /// `None`. Pure lookup.
    pub fn find_seat_for_output(&self, output: &OutputRef) -> Option<SeatRef> {
        for seat in self.registry.seats() {
            if seat
                .outputs()
                .iter()
                .any(|attached| same_output(attached, output))
            {
                return Some(seat);
            }
        }
        self.registry.fallback_seat()
    }

    // ── Device rules ──────────────────────────────────────────────────────────

    /// Appends a device rule for the named seat.
    ///
    /// Rejected (logged, nothing added) when the seat name is empty or
    /// unknown, or when the pattern is empty or fails to compile.
    /// Duplicate pattern texts are appended, not deduplicated.
    pub fn add_device_rule(&mut self, seat_name: &str, pattern: &str) -> Result<(), DeviceRuleError> {
        if seat_name.is_empty() {
            warn!("cannot add device rule for seat with empty name");
            return Err(DeviceRuleError::EmptySeatName);
        }
        if pattern.is_empty() {
            warn!(seat = seat_name, "cannot add empty device rule");
            return Err(RuleError::EmptyPattern.into());
        }
        if !self.registry.contains(seat_name) {
            warn!(seat = seat_name, "cannot add device rule for unknown seat");
            return Err(DeviceRuleError::UnknownSeat(seat_name.to_string()));
        }
        let rule = DeviceRule::parse(pattern).map_err(|err| {
            warn!(seat = seat_name, pattern, %err, "rejecting device rule");
            err
        })?;
        self.rules.add(seat_name, rule);
        Ok(())
    }

    /// Removes the first rule for `seat_name` whose pattern text equals
    /// `pattern`. A no-op for unknown seats or invalid patterns.
    pub fn remove_device_rule(&mut self, seat_name: &str, pattern: &str) {
        self.rules.remove(seat_name, pattern);
    }

    /// The seat's rule pattern texts in evaluation order.
    pub fn device_rules(&self, seat_name: &str) -> Vec<String> {
        self.rules.sources_for(seat_name)
    }

    // ── Configuration ─────────────────────────────────────────────────────────

    /// Exports the full seat configuration: per seat, its name, fallback
    /// flag, rule pattern texts, and attached output names, in registry
    /// iteration order.
    pub fn save_config(&self) -> SeatsDocument {
        let seats = self
            .registry
            .iter()
            .map(|(name, seat)| SeatEntry {
                name: name.to_string(),
                fallback: seat.is_fallback(),
                device_rules: self.rules.sources_for(name),
                outputs: seat
                    .outputs()
                    .iter()
                    .map(|output| output.name().to_string())
                    .collect(),
            })
            .collect();
        SeatsDocument { seats }
    }

    /// Replaces the entire registry and rule map with `document`.
    ///
    /// Every existing seat is torn down without per-device redistribution,
    /// then the document's seats and rules are applied in order. Output
    /// lists in the document are not reattached. Afterwards an empty
    /// registry gets a default fallback seat, and a registry with no seat
    /// flagged fallback has its first seat promoted.
    pub fn load_config(&mut self, document: &SeatsDocument) {
        self.registry.clear();
        self.rules.clear();

        for entry in &document.seats {
            self.create_seat(&entry.name, entry.fallback);
            for pattern in &entry.device_rules {
                // Rejections are logged by add_device_rule; the remaining
                // entries still load.
                let _ = self.add_device_rule(&entry.name, pattern);
            }
        }

        if self.registry.is_empty() {
            self.create_seat(DEFAULT_SEAT_NAME, true);
        }
        self.registry.promote_first_fallback();
    }

    // ── Server lifecycle ──────────────────────────────────────────────────────

    /// Binds every seat to the running server, acquiring native handles.
    ///
    /// A seat that fails to obtain a handle is logged and left in place;
    /// the failure is not fatal.
    pub fn create(&mut self, server: &dyn ServerHandle) {
        for seat in self.registry.seats() {
            if !seat.bind_server(server) {
                error!(seat = seat.name(), "failed to create native handle for seat");
            }
        }
        self.registry.promote_first_fallback();
    }

    /// Tears down all seats and rules unconditionally.
    pub fn destroy(&mut self, _server: &dyn ServerHandle) {
        self.registry.clear();
        self.rules.clear();
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
