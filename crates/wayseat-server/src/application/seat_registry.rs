//! The name-keyed seat table and the single-fallback invariant.
//!
//! Invariants enforced here:
//!
//! - at most one seat carries the fallback flag at any time;
//! - inserting a fallback seat demotes every other seat;
//! - removing the fallback seat promotes the first remaining seat, so a
//!   non-empty registry always converges back to exactly one fallback.
//!
//! The table is a `BTreeMap`, so iteration is name-sorted and
//! deterministic; "first seat" always means the lexicographically
//! smallest name. Device and output redistribution on removal is the
//! manager's job — the registry only hands the removed seat back.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::infrastructure::seats::{Seat, SeatRef};

/// Owns all seats, indexed by name.
#[derive(Default)]
pub struct SeatRegistry {
    seats: BTreeMap<String, SeatRef>,
    fallback_name: Option<String>,
}

impl SeatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the seat registered under `name`.
    pub fn get(&self, name: &str) -> Option<SeatRef> {
        self.seats.get(name).cloned()
    }

    /// Returns `true` when a seat named `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.seats.contains_key(name)
    }

    /// Registers `seat` under its own name and applies the fallback flag.
    ///
    /// When `is_fallback` is set, every other seat is demoted first so the
    /// single-fallback invariant holds. Callers guarantee the name is not
    /// already registered.
    pub fn insert(&mut self, seat: SeatRef, is_fallback: bool) {
        seat.set_fallback(is_fallback);
        if is_fallback {
            for other in self.seats.values() {
                if other.is_fallback() {
                    other.set_fallback(false);
                }
            }
            self.fallback_name = Some(seat.name().to_string());
        }
        self.seats.insert(seat.name().to_string(), seat);
    }

    /// Unregisters and returns the seat named `name`.
    ///
    /// When the removed seat was the fallback and other seats remain, the
    /// first remaining seat is promoted before this returns, so callers
    /// redistributing the removed seat's devices already see the new
    /// fallback.
    pub fn take(&mut self, name: &str) -> Option<SeatRef> {
        let seat = self.seats.remove(name)?;
        if seat.is_fallback() {
            match self.seats.iter().next() {
                Some((first_name, first)) => {
                    first.set_fallback(true);
                    self.fallback_name = Some(first_name.clone());
                }
                None => self.fallback_name = None,
            }
        }
        Some(seat)
    }

    /// The seat currently flagged as fallback, if any.
    pub fn fallback_seat(&self) -> Option<SeatRef> {
        let name = self.fallback_name.as_ref()?;
        self.seats.get(name).cloned()
    }

    /// Promotes the first seat to fallback when no fallback exists.
    /// A no-op on an empty registry or when a fallback is already set.
    pub fn promote_first_fallback(&mut self) {
        if self.fallback_seat().is_some() {
            return;
        }
        if let Some((name, seat)) = self.seats.iter().next() {
            seat.set_fallback(true);
            self.fallback_name = Some(name.clone());
        }
    }

    /// Snapshot of all seats in registry iteration order.
    pub fn seats(&self) -> Vec<SeatRef> {
        self.seats.values().cloned().collect()
    }

    /// Iterates seats in registry iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SeatRef)> {
        self.seats.iter().map(|(name, seat)| (name.as_str(), seat))
    }

    /// Resolves a seat object back to its registered name, by identity.
    pub fn name_of(&self, seat: &SeatRef) -> Option<String> {
        self.seats
            .iter()
            .find(|(_, registered)| Arc::ptr_eq(registered, seat))
            .map(|(name, _)| name.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Drops every seat and clears the fallback record.
    pub fn clear(&mut self) {
        self.seats.clear();
        self.fallback_name = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
