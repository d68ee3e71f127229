//! Seat capability surface consumed from the compositor backend.
//!
//! The manager never talks to the Wayland backend directly. Everything it
//! needs from the host — seats, input devices, outputs, and the server
//! attach hook — enters through the traits in this module:
//!
//! - [`InputDevice`] / [`Output`] – host objects reduced to the one
//!   property routing cares about: an identifying name.
//! - [`Seat`] – a host seat endpoint with attach/detach membership
//!   operations and the device-pattern-match predicate.
//! - [`SeatFactory`] – how the registry obtains new seat objects.
//! - [`ServerHandle`] – the running server, asked for native seat handles
//!   when the manager is attached to it.
//!
//! Identity is object identity: a device or output is the *same* device
//! across calls when the two `Arc`s share an allocation, which is what
//! [`same_device`] and [`same_output`] check. Names are not unique enough
//! (two identical mice report identical identifying strings).
//!
//! # Adapters
//!
//! - **`native`** – production adapter forwarding membership changes to a
//!   host [`native::NativeSeatHandle`].
//! - **`mock`** – recording doubles for tests and the routing preview
//!   binary.

use std::sync::Arc;

use wayseat_core::rules::DeviceRule;

pub mod mock;
pub mod native;

use native::NativeSeatHandle;

/// Shared handle to a host input device.
pub type DeviceRef = Arc<dyn InputDevice>;

/// Shared handle to a host output display.
pub type OutputRef = Arc<dyn Output>;

/// Shared handle to a host seat.
pub type SeatRef = Arc<dyn Seat>;

/// A host input device, reduced to its identifying string.
pub trait InputDevice: Send + Sync {
    /// The identifying name/description used for rule matching.
    fn name(&self) -> &str;
}

/// A host output display.
pub trait Output: Send + Sync {
    /// The output name as exported in the configuration document.
    fn name(&self) -> &str;
}

/// A seat endpoint owned by the host compositor.
///
/// Membership mutation takes `&self`: seat objects are shared between the
/// registry and the host, so implementations use interior mutability. All
/// calls are synchronous and side-effect-complete on return.
pub trait Seat: Send + Sync {
    /// The unique seat name.
    fn name(&self) -> &str;

    /// Whether this seat is the fallback target for unroutable devices.
    fn is_fallback(&self) -> bool;

    /// Sets or clears the fallback flag. Invariant maintenance (at most
    /// one fallback seat) is the registry's job, not the seat's.
    fn set_fallback(&self, fallback: bool);

    /// Attaches an input device to this seat.
    fn attach_device(&self, device: &DeviceRef);

    /// Detaches an input device from this seat.
    fn detach_device(&self, device: &DeviceRef);

    /// Snapshot of the attached input devices, in attach order.
    fn devices(&self) -> Vec<DeviceRef>;

    /// Attaches an output to this seat.
    fn attach_output(&self, output: &OutputRef);

    /// Detaches an output from this seat.
    fn detach_output(&self, output: &OutputRef);

    /// Snapshot of the attached outputs, in attach order.
    fn outputs(&self) -> Vec<OutputRef>;

    /// Applies the host's notion of the device's identifying string to
    /// each rule. The default uses [`InputDevice::name`]; hosts with
    /// richer device identities can override.
    fn matches_device(&self, device: &DeviceRef, rules: &[DeviceRule]) -> bool {
        rules.iter().any(|rule| rule.is_match(device.name()))
    }

    /// Binds this seat to a running server, acquiring its native-facing
    /// handle. Returns `false` when no handle could be obtained; the
    /// caller treats that as a non-fatal, logged condition.
    fn bind_server(&self, server: &dyn ServerHandle) -> bool;
}

/// Creates seat objects for the registry.
///
/// The production factory hands out [`native::NativeSeat`]s; tests inject
/// [`mock::MockSeatFactory`] to observe every seat the manager creates.
pub trait SeatFactory: Send + Sync {
    fn create_seat(&self, name: &str) -> SeatRef;
}

/// The running compositor server, as seen from the seat manager.
pub trait ServerHandle {
    /// Creates the native seat global for `name`. `None` when the backend
    /// refuses, which the manager logs and survives.
    fn create_seat_handle(&self, name: &str) -> Option<Box<dyn NativeSeatHandle>>;
}

/// Returns `true` when both refs point at the same device object.
pub fn same_device(a: &DeviceRef, b: &DeviceRef) -> bool {
    Arc::ptr_eq(a, b)
}

/// Returns `true` when both refs point at the same output object.
pub fn same_output(a: &OutputRef, b: &OutputRef) -> bool {
    Arc::ptr_eq(a, b)
}
