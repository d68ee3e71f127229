//! Production seat adapter over the compositor backend.
//!
//! [`NativeSeat`] keeps the ordered device/output membership the manager
//! operates on and mirrors every change down to the host through a
//! [`NativeSeatHandle`]. The handle is acquired lazily: seats typically
//! exist before the server is up (created from configuration), attach to
//! the backend when the manager's `create(server)` hook runs, and keep
//! working as pure bookkeeping when the backend refuses a handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{same_device, same_output, DeviceRef, OutputRef, Seat, SeatFactory, SeatRef, ServerHandle};

/// Native-facing half of a seat, implemented by the compositor backend.
///
/// Calls are notifications: the bookkeeping in [`NativeSeat`] has already
/// been updated when they fire, and they are assumed side-effect-complete
/// on return.
pub trait NativeSeatHandle: Send + Sync {
    fn device_attached(&self, device: &DeviceRef);
    fn device_detached(&self, device: &DeviceRef);
    fn output_attached(&self, output: &OutputRef);
    fn output_detached(&self, output: &OutputRef);
}

/// Production [`Seat`] implementation.
pub struct NativeSeat {
    name: String,
    fallback: AtomicBool,
    devices: Mutex<Vec<DeviceRef>>,
    outputs: Mutex<Vec<OutputRef>>,
    handle: Mutex<Option<Box<dyn NativeSeatHandle>>>,
}

impl NativeSeat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fallback: AtomicBool::new(false),
            devices: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
            handle: Mutex::new(None),
        }
    }

    /// Whether a native handle is currently bound.
    pub fn has_native_handle(&self) -> bool {
        self.handle.lock().expect("lock poisoned").is_some()
    }
}

impl Seat for NativeSeat {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_fallback(&self) -> bool {
        self.fallback.load(Ordering::Relaxed)
    }

    fn set_fallback(&self, fallback: bool) {
        self.fallback.store(fallback, Ordering::Relaxed);
    }

    fn attach_device(&self, device: &DeviceRef) {
        let mut devices = self.devices.lock().expect("lock poisoned");
        if devices.iter().any(|attached| same_device(attached, device)) {
            return;
        }
        devices.push(Arc::clone(device));
        drop(devices);
        if let Some(handle) = self.handle.lock().expect("lock poisoned").as_ref() {
            handle.device_attached(device);
        }
    }

    fn detach_device(&self, device: &DeviceRef) {
        let mut devices = self.devices.lock().expect("lock poisoned");
        let before = devices.len();
        devices.retain(|attached| !same_device(attached, device));
        let removed = devices.len() != before;
        drop(devices);
        if removed {
            if let Some(handle) = self.handle.lock().expect("lock poisoned").as_ref() {
                handle.device_detached(device);
            }
        }
    }

    fn devices(&self) -> Vec<DeviceRef> {
        self.devices.lock().expect("lock poisoned").clone()
    }

    fn attach_output(&self, output: &OutputRef) {
        let mut outputs = self.outputs.lock().expect("lock poisoned");
        if outputs.iter().any(|attached| same_output(attached, output)) {
            return;
        }
        outputs.push(Arc::clone(output));
        drop(outputs);
        if let Some(handle) = self.handle.lock().expect("lock poisoned").as_ref() {
            handle.output_attached(output);
        }
    }

    fn detach_output(&self, output: &OutputRef) {
        let mut outputs = self.outputs.lock().expect("lock poisoned");
        let before = outputs.len();
        outputs.retain(|attached| !same_output(attached, output));
        let removed = outputs.len() != before;
        drop(outputs);
        if removed {
            if let Some(handle) = self.handle.lock().expect("lock poisoned").as_ref() {
                handle.output_detached(output);
            }
        }
    }

    fn outputs(&self) -> Vec<OutputRef> {
        self.outputs.lock().expect("lock poisoned").clone()
    }

    fn bind_server(&self, server: &dyn ServerHandle) -> bool {
        let handle = server.create_seat_handle(&self.name);
        let bound = handle.is_some();
        *self.handle.lock().expect("lock poisoned") = handle;
        bound
    }
}

/// Factory handing out [`NativeSeat`]s; the production wiring for
/// `SeatManager::new`.
pub struct NativeSeatFactory;

impl SeatFactory for NativeSeatFactory {
    fn create_seat(&self, name: &str) -> SeatRef {
        Arc::new(NativeSeat::new(name))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::seats::mock::{FakeDevice, FakeOutput, RecordingServer};

    #[test]
    fn test_attach_without_handle_is_pure_bookkeeping() {
        // Arrange
        let seat = NativeSeat::new("seat0");
        let mouse = FakeDevice::named("Logitech USB Mouse");

        // Act
        seat.attach_device(&mouse);

        // Assert
        assert_eq!(seat.devices().len(), 1);
        assert!(!seat.has_native_handle());
    }

    #[test]
    fn test_attach_is_forwarded_after_bind() {
        // Arrange
        let seat = NativeSeat::new("seat0");
        let server = RecordingServer::new();
        assert!(seat.bind_server(&server));

        // Act
        seat.attach_device(&FakeDevice::named("Logitech USB Mouse"));
        seat.attach_output(&FakeOutput::named("DP-1"));

        // Assert
        let events = server.events();
        assert!(events.contains(&"seat0: device attached Logitech USB Mouse".to_string()));
        assert!(events.contains(&"seat0: output attached DP-1".to_string()));
    }

    #[test]
    fn test_bind_server_reports_refusal() {
        let seat = NativeSeat::new("seat9");
        let server = RecordingServer::new();
        server.refuse_seat("seat9");

        assert!(!seat.bind_server(&server));
        assert!(!seat.has_native_handle());
    }

    #[test]
    fn test_double_attach_of_same_device_is_ignored() {
        let seat = NativeSeat::new("seat0");
        let server = RecordingServer::new();
        seat.bind_server(&server);
        let mouse = FakeDevice::named("Logitech USB Mouse");

        seat.attach_device(&mouse);
        seat.attach_device(&mouse);

        assert_eq!(seat.devices().len(), 1);
        // The backend saw exactly one attach notification
        let attaches = server
            .events()
            .iter()
            .filter(|event| event.contains("device attached"))
            .count();
        assert_eq!(attaches, 1);
    }

    #[test]
    fn test_detach_of_unattached_device_does_not_notify() {
        let seat = NativeSeat::new("seat0");
        let server = RecordingServer::new();
        seat.bind_server(&server);

        seat.detach_device(&FakeDevice::named("Never Attached"));

        assert!(server.events().is_empty());
    }

    #[test]
    fn test_same_name_devices_are_distinct_objects() {
        // Two identical mice report identical identifying strings but must
        // be tracked independently.
        let seat = NativeSeat::new("seat0");
        let first = FakeDevice::named("Logitech USB Mouse");
        let second = FakeDevice::named("Logitech USB Mouse");

        seat.attach_device(&first);
        seat.attach_device(&second);
        assert_eq!(seat.devices().len(), 2);

        seat.detach_device(&first);
        assert_eq!(seat.devices().len(), 1);
        assert!(same_device(&seat.devices()[0], &second));
    }
}
