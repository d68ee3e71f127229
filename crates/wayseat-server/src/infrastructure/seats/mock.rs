//! Recording seat doubles for unit testing.
//!
//! Allows tests (and the headless routing preview binary) to drive the
//! seat manager without a compositor backend. [`MockSeat`] records every
//! attach/detach in call order so tests can assert on the exact sequence
//! of membership changes, not only the end state.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use super::native::NativeSeatHandle;
use super::{
    same_device, same_output, DeviceRef, InputDevice, Output, OutputRef, Seat, SeatFactory,
    SeatRef, ServerHandle,
};

/// A named test device.
pub struct FakeDevice {
    name: String,
}

impl FakeDevice {
    /// Creates a device ref with the given identifying string.
    pub fn named(name: &str) -> DeviceRef {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl InputDevice for FakeDevice {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A named test output.
pub struct FakeOutput {
    name: String,
}

impl FakeOutput {
    /// Creates an output ref with the given name.
    pub fn named(name: &str) -> OutputRef {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl Output for FakeOutput {
    fn name(&self) -> &str {
        &self.name
    }
}

/// A recording implementation of [`Seat`].
pub struct MockSeat {
    name: String,
    fallback: AtomicBool,
    devices: Mutex<Vec<DeviceRef>>,
    outputs: Mutex<Vec<OutputRef>>,
    attach_log: Mutex<Vec<String>>,
    detach_log: Mutex<Vec<String>>,
    refuse_bind: AtomicBool,
    bind_calls: AtomicU32,
}

impl MockSeat {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fallback: AtomicBool::new(false),
            devices: Mutex::new(Vec::new()),
            outputs: Mutex::new(Vec::new()),
            attach_log: Mutex::new(Vec::new()),
            detach_log: Mutex::new(Vec::new()),
            refuse_bind: AtomicBool::new(false),
            bind_calls: AtomicU32::new(0),
        }
    }

    /// Names of every attached device/output, in attach call order.
    pub fn attach_log(&self) -> Vec<String> {
        self.attach_log.lock().expect("lock poisoned").clone()
    }

    /// Names of every detached device/output, in detach call order.
    pub fn detach_log(&self) -> Vec<String> {
        self.detach_log.lock().expect("lock poisoned").clone()
    }

    /// Names of the currently attached devices.
    pub fn device_names(&self) -> Vec<String> {
        self.devices()
            .iter()
            .map(|device| device.name().to_string())
            .collect()
    }

    /// Names of the currently attached outputs.
    pub fn output_names(&self) -> Vec<String> {
        self.outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect()
    }

    /// Makes subsequent `bind_server` calls fail, exercising the
    /// non-fatal "no native handle" path.
    pub fn refuse_bind(&self) {
        self.refuse_bind.store(true, Ordering::Relaxed);
    }

    /// How many times `bind_server` was called.
    pub fn bind_calls(&self) -> u32 {
        self.bind_calls.load(Ordering::Relaxed)
    }
}

impl Seat for MockSeat {
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
        self.devices
            .lock()
            .expect("lock poisoned")
            .push(Arc::clone(device));
        self.attach_log
            .lock()
            .expect("lock poisoned")
            .push(device.name().to_string());
    }

    fn detach_device(&self, device: &DeviceRef) {
        self.devices
            .lock()
            .expect("lock poisoned")
            .retain(|attached| !same_device(attached, device));
        self.detach_log
            .lock()
            .expect("lock poisoned")
            .push(device.name().to_string());
    }

    fn devices(&self) -> Vec<DeviceRef> {
        self.devices.lock().expect("lock poisoned").clone()
    }

    fn attach_output(&self, output: &OutputRef) {
        self.outputs
            .lock()
            .expect("lock poisoned")
            .push(Arc::clone(output));
        self.attach_log
            .lock()
            .expect("lock poisoned")
            .push(output.name().to_string());
    }

    fn detach_output(&self, output: &OutputRef) {
        self.outputs
            .lock()
            .expect("lock poisoned")
            .retain(|attached| !same_output(attached, output));
        self.detach_log
            .lock()
            .expect("lock poisoned")
            .push(output.name().to_string());
    }

    fn outputs(&self) -> Vec<OutputRef> {
        self.outputs.lock().expect("lock poisoned").clone()
    }

    fn bind_server(&self, _server: &dyn ServerHandle) -> bool {
        self.bind_calls.fetch_add(1, Ordering::Relaxed);
        !self.refuse_bind.load(Ordering::Relaxed)
    }
}

/// Factory that hands out [`MockSeat`]s and keeps a concrete handle on
/// every seat it ever created, so tests can reach the recording API even
/// for seats the manager created internally (e.g. during a config load).
#[derive(Default)]
pub struct MockSeatFactory {
    seats: Mutex<Vec<Arc<MockSeat>>>,
}

impl MockSeatFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every seat created through this factory, in creation order.
    pub fn created(&self) -> Vec<Arc<MockSeat>> {
        self.seats.lock().expect("lock poisoned").clone()
    }

    /// The most recently created seat with the given name.
    pub fn seat_named(&self, name: &str) -> Option<Arc<MockSeat>> {
        self.seats
            .lock()
            .expect("lock poisoned")
            .iter()
            .rev()
            .find(|seat| seat.name() == name)
            .cloned()
    }
}

impl SeatFactory for MockSeatFactory {
    fn create_seat(&self, name: &str) -> SeatRef {
        let seat = Arc::new(MockSeat::new(name));
        self.seats
            .lock()
            .expect("lock poisoned")
            .push(Arc::clone(&seat));
        seat
    }
}

/// A [`ServerHandle`] double that records, per seat, every notification
/// its handed-out native handles receive.
#[derive(Default)]
pub struct RecordingServer {
    refused: Mutex<Vec<String>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses to create a native handle for the named seat.
    pub fn refuse_seat(&self, name: &str) {
        self.refused
            .lock()
            .expect("lock poisoned")
            .push(name.to_string());
    }

    /// Every notification received so far, formatted as
    /// `"<seat>: <kind> <name>"`.
    pub fn events(&self) -> Vec<String> {
        self.events.lock().expect("lock poisoned").clone()
    }
}

impl ServerHandle for RecordingServer {
    fn create_seat_handle(&self, name: &str) -> Option<Box<dyn NativeSeatHandle>> {
        if self
            .refused
            .lock()
            .expect("lock poisoned")
            .iter()
            .any(|refused| refused == name)
        {
            return None;
        }
        Some(Box::new(RecordingHandle {
            seat_name: name.to_string(),
            events: Arc::clone(&self.events),
        }))
    }
}

struct RecordingHandle {
    seat_name: String,
    events: Arc<Mutex<Vec<String>>>,
}

impl RecordingHandle {
    fn record(&self, kind: &str, name: &str) {
        self.events
            .lock()
            .expect("lock poisoned")
            .push(format!("{}: {} {}", self.seat_name, kind, name));
    }
}

impl NativeSeatHandle for RecordingHandle {
    fn device_attached(&self, device: &DeviceRef) {
        self.record("device attached", device.name());
    }

    fn device_detached(&self, device: &DeviceRef) {
        self.record("device detached", device.name());
    }

    fn output_attached(&self, output: &OutputRef) {
        self.record("output attached", output.name());
    }

    fn output_detached(&self, output: &OutputRef) {
        self.record("output detached", output.name());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_seat_records_attach_order() {
        // Arrange
        let seat = MockSeat::new("seat0");

        // Act
        seat.attach_device(&FakeDevice::named("Keyboard"));
        seat.attach_device(&FakeDevice::named("Mouse"));

        // Assert
        assert_eq!(seat.attach_log(), vec!["Keyboard", "Mouse"]);
        assert_eq!(seat.device_names(), vec!["Keyboard", "Mouse"]);
    }

    #[test]
    fn test_mock_seat_detach_removes_by_identity() {
        // Arrange – two devices with the same identifying string
        let seat = MockSeat::new("seat0");
        let first = FakeDevice::named("Logitech USB Mouse");
        let second = FakeDevice::named("Logitech USB Mouse");
        seat.attach_device(&first);
        seat.attach_device(&second);

        // Act
        seat.detach_device(&first);

        // Assert
        assert_eq!(seat.devices().len(), 1);
        assert!(same_device(&seat.devices()[0], &second));
    }

    #[test]
    fn test_mock_factory_tracks_created_seats() {
        let factory = MockSeatFactory::new();

        factory.create_seat("seat0");
        factory.create_seat("seat1");

        assert_eq!(factory.created().len(), 2);
        assert!(factory.seat_named("seat1").is_some());
        assert!(factory.seat_named("missing").is_none());
    }

    #[test]
    fn test_mock_seat_bind_refusal() {
        let seat = MockSeat::new("seat0");
        let server = RecordingServer::new();

        assert!(seat.bind_server(&server));
        seat.refuse_bind();
        assert!(!seat.bind_server(&server));
        assert_eq!(seat.bind_calls(), 2);
    }
}
