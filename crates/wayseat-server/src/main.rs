//! Headless seat-routing preview.
//!
//! Loads a seat configuration document, builds a seat manager over
//! in-memory seats, and reports which seat each device named on the
//! command line would be routed to. Useful for validating a seat layout
//! and its device rules without starting a compositor session.
//!
//! ```text
//! wayseat-server [--config <seats.json>] [DEVICE NAME]...
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wayseat_server::application::seat_manager::SeatManager;
use wayseat_server::infrastructure::seats::mock::{FakeDevice, MockSeatFactory};
use wayseat_server::infrastructure::seats::{Seat, SeatFactory};
use wayseat_server::infrastructure::storage::config as storage;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config_path: Option<PathBuf> = None;
    let mut device_names = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--config requires a path"))?;
            config_path = Some(PathBuf::from(path));
        } else {
            device_names.push(arg);
        }
    }

    let document = match &config_path {
        Some(path) => storage::read_document(path)?,
        None => storage::load_document()?,
    };

    let factory: Arc<dyn SeatFactory> = Arc::new(MockSeatFactory::new());
    let mut manager = SeatManager::new(factory);
    manager.load_config(&document);

    info!(seats = manager.seats().len(), "seat configuration loaded");
    for seat in manager.seats() {
        info!(
            seat = seat.name(),
            fallback = seat.is_fallback(),
            rules = ?manager.device_rules(seat.name()),
            "configured seat"
        );
    }

    if device_names.is_empty() {
        warn!("no device names given; nothing to preview");
        return Ok(());
    }

    for name in device_names {
        let device = FakeDevice::named(&name);
        match manager.find_seat_for_device(&device) {
            Some(seat) => info!(device = %name, seat = seat.name(), "device routes to seat"),
            None => warn!(device = %name, "no seat available for device"),
        }
    }

    Ok(())
}
