//! # Hardware
//!
//! Learn bindings from a real MIDI controller and keep them between runs.
//!
//! **Concepts:** Device enumeration, `midi-hardware` feature, `FileStore`
//!
//! ```bash
//! cargo run --example hardware --features midi-hardware
//! ```

use std::time::{Duration, Instant};

use bindery::prelude::*;

fn main() -> bindery::Result<()> {
    tracing_subscriber::fmt::init();

    let registry = WidgetRegistry::new();
    let volume = Arc::new(Slider::new().with_id("volume"));
    let volume_id = registry.register(volume.clone());

    let store = FileStore::default_location()?;
    println!("Bindings stored in {}", store.dir().display());

    let mut manager = BindingManager::builder()
        .registry(registry)
        .store(store)
        .build()?;
    manager.discover()?;
    manager.ready()?;

    println!("MIDI input devices:");
    let devices = manager.devices();
    if devices.is_empty() {
        println!("  (none found - connect a MIDI controller and try again)");
        return Ok(());
    }
    for dev in &devices {
        let marker = if dev.is_active { "*" } else { " " };
        println!(" {} [{}] {}", marker, dev.index, dev.name);
    }

    if !manager.table().has_bindings(volume_id) {
        println!("\nMove any knob within 10 seconds to bind it to 'volume'...");
        manager.toggle_mode();
        manager.click(volume_id);
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline && !manager.table().has_bindings(volume_id) {
            manager.pump();
            std::thread::sleep(Duration::from_millis(10));
        }
        manager.toggle_mode();
    }

    println!("Listening for 10 seconds...");
    let deadline = Instant::now() + Duration::from_secs(10);
    let mut last = volume.value();
    while Instant::now() < deadline {
        manager.pump();
        if volume.value() != last {
            last = volume.value();
            println!("volume = {:.2}", last);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    Ok(())
}
