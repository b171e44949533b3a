//! # Learn
//!
//! Bind two controls by demonstration using the in-process device backend.
//!
//! **Concepts:** Assign mode, selection, run-mode routing, bindings list
//!
//! ```bash
//! cargo run --example learn
//! ```

use bindery::prelude::*;

fn main() -> bindery::Result<()> {
    tracing_subscriber::fmt::init();

    let registry = WidgetRegistry::new();
    let cutoff = Arc::new(Slider::new().with_id("cutoff").with_range(20.0, 20_000.0));
    let kick = Arc::new(Bang::new().with_id("kick"));
    let cutoff_id = registry.register(cutoff.clone());
    let kick_id = registry.register(kick.clone());

    let controller = VirtualBackend::with_devices(["Virtual Controller"]);
    let mut manager = BindingManager::builder()
        .registry(registry)
        .backend(controller.clone())
        .build()?;
    manager.discover()?;
    manager.ready()?;

    // Learn: select a control, then move the physical knob or pad
    manager.toggle_mode();
    manager.click(cutoff_id);
    controller.send("Virtual Controller", &[0xB0, 74, 0]);
    manager.pump();
    manager.click(kick_id);
    controller.send("Virtual Controller", &[0x99, 36, 100]);
    manager.pump();
    manager.toggle_mode();

    for row in manager.bindings() {
        println!("{:>8}  {}", row.label, row.identity);
    }

    // Play
    controller.send("Virtual Controller", &[0xB0, 74, 64]);
    controller.send("Virtual Controller", &[0x99, 36, 127]);
    manager.pump();
    println!("cutoff = {:.1} Hz, kick hits = {}", cutoff.value(), kick.count());

    println!("\nStored record:\n{}", manager.export_bindings()?);
    Ok(())
}
