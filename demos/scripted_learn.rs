//! Drives an engine with scripted devices and prints each frame's pad codes.
//!
//! Run with `cargo run --example scripted_learn` (add `--features debug-log`
//! for per-tick traces).

use padmap::backends::virtual_input::VirtualDevice;
use padmap::{Control, DeviceSlots, Engine, EngineConfig, EventFilter, KeyCode, Logger};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut engine = Engine::new(EngineConfig {
        mapping_path: dir.path().join("padmap.txt"),
        ..EngineConfig::default()
    });
    engine
        .listeners_mut()
        .add_listener(Logger::new(), EventFilter::All);

    let mut slots = DeviceSlots::new();
    let _ = slots.attach(0, VirtualDevice::gamepad("Scripted Pad", 12, 4));
    let _ = slots.attach(1, VirtualDevice::joystick("Scripted Stick", 8, 2));
    engine.tick(&mut slots);

    // Pad 1, B1 <- gamepad button 0.
    engine.select_pad(0)?;
    engine.select_control(Control::Button1);
    engine.start_learning();
    if let Some(pad) = slots.get_mut(0) {
        pad.press_gamepad_button(0);
    }
    print_codes(engine.tick(&mut slots));

    // Pad 2, Left <- stick axis 0 pushed negative.
    engine.cycle_pad();
    engine.select_control(Control::Left);
    engine.start_learning();
    if let Some(stick) = slots.get_mut(1) {
        stick.set_axis(0, -1.0);
    }
    print_codes(engine.tick(&mut slots));

    // Keyboard defaults still drive the rest.
    engine.key_down(KeyCode::W);
    print_codes(engine.tick(&mut slots));

    engine.save_mappings()?;
    let report = engine.load_mappings()?;
    println!("reloaded {} bindings", report.applied);

    for pad in engine.view().pads {
        for control in pad.controls {
            println!("pad {} {:>5}: {}", pad.index + 1, control.control, control.description);
        }
    }
    Ok(())
}

fn print_codes(codes: [padmap::PadBits; padmap::PAD_COUNT]) {
    println!("pad1={} pad2={}", codes[0], codes[1]);
}
