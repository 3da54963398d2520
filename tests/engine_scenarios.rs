use padmap::backends::virtual_input::VirtualDevice;
use padmap::{
    AxisDirection, Binding, Control, DeviceSlots, Engine, EngineConfig, KeyCode, MappingSet,
    PadBits,
};
use proptest::prelude::*;
use tempfile::TempDir;

fn engine_in(dir: &TempDir) -> Engine {
    Engine::with_mappings(
        EngineConfig {
            mapping_path: dir.path().join("padmap.txt"),
            ..EngineConfig::default()
        },
        MappingSet::empty(),
    )
}

#[test]
fn learn_key_then_gamepad_button() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(&dir);
    let mut slots = DeviceSlots::new();
    let _ = slots.attach(0, VirtualDevice::gamepad("Pad", 10, 4));
    engine.tick(&mut slots);

    engine.select_pad(0).unwrap();
    engine.select_control(Control::Up);
    engine.start_learning();
    engine.key_down(KeyCode::W);
    engine.tick(&mut slots);
    assert_eq!(
        engine.mappings().get(0, Control::Up),
        Some(&Binding::key(KeyCode::W))
    );
    assert!(!engine.cursor().is_armed());

    engine.key_up(KeyCode::W);
    engine.tick(&mut slots);
    engine.start_learning();
    slots.get_mut(0).unwrap().press_gamepad_button(3);
    engine.tick(&mut slots);
    assert_eq!(
        engine.mappings().get(0, Control::Up),
        Some(&Binding::GamepadButton { device: 0, button: 3 })
    );
    assert!(engine.codes()[0].is_pressed(Control::Up));
}

#[test]
fn learned_axis_fires_below_learn_trigger() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(&dir);
    let mut slots = DeviceSlots::new();
    let _ = slots.attach(1, VirtualDevice::joystick("Stick", 0, 2));
    engine.tick(&mut slots);

    engine.select_control(Control::Left);
    engine.start_learning();
    slots.get_mut(1).unwrap().set_axis(0, -0.9);
    engine.tick(&mut slots);

    slots.get_mut(1).unwrap().set_axis(0, -0.5);
    let codes = engine.tick(&mut slots);
    assert_eq!(codes[0].bits(), 1 << Control::Left.index());

    slots.get_mut(1).unwrap().set_axis(0, -0.4);
    assert_eq!(engine.tick(&mut slots)[0], PadBits::default());
}

#[test]
fn unplugged_device_reads_released() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(&dir);
    let mut slots = DeviceSlots::new();
    let mut stick = VirtualDevice::joystick("Stick", 4, 0);
    stick.press_button(2);
    let _ = slots.attach(0, stick);

    let mut set = MappingSet::empty();
    set.set(1, Control::Button1, Binding::JoyButton { device: 0, button: 2 });
    engine = Engine::with_mappings(engine.config().clone(), set);

    assert!(engine.tick(&mut slots)[1].is_pressed(Control::Button1));
    slots.detach(0);
    assert_eq!(engine.tick(&mut slots)[1].bits(), 0);
}

#[test]
fn save_and_reload_through_engine() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(&dir);
    let mut slots: DeviceSlots<VirtualDevice> = DeviceSlots::new();

    engine.select_pad(1).unwrap();
    engine.select_control(Control::Button2);
    engine.start_learning();
    engine.key_down(KeyCode::K);
    engine.tick(&mut slots);
    engine.save_mappings().unwrap();

    let mut fresh = Engine::new(engine.config().clone());
    let report = fresh.restore_mappings().unwrap();
    assert_eq!(report.applied, 12);
    assert_eq!(fresh.mappings(), engine.mappings());
    assert_eq!(
        fresh.mappings().get(0, Control::Up),
        Some(&Binding::None),
        "load replaces defaults wholesale"
    );
}

#[test]
fn raw_axis_record_survives_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("padmap.txt");
    let binding = Binding::JoyAxis {
        device: 2,
        axis: 1,
        direction: AxisDirection::Positive,
        threshold: 0.45,
    };
    let mut set = MappingSet::empty();
    set.set(1, Control::Button2, binding);
    set.save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text.lines().last(), Some("1 5 5 2 1 1 0.450000"));
    let (back, _) = MappingSet::load(&path).unwrap();
    assert_eq!(back.get(1, Control::Button2), Some(&binding));
}

#[test]
fn out_of_range_control_record_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = engine_in(&dir);
    std::fs::write(
        &engine.config().mapping_path,
        "0 0 1 -1 87 0 0.450000\n0 9 1 -1 65 0 0.450000\n1 1 2 0 11 0 0.450000\n",
    )
    .unwrap();

    let report = engine.load_mappings().unwrap();
    assert_eq!((report.applied, report.skipped), (2, 1));
    assert_eq!(
        engine.mappings().get(0, Control::Up),
        Some(&Binding::key(KeyCode::W))
    );
    assert_eq!(
        engine.mappings().get(1, Control::Down),
        Some(&Binding::GamepadButton { device: 0, button: 11 })
    );
}

fn any_binding() -> impl Strategy<Value = Binding> {
    let device = 0u8..16;
    let direction = prop_oneof![Just(AxisDirection::Negative), Just(AxisDirection::Positive)];
    let threshold = 0.0f32..=1.0;
    prop_oneof![
        Just(Binding::None),
        (0u16..=348).prop_map(|k| Binding::key(KeyCode(k))),
        (device.clone(), 0u8..15).prop_map(|(device, button)| Binding::GamepadButton { device, button }),
        (device.clone(), 0u8..6, direction.clone(), threshold.clone()).prop_map(
            |(device, axis, direction, threshold)| Binding::GamepadAxis {
                device,
                axis,
                direction,
                threshold
            }
        ),
        (device.clone(), 0u16..64).prop_map(|(device, button)| Binding::JoyButton { device, button }),
        (device, 0u16..16, direction, threshold).prop_map(
            |(device, axis, direction, threshold)| Binding::JoyAxis {
                device,
                axis,
                direction,
                threshold
            }
        ),
    ]
}

proptest! {
    #[test]
    fn text_format_round_trips(bindings in proptest::collection::vec(any_binding(), 12)) {
        let mut set = MappingSet::empty();
        for (i, binding) in bindings.into_iter().enumerate() {
            let control = Control::from_index(i % Control::COUNT).unwrap();
            set.set(i / Control::COUNT, control, binding);
        }
        let (back, report) = MappingSet::parse_text(&set.to_text());
        prop_assert_eq!(report.skipped, 0);
        prop_assert_eq!(back, set);
    }
}
