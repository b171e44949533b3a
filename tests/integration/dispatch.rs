//! Run-mode routing

use crate::helpers::*;
use approx::assert_relative_eq;
use bindery::prelude::*;
use bindery::WidgetEventKind;

/// Bind each widget to its channel through the learn flow, then return to run.
fn learn(rig: &mut Rig, bindings: &[(WidgetId, u8)]) {
    rig.manager.toggle_mode();
    for &(widget, channel) in bindings {
        rig.manager.click(widget);
        rig.cc("A", channel, 0);
    }
    rig.manager.toggle_mode();
}

#[test]
fn test_scenario_b_continuous_and_momentary() {
    let mut rig = rig();
    let (w1, recorder) = register(&rig.registry, Recorder::default());
    let (w2, bang) = register(&rig.registry, Bang::new());
    learn(&mut rig, &[(w1, 3), (w2, 3)]);
    recorder.values.lock().clear();

    rig.note("A", 3, 64);

    assert_eq!(*recorder.values.lock(), vec![64]);
    assert_eq!(bang.count(), 1);
}

#[test]
fn test_slider_receives_mapped_value() {
    let mut rig = rig();
    let (w, slider) = register(&rig.registry, Slider::new().with_range(0.0, 127.0));
    learn(&mut rig, &[(w, 1)]);

    rig.cc("A", 1, 64);
    assert_relative_eq!(slider.value(), 64.0);
    rig.cc("A", 1, 127);
    assert_relative_eq!(slider.value(), 127.0);
}

#[test]
fn test_button_and_toggle_semantics() {
    let mut rig = rig();
    let (wb, button) = register(&rig.registry, Button::new());
    let (wt, toggle) = register(&rig.registry, Toggle::new());
    learn(&mut rig, &[(wb, 10), (wt, 11)]);

    rig.cc("A", 10, 127);
    rig.cc("A", 11, 1);
    assert!(button.is_pressed());
    assert!(toggle.is_active());

    rig.cc("A", 10, 0);
    rig.cc("A", 11, 0);
    assert!(!button.is_pressed());
    assert!(!toggle.is_active());
}

#[test]
fn test_unbound_channel_is_noop() {
    let mut rig = rig();
    let (w, recorder) = register(&rig.registry, Recorder::default());
    learn(&mut rig, &[(w, 3)]);
    recorder.values.lock().clear();

    rig.cc("A", 4, 99);
    assert!(recorder.values.lock().is_empty());
}

#[test]
fn test_widget_events_flow_out() {
    let mut rig = rig();
    let (tx, rx) = crossbeam_channel::unbounded();
    let button = Button::new().with_id("rec");
    button.connect_events(tx);
    let (w, _) = register(&rig.registry, button);
    learn(&mut rig, &[(w, 20)]);
    rx.try_iter().for_each(drop);

    rig.cc("A", 20, 127);
    let kinds: Vec<WidgetEventKind> = rx.try_iter().map(|e| e.kind).collect();
    assert_eq!(kinds, vec![WidgetEventKind::Press, WidgetEventKind::Input(1.0)]);
}

#[test]
fn test_stale_widget_is_skipped() {
    let mut rig = rig();
    let (gone, _) = register(&rig.registry, Recorder::default());
    let (kept, recorder) = register(&rig.registry, Recorder::default());
    learn(&mut rig, &[(gone, 8), (kept, 8)]);
    recorder.values.lock().clear();

    rig.registry.deregister(gone);
    rig.cc("A", 8, 5);
    assert_eq!(*recorder.values.lock(), vec![5]);
}

#[test]
fn test_messages_before_ready_are_discarded() {
    let registry = WidgetRegistry::new();
    let store = MemoryStore::new();
    let (w, recorder) = register(&registry, Recorder::default());

    {
        let mut first = rig_with(registry.clone(), store.clone());
        learn(&mut first, &[(w, 6)]);
    }
    recorder.values.lock().clear();

    let mut rig = unready_rig_with(registry, store);
    rig.cc("A", 6, 1);
    assert!(recorder.values.lock().is_empty());

    rig.manager.ready().unwrap();
    rig.cc("A", 6, 2);
    assert_eq!(*recorder.values.lock(), vec![2]);
}
