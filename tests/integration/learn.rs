//! Mode toggling, selection and channel learning

use crate::helpers::*;
use bindery::prelude::*;
use bindery::{LayerColor, Mode, Overlay};

#[test]
fn test_initial_state() {
    let rig = rig();
    assert_eq!(rig.manager.mode(), Mode::Run);
    assert!(rig.manager.selection().is_none());
    assert!(rig.manager.table().is_empty());
    assert!(rig.manager.is_ready());
}

#[test]
fn test_assign_mode_draws_base_overlay() {
    let mut rig = rig();
    let (_, s1) = register(&rig.registry, Slider::new());
    let (w2, s2) = register(&rig.registry, Bang::new());

    rig.manager.toggle_mode();
    rig.manager.click(w2);
    rig.cc("A", 4, 0);
    rig.manager.toggle_mode();
    rig.manager.toggle_mode();

    assert_eq!(s1.overlay().layer(), Some(LayerColor::Unbound));
    assert_eq!(s2.overlay().layer(), Some(LayerColor::Bound));
    assert_eq!(s2.overlay().tag().unwrap().text, "cc 4");
    assert!(s1.overlay().tag().is_none());
    assert_eq!(rig.manager.table().channel_of(w2), Some(4));
    assert!(rig.manager.selection().is_none());
}

#[test]
fn test_entering_run_clears_selection_and_overlays() {
    let mut rig = rig();
    let (w1, s1) = register(&rig.registry, Slider::new());
    let (_, s2) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    assert!(rig.manager.click(w1));
    rig.cc("A", 1, 0);
    assert_eq!(s1.overlay().layer(), Some(LayerColor::Selected));

    assert_eq!(rig.manager.toggle_mode(), Mode::Run);
    assert!(rig.manager.selection().is_none());
    assert_eq!(s1.overlay().snapshot(), Overlay::default());
    assert_eq!(s2.overlay().snapshot(), Overlay::default());
}

#[test]
fn test_scenario_a_widget_moves_between_channels() {
    let mut rig = rig();
    let (w1, _) = register(&rig.registry, Slider::new());
    let (w2, _) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w1);
    rig.cc("A", 3, 0);
    rig.manager.click(w2);
    rig.cc("A", 3, 0);

    let on_3: Vec<WidgetId> = rig.manager.table().widgets_on(3).collect();
    assert_eq!(on_3, vec![w1, w2]);

    rig.manager.click(w1);
    rig.cc("A", 5, 0);
    assert_eq!(rig.manager.table().widgets_on(3).collect::<Vec<_>>(), vec![w2]);
    assert_eq!(rig.manager.table().widgets_on(5).collect::<Vec<_>>(), vec![w1]);
}

#[test]
fn test_scenario_c_learn_keeps_selection_and_persists() {
    let mut rig = rig();
    let (w3, s3) = register(&rig.registry, Slider::new().with_id("w3"));

    rig.manager.toggle_mode();
    rig.manager.click(w3);
    rig.cc("A", 7, 10);

    assert_eq!(rig.manager.table().channel_of(w3), Some(7));
    assert_eq!(rig.manager.selection(), Some(w3));
    assert_eq!(s3.overlay().tag().unwrap().text, "cc 7");
    assert_eq!(s3.overlay().layer(), Some(LayerColor::Selected));

    let stored: serde_json::Value = serde_json::from_str(&rig.stored().unwrap()).unwrap();
    assert_eq!(stored, serde_json::json!({ "7": ["w3"] }));
}

#[test]
fn test_relearn_replaces_stale_tag() {
    let mut rig = rig();
    let (w, s) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 7, 0);
    rig.cc("A", 9, 0);

    let tag = s.overlay().tag().unwrap();
    assert_eq!(tag.channel, 9);
    assert_eq!(tag.text, "cc 9");
    assert_eq!(rig.manager.table().len(), 1);
}

#[test]
fn test_message_without_selection_is_ignored() {
    let mut rig = rig();
    register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.cc("A", 7, 10);
    assert!(rig.manager.table().is_empty());
    assert!(rig.stored().is_none());
}

#[test]
fn test_click_routes_only_in_assign_mode() {
    let mut rig = rig();
    let (w, _) = register(&rig.registry, Slider::new());
    assert!(!rig.manager.click(w));

    rig.manager.toggle_mode();
    // Registered after the snapshot: no click route
    let (late, _) = register(&rig.registry, Slider::new());
    assert!(!rig.manager.click(late));
    assert!(rig.manager.click(w));
}

#[test]
fn test_click_moves_selection_highlight() {
    let mut rig = rig();
    let (w1, s1) = register(&rig.registry, Slider::new());
    let (w2, s2) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w1);
    rig.manager.click(w2);
    assert_eq!(rig.manager.selection(), Some(w2));
    assert_eq!(s1.overlay().layer(), Some(LayerColor::Unbound));
    assert_eq!(s2.overlay().layer(), Some(LayerColor::Selected));
}

#[test]
fn test_mode_and_learn_events() {
    let mut rig = rig();
    let (w, _) = register(&rig.registry, Slider::new());
    rig.events();

    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 2, 0);
    rig.cc("A", 2, 0);
    rig.manager.toggle_mode();

    assert_eq!(
        rig.events(),
        vec![
            BindingEvent::ModeChanged(Mode::Assign),
            BindingEvent::SelectionChanged(Some(w)),
            BindingEvent::Bound {
                channel: 2,
                widget: w,
                previous: None,
            },
            BindingEvent::SelectionChanged(None),
            BindingEvent::ModeChanged(Mode::Run),
        ]
    );
}

#[test]
fn test_removed_selection_is_not_bound() {
    let mut rig = rig();
    let (w, _) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.registry.deregister(w);
    rig.cc("A", 1, 0);
    assert!(rig.manager.table().is_empty());
}

#[test]
fn test_entering_run_strips_widgets_registered_during_assign() {
    let store = MemoryStore::new();
    bindery::core::BindingStore::write(
        &store,
        bindery::core::config::DEFAULT_STORAGE_KEY,
        r#"{ "9": ["late"] }"#,
    )
    .unwrap();
    let mut rig = unready_rig_with(WidgetRegistry::new(), store);

    rig.manager.toggle_mode();
    let (late, slider) = register(&rig.registry, Slider::new().with_id("late"));
    rig.manager.ready().unwrap();
    assert_eq!(slider.overlay().tag().unwrap().text, "cc 9");

    assert!(rig.manager.remove_binding(9, late).unwrap());
    assert_eq!(slider.overlay().layer(), Some(LayerColor::Unbound));

    rig.manager.toggle_mode();
    assert_eq!(slider.overlay().snapshot(), Overlay::default());
}
