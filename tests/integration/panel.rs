//! Bindings list: rows, removal, hover preview

use crate::helpers::*;
use bindery::prelude::*;
use bindery::{LayerColor, Overlay};

#[test]
fn test_rows_sorted_by_channel_then_identity() {
    let mut rig = rig();
    let (z, _) = register(&rig.registry, Slider::new().with_id("zeta"));
    let (a, _) = register(&rig.registry, Slider::new().with_id("alpha"));
    let (m, _) = register(&rig.registry, Bang::new().with_id("mid"));

    rig.manager.toggle_mode();
    for (widget, channel) in [(z, 5), (a, 5), (m, 2)] {
        rig.manager.click(widget);
        rig.cc("A", channel, 0);
    }

    let rows = rig.manager.bindings();
    let summary: Vec<(u8, &str, &str)> = rows
        .iter()
        .map(|r| (r.channel, r.identity.as_str(), r.label.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(2, "mid", "cc 2"), (5, "alpha", "cc 5"), (5, "zeta", "cc 5")]
    );
}

#[test]
fn test_remove_in_assign_mode_reverts_layer_and_tag() {
    let mut rig = rig();
    let (w, slider) = register(&rig.registry, Slider::new());
    let (other, _) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 3, 0);
    rig.manager.click(other);

    assert!(rig.manager.remove_binding(3, w).unwrap());
    assert_eq!(slider.overlay().layer(), Some(LayerColor::Unbound));
    assert!(slider.overlay().tag().is_none());
    assert!(rig.manager.bindings().is_empty());
    assert_eq!(rig.stored().as_deref().map(str::trim), Some("{}"));

    // Second removal changes nothing
    assert!(!rig.manager.remove_binding(3, w).unwrap());
}

#[test]
fn test_remove_selected_widget_stays_selected() {
    let mut rig = rig();
    let (w, slider) = register(&rig.registry, Slider::new());

    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 3, 0);
    rig.manager.remove_binding(3, w).unwrap();
    assert_eq!(slider.overlay().layer(), Some(LayerColor::Selected));
}

#[test]
fn test_remove_in_run_mode_clears_preview() {
    let mut rig = rig();
    let (w, slider) = register(&rig.registry, Slider::new());
    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 3, 0);
    rig.manager.toggle_mode();
    rig.events();

    rig.manager.hover_enter(w);
    assert!(rig.manager.remove_binding(3, w).unwrap());
    assert_eq!(slider.overlay().snapshot(), Overlay::default());
    assert_eq!(
        rig.events(),
        vec![BindingEvent::Unbound { channel: 3, widget: w }]
    );
}

#[test]
fn test_hover_preview_in_both_modes() {
    let mut rig = rig();
    let (w, slider) = register(&rig.registry, Slider::new());
    let (bound, bound_slider) = register(&rig.registry, Slider::new());
    rig.manager.toggle_mode();
    rig.manager.click(bound);
    rig.cc("A", 1, 0);
    rig.manager.toggle_mode();

    rig.manager.hover_enter(bound);
    assert_eq!(bound_slider.overlay().layer(), Some(LayerColor::Selected));
    rig.manager.hover_exit(bound);
    assert_eq!(bound_slider.overlay().layer(), None);

    rig.manager.toggle_mode();
    rig.manager.hover_enter(w);
    assert_eq!(slider.overlay().layer(), Some(LayerColor::Selected));
    rig.manager.hover_exit(w);
    assert_eq!(slider.overlay().layer(), Some(LayerColor::Unbound));

    rig.manager.hover_enter(bound);
    rig.manager.hover_exit(bound);
    assert_eq!(bound_slider.overlay().layer(), Some(LayerColor::Bound));
    assert!(rig.manager.table().has_bindings(bound));
}

#[test]
fn test_rows_skip_removed_widgets() {
    let mut rig = rig();
    let (w, _) = register(&rig.registry, Slider::new());
    rig.manager.toggle_mode();
    rig.manager.click(w);
    rig.cc("A", 3, 0);

    rig.registry.deregister(w);
    assert!(rig.manager.bindings().is_empty());
    assert_eq!(rig.manager.export_bindings().unwrap().trim(), "{}");
}
