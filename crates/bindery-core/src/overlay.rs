//! Overlay projection.
//!
//! Draws the highlight layer and channel tag into each widget's
//! [`OverlaySlot`](crate::widget::OverlaySlot). Nothing here is authoritative:
//! every call derives what to draw from the mode, the selection and the
//! binding table it is handed.

use std::fmt;

use crate::config::Palette;
use crate::registry::{WidgetId, WidgetRegistry};
use crate::table::{BindingTable, Channel};
use crate::widget::Widget;

/// Operating mode of the binding manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Incoming messages are routed to bound widgets.
    #[default]
    Run,
    /// Clicking selects a widget; the next message binds it.
    Assign,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Run => write!(f, "run"),
            Mode::Assign => write!(f, "assign"),
        }
    }
}

/// Which palette colour a highlight layer uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerColor {
    Unbound,
    Bound,
    Selected,
}

/// Small text label showing the channel a widget is bound to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelTag {
    pub channel: Channel,
    pub text: String,
}

#[derive(Debug, Clone)]
pub struct OverlayController {
    palette: Palette,
    tag_prefix: String,
}

impl OverlayController {
    pub fn new(palette: Palette, tag_prefix: impl Into<String>) -> Self {
        Self {
            palette,
            tag_prefix: tag_prefix.into(),
        }
    }

    /// CSS-style colour string for a layer.
    pub fn color(&self, layer: LayerColor) -> &str {
        match layer {
            LayerColor::Unbound => &self.palette.unbound,
            LayerColor::Bound => &self.palette.bound,
            LayerColor::Selected => &self.palette.selected,
        }
    }

    pub fn opacity(&self) -> f32 {
        self.palette.opacity
    }

    pub fn tag(&self, channel: Channel) -> ChannelTag {
        ChannelTag {
            channel,
            text: format!("{} {}", self.tag_prefix, channel),
        }
    }

    /// Assign-mode colour: selected, then bound, then unbound.
    pub fn layer_for(
        &self,
        widget: WidgetId,
        table: &BindingTable,
        selection: Option<WidgetId>,
    ) -> LayerColor {
        if selection == Some(widget) {
            LayerColor::Selected
        } else if table.has_bindings(widget) {
            LayerColor::Bound
        } else {
            LayerColor::Unbound
        }
    }

    /// Base overlay on every eligible widget plus a tag on every bound one.
    pub fn draw_assign(
        &self,
        registry: &WidgetRegistry,
        eligible: &[WidgetId],
        table: &BindingTable,
        selection: Option<WidgetId>,
    ) {
        for &id in eligible {
            if let Some(widget) = registry.get(id) {
                widget
                    .overlay()
                    .set_layer(Some(self.layer_for(id, table, selection)));
            }
        }
        for (channel, widgets) in table.iter() {
            for &id in widgets {
                self.set_tag(registry, id, channel);
            }
        }
    }

    /// Remove every layer and tag from every live widget, including ones
    /// registered after assign mode was entered.
    pub fn strip(&self, registry: &WidgetRegistry) {
        for id in registry.ids() {
            if let Some(widget) = registry.get(id) {
                widget.overlay().clear();
            }
        }
    }

    /// Recompute one widget's assign-mode layer.
    pub fn refresh_layer(
        &self,
        registry: &WidgetRegistry,
        widget: WidgetId,
        table: &BindingTable,
        selection: Option<WidgetId>,
    ) {
        if let Some(w) = registry.get(widget) {
            w.overlay()
                .set_layer(Some(self.layer_for(widget, table, selection)));
        }
    }

    /// Attach the tag for `channel`, returning the tag it replaced.
    pub fn set_tag(
        &self,
        registry: &WidgetRegistry,
        widget: WidgetId,
        channel: Channel,
    ) -> Option<ChannelTag> {
        let w = registry.get(widget)?;
        let stale = w.overlay().replace_tag(Some(self.tag(channel)));
        if let Some(ref old) = stale {
            if old.channel != channel {
                tracing::trace!(
                    "Replaced stale tag for channel {} on widget {}",
                    old.channel,
                    widget
                );
            }
        }
        stale
    }

    pub fn remove_tag(&self, registry: &WidgetRegistry, widget: WidgetId) -> Option<ChannelTag> {
        registry
            .get(widget)
            .and_then(|w| w.overlay().replace_tag(None))
    }

    /// Preview a widget from the bindings list.
    pub fn hover_enter(&self, registry: &WidgetRegistry, widget: WidgetId) {
        if let Some(w) = registry.get(widget) {
            w.overlay().set_layer(Some(LayerColor::Selected));
        }
    }

    /// Undo [`hover_enter`](Self::hover_enter) exactly.
    ///
    /// In assign mode the layer goes back to its projected colour; in run mode
    /// the temporary preview layer is removed.
    pub fn hover_exit(
        &self,
        registry: &WidgetRegistry,
        mode: Mode,
        widget: WidgetId,
        table: &BindingTable,
        selection: Option<WidgetId>,
    ) {
        let Some(w) = registry.get(widget) else {
            return;
        };
        match mode {
            Mode::Assign => w
                .overlay()
                .set_layer(Some(self.layer_for(widget, table, selection))),
            Mode::Run => w.overlay().set_layer(None),
        }
    }

    /// Update a widget whose binding was just removed.
    pub fn binding_removed(
        &self,
        registry: &WidgetRegistry,
        mode: Mode,
        widget: WidgetId,
        table: &BindingTable,
        selection: Option<WidgetId>,
    ) {
        match mode {
            Mode::Assign => {
                self.refresh_layer(registry, widget, table, selection);
                self.remove_tag(registry, widget);
            }
            Mode::Run => {
                if let Some(w) = registry.get(widget) {
                    w.overlay().clear();
                }
            }
        }
    }
}

impl Default for OverlayController {
    fn default() -> Self {
        Self::new(Palette::default(), "cc")
    }
}
