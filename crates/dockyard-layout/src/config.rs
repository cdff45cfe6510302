//! Tunable metrics and colors for the docking engine.

use dockyard_core::geometry::Size;
use dockyard_core::surface::Rgba;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DockConfig
// ---------------------------------------------------------------------------

/// Geometry and interaction parameters.
///
/// Every field has a default, so a partial JSON object deserializes cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockConfig {
    /// Thickness of the splitter bar between section children (default: 5).
    pub splitter_thickness: i32,
    /// Extra pixels on each side of a splitter that still count as a hit
    /// (default: 2).
    pub splitter_hot_zone: i32,
    /// Gap between children of a section packed in fixed mode (default: 0).
    pub fixed_padding: i32,
    /// How far outside the root a drop must land before the dragged control
    /// is exported instead of docked (default: 20).
    pub export_distance: i32,
    /// Pointer travel before an armed drag becomes a real drag (default: 3).
    pub drag_threshold: i32,
    /// Height of the tab strip drawn above tabbed regions; 0 disables it
    /// (default: 20).
    pub tab_height: i32,
    /// Thickness of the drag bar of a lone `Horizontal` or `Vertical`
    /// control (default: 8).
    pub drag_bar_size: i32,
    /// Width of the insertion marker shown for tab drops (default: 16).
    pub drop_tab_width: i32,
    /// Maximum tabs a region accepts from drops; 0 means unlimited
    /// (default: 0).
    pub max_tabs: usize,
    /// Minimum reported for an empty layout (default: 20 x 20).
    pub empty_minimum: Size,
    /// Whether splitter drags resize live by default (default: true).
    ///
    /// A ghost drag only moves the bar outline and applies on release.
    pub live_resize: bool,
    /// Whether a click at the start of a splitter collapses one neighbour
    /// or reopens it (default: true).
    pub splitter_open_close: bool,
    /// Length of that click area along the bar (default: 12).
    pub splitter_button: i32,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            splitter_thickness: 5,
            splitter_hot_zone: 2,
            fixed_padding: 0,
            export_distance: 20,
            drag_threshold: 3,
            tab_height: 20,
            drag_bar_size: 8,
            drop_tab_width: 16,
            max_tabs: 0,
            empty_minimum: Size::new(20, 20),
            live_resize: true,
            splitter_open_close: true,
            splitter_button: 12,
        }
    }
}

impl DockConfig {
    #[must_use]
    pub fn with_splitter_thickness(mut self, px: i32) -> Self {
        self.splitter_thickness = px.max(0);
        self
    }

    #[must_use]
    pub fn with_splitter_hot_zone(mut self, px: i32) -> Self {
        self.splitter_hot_zone = px.max(0);
        self
    }

    #[must_use]
    pub fn with_fixed_padding(mut self, px: i32) -> Self {
        self.fixed_padding = px.max(0);
        self
    }

    #[must_use]
    pub fn with_export_distance(mut self, px: i32) -> Self {
        self.export_distance = px;
        self
    }

    #[must_use]
    pub fn with_drag_threshold(mut self, px: i32) -> Self {
        self.drag_threshold = px.max(0);
        self
    }

    /// Tab strip height; 0 hides the strip.
    #[must_use]
    pub fn with_tab_height(mut self, px: i32) -> Self {
        self.tab_height = px.max(0);
        self
    }

    #[must_use]
    pub fn with_drag_bar_size(mut self, px: i32) -> Self {
        self.drag_bar_size = px.max(0);
        self
    }

    #[must_use]
    pub fn with_max_tabs(mut self, max: usize) -> Self {
        self.max_tabs = max;
        self
    }

    #[must_use]
    pub fn with_empty_minimum(mut self, size: Size) -> Self {
        self.empty_minimum = size.non_negative();
        self
    }

    /// Make ghost drags the default for splitters.
    #[must_use]
    pub fn ghost_resize(mut self) -> Self {
        self.live_resize = false;
        self
    }

    /// Set the splitter open/close click area; 0 turns it off.
    #[must_use]
    pub fn with_splitter_button(mut self, px: i32) -> Self {
        self.splitter_button = px.max(0);
        self.splitter_open_close = px > 0;
        self
    }

    pub(crate) const fn splitter_button_len(&self) -> i32 {
        if self.splitter_open_close {
            self.splitter_button
        } else {
            0
        }
    }

    pub(crate) fn accepts_tabs(&self, current: usize) -> bool {
        self.max_tabs == 0 || current < self.max_tabs
    }
}

// ---------------------------------------------------------------------------
// DockTheme
// ---------------------------------------------------------------------------

/// Colors used by [`DockSizer::draw`](crate::DockSizer::draw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DockTheme {
    pub splitter: Rgba,
    /// Ghost bar drawn while a non-live splitter drag is in progress.
    pub splitter_drag: Rgba,
    pub tab_active: Rgba,
    pub tab_inactive: Rgba,
    pub tab_text: Rgba,
    /// Fill and outline of the drop preview for edge and exchange drops.
    pub drop_fill: Rgba,
    pub drop_border: Rgba,
    /// Fill and outline of the drop preview for tab insertions.
    pub tab_drop_fill: Rgba,
    pub tab_drop_border: Rgba,
    pub drop_border_width: i32,
}

impl Default for DockTheme {
    fn default() -> Self {
        Self {
            splitter: Rgba::rgb(212, 208, 200),
            splitter_drag: Rgba::rgb(96, 96, 96),
            tab_active: Rgba::rgb(255, 255, 255),
            tab_inactive: Rgba::rgb(228, 228, 228),
            tab_text: Rgba::rgb(0, 0, 0),
            drop_fill: Rgba::rgba(163, 188, 239, 64),
            drop_border: Rgba::rgba(80, 129, 229, 224),
            tab_drop_fill: Rgba::rgba(153, 255, 165, 160),
            tab_drop_border: Rgba::rgba(103, 213, 115, 192),
            drop_border_width: 5,
        }
    }
}

impl DockTheme {
    #[must_use]
    pub fn with_splitter(mut self, color: Rgba) -> Self {
        self.splitter = color;
        self
    }

    #[must_use]
    pub fn with_splitter_drag(mut self, color: Rgba) -> Self {
        self.splitter_drag = color;
        self
    }

    #[must_use]
    pub fn with_tabs(mut self, active: Rgba, inactive: Rgba, text: Rgba) -> Self {
        self.tab_active = active;
        self.tab_inactive = inactive;
        self.tab_text = text;
        self
    }

    #[must_use]
    pub fn with_drop(mut self, fill: Rgba, border: Rgba) -> Self {
        self.drop_fill = fill;
        self.drop_border = border;
        self
    }
}
