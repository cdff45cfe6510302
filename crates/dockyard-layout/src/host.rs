//! Callbacks into the embedding application.

use dockyard_core::geometry::Rect;

use crate::control::DockControl;
use crate::tree::DockTree;

/// The window hosting a [`DockSizer`](crate::DockSizer).
pub trait DockHost {
    /// Repaint `rect`.
    fn refresh(&mut self, rect: Rect);

    /// Repaint everything.
    fn update(&mut self);

    /// Suspend (`true`) or resume (`false`) repainting while several
    /// controls move at once.
    fn set_frozen(&mut self, _frozen: bool) {}

    /// The last control was closed or docked away.
    fn dock_window_empty(&mut self) {}

    /// Controls dragged far outside the layout. The host usually gives them
    /// a window of their own; by default they are dropped.
    fn controls_exported(&mut self, _controls: Vec<DockControl>) {}
}

/// Resolves controls while a saved structure is applied.
pub trait StructureResolver {
    /// Create the control for a saved `id` that no live control matches.
    /// Returning `None` drops the saved slot.
    fn resolve_id(&mut self, id: &str) -> Option<DockControl>;

    /// Place live controls the saved structure does not mention. By default
    /// they are grouped into one new region at the root level.
    fn resolve_extras(&mut self, tree: &mut DockTree, extras: Vec<DockControl>) {
        append_extras(tree, extras);
    }
}

pub(crate) fn append_extras(tree: &mut DockTree, extras: Vec<DockControl>) {
    if let Some(region) = tree.add_region(extras) {
        let _ = tree.append_region(region);
    }
}

/// A host that ignores every callback.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl DockHost for NullHost {
    fn refresh(&mut self, _rect: Rect) {}

    fn update(&mut self) {}
}
