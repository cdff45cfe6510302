//! Hit-test and drop-target results.

use dockyard_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::item::NodeId;

/// What a drop at some point would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockKind {
    /// Dock above the target.
    Top,
    Bottom,
    Left,
    Right,
    /// Add as a tab to the target region.
    Tab,
    /// Swap places with the target region's active control.
    Exchange,
    /// The point is over a splitter bar.
    Splitter,
    /// The point is far outside the layout: detach the dragged control.
    Export,
    /// No target.
    None,
}

impl DockKind {
    /// Whether this is one of the four edge drops.
    #[must_use]
    pub const fn is_edge(self) -> bool {
        matches!(self, Self::Top | Self::Bottom | Self::Left | Self::Right)
    }

    /// Edge drops that place the new item before the target.
    #[must_use]
    pub const fn is_leading(self) -> bool {
        matches!(self, Self::Top | Self::Left)
    }

    /// Edge drops along the horizontal axis.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// A drop target: what would happen, where the preview goes, and which
/// region/control it is relative to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DockInfo {
    pub kind: DockKind,
    /// Preview rectangle.
    pub bounds: Rect,
    /// Target region, if the drop is relative to one.
    pub region: Option<NodeId>,
    /// For `Tab`: insert before this control (`None` appends). For
    /// `Exchange`: the control swapped out.
    pub control: Option<NodeId>,
}

impl DockInfo {
    /// "No target here."
    pub const NONE: Self = Self {
        kind: DockKind::None,
        bounds: Rect::new(0, 0, 0, 0),
        region: None,
        control: None,
    };

    #[must_use]
    pub const fn new(kind: DockKind, bounds: Rect) -> Self {
        Self {
            kind,
            bounds,
            region: None,
            control: None,
        }
    }

    #[must_use]
    pub const fn in_region(mut self, region: NodeId) -> Self {
        self.region = Some(region);
        self
    }

    #[must_use]
    pub const fn with_control(mut self, control: Option<NodeId>) -> Self {
        self.control = control;
        self
    }

    /// Whether dropping here changes the layout.
    #[must_use]
    pub const fn is_actionable(&self) -> bool {
        !matches!(self.kind, DockKind::None | DockKind::Splitter)
    }
}

impl Default for DockInfo {
    fn default() -> Self {
        Self::NONE
    }
}

/// The most specific object under a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// Splitter `index` of `section`.
    Splitter { section: NodeId, index: usize },
    /// A tab in a region's tab strip, or the drag bar of a lone control.
    Tab { control: NodeId },
    /// The body of the visible control.
    Control(NodeId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_helpers() {
        assert!(DockKind::Left.is_edge());
        assert!(DockKind::Left.is_leading());
        assert!(DockKind::Left.is_horizontal());
        assert!(DockKind::Bottom.is_edge());
        assert!(!DockKind::Bottom.is_leading());
        assert!(!DockKind::Bottom.is_horizontal());
        assert!(!DockKind::Tab.is_edge());
    }

    #[test]
    fn none_is_not_actionable() {
        assert!(!DockInfo::NONE.is_actionable());
        assert!(!DockInfo::new(DockKind::Splitter, Rect::new(0, 0, 5, 5)).is_actionable());
        assert!(DockInfo::new(DockKind::Export, Rect::default()).is_actionable());
        assert_eq!(DockInfo::default(), DockInfo::NONE);
    }
}
