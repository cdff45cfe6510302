//! Node identifiers, node records, and the small enums shared by every kind
//! of dock item.

use std::fmt;

use dockyard_core::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

use crate::control::DockControl;
use crate::region::DockRegion;
use crate::section::DockSection;

/// Stable identifier for a node in a [`DockTree`](crate::DockTree).
///
/// Ids are allocated by the owning tree and never reused within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub(crate) const FIRST: Self = Self(1);

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    pub(crate) const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Layout style of a control.
///
/// A lone `Tab` control still shows a one-tab strip. A lone `Horizontal`
/// control gets a drag bar across its top and a lone `Vertical` one a bar
/// down its left side. A `Fixed` control gets no bar and its tab cannot be
/// dragged. Packing at natural size follows from a control not being
/// resizable, not from its style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DockStyle {
    #[default]
    Tab,
    Horizontal,
    Vertical,
    Fixed,
}

/// Orientation of a splitter bar.
///
/// A `Vertical` bar separates the children of a row section; a `Horizontal`
/// bar separates the children of a column section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitterStyle {
    Horizontal,
    Vertical,
}

impl SplitterStyle {
    /// Splitter style used between the children of a section.
    #[must_use]
    pub const fn for_section(is_row: bool) -> Self {
        if is_row {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Coarse classification of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockNodeKindTag {
    Control,
    Region,
    Section,
}

/// Payload of a node.
#[derive(Debug)]
pub enum DockNodeKind {
    Control(DockControl),
    Region(DockRegion),
    Section(DockSection),
}

impl DockNodeKind {
    #[must_use]
    pub const fn tag(&self) -> DockNodeKindTag {
        match self {
            Self::Control(_) => DockNodeKindTag::Control,
            Self::Region(_) => DockNodeKindTag::Region,
            Self::Section(_) => DockNodeKindTag::Section,
        }
    }
}

/// A node in the dock arena.
///
/// `width_hint`/`height_hint` are the last sizes assigned by layout (or
/// restored from a saved structure); `-1` means "not yet measured". They are
/// the weights the proportional section layout distributes space by.
#[derive(Debug)]
pub struct DockNode {
    pub(crate) id: NodeId,
    pub(crate) parent: Option<NodeId>,
    pub(crate) bounds: Rect,
    pub(crate) width_hint: i32,
    pub(crate) height_hint: i32,
    pub(crate) shown: bool,
    pub(crate) kind: DockNodeKind,
}

impl DockNode {
    pub(crate) fn new(id: NodeId, kind: DockNodeKind) -> Self {
        Self {
            id,
            parent: None,
            bounds: Rect::default(),
            width_hint: -1,
            height_hint: -1,
            shown: true,
            kind,
        }
    }

    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Rectangle assigned by the most recent layout pass.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub const fn size_hint(&self) -> Size {
        Size::new(self.width_hint, self.height_hint)
    }

    /// Whether the last visibility pass showed this node.
    #[must_use]
    pub const fn is_shown(&self) -> bool {
        self.shown
    }

    #[must_use]
    pub const fn kind(&self) -> &DockNodeKind {
        &self.kind
    }

    #[must_use]
    pub const fn tag(&self) -> DockNodeKindTag {
        self.kind.tag()
    }

    #[must_use]
    pub fn as_control(&self) -> Option<&DockControl> {
        match &self.kind {
            DockNodeKind::Control(control) => Some(control),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_region(&self) -> Option<&DockRegion> {
        match &self.kind {
            DockNodeKind::Region(region) => Some(region),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_section(&self) -> Option<&DockSection> {
        match &self.kind {
            DockNodeKind::Section(section) => Some(section),
            _ => None,
        }
    }

    pub(crate) fn set_hint(&mut self, size: Size) {
        self.width_hint = size.width;
        self.height_hint = size.height;
    }

    pub(crate) fn has_hint(&self) -> bool {
        self.width_hint >= 0
    }

    /// Children of a container node, in order. Empty for controls.
    pub(crate) fn children(&self) -> &[NodeId] {
        match &self.kind {
            DockNodeKind::Control(_) => &[],
            DockNodeKind::Region(region) => &region.contents,
            DockNodeKind::Section(section) => &section.contents,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match &mut self.kind {
            DockNodeKind::Control(_) => None,
            DockNodeKind::Region(region) => Some(&mut region.contents),
            DockNodeKind::Section(section) => Some(&mut section.contents),
        }
    }
}
