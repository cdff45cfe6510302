//! The dock tree arena.
//!
//! Nodes live in a `BTreeMap` keyed by [`NodeId`]; containers hold child ids
//! and every node keeps its parent id. Ids are never reused, so a stale id
//! simply fails lookup.
//!
//! Structural invariants maintained by every mutation:
//!
//! 1. A region holds only controls and is never empty.
//! 2. A section holds only regions and sections and never fewer than two of
//!    them. A section left with one child is replaced by that child; a child
//!    section of the same orientation is spliced into the grandparent.
//! 3. Parent links agree with child lists, and every node is reachable from
//!    the root.

use std::collections::BTreeMap;

use dockyard_core::geometry::{Rect, Size};

use crate::config::DockConfig;
use crate::control::DockControl;
use crate::error::DockError;
use crate::info::{DockInfo, HitTarget};
use crate::item::{DockNode, DockNodeKind, DockNodeKindTag, NodeId};
use crate::region::DockRegion;
use crate::section::{DockSection, forced_dock_info};

/// Arena-backed tree of sections, regions and controls.
#[derive(Debug)]
pub struct DockTree {
    config: DockConfig,
    root: Option<NodeId>,
    next_id: NodeId,
    pub(crate) nodes: BTreeMap<NodeId, DockNode>,
    modified: bool,
    emptied: bool,
}

impl Default for DockTree {
    fn default() -> Self {
        Self::new(DockConfig::default())
    }
}

impl DockTree {
    #[must_use]
    pub fn new(config: DockConfig) -> Self {
        Self {
            config,
            root: None,
            next_id: NodeId::FIRST,
            nodes: BTreeMap::new(),
            modified: false,
            emptied: false,
        }
    }

    #[must_use]
    pub fn config(&self) -> &DockConfig {
        &self.config
    }

    pub(crate) fn set_config(&mut self, config: DockConfig) {
        self.config = config;
        self.modified = true;
    }

    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&DockNode> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &DockNode> {
        self.nodes.values()
    }

    #[must_use]
    pub fn control(&self, id: NodeId) -> Option<&DockControl> {
        self.nodes.get(&id).and_then(DockNode::as_control)
    }

    pub fn control_mut(&mut self, id: NodeId) -> Option<&mut DockControl> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(DockNodeKind::Control(control)) => Some(control),
            _ => None,
        }
    }

    /// Whether the tree changed since the last layout pass.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_modified(&mut self) {
        self.modified = true;
    }

    pub(crate) fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Returns and clears the "root was emptied" flag.
    pub(crate) fn take_emptied(&mut self) -> bool {
        std::mem::take(&mut self.emptied)
    }

    // -----------------------------------------------------------------------
    // Lookup helpers
    // -----------------------------------------------------------------------

    pub(crate) fn require(&self, id: NodeId) -> Result<&DockNode, DockError> {
        self.nodes
            .get(&id)
            .ok_or(DockError::UnknownNode { node_id: id })
    }

    pub(crate) fn require_mut(&mut self, id: NodeId) -> Result<&mut DockNode, DockError> {
        self.nodes
            .get_mut(&id)
            .ok_or(DockError::UnknownNode { node_id: id })
    }

    pub(crate) fn require_control(&self, id: NodeId) -> Result<&DockControl, DockError> {
        self.require(id)?
            .as_control()
            .ok_or(DockError::NotAControl { node_id: id })
    }

    pub(crate) fn require_region(&self, id: NodeId) -> Result<&DockRegion, DockError> {
        self.require(id)?
            .as_region()
            .ok_or(DockError::NotARegion { node_id: id })
    }

    pub(crate) fn require_section(&self, id: NodeId) -> Result<&DockSection, DockError> {
        self.require(id)?
            .as_section()
            .ok_or(DockError::NotASection { node_id: id })
    }

    pub(crate) fn tag(&self, id: NodeId) -> Option<DockNodeKindTag> {
        self.nodes.get(&id).map(DockNode::tag)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    pub(crate) fn bounds_of(&self, id: NodeId) -> Rect {
        self.nodes.get(&id).map(|node| node.bounds).unwrap_or_default()
    }

    pub(crate) fn children_of(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| node.children().to_vec())
            .unwrap_or_default()
    }

    /// Position of `id` inside its parent's child list.
    pub(crate) fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent_of(id)?;
        let index = self
            .nodes
            .get(&parent)?
            .children()
            .iter()
            .position(|child| *child == id)?;
        Some((parent, index))
    }

    /// Region containing the control `id`.
    pub fn region_of(&self, id: NodeId) -> Result<NodeId, DockError> {
        self.require_control(id)?;
        self.parent_of(id).ok_or(DockError::UnknownNode { node_id: id })
    }

    /// Controls in traversal order (depth first, tab order within regions).
    #[must_use]
    pub fn controls(&self, visible_only: bool) -> Vec<NodeId> {
        match self.root {
            Some(root) => self.subtree_controls(root, visible_only),
            None => Vec::new(),
        }
    }

    /// Controls below `id` in traversal order.
    #[must_use]
    pub fn subtree_controls(&self, id: NodeId, visible_only: bool) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_controls(id, visible_only, &mut out);
        out
    }

    fn collect_controls(&self, id: NodeId, visible_only: bool, out: &mut Vec<NodeId>) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        match &node.kind {
            DockNodeKind::Control(control) => {
                if !visible_only || control.visible {
                    out.push(id);
                }
            }
            _ => {
                for child in node.children() {
                    self.collect_controls(*child, visible_only, out);
                }
            }
        }
    }

    /// First control (traversal order) with the given persistent id.
    #[must_use]
    pub fn find_control(&self, id: &str) -> Option<NodeId> {
        self.controls(false)
            .into_iter()
            .find(|node| self.control(*node).is_some_and(|control| control.id == id))
    }

    /// A control is visible when its flag is set; a container is visible when
    /// any child is.
    #[must_use]
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        match &node.kind {
            DockNodeKind::Control(control) => control.visible,
            _ => node.children().iter().any(|child| self.is_visible(*child)),
        }
    }

    pub(crate) fn visible_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of(id)
            .into_iter()
            .filter(|child| self.is_visible(*child))
            .collect()
    }

    /// A region is resizable when any visible control is; a section when
    /// every visible child is.
    #[must_use]
    pub fn is_resizable(&self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        match &node.kind {
            DockNodeKind::Control(control) => control.resizable,
            DockNodeKind::Region(region) => region.contents.iter().any(|child| {
                self.control(*child)
                    .is_some_and(|control| control.visible && control.resizable)
            }),
            DockNodeKind::Section(section) => section
                .contents
                .iter()
                .filter(|child| self.is_visible(**child))
                .all(|child| self.is_resizable(*child)),
        }
    }

    /// Whether every control below `id` is locked (false when there are no
    /// controls).
    #[must_use]
    pub fn is_locked(&self, id: NodeId) -> bool {
        let controls = self.subtree_controls(id, false);
        !controls.is_empty()
            && controls
                .iter()
                .all(|control| self.control(*control).is_some_and(|c| c.locked))
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    fn alloc(&mut self, kind: DockNodeKind) -> NodeId {
        let id = self.next_id;
        self.next_id = id.next();
        let _ = self.nodes.insert(id, DockNode::new(id, kind));
        self.modified = true;
        id
    }

    /// Add a detached control node. It must be placed in a region before the
    /// tree is laid out.
    pub(crate) fn alloc_control(&mut self, control: DockControl) -> NodeId {
        let hint = control.size_hint;
        let id = self.alloc(DockNodeKind::Control(control));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_hint(hint);
        }
        id
    }

    /// Create a detached region holding `controls` (first one active).
    ///
    /// Returns `None` for an empty list.
    pub fn add_region(&mut self, controls: Vec<DockControl>) -> Option<NodeId> {
        if controls.is_empty() {
            return None;
        }
        let ids: Vec<NodeId> = controls
            .into_iter()
            .map(|control| self.alloc_control(control))
            .collect();
        Some(self.region_from_nodes(ids))
    }

    pub(crate) fn region_from_nodes(&mut self, controls: Vec<NodeId>) -> NodeId {
        let region = self.alloc(DockNodeKind::Region(DockRegion::new(controls.clone())));
        for control in controls {
            self.set_parent(control, Some(region));
        }
        self.update_active(region, 0);
        region
    }

    /// Create a detached section over detached `children` (regions or
    /// sections). Same-orientation child sections are spliced in.
    pub fn add_section(&mut self, is_row: bool, children: Vec<NodeId>) -> Result<NodeId, DockError> {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            let node = self.require(child)?;
            if node.parent.is_some() || self.root == Some(child) {
                return Err(DockError::InvalidContentSpec {
                    reason: "section child is already attached",
                });
            }
            let spliced = match &node.kind {
                DockNodeKind::Control(_) => {
                    return Err(DockError::InvalidContentSpec {
                        reason: "controls must be wrapped in a region",
                    });
                }
                DockNodeKind::Section(inner) if inner.is_row == is_row => {
                    Some(inner.contents.clone())
                }
                _ => None,
            };
            match spliced {
                Some(grandchildren) => {
                    flat.extend(grandchildren);
                    let _ = self.nodes.remove(&child);
                }
                None => flat.push(child),
            }
        }
        let section = self.alloc(DockNodeKind::Section(DockSection::new(is_row, flat.clone())));
        for child in flat {
            self.set_parent(child, Some(section));
        }
        Ok(section)
    }

    /// Make the detached region or section `id` the root. Any previous root
    /// subtree is dropped.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), DockError> {
        let node = self.require(id)?;
        if node.tag() == DockNodeKindTag::Control {
            return Err(DockError::InvalidContentSpec {
                reason: "the root must be a region or section",
            });
        }
        if node.parent.is_some() {
            return Err(DockError::InvalidContentSpec {
                reason: "the root cannot have a parent",
            });
        }
        if let Some(old) = self.root.filter(|old| *old != id) {
            self.delete_subtree(old);
        }
        self.root = Some(id);
        self.normalize(id);
        self.modified = true;
        Ok(())
    }

    /// Place a detached region at the root level: as the root of an empty
    /// tree, appended to a root row, or beside any other root in a new row.
    pub fn append_region(&mut self, region: NodeId) -> Result<(), DockError> {
        self.require_region(region)?;
        let Some(root) = self.root else {
            self.root = Some(region);
            self.modified = true;
            return Ok(());
        };
        let row_root = self
            .node(root)
            .and_then(DockNode::as_section)
            .is_some_and(|section| section.is_row);
        let target = if row_root { root } else { self.wrap_root(true)? };
        let end = self.children_of(target).len();
        self.insert_child(target, end, region)
    }

    /// Replace the root with a new section of orientation `is_row` holding it
    /// (a transient single-child section; callers add a sibling next).
    pub(crate) fn wrap_root(&mut self, is_row: bool) -> Result<NodeId, DockError> {
        let root = self.root.ok_or(DockError::EmptyTree)?;
        let hint = self.require(root)?.size_hint();
        let bounds = self.bounds_of(root);
        let section = self.alloc(DockNodeKind::Section(DockSection::new(is_row, vec![root])));
        self.set_parent(root, Some(section));
        if let Some(node) = self.nodes.get_mut(&section) {
            node.set_hint(hint);
            node.bounds = bounds;
        }
        self.root = Some(section);
        Ok(section)
    }

    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = parent;
        }
    }

    /// Insert the detached node `child` into `parent` at `index`.
    pub(crate) fn insert_child(
        &mut self,
        parent: NodeId,
        index: usize,
        child: NodeId,
    ) -> Result<(), DockError> {
        self.require(child)?;
        let list = self
            .require_mut(parent)?
            .children_mut()
            .ok_or(DockError::NotASection { node_id: parent })?;
        let index = index.min(list.len());
        list.insert(index, child);
        self.set_parent(child, Some(parent));
        self.modified = true;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Removal
    // -----------------------------------------------------------------------

    /// Unlink `id` from its parent without pruning the parent. The node stays
    /// in the arena. Returns the former parent.
    pub(crate) fn detach(&mut self, id: NodeId) -> Result<Option<NodeId>, DockError> {
        let parent = self.require(id)?.parent;
        match parent {
            None => {
                if self.root == Some(id) {
                    self.root = None;
                }
            }
            Some(parent) => {
                let node = self.require_mut(parent)?;
                let index = node
                    .children()
                    .iter()
                    .position(|child| *child == id)
                    .ok_or(DockError::NotAChild { parent, child: id })?;
                let mut refresh_from = None;
                match &mut node.kind {
                    DockNodeKind::Region(region) => {
                        let _ = region.contents.remove(index);
                        region.removed_at(index);
                        refresh_from = Some(region.active.unwrap_or(0));
                    }
                    DockNodeKind::Section(section) => {
                        let _ = section.contents.remove(index);
                    }
                    DockNodeKind::Control(_) => {}
                }
                if let Some(start) = refresh_from {
                    self.update_active(parent, start);
                }
            }
        }
        self.set_parent(id, None);
        self.modified = true;
        Ok(parent)
    }

    /// Restore the structural invariants of `id` after one of its children
    /// was removed.
    pub(crate) fn prune(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let remaining = node.children().len();
        match node.tag() {
            DockNodeKindTag::Control => {}
            DockNodeKindTag::Region => {
                if remaining == 0 {
                    self.discard_container(id);
                }
            }
            DockNodeKindTag::Section => match remaining {
                0 => self.discard_container(id),
                1 => self.promote_only_child(id),
                _ => {}
            },
        }
    }

    fn discard_container(&mut self, id: NodeId) {
        let parent = self.parent_of(id);
        match parent {
            Some(parent) => {
                if let Some(list) = self.nodes.get_mut(&parent).and_then(DockNode::children_mut) {
                    list.retain(|child| *child != id);
                }
            }
            None => {
                if self.root == Some(id) {
                    self.root = None;
                    self.emptied = true;
                }
            }
        }
        let _ = self.nodes.remove(&id);
        self.modified = true;
        if let Some(parent) = parent {
            self.prune(parent);
        }
    }

    /// Replace the single-child section `id` by its child.
    fn promote_only_child(&mut self, id: NodeId) {
        let Some(section) = self.nodes.remove(&id) else {
            return;
        };
        let Some(&child) = section.children().first() else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&child) {
            if section.has_hint() {
                node.set_hint(section.size_hint());
            }
        }
        self.modified = true;

        let Some(parent) = section.parent else {
            if self.root == Some(id) {
                self.root = Some(child);
            }
            self.set_parent(child, None);
            return;
        };

        let parent_row = self.node(parent).and_then(DockNode::as_section).map(|s| s.is_row);
        let child_row = self.node(child).and_then(DockNode::as_section).map(|s| s.is_row);
        let splice = parent_row.is_some() && parent_row == child_row;
        let grandchildren = if splice {
            self.nodes
                .remove(&child)
                .map(|node| node.children().to_vec())
                .unwrap_or_default()
        } else {
            vec![child]
        };
        if let Some(list) = self.nodes.get_mut(&parent).and_then(DockNode::children_mut) {
            if let Some(index) = list.iter().position(|entry| *entry == id) {
                let _ = list.splice(index..=index, grandchildren.iter().copied());
            }
        }
        for node in grandchildren {
            self.set_parent(node, Some(parent));
        }
    }

    /// Collapse degenerate sections below `id` (used after bulk builds).
    pub(crate) fn normalize(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            self.normalize(child);
        }
        if self.nodes.contains_key(&id) {
            self.prune(id);
        }
    }

    /// Remove a control from the tree and the arena, pruning its region and
    /// collapsing sections as needed.
    pub fn remove_control(&mut self, id: NodeId) -> Result<DockControl, DockError> {
        self.require_control(id)?;
        let parent = self.detach(id)?;
        let control = self.take_control(id).ok_or(DockError::NotAControl { node_id: id })?;
        if let Some(parent) = parent {
            self.prune(parent);
        }
        Ok(control)
    }

    /// Take a detached control node out of the arena, carrying its hint.
    pub(crate) fn take_control(&mut self, id: NodeId) -> Option<DockControl> {
        if self.tag(id) != Some(DockNodeKindTag::Control) {
            return None;
        }
        let node = self.nodes.remove(&id)?;
        let hint = node.size_hint();
        match node.kind {
            DockNodeKind::Control(mut control) => {
                control.size_hint = hint;
                Some(control)
            }
            _ => None,
        }
    }

    /// Drop `id` and everything below it from the arena.
    pub(crate) fn delete_subtree(&mut self, id: NodeId) {
        for child in self.children_of(id) {
            self.delete_subtree(child);
        }
        let _ = self.nodes.remove(&id);
        if self.root == Some(id) {
            self.root = None;
        }
        self.modified = true;
    }

    /// Remove every node, returning the controls in traversal order.
    pub(crate) fn drain_controls(&mut self) -> Vec<DockControl> {
        let order = self.controls(false);
        let mut out = Vec::with_capacity(order.len());
        for id in order {
            if let Some(control) = self.take_control(id) {
                out.push(control);
            }
        }
        self.nodes.clear();
        self.root = None;
        self.modified = true;
        out
    }

    // -----------------------------------------------------------------------
    // Layout dispatch
    // -----------------------------------------------------------------------

    /// Minimum size of `id`. Initialises unset hints; with `use_size`, known
    /// hints of controls stand in for their natural size.
    pub fn calc_min(&mut self, id: NodeId, use_size: bool) -> Size {
        match self.tag(id) {
            Some(DockNodeKindTag::Control) => self.control_calc_min(id, use_size),
            Some(DockNodeKindTag::Region) => self.region_calc_min(id, use_size),
            Some(DockNodeKindTag::Section) => self.section_calc_min(id, use_size),
            None => Size::ZERO,
        }
    }

    /// Lay out `id` inside `rect`.
    pub fn recalc_sizes(&mut self, id: NodeId, rect: Rect) {
        match self.tag(id) {
            Some(DockNodeKindTag::Control) => self.control_recalc(id, rect),
            Some(DockNodeKindTag::Region) => self.region_recalc(id, rect),
            Some(DockNodeKindTag::Section) => self.section_recalc(id, rect),
            None => {}
        }
    }

    /// Show or hide `id` and propagate to its children.
    pub fn set_visibility(&mut self, id: NodeId, visible: bool) {
        match self.tag(id) {
            Some(DockNodeKindTag::Control) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.shown = visible;
                    if let DockNodeKind::Control(control) = &mut node.kind {
                        control.show(visible);
                    }
                }
            }
            Some(DockNodeKindTag::Region) => self.region_set_visibility(id, visible),
            Some(DockNodeKindTag::Section) => {
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.shown = visible;
                }
                for child in self.children_of(id) {
                    let child_visible = visible && self.is_visible(child);
                    self.set_visibility(child, child_visible);
                }
            }
            None => {}
        }
    }

    fn control_calc_min(&mut self, id: NodeId, use_size: bool) -> Size {
        let Some(node) = self.nodes.get_mut(&id) else {
            return Size::ZERO;
        };
        let hint = node.size_hint();
        let natural = match &node.kind {
            DockNodeKind::Control(control) => control.natural_size(hint),
            _ => return Size::ZERO,
        };
        if !node.has_hint() {
            node.set_hint(natural);
            return natural;
        }
        if use_size { hint.non_negative() } else { natural }
    }

    fn control_recalc(&mut self, id: NodeId, rect: Rect) {
        let rect = Rect::new(rect.x, rect.y, rect.width.max(0), rect.height.max(0));
        if let Some(node) = self.nodes.get_mut(&id) {
            node.set_hint(rect.size());
            node.bounds = rect;
            if let DockNodeKind::Control(control) = &mut node.kind {
                control.place(rect);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Hit testing
    // -----------------------------------------------------------------------

    /// Most specific object at (`x`, `y`): splitters win over children.
    #[must_use]
    pub fn object_at(&self, x: i32, y: i32) -> Option<HitTarget> {
        self.object_at_node(self.root?, x, y)
    }

    pub(crate) fn object_at_node(&self, id: NodeId, x: i32, y: i32) -> Option<HitTarget> {
        let node = self.nodes.get(&id)?;
        match &node.kind {
            DockNodeKind::Control(_) => {
                (node.shown && node.bounds.contains(x, y)).then_some(HitTarget::Control(id))
            }
            DockNodeKind::Region(_) => self.region_object_at(id, x, y),
            DockNodeKind::Section(_) => self.section_object_at(id, x, y),
        }
    }

    /// Drop target at (`x`, `y`) for a dragged item.
    ///
    /// Points not claimed by any region resolve against the root edges (or
    /// to an export when far outside).
    #[must_use]
    pub fn dock_info_at(&self, x: i32, y: i32, tab_width: i32, is_control: bool) -> DockInfo {
        let Some(root) = self.root else {
            return DockInfo::NONE;
        };
        match self.tag(root) {
            Some(DockNodeKindTag::Section) => self
                .section_dock_info(root, x, y, tab_width, is_control, true)
                .unwrap_or(DockInfo::NONE),
            Some(DockNodeKindTag::Region) => self
                .region_dock_info(root, x, y, tab_width, is_control)
                .unwrap_or_else(|| {
                    forced_dock_info(self.bounds_of(root), x, y, self.config.export_distance)
                }),
            _ => DockInfo::NONE,
        }
    }

    pub(crate) fn node_dock_info(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        tab_width: i32,
        is_control: bool,
    ) -> Option<DockInfo> {
        match self.tag(id)? {
            DockNodeKindTag::Region => self.region_dock_info(id, x, y, tab_width, is_control),
            DockNodeKindTag::Section => {
                self.section_dock_info(id, x, y, tab_width, is_control, false)
            }
            DockNodeKindTag::Control => None,
        }
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Check the structural invariants listed in the module docs.
    pub fn validate(&self) -> Result<(), DockError> {
        let mut reached = 0usize;
        if let Some(root) = self.root {
            let node = self.require(root)?;
            if node.parent.is_some() {
                return Err(DockError::InvariantViolation {
                    node_id: root,
                    reason: "root has a parent",
                });
            }
            if node.tag() == DockNodeKindTag::Control {
                return Err(DockError::InvariantViolation {
                    node_id: root,
                    reason: "root is a control",
                });
            }
            self.validate_node(root, &mut reached)?;
        }
        if reached != self.nodes.len() {
            let stray = self
                .nodes
                .keys()
                .copied()
                .next()
                .ok_or(DockError::EmptyTree)?;
            return Err(DockError::InvariantViolation {
                node_id: stray,
                reason: "unreachable nodes in arena",
            });
        }
        Ok(())
    }

    fn validate_node(&self, id: NodeId, reached: &mut usize) -> Result<(), DockError> {
        let node = self.require(id)?;
        *reached += 1;
        let violation = |reason| DockError::InvariantViolation {
            node_id: id,
            reason,
        };
        match &node.kind {
            DockNodeKind::Control(_) => return Ok(()),
            DockNodeKind::Region(region) => {
                if region.contents.is_empty() {
                    return Err(violation("empty region"));
                }
                if region.active.is_some_and(|active| active >= region.contents.len()) {
                    return Err(violation("active tab out of range"));
                }
                if region
                    .contents
                    .iter()
                    .any(|child| self.tag(*child) != Some(DockNodeKindTag::Control))
                {
                    return Err(violation("region holds a non-control"));
                }
            }
            DockNodeKind::Section(section) => {
                if section.contents.len() < 2 {
                    return Err(violation("section with fewer than two children"));
                }
                if section
                    .contents
                    .iter()
                    .any(|child| self.tag(*child) == Some(DockNodeKindTag::Control))
                {
                    return Err(violation("section holds a bare control"));
                }
            }
        }
        for child in node.children() {
            if self.parent_of(*child) != Some(id) {
                return Err(DockError::InvariantViolation {
                    node_id: *child,
                    reason: "parent link mismatch",
                });
            }
            self.validate_node(*child, reached)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls(ids: &[&str]) -> Vec<DockControl> {
        ids.iter().map(|id| DockControl::new(*id)).collect()
    }

    fn region(tree: &mut DockTree, ids: &[&str]) -> NodeId {
        tree.add_region(controls(ids)).expect("non-empty region")
    }

    #[test]
    fn empty_region_is_rejected() {
        let mut tree = DockTree::default();
        assert!(tree.add_region(Vec::new()).is_none());
    }

    #[test]
    fn build_and_validate() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a", "b"]);
        let c = region(&mut tree, &["c"]);
        let section = tree.add_section(true, vec![a, c]).expect("section");
        tree.set_root(section).expect("root");
        tree.validate().expect("valid tree");
        assert_eq!(tree.controls(false).len(), 3);
        assert!(tree.find_control("c").is_some());
        assert!(tree.find_control("zzz").is_none());
    }

    #[test]
    fn same_orientation_children_are_spliced() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a"]);
        let b = region(&mut tree, &["b"]);
        let inner = tree.add_section(true, vec![a, b]).expect("inner");
        let c = region(&mut tree, &["c"]);
        let outer = tree.add_section(true, vec![inner, c]).expect("outer");
        tree.set_root(outer).expect("root");
        assert_eq!(tree.children_of(outer), vec![a, b, c]);
        assert!(tree.node(inner).is_none());
        tree.validate().expect("valid tree");
    }

    #[test]
    fn single_child_root_section_collapses() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a"]);
        let section = tree.add_section(false, vec![a]).expect("section");
        tree.set_root(section).expect("root");
        assert_eq!(tree.root(), Some(a));
        tree.validate().expect("valid tree");
    }

    #[test]
    fn removing_last_control_collapses_section() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a"]);
        let b = region(&mut tree, &["b"]);
        let section = tree.add_section(true, vec![a, b]).expect("section");
        tree.set_root(section).expect("root");

        let a_control = tree.find_control("a").expect("control a");
        let removed = tree.remove_control(a_control).expect("remove");
        assert_eq!(removed.id(), "a");
        assert_eq!(tree.root(), Some(b));
        tree.validate().expect("valid tree");

        let b_control = tree.find_control("b").expect("control b");
        let _ = tree.remove_control(b_control).expect("remove");
        assert!(tree.is_empty());
        assert!(tree.take_emptied());
        assert!(!tree.take_emptied());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn collapse_splices_same_orientation_grandchild() {
        // row[ a, column[ b, row[c, d] ] ]: removing b leaves the column with
        // a single row child, which is spliced into the outer row.
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a"]);
        let b = region(&mut tree, &["b"]);
        let c = region(&mut tree, &["c"]);
        let d = region(&mut tree, &["d"]);
        let inner_row = tree.add_section(true, vec![c, d]).expect("row");
        let column = tree.add_section(false, vec![b, inner_row]).expect("column");
        let outer = tree.add_section(true, vec![a, column]).expect("outer");
        tree.set_root(outer).expect("root");

        let b_control = tree.find_control("b").expect("b");
        let _ = tree.remove_control(b_control).expect("remove");
        assert_eq!(tree.children_of(outer), vec![a, c, d]);
        tree.validate().expect("valid tree");
    }

    #[test]
    fn append_region_wraps_non_row_root() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a"]);
        tree.set_root(a).expect("root");
        let b = region(&mut tree, &["b"]);
        tree.append_region(b).expect("append");
        let root = tree.root().expect("root");
        let section = tree.node(root).and_then(DockNode::as_section).expect("section root");
        assert!(section.is_row());
        assert_eq!(tree.children_of(root), vec![a, b]);
        tree.validate().expect("valid tree");
    }

    #[test]
    fn locked_requires_every_control() {
        let mut tree = DockTree::default();
        let r = tree
            .add_region(vec![
                DockControl::new("a").with_locked(true),
                DockControl::new("b"),
            ])
            .expect("region");
        tree.set_root(r).expect("root");
        assert!(!tree.is_locked(r));
        let b = tree.find_control("b").expect("b");
        if let Some(control) = tree.control_mut(b) {
            control.toggle_lock();
        }
        assert!(tree.is_locked(r));
    }

    #[test]
    fn stale_ids_fail_lookup() {
        let mut tree = DockTree::default();
        let a = region(&mut tree, &["a", "b"]);
        tree.set_root(a).expect("root");
        let b = tree.find_control("b").expect("b");
        let _ = tree.remove_control(b).expect("remove");
        assert_eq!(
            tree.remove_control(b).map(|c| c.id().to_string()),
            Err(DockError::UnknownNode { node_id: b })
        );
    }
}
