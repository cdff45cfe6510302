//! The sizer: top-level owner of one dock tree per host window.
//!
//! The sizer drives layout passes, persistence, weight mapping,
//! maximize/restore and pointer interaction. Mutations only mark the tree
//! dirty; the host calls [`DockSizer::flush`] once per event-loop iteration
//! to run the deferred layout.
//!
//! Applying a structure (persistence, weights, restore) rebuilds the tree,
//! so node ids handed out before are stale afterwards. Look controls up
//! again with [`DockSizer::find_control`].

use std::collections::HashMap;

use dockyard_core::geometry::{Rect, Size};
use dockyard_core::surface::DrawSurface;

use crate::config::{DockConfig, DockTheme};
use crate::control::DockControl;
use crate::drag::{CancelReason, DragEffect, DragMachine, DragTarget, Modifiers, PointerPosition};
use crate::draw::{self, Overlay};
use crate::error::DockError;
use crate::host::{DockHost, StructureResolver, append_extras};
use crate::info::{DockInfo, DockKind, HitTarget};
use crate::item::{DockNodeKindTag, DockStyle, NodeId};
use crate::section::DockSection;
use crate::structure::{ControlRecord, Structure};
use crate::tree::DockTree;
use crate::weights::WeightSpec;

/// Layout size weights are mapped at before the first layout pass.
pub const NOMINAL_LAYOUT: Size = Size::new(1000, 1000);

/// Shorthand for initial contents.
///
/// `Region` is a tabbed group of controls. `Section` is a row whose nested
/// sections alternate orientation with depth; bare controls inside a section
/// get a region of their own.
#[derive(Debug)]
pub enum ContentSpec {
    Tree(DockTree),
    Control(DockControl),
    Region(Vec<ContentSpec>),
    Section(Vec<ContentSpec>),
}

impl From<DockControl> for ContentSpec {
    fn from(control: DockControl) -> Self {
        Self::Control(control)
    }
}

impl From<DockTree> for ContentSpec {
    fn from(tree: DockTree) -> Self {
        Self::Tree(tree)
    }
}

/// Result of applying a drop target.
#[derive(Debug)]
pub enum DockOutcome {
    /// The drop would not change anything.
    Ignored,
    Docked,
    /// The controls left the layout and now belong to the caller.
    Exported(Vec<DockControl>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SplitterDrag {
    section: NodeId,
    index: usize,
    start: Rect,
    current: Rect,
    limits: Rect,
    live: bool,
    neighbours: [(NodeId, Rect); 2],
}

/// What the captured pointer is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragSession {
    Splitter(SplitterDrag),
    /// Press on a splitter's open/close button; acts on release.
    SplitterButton { section: NodeId, index: usize },
    Control { control: NodeId, drop: DockInfo },
}

/// Owner of a dock tree and its interaction state.
#[derive(Debug)]
pub struct DockSizer {
    tree: DockTree,
    theme: DockTheme,
    /// Snapshot taken before the last structure change, for
    /// [`reset_structure`](Self::reset_structure).
    structure: Option<Structure>,
    /// Layout saved while a control is maximized.
    max_structure: Option<Structure>,
    area: Option<Rect>,
    drag: DragMachine,
    session: Option<DragSession>,
}

impl Default for DockSizer {
    fn default() -> Self {
        Self::new(DockConfig::default())
    }
}

impl DockSizer {
    #[must_use]
    pub fn new(config: DockConfig) -> Self {
        Self {
            drag: DragMachine::new(config.drag_threshold),
            tree: DockTree::new(config),
            theme: DockTheme::default(),
            structure: None,
            max_structure: None,
            area: None,
            session: None,
        }
    }

    #[must_use]
    pub fn with_theme(mut self, theme: DockTheme) -> Self {
        self.theme = theme;
        self
    }

    #[must_use]
    pub fn config(&self) -> &DockConfig {
        self.tree.config()
    }

    #[must_use]
    pub const fn theme(&self) -> &DockTheme {
        &self.theme
    }

    #[must_use]
    pub const fn tree(&self) -> &DockTree {
        &self.tree
    }

    /// Area of the last layout pass.
    #[must_use]
    pub const fn area(&self) -> Option<Rect> {
        self.area
    }

    #[must_use]
    pub fn control(&self, id: NodeId) -> Option<&DockControl> {
        self.tree.control(id)
    }

    /// Mutable access to a control's flags. Marks the layout dirty.
    pub fn control_mut(&mut self, id: NodeId) -> Option<&mut DockControl> {
        self.tree.mark_modified();
        self.tree.control_mut(id)
    }

    // -----------------------------------------------------------------------
    // Contents
    // -----------------------------------------------------------------------

    /// Replace the whole layout. Nothing changes when `contents` is invalid.
    ///
    /// The first call also records the initial structure for
    /// [`reset_structure`](Self::reset_structure).
    pub fn set_contents(&mut self, contents: ContentSpec) -> Result<(), DockError> {
        let config = self.tree.config().clone();
        let tree = match contents {
            ContentSpec::Tree(mut tree) => {
                tree.validate()?;
                tree.set_config(config);
                tree
            }
            shorthand => {
                let mut tree = DockTree::new(config);
                if let Some(root) = build_spec(&mut tree, shorthand, true)? {
                    tree.set_root(root)?;
                }
                tree
            }
        };

        self.abort_drag();
        self.tree = tree;
        self.tree.mark_modified();
        self.max_structure = None;
        if self.structure.is_none() {
            self.structure = Some(self.tree.structure());
        }
        dockyard_core::debug!(nodes = self.tree.len(), "dock contents replaced");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Layout
    // -----------------------------------------------------------------------

    /// Smallest size the layout can be shown at.
    pub fn calculate_minimum(&mut self) -> Size {
        match self.tree.root() {
            Some(root) => self.tree.calc_min(root, false),
            None => self.tree.config().empty_minimum,
        }
    }

    /// Lay the tree out inside `area` and clear the dirty flag.
    ///
    /// Content callbacks run during the pass cannot reach the sizer, so a
    /// pass never nests.
    pub fn perform_layout(&mut self, area: Rect) {
        self.area = Some(area);
        if let Some(root) = self.tree.root() {
            let _ = self.tree.calc_min(root, true);
            self.tree.recalc_sizes(root, area);
            let visible = self.tree.is_visible(root);
            self.tree.set_visibility(root, visible);
        }
        self.tree.clear_modified();
        dockyard_core::debug!(
            x = area.x,
            y = area.y,
            width = area.width,
            height = area.height,
            "dock layout pass"
        );
    }

    /// Whether a mutation is waiting for a layout pass.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.tree.is_modified()
    }

    /// Deliver deferred work: a pending `dock_window_empty`, then a layout
    /// pass at the last known area. Returns whether anything happened.
    pub fn flush(&mut self, host: &mut dyn DockHost) -> bool {
        let mut acted = false;
        if self.tree.take_emptied() {
            host.dock_window_empty();
            acted = true;
        }
        if let (true, Some(area)) = (self.tree.is_modified(), self.area) {
            host.set_frozen(true);
            self.perform_layout(area);
            host.set_frozen(false);
            host.update();
            acted = true;
        }
        acted
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Snapshot of the current layout.
    #[must_use]
    pub fn structure(&self) -> Structure {
        self.tree.structure()
    }

    /// Rebuild the layout from `structure`, matching live controls by id.
    ///
    /// Live controls found in the structure take its flags and sizes (the
    /// saved name and style only when the user changed them). Saved ids with
    /// no live control are offered to `resolver`; unresolved slots are
    /// dropped. Live controls the structure does not mention are handed to
    /// [`StructureResolver::resolve_extras`], or appended as one region at the
    /// root when there is no resolver.
    pub fn set_structure(
        &mut self,
        structure: &Structure,
        resolver: Option<&mut dyn StructureResolver>,
    ) {
        self.structure = Some(self.tree.structure());
        self.apply_structure(structure, resolver);
    }

    /// Return to the structure saved before the last change. Returns `false`
    /// when there is none.
    pub fn reset_structure(&mut self) -> bool {
        match self.structure.take() {
            Some(saved) => {
                self.set_structure(&saved, None);
                true
            }
            None => false,
        }
    }

    fn apply_structure(
        &mut self,
        structure: &Structure,
        mut resolver: Option<&mut dyn StructureResolver>,
    ) {
        self.abort_drag();

        let mut saved: HashMap<&str, &ControlRecord> = HashMap::new();
        let mut order = Vec::new();
        for record in structure.controls() {
            if !saved.contains_key(record.id.as_str()) {
                saved.insert(record.id.as_str(), record);
                order.push(record);
            }
        }

        let mut pool: HashMap<String, DockControl> = HashMap::new();
        let mut extras = Vec::new();
        for mut control in self.tree.drain_controls() {
            match saved.get(control.id()) {
                Some(record) if !pool.contains_key(control.id()) => {
                    control.apply_record(record, false);
                    pool.insert(control.id().to_string(), control);
                }
                _ => extras.push(control),
            }
        }

        for record in order {
            if pool.contains_key(&record.id) {
                continue;
            }
            let Some(resolver) = resolver.as_deref_mut() else {
                break;
            };
            match resolver.resolve_id(&record.id) {
                Some(mut control) => {
                    control.id.clone_from(&record.id);
                    control.apply_record(record, true);
                    pool.insert(record.id.clone(), control);
                }
                None => {
                    dockyard_core::debug!(id = %record.id, "saved control not resolved");
                }
            }
        }

        let mut tree = DockTree::new(self.tree.config().clone());
        if let Some(root) = tree.build_record(structure, &mut pool) {
            let _ = tree.set_root(root);
        }
        if !extras.is_empty() {
            dockyard_core::debug!(count = extras.len(), "placing controls missing from structure");
            match resolver {
                Some(resolver) => resolver.resolve_extras(&mut tree, extras),
                None => append_extras(&mut tree, extras),
            }
        }
        tree.mark_modified();
        self.tree = tree;
    }

    // -----------------------------------------------------------------------
    // Weights
    // -----------------------------------------------------------------------

    /// Map `spec` onto the live controls (traversal order) at the current
    /// layout size, or at [`NOMINAL_LAYOUT`] before the first layout pass.
    /// Logs and returns `None` when the spec does not fit.
    #[must_use]
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn map_structure(&self, spec: &WeightSpec) -> Option<Structure> {
        let controls: Vec<ControlRecord> = self
            .tree
            .controls(false)
            .into_iter()
            .filter_map(|id| {
                let node = self.tree.node(id)?;
                Some(node.as_control()?.record(node.size_hint()))
            })
            .collect();
        match spec.map(&controls, self.layout_size()) {
            Ok(structure) => Some(structure),
            Err(err) => {
                dockyard_core::warn!(error = %err, "weight spec rejected");
                None
            }
        }
    }

    /// Map `spec` and apply the result. Returns `false`, leaving the layout
    /// untouched, when the spec does not fit.
    pub fn apply_weights(&mut self, spec: &WeightSpec) -> bool {
        match self.map_structure(spec) {
            Some(structure) => {
                self.set_structure(&structure, None);
                true
            }
            None => false,
        }
    }

    fn layout_size(&self) -> Size {
        let hint = self
            .tree
            .root()
            .and_then(|root| self.tree.node(root))
            .map(|node| node.size_hint());
        hint.into_iter()
            .chain(self.area.map(|area| area.size()))
            .find(|size| size.width > 0 && size.height > 0)
            .unwrap_or(NOMINAL_LAYOUT)
    }

    // -----------------------------------------------------------------------
    // Maximize
    // -----------------------------------------------------------------------

    /// Show only `control`, or restore the layout saved by the previous call.
    pub fn min_max(&mut self, control: NodeId) -> Result<(), DockError> {
        if let Some(saved) = self.max_structure.take() {
            self.apply_structure(&saved, None);
            dockyard_core::debug!("dock layout restored");
            return Ok(());
        }
        self.tree.require_control(control)?;
        self.max_structure = Some(self.tree.structure());
        for id in self.tree.controls(false) {
            self.tree.set_control_visible(id, id == control)?;
        }
        dockyard_core::debug!(control = %control, "dock control maximized");
        Ok(())
    }

    #[must_use]
    pub const fn is_maximizable(&self) -> bool {
        self.max_structure.is_none()
    }

    // -----------------------------------------------------------------------
    // Hit testing and docking
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn object_at(&self, x: i32, y: i32) -> Option<HitTarget> {
        self.tree.object_at(x, y)
    }

    /// Drop target for a dragged control (`is_control`) or region.
    #[must_use]
    pub fn dock_info_at(&self, x: i32, y: i32, tab_width: i32, is_control: bool) -> DockInfo {
        self.tree.dock_info_at(x, y, tab_width, is_control)
    }

    /// Move the control or region `item` as `info` describes.
    pub fn dock(&mut self, info: DockInfo, item: NodeId) -> Result<DockOutcome, DockError> {
        let tag = self.tree.require(item)?.tag();
        if tag == DockNodeKindTag::Section {
            return Err(DockError::NotARegion { node_id: item });
        }
        if self.tree.is_locked(item) {
            return Err(DockError::Locked { node_id: item });
        }
        if let Some(target) = info.region {
            self.tree.require_region(target)?;
        }

        let outcome = match info.kind {
            DockKind::Tab => self.dock_tab(info, item, tag)?,
            DockKind::Exchange => self.dock_exchange(info, item, tag)?,
            DockKind::Export => self.export(item, tag)?,
            kind if kind.is_edge() => self.dock_edge(info, item, tag)?,
            _ => DockOutcome::Ignored,
        };
        if !matches!(outcome, DockOutcome::Ignored) {
            dockyard_core::debug!(kind = ?info.kind, item = %item, "dock applied");
        }
        Ok(outcome)
    }

    fn dock_tab(
        &mut self,
        info: DockInfo,
        item: NodeId,
        tag: DockNodeKindTag,
    ) -> Result<DockOutcome, DockError> {
        let Some(target) = info.region else {
            return Ok(DockOutcome::Ignored);
        };
        if info.control == Some(item) || item == target {
            return Ok(DockOutcome::Ignored);
        }
        let moving = match tag {
            DockNodeKindTag::Control => vec![item],
            _ => self.tree.children_of(item),
        };
        for control in moving {
            let source = self.tree.detach(control)?;
            self.tree.region_insert(target, control, info.control)?;
            if let Some(source) = source.filter(|source| *source != target) {
                self.tree.prune(source);
            }
        }
        Ok(DockOutcome::Docked)
    }

    fn dock_exchange(
        &mut self,
        info: DockInfo,
        item: NodeId,
        tag: DockNodeKindTag,
    ) -> Result<DockOutcome, DockError> {
        match (tag, info.control) {
            (DockNodeKindTag::Control, Some(other)) if other != item => {
                self.tree.require_control(other)?;
                self.tree.exchange_controls(item, other)?;
                Ok(DockOutcome::Docked)
            }
            _ => Ok(DockOutcome::Ignored),
        }
    }

    fn dock_edge(
        &mut self,
        info: DockInfo,
        item: NodeId,
        tag: DockNodeKindTag,
    ) -> Result<DockOutcome, DockError> {
        let root = self.tree.root().ok_or(DockError::EmptyTree)?;
        let source = match tag {
            DockNodeKindTag::Control => self.tree.region_of(item)?,
            _ => item,
        };
        // The whole source region moves when nothing else is left in it.
        let whole = source == item || self.tree.children_of(source).len() == 1;
        if whole && (info.region == Some(source) || source == root) {
            return Ok(DockOutcome::Ignored);
        }

        let moving = if whole {
            if let Some(parent) = self.tree.detach(source)? {
                self.tree.prune(parent);
            }
            source
        } else {
            let _ = self.tree.detach(item)?;
            self.tree.region_from_nodes(vec![item])
        };

        match info.region {
            Some(target) => {
                let section = match self.tree.parent_of(target) {
                    Some(section) => section,
                    None => self.tree.wrap_root(info.kind.is_horizontal())?,
                };
                self.tree.section_add(section, moving, target, info.kind)?;
            }
            None => self.dock_root_edge(moving, info)?,
        }
        Ok(DockOutcome::Docked)
    }

    /// Place `moving` along one outer edge of the whole layout.
    fn dock_root_edge(&mut self, moving: NodeId, info: DockInfo) -> Result<(), DockError> {
        let horizontal = info.kind.is_horizontal();
        let Some(root) = self.tree.root() else {
            return self.tree.set_root(moving);
        };
        let root_row = self
            .tree
            .node(root)
            .and_then(|node| node.as_section())
            .map(DockSection::is_row);
        let section = if root_row == Some(horizontal) {
            root
        } else {
            self.tree.wrap_root(horizontal)?
        };
        if let Some(node) = self.tree.nodes.get_mut(&moving) {
            node.set_hint(info.bounds.size());
        }
        let index = if info.kind.is_leading() {
            0
        } else {
            self.tree.children_of(section).len()
        };
        self.tree.insert_child(section, index, moving)
    }

    fn export(&mut self, item: NodeId, tag: DockNodeKindTag) -> Result<DockOutcome, DockError> {
        let controls = match tag {
            DockNodeKindTag::Control => vec![item],
            _ => self.tree.children_of(item),
        };
        let mut exported = Vec::with_capacity(controls.len());
        for control in controls {
            exported.push(self.tree.remove_control(control)?);
        }
        Ok(DockOutcome::Exported(exported))
    }

    // -----------------------------------------------------------------------
    // Controls
    // -----------------------------------------------------------------------

    /// Close a control and return it. A non-closeable control or a vetoing
    /// close handler refuses unless `force` is set.
    pub fn close_control(&mut self, id: NodeId, force: bool) -> Result<DockControl, DockError> {
        self.tree.require_control(id)?;
        let control = self
            .tree
            .control_mut(id)
            .ok_or(DockError::NotAControl { node_id: id })?;
        if !(force || control.is_closeable()) || !control.request_close(force) {
            return Err(DockError::CloseVetoed {
                id: control.id().to_string(),
            });
        }
        self.abort_drag();
        let control = self.tree.remove_control(id)?;
        dockyard_core::debug!(id = control.id(), force, "dock control closed");
        Ok(control)
    }

    pub fn set_control_visible(&mut self, id: NodeId, visible: bool) -> Result<(), DockError> {
        self.tree.set_control_visible(id, visible)
    }

    pub fn activate_control(&mut self, id: NodeId) -> Result<(), DockError> {
        self.tree.activate_control(id)
    }

    /// Flip the lock of every control.
    pub fn toggle_lock(&mut self) {
        for id in self.tree.controls(false) {
            if let Some(control) = self.tree.control_mut(id) {
                control.toggle_lock();
            }
        }
    }

    #[must_use]
    pub fn controls(&self, visible_only: bool) -> Vec<NodeId> {
        self.tree.controls(visible_only)
    }

    #[must_use]
    pub fn find_control(&self, id: &str) -> Option<NodeId> {
        self.tree.find_control(id)
    }

    // -----------------------------------------------------------------------
    // Pointer routing
    // -----------------------------------------------------------------------

    /// Start capturing the pointer on a splitter or a tab. Returns whether
    /// the sizer took the capture.
    ///
    /// A locked splitter ignores the press. A press on a splitter's
    /// open/close button is a click, not a drag. A locked or `Fixed` tab is
    /// activated but cannot be dragged. Holding ctrl (or turning off
    /// `live_resize`) drags a ghost bar that resizes only on release.
    pub fn pointer_down(&mut self, x: i32, y: i32, modifiers: Modifiers) -> bool {
        if self.drag.is_active() {
            return false;
        }
        let (target, session) = match self.tree.object_at(x, y) {
            Some(HitTarget::Splitter { section, index }) => {
                if self.tree.is_splitter_locked(section, index) {
                    dockyard_core::trace!(section = %section, index, "locked splitter ignored");
                    return false;
                }
                if self.on_splitter_button(section, index, x, y) {
                    (
                        DragTarget::Splitter { section, index },
                        DragSession::SplitterButton { section, index },
                    )
                } else {
                    let Some(drag) = self.splitter_drag(section, index, modifiers) else {
                        return false;
                    };
                    (DragTarget::Splitter { section, index }, DragSession::Splitter(drag))
                }
            }
            Some(HitTarget::Tab { control }) => {
                let fixed = self
                    .tree
                    .control(control)
                    .is_some_and(|data| data.style() == DockStyle::Fixed);
                if fixed || self.tree.is_locked(control) {
                    let _ = self.tree.activate_control(control);
                    return false;
                }
                (
                    DragTarget::Control { control },
                    DragSession::Control {
                        control,
                        drop: DockInfo::NONE,
                    },
                )
            }
            _ => return false,
        };
        let _ = self.drag.press(target, PointerPosition::new(x, y));
        self.session = Some(session);
        true
    }

    fn on_splitter_button(&self, section: NodeId, index: usize, x: i32, y: i32) -> bool {
        let len = self.tree.config().splitter_button_len();
        len > 0
            && self
                .tree
                .splitter(section, index)
                .is_ok_and(|splitter| splitter.button(len).contains(x, y))
    }

    /// Resize the neighbours of splitter `index` to its bounds with the
    /// host frozen, then repaint them.
    fn resize_at_splitter(
        &mut self,
        section: NodeId,
        index: usize,
        host: &mut dyn DockHost,
    ) -> Result<Rect, DockError> {
        host.set_frozen(true);
        let resized = self.tree.update_splitter(section, index);
        host.set_frozen(false);
        if let Ok(rect) = resized {
            host.refresh(rect);
        }
        resized
    }

    fn splitter_drag(&self, section: NodeId, index: usize, modifiers: Modifiers) -> Option<SplitterDrag> {
        let start = self.tree.splitter(section, index).ok()?.bounds();
        let limits = self.tree.splitter_limits(section, index).ok()?;
        let (first, second) = self.tree.splitter_neighbours(section, index).ok()?;
        Some(SplitterDrag {
            section,
            index,
            start,
            current: start,
            limits,
            live: self.tree.config().live_resize && !modifiers.ctrl,
            neighbours: [
                (first, self.tree.bounds_of(first)),
                (second, self.tree.bounds_of(second)),
            ],
        })
    }

    /// Track a captured pointer. Returns whether anything moved.
    pub fn pointer_move(&mut self, x: i32, y: i32, host: &mut dyn DockHost) -> bool {
        let effect = self.drag.motion(PointerPosition::new(x, y));
        if matches!(self.session, Some(DragSession::SplitterButton { .. })) {
            return false;
        }
        match effect {
            DragEffect::DragStarted { origin, current, .. }
            | DragEffect::DragUpdated { origin, current, .. } => {
                self.drag_to(origin, current, host);
                true
            }
            _ => false,
        }
    }

    fn drag_to(&mut self, origin: PointerPosition, current: PointerPosition, host: &mut dyn DockHost) {
        match self.session {
            Some(DragSession::Splitter(mut drag)) => {
                let Ok(splitter) = self.tree.splitter(drag.section, drag.index) else {
                    return;
                };
                let bounds =
                    splitter.dragged(drag.start, drag.limits, current.x - origin.x, current.y - origin.y);
                if bounds == drag.current {
                    return;
                }
                let previous = drag.current;
                drag.current = bounds;
                self.session = Some(DragSession::Splitter(drag));
                if drag.live {
                    if self.tree.place_splitter(drag.section, drag.index, bounds).is_ok() {
                        let _ = self.resize_at_splitter(drag.section, drag.index, host);
                    }
                } else {
                    host.refresh(previous.union(&bounds));
                }
            }
            Some(DragSession::Control { control, drop }) => {
                let tab_width = self.tree.config().drop_tab_width;
                let next = self.tree.dock_info_at(current.x, current.y, tab_width, true);
                if next != drop {
                    self.session = Some(DragSession::Control { control, drop: next });
                    host.refresh(drop.bounds.union(&next.bounds));
                }
            }
            Some(DragSession::SplitterButton { .. }) | None => {}
        }
    }

    /// Release the capture: finish a splitter drag, toggle a clicked
    /// splitter button, drop a dragged tab, or activate a clicked tab.
    /// Returns whether the layout changed.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    pub fn pointer_up(&mut self, x: i32, y: i32, host: &mut dyn DockHost) -> bool {
        let effect = self.drag.release(PointerPosition::new(x, y));
        let session = self.session.take();
        let DragEffect::Committed { end, dragged, .. } = effect else {
            return false;
        };
        match session {
            Some(DragSession::Splitter(drag)) => {
                if !dragged {
                    return false;
                }
                if !drag.live {
                    let moved = self
                        .tree
                        .place_splitter(drag.section, drag.index, drag.current)
                        .and_then(|()| self.resize_at_splitter(drag.section, drag.index, host));
                    if moved.is_err() {
                        return false;
                    }
                }
                self.tree.remember_splitter(drag.section, drag.index, drag.start);
                dockyard_core::debug!(
                    section = %drag.section,
                    index = drag.index,
                    live = drag.live,
                    "splitter drag committed"
                );
                true
            }
            Some(DragSession::SplitterButton { section, index }) => {
                self.toggle_splitter_at(section, index, end, host)
            }
            Some(DragSession::Control { control, drop }) => {
                if !dragged {
                    return self.tree.activate_control(control).is_ok();
                }
                host.refresh(drop.bounds);
                let tab_width = self.tree.config().drop_tab_width;
                let info = self.tree.dock_info_at(end.x, end.y, tab_width, true);
                match self.dock(info, control) {
                    Ok(DockOutcome::Docked) => true,
                    Ok(DockOutcome::Exported(controls)) => {
                        host.controls_exported(controls);
                        true
                    }
                    Ok(DockOutcome::Ignored) => false,
                    Err(err) => {
                        dockyard_core::debug!(error = %err, "drop rejected");
                        false
                    }
                }
            }
            None => false,
        }
    }

    /// Collapse or reopen splitter `index` when the release at `end` is
    /// still on its button.
    fn toggle_splitter_at(
        &mut self,
        section: NodeId,
        index: usize,
        end: PointerPosition,
        host: &mut dyn DockHost,
    ) -> bool {
        if !self.on_splitter_button(section, index, end.x, end.y) {
            return false;
        }
        let len = self.tree.config().splitter_button_len();
        let Ok(toward_first) = self
            .tree
            .splitter(section, index)
            .map(|splitter| splitter.collapses_first(len, end.x, end.y))
        else {
            return false;
        };
        self.tree
            .toggle_splitter(section, index, toward_first)
            .and_then(|_| self.resize_at_splitter(section, index, host))
            .is_ok()
    }

    /// Abandon the active drag, restoring the splitter (and for live drags
    /// its neighbours) to where they were on press.
    pub fn cancel_drag(&mut self, reason: CancelReason, host: &mut dyn DockHost) -> bool {
        let effect = self.drag.cancel(reason);
        let session = self.session.take();
        if !matches!(effect, DragEffect::Canceled { .. }) {
            return false;
        }
        match session {
            Some(DragSession::Splitter(drag)) => {
                let _ = self.tree.place_splitter(drag.section, drag.index, drag.start);
                let mut dirty = drag.start.union(&drag.current);
                if drag.live {
                    host.set_frozen(true);
                    for (node, bounds) in drag.neighbours {
                        self.tree.recalc_sizes(node, bounds);
                        dirty = dirty.union(&bounds);
                    }
                    host.set_frozen(false);
                }
                host.refresh(dirty);
            }
            Some(DragSession::Control { drop, .. }) => {
                if drop.is_actionable() {
                    host.refresh(drop.bounds);
                }
            }
            Some(DragSession::SplitterButton { .. }) | None => {}
        }
        dockyard_core::debug!(reason = ?reason, "dock drag canceled");
        true
    }

    /// Whether the pointer is captured.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag.is_active()
    }

    fn abort_drag(&mut self) {
        let _ = self.drag.cancel(CancelReason::Programmatic);
        self.session = None;
    }

    // -----------------------------------------------------------------------
    // Drawing and teardown
    // -----------------------------------------------------------------------

    /// Paint splitters, tab strips and drag feedback. Returns `false`
    /// without drawing while a layout pass is pending.
    pub fn draw(&self, surface: &mut dyn DrawSurface) -> bool {
        if self.tree.is_modified() || self.area.is_none() {
            return false;
        }
        draw::paint(&self.tree, &self.theme, self.overlay(), surface);
        true
    }

    fn overlay(&self) -> Overlay {
        if !self.drag.is_dragging() {
            return Overlay::default();
        }
        match self.session {
            Some(DragSession::Splitter(drag)) if !drag.live => Overlay {
                ghost: Some(drag.current),
                drop: None,
            },
            Some(DragSession::Control { drop, .. }) if drop.is_actionable() => Overlay {
                ghost: None,
                drop: Some(drop),
            },
            _ => Overlay::default(),
        }
    }

    /// Force-close every control and forget all saved layouts.
    pub fn close(&mut self) {
        self.abort_drag();
        for id in self.tree.controls(false) {
            if let Some(control) = self.tree.control_mut(id) {
                let _ = control.request_close(true);
            }
        }
        let closed = self.tree.drain_controls();
        dockyard_core::debug!(count = closed.len(), "dock sizer closed");
        drop(closed);
        self.structure = None;
        self.max_structure = None;
        self.area = None;
    }
}

/// Build detached nodes for a shorthand spec. A section is a row when
/// `is_row`; its nested sections take the other orientation.
fn build_spec(
    tree: &mut DockTree,
    spec: ContentSpec,
    is_row: bool,
) -> Result<Option<NodeId>, DockError> {
    match spec {
        ContentSpec::Tree(_) => Err(DockError::InvalidContentSpec {
            reason: "a prebuilt tree must be the whole contents",
        }),
        ContentSpec::Control(control) => Ok(tree.add_region(vec![control])),
        ContentSpec::Region(items) => {
            let mut controls = Vec::with_capacity(items.len());
            flatten_region(items, &mut controls)?;
            Ok(tree.add_region(controls))
        }
        ContentSpec::Section(items) => {
            let mut children = Vec::with_capacity(items.len());
            for item in items {
                children.extend(build_spec(tree, item, !is_row)?);
            }
            match children.len() {
                0 => Ok(None),
                1 => Ok(children.pop()),
                _ => tree.add_section(is_row, children).map(Some),
            }
        }
    }
}

fn flatten_region(items: Vec<ContentSpec>, out: &mut Vec<DockControl>) -> Result<(), DockError> {
    for item in items {
        match item {
            ContentSpec::Control(control) => out.push(control),
            ContentSpec::Region(inner) => flatten_region(inner, out)?,
            ContentSpec::Section(_) | ContentSpec::Tree(_) => {
                return Err(DockError::InvalidContentSpec {
                    reason: "a region can only hold controls",
                });
            }
        }
    }
    Ok(())
}
