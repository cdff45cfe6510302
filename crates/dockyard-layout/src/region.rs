//! Tabbed regions: an ordered stack of controls with one active tab.
//!
//! A region with several visible controls, or a single one styled
//! [`DockStyle::Tab`], is a notebook and carries a tab strip. A lone
//! `Horizontal` control gets a drag bar across its top instead, and a lone
//! `Vertical` one a bar down its left side. `Fixed` and locked controls get
//! neither.

use dockyard_core::geometry::{Rect, Size};

use crate::error::DockError;
use crate::info::{DockInfo, DockKind, HitTarget};
use crate::item::{DockNodeKind, DockStyle, NodeId};
use crate::tree::DockTree;

/// A notebook of controls.
///
/// `contents` is the tab order. `active` indexes into `contents` and is
/// `None` only when no tab is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockRegion {
    pub(crate) contents: Vec<NodeId>,
    pub(crate) active: Option<usize>,
}

impl DockRegion {
    pub(crate) fn new(contents: Vec<NodeId>) -> Self {
        Self {
            contents,
            active: None,
        }
    }

    #[must_use]
    pub fn contents(&self) -> &[NodeId] {
        &self.contents
    }

    #[must_use]
    pub const fn active(&self) -> Option<usize> {
        self.active
    }

    #[must_use]
    pub fn active_control(&self) -> Option<NodeId> {
        self.active.and_then(|index| self.contents.get(index).copied())
    }

    /// Keep `active` pointing at the same tab after `contents[index]` was
    /// removed.
    pub(crate) fn removed_at(&mut self, index: usize) {
        if let Some(active) = self.active {
            if active > index || active >= self.contents.len() {
                self.active = active.checked_sub(1);
            }
        }
    }
}

impl DockTree {
    fn region_mut(&mut self, id: NodeId) -> Option<&mut DockRegion> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(DockNodeKind::Region(region)) => Some(region),
            _ => None,
        }
    }

    fn control_visible(&self, id: NodeId) -> bool {
        self.control(id).is_some_and(|control| control.visible)
    }

    /// Make the first visible tab at or after `start` active, else the
    /// nearest visible tab before it, else none.
    pub(crate) fn update_active(&mut self, region: NodeId, start: usize) {
        let contents = self.children_of(region);
        let start = start.min(contents.len());
        let forward = (start..contents.len()).find(|i| self.control_visible(contents[*i]));
        let found = forward.or_else(|| (0..start).rev().find(|i| self.control_visible(contents[*i])));
        if let Some(region) = self.region_mut(region) {
            region.active = found;
        }
    }

    /// React to a visibility change of the control at `index`.
    fn show_hide(&mut self, region: NodeId, index: usize) {
        let Some(active) = self.node(region).and_then(|node| node.as_region()).map(|r| r.active)
        else {
            return;
        };
        match active {
            Some(active) if active == index => self.update_active(region, index),
            None => {
                let visible = self
                    .children_of(region)
                    .get(index)
                    .is_some_and(|control| self.control_visible(*control));
                if visible {
                    if let Some(region) = self.region_mut(region) {
                        region.active = Some(index);
                    }
                }
            }
            Some(_) => {}
        }
        self.mark_modified();
    }

    /// Show or hide a control, keeping its region's active tab valid.
    pub fn set_control_visible(&mut self, id: NodeId, visible: bool) -> Result<(), DockError> {
        let region = self.region_of(id)?;
        let Some(control) = self.control_mut(id) else {
            return Err(DockError::NotAControl { node_id: id });
        };
        if control.visible == visible {
            return Ok(());
        }
        control.visible = visible;
        let index = self
            .children_of(region)
            .iter()
            .position(|child| *child == id)
            .ok_or(DockError::NotAChild {
                parent: region,
                child: id,
            })?;
        self.show_hide(region, index);
        Ok(())
    }

    /// Make `id` the active tab of its region, showing it if hidden.
    pub fn activate_control(&mut self, id: NodeId) -> Result<(), DockError> {
        let region = self.region_of(id)?;
        self.set_control_visible(id, true)?;
        let index = self
            .children_of(region)
            .iter()
            .position(|child| *child == id)
            .ok_or(DockError::NotAChild {
                parent: region,
                child: id,
            })?;
        if let Some(region) = self.region_mut(region) {
            if region.active != Some(index) {
                region.active = Some(index);
            }
        }
        self.mark_modified();
        Ok(())
    }

    /// Insert the detached control `control` into `region` before `before`
    /// (append when `None`) and make it active.
    pub(crate) fn region_insert(
        &mut self,
        region: NodeId,
        control: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), DockError> {
        let contents = self.require_region(region)?.contents.clone();
        let index = before
            .and_then(|before| contents.iter().position(|child| *child == before))
            .unwrap_or(contents.len());
        if let Some(region) = self.region_mut(region) {
            region.contents.insert(index, control);
            if let Some(active) = region.active {
                if active >= index {
                    region.active = Some(active + 1);
                }
            }
        }
        self.set_parent(control, Some(region));
        if self.control_visible(control) {
            if let Some(region) = self.region_mut(region) {
                region.active = Some(index);
            }
        } else if self.node(region).and_then(|n| n.as_region()).is_some_and(|r| r.active.is_none()) {
            self.update_active(region, 0);
        }
        self.mark_modified();
        Ok(())
    }

    /// Swap two controls between (or within) their regions. Each region keeps
    /// its active slot, so the incoming control inherits the tab state.
    pub(crate) fn exchange_controls(&mut self, a: NodeId, b: NodeId) -> Result<(), DockError> {
        let region_a = self.region_of(a)?;
        let region_b = self.region_of(b)?;
        let index_a = self.index_in_parent(a).map(|(_, index)| index);
        let index_b = self.index_in_parent(b).map(|(_, index)| index);
        let (Some(index_a), Some(index_b)) = (index_a, index_b) else {
            return Err(DockError::NotAChild {
                parent: region_a,
                child: a,
            });
        };
        if let Some(region) = self.region_mut(region_a) {
            region.contents[index_a] = b;
        }
        if let Some(region) = self.region_mut(region_b) {
            region.contents[index_b] = a;
        }
        self.set_parent(a, Some(region_b));
        self.set_parent(b, Some(region_a));
        for region in [region_a, region_b] {
            let active = self
                .node(region)
                .and_then(|node| node.as_region())
                .and_then(|r| r.active)
                .unwrap_or(0);
            self.update_active(region, active);
        }
        self.mark_modified();
        Ok(())
    }

    /// Whether `id` shows a tab strip.
    #[must_use]
    pub fn region_is_notebook(&self, id: NodeId) -> bool {
        match self.visible_children(id).as_slice() {
            [] => false,
            [only] => self.control(*only).is_some_and(|c| c.style == DockStyle::Tab),
            _ => true,
        }
    }

    /// Orientation of the drag bar of a region that is not a notebook.
    fn drag_bar_style(&self, id: NodeId) -> Option<DockStyle> {
        if self.region_is_notebook(id) {
            return None;
        }
        let only = *self.visible_children(id).first()?;
        let control = self.control(only)?;
        match control.style {
            DockStyle::Horizontal | DockStyle::Vertical if !control.locked => Some(control.style),
            _ => None,
        }
    }

    pub(crate) fn region_calc_min(&mut self, id: NodeId, use_size: bool) -> Size {
        let visible = self.visible_children(id);
        let mut min = Size::ZERO;
        for control in &visible {
            min = min.max(self.calc_min(*control, use_size));
        }
        let bar = self.config().drag_bar_size;
        match self.drag_bar_style(id) {
            Some(DockStyle::Horizontal) => min.height += bar,
            Some(_) => min.width += bar,
            None if self.region_is_notebook(id) => min.height += self.config().tab_height,
            None => {}
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            if !node.has_hint() {
                node.set_hint(min);
            }
        }
        min
    }

    pub(crate) fn region_recalc(&mut self, id: NodeId, rect: Rect) {
        let rect = Rect::new(rect.x, rect.y, rect.width.max(0), rect.height.max(0));
        let shown = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_hint(rect.size());
                node.bounds = rect;
                node.shown
            }
            None => return,
        };

        let visible = self.visible_children(id);
        let strip = if self.region_is_notebook(id) {
            self.config().tab_height.min(rect.height)
        } else {
            0
        };
        let bar_size = self.config().drag_bar_size;
        let (body, bar) = match self.drag_bar_style(id) {
            Some(DockStyle::Horizontal) => {
                let h = bar_size.min(rect.height);
                (
                    Rect::new(rect.x, rect.y + h, rect.width, rect.height - h),
                    Rect::new(rect.x, rect.y, rect.width, h),
                )
            }
            Some(_) => {
                let w = bar_size.min(rect.width);
                (
                    Rect::new(rect.x + w, rect.y, rect.width - w, rect.height),
                    Rect::new(rect.x, rect.y, w, rect.height),
                )
            }
            None => (
                Rect::new(rect.x, rect.y + strip, rect.width, rect.height - strip),
                Rect::default(),
            ),
        };

        for control in self.children_of(id) {
            if let Some(control) = self.control_mut(control) {
                control.drag_bounds = Rect::default();
            }
        }
        if let Some(control) = visible.first().and_then(|only| self.control_mut(*only)) {
            if !bar.is_empty() {
                control.drag_bounds = bar;
            }
        }

        let count = visible.len() as i32;
        let mut tab_x = rect.x;
        for (i, control) in visible.iter().enumerate() {
            if strip > 0 {
                let tab_width = (rect.right() - tab_x) / (count - i as i32);
                if let Some(control) = self.control_mut(*control) {
                    control.drag_bounds = Rect::new(tab_x, rect.y, tab_width, strip);
                }
                tab_x += tab_width;
            }
            self.recalc_sizes(*control, body);
        }

        self.region_set_visibility(id, shown);
    }

    pub(crate) fn region_set_visibility(&mut self, id: NodeId, visible: bool) {
        let active = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.shown = visible;
                node.as_region().and_then(|region| region.active)
            }
            None => return,
        };
        for (i, control) in self.children_of(id).into_iter().enumerate() {
            self.set_visibility(control, visible && active == Some(i));
        }
    }

    pub(crate) fn region_object_at(&self, id: NodeId, x: i32, y: i32) -> Option<HitTarget> {
        let node = self.node(id)?;
        if !node.shown || !node.bounds.contains(x, y) {
            return None;
        }
        let region = node.as_region()?;
        for control in &region.contents {
            if self.control(*control).is_some_and(|c| c.visible && c.drag_bounds.contains(x, y)) {
                return Some(HitTarget::Tab { control: *control });
            }
        }
        let active = region.active_control()?;
        self.object_at_node(active, x, y)
    }

    /// Drop target inside a region: tab strip slots of a notebook, then the
    /// outer thirds as edges, else the center.
    pub(crate) fn region_dock_info(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        tab_width: i32,
        is_control: bool,
    ) -> Option<DockInfo> {
        let node = self.node(id)?;
        let bounds = node.bounds;
        if !node.shown || !bounds.contains(x, y) {
            return None;
        }
        let visible: Vec<NodeId> = self
            .children_of(id)
            .into_iter()
            .filter(|control| self.control_visible(*control))
            .collect();
        let first = self.control(*visible.first()?)?.drag_bounds;

        if self.region_is_notebook(id)
            && !first.is_empty()
            && first.y <= y
            && y < first.bottom()
            && self.config().accepts_tabs(visible.len())
        {
            let mut left = bounds.x;
            let mut last = first;
            for control in &visible {
                let tab = self.control(*control).map(|c| c.drag_bounds).unwrap_or_default();
                let middle = tab.x + tab.width / 2;
                if left <= x && x < middle {
                    let marker = Rect::new(tab.x - tab_width / 2, tab.y, tab_width, tab.height);
                    return Some(
                        DockInfo::new(DockKind::Tab, marker)
                            .in_region(id)
                            .with_control(Some(*control)),
                    );
                }
                left = middle;
                last = tab;
            }
            if x >= left {
                let marker = Rect::new(last.right(), last.y, tab_width, last.height);
                return Some(DockInfo::new(DockKind::Tab, marker).in_region(id));
            }
        }

        let (kind, preview) = match region_edge(bounds, x, y) {
            Some(edge) => edge,
            None if is_control => (DockKind::Exchange, bounds),
            None => (DockKind::Tab, bounds),
        };
        let active = self
            .node(id)
            .and_then(|node| node.as_region())
            .and_then(DockRegion::active_control);
        let control = if kind == DockKind::Exchange { active } else { None };
        Some(DockInfo::new(kind, preview).in_region(id).with_control(control))
    }
}

/// Edge drop for a point inside a region: the outer third on each side,
/// with left/right winning a corner only when proportionally closer.
fn region_edge(bounds: Rect, x: i32, y: i32) -> Option<(DockKind, Rect)> {
    let (lx, ty, dx, dy) = (bounds.x, bounds.y, bounds.width, bounds.height);
    let left = x - lx;
    let right = lx + dx - 1 - x;
    let top = y - ty;
    let bottom = ty + dy - 1 - y;
    let mdx = dx / 3;
    let mdy = dy / 3;

    let (left_w, right_w) = (i64::from(left) * i64::from(mdy), i64::from(right) * i64::from(mdy));
    let top_w = i64::from(top) * i64::from(mdx);
    let bottom_w = i64::from(bottom) * i64::from(mdx);

    if left <= mdx && left_w <= top_w && left_w <= bottom_w {
        return Some((DockKind::Left, Rect::new(lx, ty, mdx, dy)));
    }
    if right <= mdx && right_w <= top_w && right_w <= bottom_w {
        return Some((DockKind::Right, Rect::new(lx + dx - mdx, ty, mdx, dy)));
    }
    if top <= mdy {
        return Some((DockKind::Top, Rect::new(lx, ty, dx, mdy)));
    }
    if bottom <= mdy {
        return Some((DockKind::Bottom, Rect::new(lx, ty + dy - mdy, dx, mdy)));
    }
    None
}
