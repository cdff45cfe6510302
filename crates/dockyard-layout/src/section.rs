//! Rows and columns of regions or nested sections, separated by splitters.
//!
//! # Layout
//!
//! A section whose visible children are all resizable distributes its major
//! axis proportionally to the children's current hints:
//!
//! ```text
//! available = major - (n - 1) * splitter
//! size_i    = round(hint_i * available / max(1, sum(hints)))   (i < n - 1)
//! size_last = available - sum(size_i)
//! ```
//!
//! Children that all have a zero hint share the axis evenly.
//!
//! A section containing any non-resizable child packs its children at their
//! minimum size instead, with the last child taking whatever remains and no
//! splitters.
//!
//! A click at the start of a splitter bar collapses one neighbour to zero
//! and a second click reopens it; see [`DockTree::toggle_splitter`].

use dockyard_core::geometry::{Rect, Size};

use crate::error::DockError;
use crate::info::{DockInfo, DockKind, HitTarget};
use crate::item::{DockNodeKind, DockNodeKindTag, NodeId, SplitterStyle};
use crate::splitter::{DockSplitter, SplitterState};
use crate::tree::DockTree;

/// A row (`is_row`) or column of children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockSection {
    pub(crate) is_row: bool,
    pub(crate) contents: Vec<NodeId>,
    pub(crate) splitters: Vec<DockSplitter>,
}

impl DockSection {
    pub(crate) fn new(is_row: bool, contents: Vec<NodeId>) -> Self {
        Self {
            is_row,
            contents,
            splitters: Vec::new(),
        }
    }

    #[must_use]
    pub const fn is_row(&self) -> bool {
        self.is_row
    }

    #[must_use]
    pub fn contents(&self) -> &[NodeId] {
        &self.contents
    }

    /// Splitters from the last proportional layout pass, one between each
    /// pair of adjacent visible children.
    #[must_use]
    pub fn splitters(&self) -> &[DockSplitter] {
        &self.splitters
    }
}

impl DockTree {
    fn section_mut(&mut self, id: NodeId) -> Option<&mut DockSection> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(DockNodeKind::Section(section)) => Some(section),
            _ => None,
        }
    }

    fn section_is_row(&self, id: NodeId) -> bool {
        self.node(id)
            .and_then(|node| node.as_section())
            .is_some_and(DockSection::is_row)
    }

    pub(crate) fn section_calc_min(&mut self, id: NodeId, use_size: bool) -> Size {
        let is_row = self.section_is_row(id);
        let visible = self.visible_children(id);
        let resizable = self.is_resizable(id);
        let n = visible.len() as i32;

        let mut major = 0;
        let mut minor = 0;
        for child in &visible {
            let size = self.calc_min(*child, use_size);
            let (child_major, child_minor) = split_axes(size, is_row);
            major += child_major;
            minor = minor.max(child_minor);
        }

        if resizable {
            major += (n - 1).max(0) * self.config().splitter_thickness;
        } else {
            let padding = self.config().fixed_padding;
            major += (n + 1) * padding;
            minor += 2 * padding;
        }

        let min = join_axes(major, minor, is_row);
        if let Some(node) = self.nodes.get_mut(&id) {
            if !node.has_hint() {
                node.set_hint(min);
            }
        }
        min
    }

    pub(crate) fn section_recalc(&mut self, id: NodeId, rect: Rect) {
        let rect = Rect::new(rect.x, rect.y, rect.width.max(0), rect.height.max(0));
        match self.nodes.get_mut(&id) {
            Some(node) => {
                node.set_hint(rect.size());
                node.bounds = rect;
            }
            None => return,
        }

        if self.is_resizable(id) {
            self.section_recalc_proportional(id, rect);
        } else {
            self.section_recalc_fixed(id, rect);
        }

        for child in self.children_of(id) {
            let visible = self.is_visible(child);
            self.set_visibility(child, visible);
        }
    }

    fn section_recalc_proportional(&mut self, id: NodeId, rect: Rect) {
        let is_row = self.section_is_row(id);
        let visible = self.visible_children(id);
        let thickness = self.config().splitter_thickness;
        let gaps = (visible.len() as i32 - 1).max(0);

        let (mut pos, origin_minor) = if is_row { (rect.x, rect.y) } else { (rect.y, rect.x) };
        let (major, minor) = split_axes(rect.size(), is_row);
        let available = major - gaps * thickness;

        let mut hints: Vec<i32> = visible
            .iter()
            .map(|child| {
                let hint = self.node(*child).map(|node| node.size_hint()).unwrap_or_default();
                split_axes(hint, is_row).0.max(0)
            })
            .collect();
        // Children with no size at all share the space evenly.
        if hints.iter().all(|hint| *hint == 0) {
            hints.fill(1);
        }
        let total = hints.iter().sum::<i32>().max(1);

        let mut remaining = available;
        let mut bars = Vec::with_capacity(gaps as usize);
        for (i, child) in visible.iter().enumerate() {
            let last = i + 1 == visible.len();
            let size = if last {
                remaining
            } else {
                (f64::from(hints[i]) * f64::from(available) / f64::from(total)).round() as i32
            };
            self.recalc_sizes(*child, place(pos, origin_minor, size, minor, is_row));
            remaining -= size;
            pos += size;
            if !last {
                bars.push(place(pos, origin_minor, thickness, minor, is_row));
                pos += thickness;
            }
        }

        let hot_zone = self.config().splitter_hot_zone;
        if let Some(section) = self.section_mut(id) {
            let mut previous = std::mem::take(&mut section.splitters).into_iter();
            section.splitters = bars
                .into_iter()
                .enumerate()
                .map(|(index, bounds)| {
                    let mut splitter = previous
                        .next()
                        .unwrap_or_else(|| DockSplitter::new(index, SplitterStyle::for_section(is_row)));
                    splitter.place(index, bounds, SplitterStyle::for_section(is_row), hot_zone);
                    splitter
                })
                .collect();
        }
    }

    fn section_recalc_fixed(&mut self, id: NodeId, rect: Rect) {
        if let Some(section) = self.section_mut(id) {
            section.splitters.clear();
        }
        let is_row = self.section_is_row(id);
        let padding = self.config().fixed_padding;
        let inner = Rect::new(
            rect.x + padding,
            rect.y + padding,
            (rect.width - 2 * padding).max(0),
            (rect.height - 2 * padding).max(0),
        );
        let (mut pos, origin_minor) = if is_row { (inner.x, inner.y) } else { (inner.y, inner.x) };
        let (mut space, minor) = split_axes(inner.size(), is_row);

        let visible = self.visible_children(id);
        for (i, child) in visible.iter().enumerate() {
            let wanted = if i + 1 == visible.len() {
                space
            } else {
                split_axes(self.calc_min(*child, false), is_row).0
            };
            let size = wanted.min(space);
            space = (space - size - padding).max(0);
            self.recalc_sizes(*child, place(pos, origin_minor, size, minor, is_row));
            pos += size + padding;
        }
    }

    /// Range a splitter may be dragged within: the span of its two
    /// neighbours.
    pub fn splitter_limits(&self, section: NodeId, index: usize) -> Result<Rect, DockError> {
        let data = self.require_section(section)?;
        let splitter = data
            .splitters
            .get(index)
            .ok_or(DockError::UnknownSplitter { section, index })?;
        let visible = self.visible_children(section);
        let (first, second) = neighbours(&visible, index, section)?;
        let a = self.bounds_of(first);
        let b = self.bounds_of(second);
        let bar = splitter.bounds;
        Ok(if data.is_row {
            Rect::new(a.x, bar.y, b.right() - a.x, bar.height)
        } else {
            Rect::new(bar.x, a.y, bar.width, b.bottom() - a.y)
        })
    }

    /// Resize the two neighbours of splitter `index` to meet its current
    /// bounds. Returns the rectangle needing a repaint.
    pub fn update_splitter(&mut self, section: NodeId, index: usize) -> Result<Rect, DockError> {
        let data = self.require_section(section)?;
        let is_row = data.is_row;
        let bar = data
            .splitters
            .get(index)
            .ok_or(DockError::UnknownSplitter { section, index })?
            .bounds;
        let visible = self.visible_children(section);
        let (first, second) = neighbours(&visible, index, section)?;
        let a = self.bounds_of(first);
        let b = self.bounds_of(second);

        if is_row {
            self.recalc_sizes(first, Rect::new(a.x, a.y, bar.x - a.x, a.height));
            self.recalc_sizes(second, Rect::new(bar.right(), b.y, b.right() - bar.right(), b.height));
        } else {
            self.recalc_sizes(first, Rect::new(a.x, a.y, a.width, bar.y - a.y));
            self.recalc_sizes(second, Rect::new(b.x, bar.bottom(), b.width, b.bottom() - bar.bottom()));
        }

        let (dx, dy) = if is_row { (bar.width, 0) } else { (0, bar.height) };
        Ok(Rect::new(
            a.x - dx,
            a.y - dy,
            b.right() - a.x + 2 * dx,
            b.bottom() - a.y + 2 * dy,
        ))
    }

    pub(crate) fn splitter(&self, section: NodeId, index: usize) -> Result<&DockSplitter, DockError> {
        self.require_section(section)?
            .splitters
            .get(index)
            .ok_or(DockError::UnknownSplitter { section, index })
    }

    pub(crate) fn splitter_neighbours(
        &self,
        section: NodeId,
        index: usize,
    ) -> Result<(NodeId, NodeId), DockError> {
        neighbours(&self.visible_children(section), index, section)
    }

    /// Move splitter `index` without touching its neighbours.
    pub(crate) fn place_splitter(
        &mut self,
        section: NodeId,
        index: usize,
        bounds: Rect,
    ) -> Result<(), DockError> {
        let splitter = self
            .section_mut(section)
            .and_then(|data| data.splitters.get_mut(index))
            .ok_or(DockError::UnknownSplitter { section, index })?;
        splitter.bounds = bounds;
        Ok(())
    }

    /// Whether splitter `index` collapses one of its neighbours.
    pub fn splitter_state(&self, section: NodeId, index: usize) -> Result<SplitterState, DockError> {
        let is_row = self.require_section(section)?.is_row;
        let bar = self.splitter(section, index)?.bounds;
        let limits = self.splitter_limits(section, index)?;
        let (start, end) = span(limits, is_row);
        let (bar_start, bar_end) = span(bar, is_row);
        Ok(if bar_start <= start {
            SplitterState::Leading
        } else if bar_end >= end {
            SplitterState::Trailing
        } else {
            SplitterState::Middle
        })
    }

    /// Collapse a neighbour of splitter `index`, or reopen a collapsed one.
    ///
    /// An open bar remembers where it was and moves to the start of its
    /// span (`toward_first`) or to the end. A collapsed bar goes back to the
    /// remembered position, or to the middle of the span when that position
    /// is gone. Only the bar moves; follow with
    /// [`update_splitter`](Self::update_splitter). Returns the new bounds.
    pub fn toggle_splitter(
        &mut self,
        section: NodeId,
        index: usize,
        toward_first: bool,
    ) -> Result<Rect, DockError> {
        let is_row = self.require_section(section)?.is_row;
        let state = self.splitter_state(section, index)?;
        let (start, end) = span(self.splitter_limits(section, index)?, is_row);
        let splitter = self.splitter(section, index)?;
        let bar = splitter.bounds;
        let (pos, thickness) = if is_row { (bar.x, bar.width) } else { (bar.y, bar.height) };

        let (target, last) = if state == SplitterState::Middle {
            let target = if toward_first { start } else { end - thickness };
            (target, Some(bar))
        } else {
            let restored = splitter
                .last_bounds
                .map(|last| if is_row { last.x } else { last.y })
                .filter(|last| *last != pos && *last >= start && *last + thickness <= end);
            (
                restored.unwrap_or((start + end - thickness) / 2),
                splitter.last_bounds,
            )
        };
        let moved = if is_row {
            Rect::new(target, bar.y, bar.width, bar.height)
        } else {
            Rect::new(bar.x, target, bar.width, bar.height)
        };
        let splitter = self
            .section_mut(section)
            .and_then(|data| data.splitters.get_mut(index))
            .ok_or(DockError::UnknownSplitter { section, index })?;
        splitter.bounds = moved;
        splitter.last_bounds = last;
        dockyard_core::debug!(section = %section, index, state = ?state, "splitter toggled");
        Ok(moved)
    }

    /// Remember `bounds` as the position a collapsed splitter reopens to.
    pub(crate) fn remember_splitter(&mut self, section: NodeId, index: usize, bounds: Rect) {
        if let Some(splitter) = self
            .section_mut(section)
            .and_then(|data| data.splitters.get_mut(index))
        {
            splitter.last_bounds = Some(bounds);
        }
    }

    /// Whether every control on both sides of splitter `index` is locked.
    #[must_use]
    pub fn is_splitter_locked(&self, section: NodeId, index: usize) -> bool {
        let visible = self.visible_children(section);
        match neighbours(&visible, index, section) {
            Ok((first, second)) => self.is_locked(first) && self.is_locked(second),
            Err(_) => false,
        }
    }

    pub(crate) fn section_object_at(&self, id: NodeId, x: i32, y: i32) -> Option<HitTarget> {
        let node = self.node(id)?;
        if !node.shown {
            return None;
        }
        let section = node.as_section()?;
        if let Some(splitter) = section.splitters.iter().find(|s| s.is_at(x, y)) {
            return Some(HitTarget::Splitter {
                section: id,
                index: splitter.index,
            });
        }
        self.visible_children(id)
            .into_iter()
            .find_map(|child| self.object_at_node(child, x, y))
    }

    /// Drop target in a section: splitters first, then children; with
    /// `force`, the section's own edges (or an export far outside). A hidden
    /// section offers nothing.
    pub(crate) fn section_dock_info(
        &self,
        id: NodeId,
        x: i32,
        y: i32,
        tab_width: i32,
        is_control: bool,
        force: bool,
    ) -> Option<DockInfo> {
        let node = self.node(id)?;
        if !node.shown {
            return None;
        }
        let section = node.as_section()?;
        if let Some(splitter) = section.splitters.iter().find(|s| s.is_at(x, y)) {
            return Some(DockInfo::new(DockKind::Splitter, splitter.bounds));
        }
        for child in self.visible_children(id) {
            if let Some(info) = self.node_dock_info(child, x, y, tab_width, is_control) {
                return Some(info);
            }
        }
        force.then(|| forced_dock_info(node.bounds, x, y, self.config().export_distance))
    }

    /// Insert the detached region `item` beside `target` (a child of
    /// `section`) on `edge`.
    ///
    /// An edge across the section's axis wraps `target` in a new
    /// perpendicular section; an edge along it inserts `item` next to
    /// `target`. The target's slot is split evenly between the two.
    pub(crate) fn section_add(
        &mut self,
        section: NodeId,
        item: NodeId,
        target: NodeId,
        edge: DockKind,
    ) -> Result<(), DockError> {
        let is_row = self.require_section(section)?.is_row;
        let index = self
            .children_of(section)
            .iter()
            .position(|child| *child == target)
            .ok_or(DockError::NotAChild {
                parent: section,
                child: target,
            })?;
        if self.tag(item) == Some(DockNodeKindTag::Control) {
            return Err(DockError::NotARegion { node_id: item });
        }

        let target_hint = self.require(target)?.size_hint();
        let across = is_row != edge.is_horizontal();
        let split_row = if across { !is_row } else { is_row };
        let (major, minor) = split_axes(target_hint, split_row);
        let half = join_axes((major / 2).max(0), minor, split_row);
        let rest = join_axes((major - major / 2).max(0), minor, split_row);
        if let Some(node) = self.nodes.get_mut(&target) {
            node.set_hint(rest);
        }
        if let Some(node) = self.nodes.get_mut(&item) {
            node.set_hint(half);
        }

        if across {
            let pair = if edge.is_leading() {
                vec![item, target]
            } else {
                vec![target, item]
            };
            let bounds = self.bounds_of(target);
            self.set_parent(target, None);
            let wrapper = self.add_section(!is_row, pair)?;
            if let Some(node) = self.nodes.get_mut(&wrapper) {
                node.set_hint(target_hint);
                node.bounds = bounds;
            }
            if let Some(section) = self.section_mut(section) {
                section.contents[index] = wrapper;
            }
            self.set_parent(wrapper, Some(section));
        } else {
            let at = if edge.is_leading() { index } else { index + 1 };
            self.insert_child(section, at, item)?;
        }
        self.mark_modified();
        Ok(())
    }
}

/// Root-level drop classification for a point relative to `bounds`.
///
/// Far outside (more than `export_distance` beyond any edge) is an export;
/// otherwise the nearest edge, weighting horizontal distances by the
/// height and vertical ones by the width, with half-section previews.
#[must_use]
pub fn forced_dock_info(bounds: Rect, x: i32, y: i32, export_distance: i32) -> DockInfo {
    let (lx, ty, dx, dy) = (bounds.x, bounds.y, bounds.width, bounds.height);
    let left = lx - x;
    let right = x - lx - dx + 1;
    let top = ty - y;
    let bottom = y - ty - dy + 1;

    if left.max(right).max(top).max(bottom) > export_distance {
        return DockInfo::new(DockKind::Export, Rect::new(x, y, 0, 0));
    }

    let (left, right, top, bottom) = (left.abs(), right.abs(), top.abs(), bottom.abs());
    let mdx = dx / 2;
    let mdy = dy / 2;
    let left_w = i64::from(left) * i64::from(mdy);
    let right_w = i64::from(right) * i64::from(mdy);
    let top_w = i64::from(top) * i64::from(mdx);
    let bottom_w = i64::from(bottom) * i64::from(mdx);

    let (kind, preview) = if left <= mdx && left_w <= top_w && left_w <= bottom_w {
        (DockKind::Left, Rect::new(lx, ty, mdx, dy))
    } else if right <= mdx && right_w <= top_w && right_w <= bottom_w {
        (DockKind::Right, Rect::new(lx + dx - mdx, ty, mdx, dy))
    } else if top <= mdy {
        (DockKind::Top, Rect::new(lx, ty, dx, mdy))
    } else {
        (DockKind::Bottom, Rect::new(lx, ty + dy - mdy, dx, mdy))
    };
    DockInfo::new(kind, preview)
}

fn neighbours(visible: &[NodeId], index: usize, section: NodeId) -> Result<(NodeId, NodeId), DockError> {
    match (visible.get(index), visible.get(index + 1)) {
        (Some(first), Some(second)) => Ok((*first, *second)),
        _ => Err(DockError::UnknownSplitter { section, index }),
    }
}

/// Start and end of `rect` along the axis of a row or column.
const fn span(rect: Rect, is_row: bool) -> (i32, i32) {
    if is_row {
        (rect.x, rect.x + rect.width)
    } else {
        (rect.y, rect.y + rect.height)
    }
}

/// (major, minor) extents of `size` for a row or column.
const fn split_axes(size: Size, is_row: bool) -> (i32, i32) {
    if is_row {
        (size.width, size.height)
    } else {
        (size.height, size.width)
    }
}

const fn join_axes(major: i32, minor: i32, is_row: bool) -> Size {
    if is_row {
        Size::new(major, minor)
    } else {
        Size::new(minor, major)
    }
}

const fn place(pos: i32, minor_pos: i32, major: i32, minor: i32, is_row: bool) -> Rect {
    if is_row {
        Rect::new(pos, minor_pos, major, minor)
    } else {
        Rect::new(minor_pos, pos, minor, major)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DockConfig;
    use crate::control::DockControl;
    use crate::item::DockStyle;

    fn row_of(tree: &mut DockTree, widths: &[i32]) -> (NodeId, Vec<NodeId>) {
        let regions: Vec<NodeId> = widths
            .iter()
            .enumerate()
            .map(|(i, width)| {
                tree.add_region(vec![
                    DockControl::new(format!("c{i}")).with_size_hint(Size::new(*width, 50)),
                ])
                .expect("region")
            })
            .collect();
        let section = tree.add_section(true, regions.clone()).expect("section");
        tree.set_root(section).expect("root");
        let _ = tree.calc_min(section, true);
        (section, regions)
    }

    #[test]
    fn proportional_layout_conserves_width() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(4));
        let (section, regions) = row_of(&mut tree, &[100, 200, 100]);
        tree.recalc_sizes(section, Rect::new(0, 0, 408, 60));

        let widths: Vec<i32> = regions.iter().map(|r| tree.bounds_of(*r).width).collect();
        assert_eq!(widths, vec![100, 200, 100]);
        assert_eq!(tree.bounds_of(regions[1]).x, 104);
        assert_eq!(tree.bounds_of(regions[2]).x, 308);

        let splitters = tree.require_section(section).expect("section").splitters().to_vec();
        assert_eq!(splitters.len(), 2);
        assert_eq!(splitters[0].bounds(), Rect::new(100, 0, 4, 60));
        assert_eq!(splitters[1].style(), SplitterStyle::Vertical);
    }

    #[test]
    fn proportional_layout_scales_on_resize() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(0));
        let (section, regions) = row_of(&mut tree, &[100, 300]);
        tree.recalc_sizes(section, Rect::new(0, 0, 200, 50));
        assert_eq!(tree.bounds_of(regions[0]).width, 50);
        assert_eq!(tree.bounds_of(regions[1]).width, 150);
    }

    #[test]
    fn tiny_hints_clamp_last_child_to_zero() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(0));
        let (section, regions) = row_of(&mut tree, &[1, 1, 0]);
        tree.recalc_sizes(section, Rect::new(0, 0, 1, 10));
        assert_eq!(tree.bounds_of(regions[2]).width, 0);
    }

    #[test]
    fn fixed_children_pack_at_minimum() {
        let mut tree = DockTree::default();
        let a = tree
            .add_region(vec![
                DockControl::new("a")
                    .with_style(DockStyle::Fixed)
                    .with_resizable(false)
                    .with_size_hint(Size::new(30, 10)),
            ])
            .expect("a");
        let b = tree
            .add_region(vec![DockControl::new("b").with_size_hint(Size::new(40, 10))])
            .expect("b");
        let section = tree.add_section(true, vec![a, b]).expect("section");
        tree.set_root(section).expect("root");
        assert!(!tree.is_resizable(section));
        // Only the tabbed region carries a tab strip.
        assert_eq!(tree.calc_min(section, false), Size::new(70, 30));

        tree.recalc_sizes(section, Rect::new(0, 0, 200, 40));
        assert_eq!(tree.bounds_of(a), Rect::new(0, 0, 30, 40));
        assert_eq!(tree.bounds_of(b), Rect::new(30, 0, 170, 40));
        assert!(tree.require_section(section).expect("section").splitters().is_empty());
    }

    #[test]
    fn content_less_children_split_evenly() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(0));
        let regions: Vec<NodeId> = ["a", "b", "c"]
            .iter()
            .map(|id| tree.add_region(vec![DockControl::new(*id)]).expect("region"))
            .collect();
        let section = tree.add_section(true, regions.clone()).expect("section");
        tree.set_root(section).expect("root");
        tree.recalc_sizes(section, Rect::new(0, 0, 300, 90));
        let widths: Vec<i32> = regions.iter().map(|r| tree.bounds_of(*r).width).collect();
        assert_eq!(widths, vec![100, 100, 100]);
    }

    #[test]
    fn calc_min_adds_splitters() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(5));
        let (section, _) = row_of(&mut tree, &[10, 20, 30]);
        assert_eq!(tree.calc_min(section, true), Size::new(70, 50));
    }

    #[test]
    fn hidden_children_take_no_space() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(0));
        let (section, regions) = row_of(&mut tree, &[100, 100, 100]);
        let hidden = tree.find_control("c1").expect("c1");
        tree.set_control_visible(hidden, false).expect("hide");
        tree.recalc_sizes(section, Rect::new(0, 0, 300, 50));
        assert_eq!(tree.bounds_of(regions[0]).width, 150);
        assert_eq!(tree.bounds_of(regions[2]), Rect::new(150, 0, 150, 50));
        assert!(!tree.node(regions[1]).expect("node").is_shown());
        assert_eq!(tree.require_section(section).expect("s").splitters().len(), 1);
    }

    #[test]
    fn update_splitter_resizes_neighbours_only() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(4));
        let (section, regions) = row_of(&mut tree, &[100, 100, 100]);
        tree.recalc_sizes(section, Rect::new(0, 0, 308, 50));
        if let Some(section) = tree.section_mut(section) {
            section.splitters[0].bounds.x = 60;
        }
        let refresh = tree.update_splitter(section, 0).expect("update");
        assert_eq!(tree.bounds_of(regions[0]).width, 60);
        assert_eq!(tree.bounds_of(regions[1]), Rect::new(64, 0, 140, 50));
        assert_eq!(tree.bounds_of(regions[2]), Rect::new(208, 0, 100, 50));
        assert_eq!(refresh, Rect::new(-4, 0, 212, 50));
    }

    #[test]
    fn splitter_limits_span_neighbours() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(4));
        let (section, _) = row_of(&mut tree, &[100, 100, 100]);
        tree.recalc_sizes(section, Rect::new(0, 0, 308, 50));
        assert_eq!(
            tree.splitter_limits(section, 1).expect("limits"),
            Rect::new(104, 0, 204, 50)
        );
    }

    #[test]
    fn toggle_collapses_and_restores() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(4));
        let (section, regions) = row_of(&mut tree, &[100, 100]);
        tree.recalc_sizes(section, Rect::new(0, 0, 204, 50));
        assert_eq!(tree.splitter_state(section, 0), Ok(SplitterState::Middle));

        let moved = tree.toggle_splitter(section, 0, true).expect("collapse");
        assert_eq!(moved, Rect::new(0, 0, 4, 50));
        tree.update_splitter(section, 0).expect("update");
        assert_eq!(tree.bounds_of(regions[0]).width, 0);
        assert_eq!(tree.bounds_of(regions[1]), Rect::new(4, 0, 200, 50));
        assert_eq!(tree.splitter_state(section, 0), Ok(SplitterState::Leading));

        tree.toggle_splitter(section, 0, true).expect("restore");
        tree.update_splitter(section, 0).expect("update");
        assert_eq!(tree.bounds_of(regions[0]).width, 100);
        assert_eq!(tree.bounds_of(regions[1]), Rect::new(104, 0, 100, 50));

        let moved = tree.toggle_splitter(section, 0, false).expect("collapse");
        assert_eq!(moved.x, 200);
        tree.update_splitter(section, 0).expect("update");
        assert_eq!(tree.bounds_of(regions[1]).width, 0);
        assert_eq!(tree.splitter_state(section, 0), Ok(SplitterState::Trailing));
    }

    #[test]
    fn stale_return_position_reopens_at_middle() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(4));
        let (section, regions) = row_of(&mut tree, &[150, 50]);
        tree.recalc_sizes(section, Rect::new(0, 0, 204, 50));
        tree.toggle_splitter(section, 0, false).expect("collapse");
        tree.update_splitter(section, 0).expect("update");
        // A return position equal to the collapsed one is ignored.
        tree.remember_splitter(section, 0, Rect::new(200, 0, 4, 50));
        let moved = tree.toggle_splitter(section, 0, true).expect("reopen");
        assert_eq!(moved.x, 100);
        tree.update_splitter(section, 0).expect("update");
        assert_eq!(tree.bounds_of(regions[0]).width, 100);
    }

    #[test]
    fn hidden_section_offers_no_forced_edge() {
        let mut tree = DockTree::new(DockConfig::default().with_splitter_thickness(0));
        let control = |id: &str| DockControl::new(id).with_size_hint(Size::new(100, 50));
        let a = tree.add_region(vec![control("a")]).expect("a");
        let b = tree.add_region(vec![control("b")]).expect("b");
        let c = tree.add_region(vec![control("c")]).expect("c");
        let column = tree.add_section(false, vec![b, c]).expect("column");
        let root = tree.add_section(true, vec![a, column]).expect("root");
        tree.set_root(root).expect("root");
        tree.recalc_sizes(root, Rect::new(0, 0, 200, 100));
        assert!(tree.section_dock_info(column, 150, 50, 16, true, true).is_some());

        for id in ["b", "c"] {
            let hidden = tree.find_control(id).expect("control");
            tree.set_control_visible(hidden, false).expect("hide");
        }
        tree.recalc_sizes(root, Rect::new(0, 0, 200, 100));
        assert!(!tree.node(column).expect("column").is_shown());
        assert_eq!(tree.section_dock_info(column, 150, 50, 16, true, true), None);
        assert_eq!(tree.bounds_of(a), Rect::new(0, 0, 200, 100));
    }

    #[test]
    fn splitter_beats_children_in_hit_test() {
        let mut tree = DockTree::new(
            DockConfig::default()
                .with_splitter_thickness(4)
                .with_splitter_hot_zone(3),
        );
        let (section, _) = row_of(&mut tree, &[100, 100]);
        tree.recalc_sizes(section, Rect::new(0, 0, 204, 50));
        // x = 98 lies inside the first region but within the hot zone.
        assert_eq!(
            tree.object_at(98, 10),
            Some(HitTarget::Splitter { section, index: 0 })
        );
        assert_eq!(tree.dock_info_at(98, 10, 16, true).kind, DockKind::Splitter);
    }

    #[test]
    fn forced_edges_and_export() {
        let bounds = Rect::new(0, 0, 100, 50);
        assert_eq!(forced_dock_info(bounds, 50, 25, 20).kind, DockKind::Top);
        assert_eq!(forced_dock_info(bounds, 2, 25, 20).kind, DockKind::Left);
        assert_eq!(forced_dock_info(bounds, 97, 25, 20).kind, DockKind::Right);
        assert_eq!(forced_dock_info(bounds, 50, 48, 20).kind, DockKind::Bottom);
        assert_eq!(forced_dock_info(bounds, -30, 25, 20).kind, DockKind::Export);
        assert_eq!(forced_dock_info(bounds, 50, 60, 20).kind, DockKind::Bottom);
        assert_eq!(forced_dock_info(bounds, 50, 75, 20).kind, DockKind::Export);
        assert_eq!(
            forced_dock_info(bounds, 2, 25, 20).bounds,
            Rect::new(0, 0, 50, 50)
        );
    }

    #[test]
    fn add_across_axis_wraps_target() {
        let mut tree = DockTree::default();
        let (section, regions) = row_of(&mut tree, &[100, 100]);
        let new_region = tree.add_region(vec![DockControl::new("new")]).expect("region");
        tree.section_add(section, new_region, regions[1], DockKind::Top)
            .expect("add");
        let children = tree.children_of(section);
        assert_eq!(children[0], regions[0]);
        let wrapper = tree.require_section(children[1]).expect("wrapper");
        assert!(!wrapper.is_row());
        assert_eq!(wrapper.contents(), &[new_region, regions[1]]);
        tree.validate().expect("valid tree");
    }

    #[test]
    fn add_along_axis_inserts_adjacent() {
        let mut tree = DockTree::default();
        let (section, regions) = row_of(&mut tree, &[100, 100]);
        let new_region = tree.add_region(vec![DockControl::new("new")]).expect("region");
        tree.section_add(section, new_region, regions[0], DockKind::Right)
            .expect("add");
        assert_eq!(tree.children_of(section), vec![regions[0], new_region, regions[1]]);
        assert_eq!(tree.node(new_region).expect("n").size_hint().width, 50);
        assert_eq!(tree.node(regions[0]).expect("n").size_hint().width, 50);
        tree.validate().expect("valid tree");
    }
}
