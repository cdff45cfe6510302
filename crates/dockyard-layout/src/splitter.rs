//! Splitter bars between adjacent section children.

use dockyard_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::item::SplitterStyle;
use crate::structure::SplitterRecord;

/// A draggable bar between visible children `index` and `index + 1` of a
/// section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DockSplitter {
    pub(crate) index: usize,
    pub(crate) bounds: Rect,
    pub(crate) style: SplitterStyle,
    #[serde(skip)]
    pub(crate) hot_zone: i32,
    /// Where the bar sat before its last collapse or drag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) last_bounds: Option<Rect>,
}

/// Which neighbour of a splitter, if any, is collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitterState {
    /// The bar sits at the start of its span; the first neighbour is empty.
    Leading,
    Middle,
    /// The bar sits at the end of its span; the second neighbour is empty.
    Trailing,
}

impl DockSplitter {
    pub(crate) fn new(index: usize, style: SplitterStyle) -> Self {
        Self {
            index,
            bounds: Rect::default(),
            style,
            hot_zone: 0,
            last_bounds: None,
        }
    }

    pub(crate) fn place(&mut self, index: usize, bounds: Rect, style: SplitterStyle, hot_zone: i32) {
        self.index = index;
        self.bounds = bounds;
        self.style = style;
        self.hot_zone = hot_zone;
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub const fn style(&self) -> SplitterStyle {
        self.style
    }

    /// Hit area: the bar grown across its thin axis by the hot zone.
    #[must_use]
    pub const fn hot_spot(&self) -> Rect {
        match self.style {
            SplitterStyle::Vertical => self.bounds.inflate(self.hot_zone, 0),
            SplitterStyle::Horizontal => self.bounds.inflate(0, self.hot_zone),
        }
    }

    #[must_use]
    pub const fn is_at(&self, x: i32, y: i32) -> bool {
        self.hot_spot().contains(x, y)
    }

    #[must_use]
    pub const fn last_bounds(&self) -> Option<Rect> {
        self.last_bounds
    }

    /// Open/close click area: the first `len` pixels of the bar.
    #[must_use]
    pub fn button(&self, len: i32) -> Rect {
        let b = self.bounds;
        match self.style {
            SplitterStyle::Vertical => Rect::new(b.x, b.y, b.width, len.clamp(0, b.height)),
            SplitterStyle::Horizontal => Rect::new(b.x, b.y, len.clamp(0, b.width), b.height),
        }
    }

    /// Whether a click on the button at (`x`, `y`) collapses toward the
    /// first neighbour. On a horizontal bar that is the left half of the
    /// button; on a vertical bar, the lower half.
    #[must_use]
    pub fn collapses_first(&self, len: i32, x: i32, y: i32) -> bool {
        let button = self.button(len);
        match self.style {
            SplitterStyle::Horizontal => x < button.x + button.width / 2,
            SplitterStyle::Vertical => y >= button.y + button.height / 2,
        }
    }

    /// Bounds of the bar after moving `start` by (`dx`, `dy`) along its
    /// movable axis, kept inside `limits`.
    #[must_use]
    pub fn dragged(&self, start: Rect, limits: Rect, dx: i32, dy: i32) -> Rect {
        match self.style {
            SplitterStyle::Vertical => {
                let high = (limits.right() - start.width).max(limits.x);
                Rect::new((start.x + dx).clamp(limits.x, high), start.y, start.width, start.height)
            }
            SplitterStyle::Horizontal => {
                let high = (limits.bottom() - start.height).max(limits.y);
                Rect::new(start.x, (start.y + dy).clamp(limits.y, high), start.width, start.height)
            }
        }
    }
}

impl From<&SplitterRecord> for DockSplitter {
    fn from(record: &SplitterRecord) -> Self {
        let mut splitter = Self::new(record.index, record.style);
        splitter.bounds = record.bounds;
        splitter.last_bounds = record.last_bounds;
        splitter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_bar() -> DockSplitter {
        let mut splitter = DockSplitter::new(0, SplitterStyle::Vertical);
        splitter.place(0, Rect::new(100, 0, 4, 60), SplitterStyle::Vertical, 2);
        splitter
    }

    #[test]
    fn hot_zone_grows_thin_axis_only() {
        let splitter = vertical_bar();
        assert_eq!(splitter.hot_spot(), Rect::new(98, 0, 8, 60));
        assert!(splitter.is_at(98, 10));
        assert!(splitter.is_at(105, 59));
        assert!(!splitter.is_at(106, 10));
        assert!(!splitter.is_at(100, 60));
    }

    #[test]
    fn horizontal_hot_zone() {
        let mut splitter = DockSplitter::new(1, SplitterStyle::Horizontal);
        splitter.place(1, Rect::new(0, 50, 80, 5), SplitterStyle::Horizontal, 3);
        assert_eq!(splitter.hot_spot(), Rect::new(0, 47, 80, 11));
    }

    #[test]
    fn drag_is_clamped_to_limits() {
        let splitter = vertical_bar();
        let start = splitter.bounds();
        let limits = Rect::new(0, 0, 208, 60);
        assert_eq!(splitter.dragged(start, limits, -30, 99).x, 70);
        assert_eq!(splitter.dragged(start, limits, -500, 0).x, 0);
        assert_eq!(splitter.dragged(start, limits, 500, 0).x, 204);
        assert_eq!(splitter.dragged(start, limits, 10, 0).y, 0);
    }

    #[test]
    fn button_covers_start_of_bar() {
        let splitter = vertical_bar();
        assert_eq!(splitter.button(12), Rect::new(100, 0, 4, 12));
        assert_eq!(splitter.button(500), splitter.bounds());
        assert!(!splitter.collapses_first(12, 101, 3));
        assert!(splitter.collapses_first(12, 101, 9));

        let mut bar = DockSplitter::new(0, SplitterStyle::Horizontal);
        bar.place(0, Rect::new(0, 40, 90, 4), SplitterStyle::Horizontal, 0);
        assert_eq!(bar.button(12), Rect::new(0, 40, 12, 4));
        assert!(bar.collapses_first(12, 2, 41));
        assert!(!bar.collapses_first(12, 8, 41));
    }

    #[test]
    fn placing_keeps_last_bounds() {
        let mut splitter = vertical_bar();
        splitter.last_bounds = Some(Rect::new(40, 0, 4, 60));
        splitter.place(0, Rect::new(10, 0, 4, 60), SplitterStyle::Vertical, 2);
        assert_eq!(splitter.last_bounds(), Some(Rect::new(40, 0, 4, 60)));
    }

    #[test]
    fn degenerate_limits_do_not_panic() {
        let splitter = vertical_bar();
        let limits = Rect::new(100, 0, 2, 60);
        assert_eq!(splitter.dragged(splitter.bounds(), limits, 5, 0).x, 100);
    }
}
