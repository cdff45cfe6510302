//! Painting the parts of the layout the engine owns: splitter bars, tab and
//! drag bar strips, and drag feedback. Control content is painted by the host.

use dockyard_core::geometry::Rect;
use dockyard_core::surface::DrawSurface;

use crate::config::DockTheme;
use crate::info::{DockInfo, DockKind};
use crate::item::{DockNodeKind, NodeId};
use crate::tree::DockTree;

/// Transient drag feedback drawn over the layout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Overlay {
    /// Ghost bar of a non-live splitter drag.
    pub(crate) ghost: Option<Rect>,
    /// Drop target under a dragged tab.
    pub(crate) drop: Option<DockInfo>,
}

const TAB_TEXT_INSET: i32 = 4;

pub(crate) fn paint(tree: &DockTree, theme: &DockTheme, overlay: Overlay, surface: &mut dyn DrawSurface) {
    if let Some(root) = tree.root() {
        paint_node(tree, theme, root, surface);
    }
    if let Some(ghost) = overlay.ghost {
        surface.fill_rect(ghost, theme.splitter_drag);
    }
    if let Some(drop) = overlay.drop {
        paint_drop(theme, &drop, surface);
    }
}

fn paint_node(tree: &DockTree, theme: &DockTheme, id: NodeId, surface: &mut dyn DrawSurface) {
    let Some(node) = tree.node(id) else {
        return;
    };
    if !node.is_shown() {
        return;
    }
    match node.kind() {
        DockNodeKind::Section(section) => {
            for child in section.contents() {
                paint_node(tree, theme, *child, surface);
            }
            for splitter in section.splitters() {
                surface.fill_rect(splitter.bounds(), theme.splitter);
            }
        }
        DockNodeKind::Region(region) => {
            let active = region.active_control();
            for control in region.contents() {
                let Some(data) = tree.control(*control) else {
                    continue;
                };
                let tab = data.drag_bounds();
                if !data.is_visible() || tab.is_empty() {
                    continue;
                }
                let fill = if active == Some(*control) {
                    theme.tab_active
                } else {
                    theme.tab_inactive
                };
                surface.fill_rect(tab, fill);
                let text = surface.text_size(data.name());
                surface.set_clip(Some(tab));
                surface.draw_text(
                    data.name(),
                    tab.x + TAB_TEXT_INSET,
                    tab.y + (tab.height - text.height) / 2,
                    theme.tab_text,
                );
                surface.set_clip(None);
            }
        }
        DockNodeKind::Control(_) => {}
    }
}

fn paint_drop(theme: &DockTheme, drop: &DockInfo, surface: &mut dyn DrawSurface) {
    let (fill, border) = match drop.kind {
        DockKind::Tab => (theme.tab_drop_fill, theme.tab_drop_border),
        DockKind::None | DockKind::Splitter => return,
        _ => (theme.drop_fill, theme.drop_border),
    };
    if drop.kind == DockKind::Export || drop.bounds.is_empty() {
        return;
    }
    surface.fill_rect(drop.bounds, fill);
    surface.stroke_rect(drop.bounds, border, theme.drop_border_width);
}

#[cfg(test)]
mod tests {
    use dockyard_core::geometry::Size;
    use dockyard_core::surface::Rgba;

    use super::*;
    use crate::config::DockConfig;
    use crate::control::DockControl;

    #[derive(Default)]
    struct Recorder {
        fills: Vec<(Rect, Rgba)>,
        strokes: Vec<Rect>,
        texts: Vec<String>,
    }

    impl DrawSurface for Recorder {
        fn fill_rect(&mut self, rect: Rect, color: Rgba) {
            self.fills.push((rect, color));
        }

        fn stroke_rect(&mut self, rect: Rect, _color: Rgba, _width: i32) {
            self.strokes.push(rect);
        }

        fn text_size(&self, text: &str) -> Size {
            Size::new(text.len() as i32 * 6, 8)
        }

        fn draw_text(&mut self, text: &str, _x: i32, _y: i32, _color: Rgba) {
            self.texts.push(text.to_string());
        }
    }

    fn tabbed_row() -> DockTree {
        let mut tree = DockTree::new(DockConfig::default().with_tab_height(20).with_splitter_thickness(4));
        let control = |id: &str| DockControl::new(id).with_size_hint(Size::new(100, 80));
        let left = tree
            .add_region(vec![control("a").with_name("Alpha"), control("b")])
            .expect("left");
        let right = tree.add_region(vec![control("c")]).expect("right");
        let row = tree.add_section(true, vec![left, right]).expect("row");
        tree.set_root(row).expect("root");
        let _ = tree.calc_min(row, true);
        tree.recalc_sizes(row, Rect::new(0, 0, 204, 100));
        tree.set_visibility(row, true);
        tree
    }

    #[test]
    fn paints_tabs_and_splitters() {
        let tree = tabbed_row();
        let theme = DockTheme::default();
        let mut surface = Recorder::default();
        paint(&tree, &theme, Overlay::default(), &mut surface);

        assert_eq!(surface.texts, vec!["Alpha", "b", "c"]);
        let c = tree.find_control("c").expect("c");
        assert_eq!(tree.control(c).expect("c").drag_bounds(), Rect::new(104, 0, 100, 20));
        let tab_colors: Vec<Rgba> = surface.fills.iter().take(2).map(|(_, color)| *color).collect();
        assert_eq!(tab_colors, vec![theme.tab_active, theme.tab_inactive]);
        assert!(surface.fills.iter().any(|(_, color)| *color == theme.splitter));
    }

    #[test]
    fn overlay_draws_ghost_and_drop_preview() {
        let tree = tabbed_row();
        let theme = DockTheme::default();
        let mut surface = Recorder::default();
        let overlay = Overlay {
            ghost: Some(Rect::new(60, 0, 4, 100)),
            drop: Some(DockInfo::new(DockKind::Left, Rect::new(0, 0, 50, 100))),
        };
        paint(&tree, &theme, overlay, &mut surface);
        assert!(surface.fills.contains(&(Rect::new(60, 0, 4, 100), theme.splitter_drag)));
        assert!(surface.fills.contains(&(Rect::new(0, 0, 50, 100), theme.drop_fill)));
        assert_eq!(surface.strokes, vec![Rect::new(0, 0, 50, 100)]);
    }

    #[test]
    fn export_has_no_preview() {
        let theme = DockTheme::default();
        let mut surface = Recorder::default();
        paint_drop(&theme, &DockInfo::new(DockKind::Export, Rect::new(5, 5, 0, 0)), &mut surface);
        assert!(surface.fills.is_empty());
    }
}
