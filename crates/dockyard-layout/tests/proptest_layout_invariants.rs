//! Property-based invariant tests for the dock tree.
//!
//! 1. A proportional row hands out exactly its width: children plus
//!    splitters add up to the area, with no gaps or overlaps.
//! 2. Closing controls in any order keeps the tree well formed: no empty
//!    region, no section with fewer than two children, consistent parent
//!    links. The last close reports an empty window exactly once.
//! 3. Saving and restoring a structure reproduces the same layout.

use dockyard_layout::{
    ContentSpec, DockConfig, DockControl, DockHost, DockNode, DockSizer, NodeId, Rect, Size,
};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Default)]
struct CountingHost {
    emptied: usize,
}

impl DockHost for CountingHost {
    fn refresh(&mut self, _rect: Rect) {}

    fn update(&mut self) {}

    fn dock_window_empty(&mut self) {
        self.emptied += 1;
    }
}

fn row(widths: &[i32], thickness: i32) -> DockSizer {
    let mut sizer = DockSizer::new(DockConfig::default().with_splitter_thickness(thickness));
    sizer
        .set_contents(ContentSpec::Section(
            widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    DockControl::new(format!("c{i}"))
                        .with_size_hint(Size::new(*width, 50))
                        .into()
                })
                .collect(),
        ))
        .expect("contents");
    sizer
}

fn top_level(sizer: &DockSizer) -> Vec<NodeId> {
    let tree = sizer.tree();
    let Some(root) = tree.root() else {
        return Vec::new();
    };
    match tree.node(root).and_then(DockNode::as_section) {
        Some(section) => section.contents().to_vec(),
        None => vec![root],
    }
}

/// Controls split into up to three columns; every third control joins the
/// previous control's region as a tab.
fn nested(groups: &[usize]) -> ContentSpec {
    let mut columns: Vec<Vec<ContentSpec>> = vec![Vec::new(), Vec::new(), Vec::new()];
    for (i, group) in groups.iter().enumerate() {
        let control = DockControl::new(format!("c{i}")).with_size_hint(Size::new(60, 40));
        let column = &mut columns[*group];
        match column.last_mut() {
            Some(ContentSpec::Region(tabs)) if i % 3 == 2 => tabs.push(control.into()),
            _ => column.push(ContentSpec::Region(vec![control.into()])),
        }
    }
    ContentSpec::Section(
        columns
            .into_iter()
            .filter(|column| !column.is_empty())
            .map(ContentSpec::Section)
            .collect(),
    )
}

fn nested_with_close_order() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(0usize..3, 2..=9).prop_flat_map(|groups| {
        let order: Vec<usize> = (0..groups.len()).collect();
        (Just(groups), Just(order).prop_shuffle())
    })
}

// ── Properties ──────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn proportional_row_conserves_width(
        widths in prop::collection::vec(50i32..=200, 1..=4),
        area in 400i32..=1600,
        thickness in 0i32..=6,
    ) {
        let mut sizer = row(&widths, thickness);
        sizer.perform_layout(Rect::new(0, 0, area, 80));

        let children = top_level(&sizer);
        prop_assert_eq!(children.len(), widths.len());
        let bounds: Vec<Rect> = children
            .iter()
            .filter_map(|id| sizer.tree().node(*id).map(DockNode::bounds))
            .collect();

        let total: i32 = bounds.iter().map(|b| b.width).sum();
        let gaps = (widths.len() as i32 - 1) * thickness;
        prop_assert_eq!(total + gaps, area);

        let mut x = 0;
        for b in &bounds {
            prop_assert!(b.width >= 0);
            prop_assert_eq!(b.x, x);
            prop_assert_eq!(b.height, 80);
            x = b.right() + thickness;
        }
    }

    #[test]
    fn closing_keeps_tree_well_formed((groups, order) in nested_with_close_order()) {
        let mut sizer = DockSizer::default();
        sizer.set_contents(nested(&groups)).expect("contents");
        prop_assert!(sizer.tree().validate().is_ok());
        sizer.perform_layout(Rect::new(0, 0, 640, 480));

        let mut host = CountingHost::default();
        for (closed, index) in order.iter().enumerate() {
            let id = sizer.find_control(&format!("c{index}")).expect("still open");
            prop_assert!(sizer.close_control(id, false).is_ok());
            prop_assert!(sizer.tree().validate().is_ok());
            prop_assert_eq!(sizer.controls(false).len(), groups.len() - closed - 1);
            let _ = sizer.flush(&mut host);
        }
        prop_assert!(sizer.tree().is_empty());
        prop_assert_eq!(host.emptied, 1);
    }

    #[test]
    fn structure_round_trip_is_stable(groups in prop::collection::vec(0usize..3, 1..=8)) {
        let area = Rect::new(0, 0, 800, 600);
        let mut sizer = DockSizer::default();
        sizer.set_contents(nested(&groups)).expect("contents");
        sizer.perform_layout(area);
        let saved = sizer.structure();

        sizer.set_structure(&saved, None);
        sizer.perform_layout(area);
        prop_assert_eq!(sizer.structure(), saved);
    }
}
