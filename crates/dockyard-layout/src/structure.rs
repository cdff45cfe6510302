//! Content-free layout records for persistence and maximize/restore.
//!
//! A [`Structure`] mirrors the dock tree but stores only identities, flags
//! and sizes. Live controls are matched back to records by their `id`.

use std::collections::HashMap;

use dockyard_core::geometry::{Rect, Size};
use serde::{Deserialize, Serialize};

use crate::control::DockControl;
use crate::item::{DockNodeKind, DockStyle, NodeId, SplitterStyle};
use crate::splitter::DockSplitter;
use crate::tree::DockTree;

/// Persisted state of one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user_name: bool,
    #[serde(default)]
    pub style: DockStyle,
    #[serde(default)]
    pub user_style: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    #[serde(default = "default_true")]
    pub closeable: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
    #[serde(default = "unset")]
    pub width: i32,
    #[serde(default = "unset")]
    pub height: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    /// Index of the active tab, `-1` when none.
    #[serde(default)]
    pub active_index: i32,
    #[serde(default = "unset")]
    pub width: i32,
    #[serde(default = "unset")]
    pub height: i32,
    pub contents: Vec<ControlRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitterRecord {
    pub index: usize,
    pub bounds: Rect,
    pub style: SplitterStyle,
    /// Position a collapsed splitter reopens to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_bounds: Option<Rect>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRecord {
    pub is_row: bool,
    #[serde(default = "unset")]
    pub width: i32,
    #[serde(default = "unset")]
    pub height: i32,
    pub contents: Vec<Structure>,
    #[serde(default)]
    pub splitters: Vec<SplitterRecord>,
}

/// A saved layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Structure {
    Control(ControlRecord),
    Region(RegionRecord),
    Section(SectionRecord),
}

const fn default_true() -> bool {
    true
}

const fn unset() -> i32 {
    -1
}

impl Structure {
    /// The structure of an empty layout.
    #[must_use]
    pub fn empty() -> Self {
        Self::Section(SectionRecord {
            is_row: true,
            width: -1,
            height: -1,
            contents: Vec::new(),
            splitters: Vec::new(),
        })
    }

    /// Whether no control records are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls().is_empty()
    }

    /// Control records in traversal order.
    #[must_use]
    pub fn controls(&self) -> Vec<&ControlRecord> {
        let mut out = Vec::new();
        self.collect(&mut out);
        out
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a ControlRecord>) {
        match self {
            Self::Control(control) => out.push(control),
            Self::Region(region) => out.extend(region.contents.iter()),
            Self::Section(section) => {
                for child in &section.contents {
                    child.collect(out);
                }
            }
        }
    }

    #[must_use]
    pub fn control_ids(&self) -> Vec<&str> {
        self.controls().into_iter().map(|c| c.id.as_str()).collect()
    }

    /// First record with the given id.
    #[must_use]
    pub fn find_control(&self, id: &str) -> Option<&ControlRecord> {
        self.controls().into_iter().find(|c| c.id == id)
    }

    /// Recorded size of the top-level item.
    #[must_use]
    pub const fn size(&self) -> Size {
        match self {
            Self::Control(c) => Size::new(c.width, c.height),
            Self::Region(r) => Size::new(r.width, r.height),
            Self::Section(s) => Size::new(s.width, s.height),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl DockControl {
    pub(crate) fn record(&self, hint: Size) -> ControlRecord {
        ControlRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            user_name: self.user_name,
            style: self.style,
            user_style: self.user_style,
            visible: self.visible,
            locked: self.locked,
            closeable: self.closeable,
            resizable: self.resizable,
            width: hint.width,
            height: hint.height,
        }
    }

    /// Copy persisted flags and sizes from `record`. The name and style are
    /// taken only when the user customised them, unless `adopt_identity`.
    pub(crate) fn apply_record(&mut self, record: &ControlRecord, adopt_identity: bool) {
        self.visible = record.visible;
        self.locked = record.locked;
        self.closeable = record.closeable;
        self.resizable = record.resizable;
        self.size_hint = Size::new(record.width, record.height);
        if adopt_identity || record.user_name {
            self.name = record.name.clone();
            self.user_name = record.user_name;
        }
        if adopt_identity || record.user_style {
            self.style = record.style;
            self.user_style = record.user_style;
        }
    }
}

impl DockTree {
    /// Snapshot of the current layout.
    #[must_use]
    pub fn structure(&self) -> Structure {
        match self.root() {
            Some(root) => self.node_structure(root),
            None => Structure::empty(),
        }
    }

    fn node_structure(&self, id: NodeId) -> Structure {
        let Some(node) = self.node(id) else {
            return Structure::empty();
        };
        let hint = node.size_hint();
        match node.kind() {
            DockNodeKind::Control(control) => Structure::Control(control.record(hint)),
            DockNodeKind::Region(region) => Structure::Region(RegionRecord {
                active_index: region.active().map_or(-1, |active| active as i32),
                width: hint.width,
                height: hint.height,
                contents: region
                    .contents()
                    .iter()
                    .filter_map(|child| {
                        let node = self.node(*child)?;
                        Some(node.as_control()?.record(node.size_hint()))
                    })
                    .collect(),
            }),
            DockNodeKind::Section(section) => Structure::Section(SectionRecord {
                is_row: section.is_row(),
                width: hint.width,
                height: hint.height,
                contents: section
                    .contents()
                    .iter()
                    .map(|child| self.node_structure(*child))
                    .collect(),
                splitters: section
                    .splitters()
                    .iter()
                    .map(|splitter| SplitterRecord {
                        index: splitter.index(),
                        bounds: splitter.bounds(),
                        style: splitter.style(),
                        last_bounds: splitter.last_bounds(),
                    })
                    .collect(),
            }),
        }
    }

    /// Build detached nodes for `record`, taking controls from `pool` by id.
    ///
    /// Records whose control is missing from the pool are skipped, and
    /// containers left empty are dropped. Returns `None` when nothing was
    /// built.
    pub(crate) fn build_record(
        &mut self,
        record: &Structure,
        pool: &mut HashMap<String, DockControl>,
    ) -> Option<NodeId> {
        match record {
            Structure::Control(control) => {
                let control = pool.remove(&control.id)?;
                let id = self.alloc_control(control);
                Some(self.region_from_nodes(vec![id]))
            }
            Structure::Region(region) => {
                let active_id = usize::try_from(region.active_index)
                    .ok()
                    .and_then(|index| region.contents.get(index))
                    .map(|record| record.id.clone());
                let controls: Vec<NodeId> = region
                    .contents
                    .iter()
                    .filter_map(|record| pool.remove(&record.id))
                    .map(|control| self.alloc_control(control))
                    .collect();
                if controls.is_empty() {
                    return None;
                }
                let id = self.region_from_nodes(controls);
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_hint(Size::new(region.width, region.height));
                }
                self.restore_active(id, active_id.as_deref());
                Some(id)
            }
            Structure::Section(section) => {
                let children: Vec<NodeId> = section
                    .contents
                    .iter()
                    .filter_map(|child| self.build_record(child, pool))
                    .collect();
                if children.is_empty() {
                    return None;
                }
                let id = self.add_section(section.is_row, children).ok()?;
                if let Some(node) = self.nodes.get_mut(&id) {
                    node.set_hint(Size::new(section.width, section.height));
                    // Saved splitters only line up when no child was dropped.
                    if let DockNodeKind::Section(data) = &mut node.kind {
                        if data.contents.len() == section.contents.len() {
                            data.splitters = section.splitters.iter().map(DockSplitter::from).collect();
                        }
                    }
                }
                Some(id)
            }
        }
    }

    fn restore_active(&mut self, region: NodeId, active_id: Option<&str>) {
        let Some(active_id) = active_id else {
            return;
        };
        let index = self.children_of(region).iter().position(|child| {
            self.control(*child)
                .is_some_and(|control| control.visible && control.id == active_id)
        });
        if let Some(index) = index {
            if let Some(DockNodeKind::Region(data)) = self.nodes.get_mut(&region).map(|n| &mut n.kind) {
                data.active = Some(index);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::DockNode;

    fn record(id: &str) -> ControlRecord {
        ControlRecord {
            id: id.to_string(),
            name: id.to_string(),
            user_name: false,
            style: DockStyle::Tab,
            user_style: false,
            visible: true,
            locked: false,
            closeable: true,
            resizable: true,
            width: 10,
            height: 10,
        }
    }

    #[test]
    fn json_uses_kind_tags() {
        let structure = Structure::Region(RegionRecord {
            active_index: 0,
            width: 10,
            height: 10,
            contents: vec![record("a")],
        });
        let json = structure.to_json().expect("serialize");
        assert!(json.contains(r#""kind": "region""#));
        assert!(json.contains(r#""active_index": 0"#));
        let back = Structure::from_json(&json).expect("parse");
        assert_eq!(back, structure);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let json = r#"{"kind":"region","contents":[{"id":"a","name":"A"}]}"#;
        let structure = Structure::from_json(json).expect("parse");
        let control = structure.find_control("a").expect("a");
        assert!(control.visible);
        assert!(control.resizable);
        assert_eq!(control.width, -1);
        assert_eq!(structure.size(), Size::new(-1, -1));
    }

    #[test]
    fn controls_in_traversal_order() {
        let structure = Structure::Section(SectionRecord {
            is_row: true,
            width: 100,
            height: 50,
            contents: vec![
                Structure::Region(RegionRecord {
                    active_index: 0,
                    width: 50,
                    height: 50,
                    contents: vec![record("a"), record("b")],
                }),
                Structure::Region(RegionRecord {
                    active_index: 0,
                    width: 50,
                    height: 50,
                    contents: vec![record("c")],
                }),
            ],
            splitters: Vec::new(),
        });
        assert_eq!(structure.control_ids(), vec!["a", "b", "c"]);
        assert!(!structure.is_empty());
        assert!(Structure::empty().is_empty());
    }

    #[test]
    fn apply_record_respects_user_flags() {
        let mut control = DockControl::new("a").with_name("Live");
        let mut saved = record("a");
        saved.name = "Saved".to_string();
        saved.locked = true;
        control.apply_record(&saved, false);
        assert_eq!(control.name(), "Live");
        assert!(control.is_locked());

        saved.user_name = true;
        control.apply_record(&saved, false);
        assert_eq!(control.name(), "Saved");
        assert!(control.user_name());
    }

    #[test]
    fn collapsed_splitter_reopens_after_rebuild() {
        let region = |id: &str| {
            Structure::Region(RegionRecord {
                active_index: 0,
                width: if id == "a" { 0 } else { 104 },
                height: 50,
                contents: vec![record(id)],
            })
        };
        let structure = Structure::Section(SectionRecord {
            is_row: true,
            width: 104,
            height: 50,
            contents: vec![region("a"), region("b")],
            splitters: vec![SplitterRecord {
                index: 0,
                bounds: Rect::new(0, 0, 4, 50),
                style: SplitterStyle::Vertical,
                last_bounds: Some(Rect::new(50, 0, 4, 50)),
            }],
        });
        let json = structure.to_json().expect("serialize");
        assert!(json.contains("last_bounds"));

        let mut pool: HashMap<String, DockControl> = ["a", "b"]
            .into_iter()
            .map(|id| (id.to_string(), DockControl::new(id)))
            .collect();
        let mut tree = DockTree::new(crate::config::DockConfig::default().with_splitter_thickness(4));
        let root = tree.build_record(&structure, &mut pool).expect("built");
        tree.set_root(root).expect("root");
        tree.recalc_sizes(root, Rect::new(0, 0, 104, 50));
        assert_eq!(tree.splitter(root, 0).expect("splitter").bounds(), Rect::new(0, 0, 4, 50));

        let moved = tree.toggle_splitter(root, 0, true).expect("reopen");
        assert_eq!(moved, Rect::new(50, 0, 4, 50));
    }

    #[test]
    fn build_skips_missing_and_duplicate_ids() {
        let structure = Structure::Section(SectionRecord {
            is_row: true,
            width: 100,
            height: 50,
            contents: vec![
                Structure::Region(RegionRecord {
                    active_index: 1,
                    width: 50,
                    height: 50,
                    contents: vec![record("a"), record("b"), record("a")],
                }),
                Structure::Region(RegionRecord {
                    active_index: 0,
                    width: 50,
                    height: 50,
                    contents: vec![record("gone")],
                }),
            ],
            splitters: Vec::new(),
        });
        let mut pool: HashMap<String, DockControl> = ["a", "b"]
            .into_iter()
            .map(|id| (id.to_string(), DockControl::new(id)))
            .collect();
        let mut tree = DockTree::default();
        let root = tree.build_record(&structure, &mut pool).expect("built");
        tree.set_root(root).expect("root");
        tree.validate().expect("valid tree");

        let region_id = tree.root().expect("root");
        let region = tree.node(region_id).and_then(DockNode::as_region).expect("region");
        assert_eq!(region.contents().len(), 2);
        let active = region.active_control().expect("active");
        assert_eq!(tree.control(active).map(DockControl::id), Some("b"));
    }
}
