#![forbid(unsafe_code)]

//! Docking-panel layout engine.
//!
//! Host content panels are wrapped in [`DockControl`]s, grouped into tabbed
//! [`DockRegion`]s, and arranged in nested rows and columns
//! ([`DockSection`]) separated by draggable [`DockSplitter`] bars. A
//! [`DockSizer`] owns one [`DockTree`] per host window and drives:
//!
//! - minimum-size computation and proportional layout passes
//! - hit-testing and drag-and-drop re-docking ([`DockInfo`])
//! - persistence through [`Structure`] values, with id matching
//! - abstract weight specs ([`WeightSpec`]) mapped onto concrete layouts
//! - maximize/restore of a single control
//! - splitter open/close clicks that collapse and reopen a neighbour
//!
//! ```ignore
//! use dockyard_layout::{ContentSpec, DockControl, DockSizer, Rect};
//!
//! let mut sizer = DockSizer::default();
//! sizer.set_contents(ContentSpec::Section(vec![
//!     DockControl::new("files").into(),
//!     ContentSpec::Region(vec![
//!         DockControl::new("editor").into(),
//!         DockControl::new("preview").into(),
//!     ]),
//! ]))?;
//! sizer.perform_layout(Rect::new(0, 0, 800, 600));
//! let saved = sizer.structure().to_json()?;
//! ```

pub mod config;
pub mod control;
mod draw;
pub mod drag;
pub mod error;
pub mod host;
pub mod info;
pub mod item;
pub mod region;
pub mod section;
pub mod sizer;
pub mod splitter;
pub mod structure;
pub mod tree;
pub mod weights;

pub use config::{DockConfig, DockTheme};
pub use control::{CloseHandler, DockContent, DockControl};
pub use dockyard_core::geometry::{Rect, Sides, Size};
pub use dockyard_core::surface::{DrawSurface, Rgba};
pub use drag::{
    CancelReason, DRAG_DEFAULT_THRESHOLD, DragEffect, DragMachine, DragNoopReason, DragState,
    DragTarget, Modifiers, PointerPosition,
};
pub use error::DockError;
pub use host::{DockHost, NullHost, StructureResolver};
pub use info::{DockInfo, DockKind, HitTarget};
pub use item::{DockNode, DockNodeKind, DockNodeKindTag, DockStyle, NodeId, SplitterStyle};
pub use region::DockRegion;
pub use section::{DockSection, forced_dock_info};
pub use sizer::{ContentSpec, DockOutcome, DockSizer};
pub use splitter::{DockSplitter, SplitterState};
pub use structure::{ControlRecord, RegionRecord, SectionRecord, SplitterRecord, Structure};
pub use tree::DockTree;
pub use weights::{WeightNode, WeightSpec, WeightSpecError};
