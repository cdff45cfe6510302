//! Error types for dock tree operations.

use std::fmt;

use crate::item::NodeId;

/// Failures reported by [`DockTree`](crate::DockTree) and
/// [`DockSizer`](crate::DockSizer) operations.
///
/// Every failure is local: the tree is left exactly as it was before the
/// failing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DockError {
    UnknownNode {
        node_id: NodeId,
    },
    NotAControl {
        node_id: NodeId,
    },
    NotARegion {
        node_id: NodeId,
    },
    NotASection {
        node_id: NodeId,
    },
    NotAChild {
        parent: NodeId,
        child: NodeId,
    },
    UnknownSplitter {
        section: NodeId,
        index: usize,
    },
    EmptyTree,
    CloseVetoed {
        id: String,
    },
    Locked {
        node_id: NodeId,
    },
    InvalidContentSpec {
        reason: &'static str,
    },
    InvariantViolation {
        node_id: NodeId,
        reason: &'static str,
    },
}

impl fmt::Display for DockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownNode { node_id } => write!(f, "dock node {} not found", node_id.get()),
            Self::NotAControl { node_id } => {
                write!(f, "dock node {} is not a control", node_id.get())
            }
            Self::NotARegion { node_id } => {
                write!(f, "dock node {} is not a region", node_id.get())
            }
            Self::NotASection { node_id } => {
                write!(f, "dock node {} is not a section", node_id.get())
            }
            Self::NotAChild { parent, child } => write!(
                f,
                "dock node {} is not a child of {}",
                child.get(),
                parent.get()
            ),
            Self::UnknownSplitter { section, index } => write!(
                f,
                "section {} has no splitter {index}",
                section.get()
            ),
            Self::EmptyTree => write!(f, "dock tree has no contents"),
            Self::CloseVetoed { id } => write!(f, "close of control '{id}' was vetoed"),
            Self::Locked { node_id } => write!(f, "dock node {} is locked", node_id.get()),
            Self::InvalidContentSpec { reason } => {
                write!(f, "invalid content specification: {reason}")
            }
            Self::InvariantViolation { node_id, reason } => {
                write!(f, "invariant violated at node {}: {reason}", node_id.get())
            }
        }
    }
}

impl std::error::Error for DockError {}
