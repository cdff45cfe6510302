//! Abstract weight specifications mapped onto concrete structures.
//!
//! A spec is a sequence of slots laid out as a row. A slot is either a bare
//! weight (one control) or a group `[weight, child, child, ...]` whose
//! children are laid out across the perpendicular axis, so orientation
//! alternates with depth:
//!
//! ```text
//! [2, [1, 3, 1]]
//!
//! +-----------------+--------+
//! |                 |   3    |
//! |        2        |        |
//! |                 |--------|
//! |                 |   1    |
//! +-----------------+--------+
//! ```
//!
//! Leaves consume the live controls in traversal order.

use std::fmt;
use std::str::FromStr;

use dockyard_core::geometry::Size;
use serde_json::Value;

use crate::structure::{ControlRecord, RegionRecord, SectionRecord, Structure};

/// Reasons a weight spec cannot be mapped.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightSpecError {
    Empty,
    EmptyGroup,
    NonPositiveWeight { weight: f64 },
    LeafCountMismatch { leaves: usize, controls: usize },
    Malformed { reason: String },
}

impl fmt::Display for WeightSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "weight spec has no slots"),
            Self::EmptyGroup => write!(f, "weight group has a weight but no children"),
            Self::NonPositiveWeight { weight } => {
                write!(f, "weight {weight} must be finite and greater than zero")
            }
            Self::LeafCountMismatch { leaves, controls } => write!(
                f,
                "weight spec has {leaves} leaves but the layout has {controls} controls"
            ),
            Self::Malformed { reason } => write!(f, "malformed weight spec: {reason}"),
        }
    }
}

impl std::error::Error for WeightSpecError {}

/// One slot of a weight spec.
#[derive(Debug, Clone, PartialEq)]
pub enum WeightNode {
    Leaf(f64),
    Group { weight: f64, children: Vec<WeightNode> },
}

impl WeightNode {
    #[must_use]
    pub const fn leaf(weight: f64) -> Self {
        Self::Leaf(weight)
    }

    #[must_use]
    pub fn group(weight: f64, children: Vec<WeightNode>) -> Self {
        Self::Group { weight, children }
    }

    #[must_use]
    pub const fn weight(&self) -> f64 {
        match self {
            Self::Leaf(weight) | Self::Group { weight, .. } => *weight,
        }
    }

    fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::Group { children, .. } => children.iter().map(Self::leaf_count).sum(),
        }
    }

    fn validate(&self) -> Result<(), WeightSpecError> {
        let weight = self.weight();
        if !weight.is_finite() || weight <= 0.0 {
            return Err(WeightSpecError::NonPositiveWeight { weight });
        }
        if let Self::Group { children, .. } = self {
            if children.is_empty() {
                return Err(WeightSpecError::EmptyGroup);
            }
            for child in children {
                child.validate()?;
            }
        }
        Ok(())
    }

    fn from_value(value: &Value) -> Result<Self, WeightSpecError> {
        match value {
            Value::Number(number) => number.as_f64().map(Self::Leaf).ok_or_else(|| {
                WeightSpecError::Malformed {
                    reason: format!("unrepresentable number {number}"),
                }
            }),
            Value::Array(items) => {
                let (first, rest) = items.split_first().ok_or(WeightSpecError::EmptyGroup)?;
                let weight = first.as_f64().ok_or_else(|| WeightSpecError::Malformed {
                    reason: format!("group weight must be a number, found {first}"),
                })?;
                let children = rest
                    .iter()
                    .map(Self::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Self::Group { weight, children })
            }
            other => Err(WeightSpecError::Malformed {
                reason: format!("expected a number or an array, found {other}"),
            }),
        }
    }
}

/// A full weight spec: the top-level row of slots.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightSpec {
    slots: Vec<WeightNode>,
}

impl WeightSpec {
    #[must_use]
    pub fn new(slots: Vec<WeightNode>) -> Self {
        Self { slots }
    }

    #[must_use]
    pub fn slots(&self) -> &[WeightNode] {
        &self.slots
    }

    /// Parse from a JSON value such as `[2, [1, 3, 1]]`.
    pub fn from_value(value: &Value) -> Result<Self, WeightSpecError> {
        let Value::Array(items) = value else {
            return Err(WeightSpecError::Malformed {
                reason: format!("expected an array, found {value}"),
            });
        };
        let slots = items
            .iter()
            .map(WeightNode::from_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { slots })
    }

    /// Number of controls the spec places.
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.slots.iter().map(WeightNode::leaf_count).sum()
    }

    pub fn validate(&self) -> Result<(), WeightSpecError> {
        if self.slots.is_empty() {
            return Err(WeightSpecError::Empty);
        }
        for slot in &self.slots {
            slot.validate()?;
        }
        Ok(())
    }

    /// Build a concrete structure of `size` placing `controls` in order.
    ///
    /// Fails without side effects when the spec is invalid or its leaf count
    /// differs from the number of controls.
    pub fn map(&self, controls: &[ControlRecord], size: Size) -> Result<Structure, WeightSpecError> {
        self.validate()?;
        let leaves = self.leaf_count();
        if leaves != controls.len() {
            return Err(WeightSpecError::LeafCountMismatch {
                leaves,
                controls: controls.len(),
            });
        }
        let mut queue = controls.iter();
        Ok(axis(&self.slots, true, size.width, size.height, &mut queue))
    }
}

impl FromStr for WeightSpec {
    type Err = WeightSpecError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(text).map_err(|err| WeightSpecError::Malformed {
            reason: err.to_string(),
        })?;
        Self::from_value(&value)
    }
}

/// Lay `slots` out along one axis. A single slot collapses to its own
/// structure so no single-child section is produced.
fn axis<'a>(
    slots: &[WeightNode],
    is_row: bool,
    width: i32,
    height: i32,
    queue: &mut impl Iterator<Item = &'a ControlRecord>,
) -> Structure {
    if let [only] = slots {
        return slot(only, is_row, width, height, queue);
    }
    let total: f64 = slots.iter().map(WeightNode::weight).sum();
    let contents = slots
        .iter()
        .map(|item| {
            let share = item.weight() / total;
            let (w, h) = if is_row {
                ((share * f64::from(width)).round() as i32, height)
            } else {
                (width, (share * f64::from(height)).round() as i32)
            };
            slot(item, is_row, w, h, queue)
        })
        .collect();
    Structure::Section(SectionRecord {
        is_row,
        width,
        height,
        contents,
        splitters: Vec::new(),
    })
}

fn slot<'a>(
    item: &WeightNode,
    parent_is_row: bool,
    width: i32,
    height: i32,
    queue: &mut impl Iterator<Item = &'a ControlRecord>,
) -> Structure {
    match item {
        WeightNode::Group { children, .. } => axis(children, !parent_is_row, width, height, queue),
        WeightNode::Leaf(_) => {
            let contents = queue
                .next()
                .map(|record| ControlRecord {
                    width,
                    height,
                    ..record.clone()
                })
                .into_iter()
                .collect();
            Structure::Region(RegionRecord {
                active_index: 0,
                width,
                height,
                contents,
            })
        }
    }
}
