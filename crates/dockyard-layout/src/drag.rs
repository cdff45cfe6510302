//! Pointer drag lifecycle shared by splitter resizes and tab drags.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle
//!    \------> Idle (commit/cancel from Armed)
//! ```
//!
//! The machine only tracks pointer positions; the sizer interprets the
//! emitted effects against the tree.

use serde::{Deserialize, Serialize};

use crate::item::NodeId;

/// Default pointer travel before an armed drag starts.
pub const DRAG_DEFAULT_THRESHOLD: i32 = 3;

/// A pointer position in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

impl PointerPosition {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Modifier keys held during a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Ctrl held: splitter drags move a ghost bar instead of resizing live.
    #[must_use]
    pub const fn ctrl() -> Self {
        Self {
            shift: false,
            ctrl: true,
            alt: false,
        }
    }
}

/// What a drag is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DragTarget {
    Splitter { section: NodeId, index: usize },
    Control { control: NodeId },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    EscapeKey,
    FocusLost,
    Programmatic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    Idle,
    Armed {
        target: DragTarget,
        origin: PointerPosition,
        current: PointerPosition,
    },
    Dragging {
        target: DragTarget,
        origin: PointerPosition,
        current: PointerPosition,
    },
}

/// Why an input was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    ThresholdNotReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Armed {
        target: DragTarget,
        origin: PointerPosition,
    },
    DragStarted {
        target: DragTarget,
        origin: PointerPosition,
        current: PointerPosition,
    },
    DragUpdated {
        target: DragTarget,
        origin: PointerPosition,
        previous: PointerPosition,
        current: PointerPosition,
    },
    /// Release. `dragged` is false when the pointer never crossed the
    /// threshold (a click).
    Committed {
        target: DragTarget,
        origin: PointerPosition,
        end: PointerPosition,
        dragged: bool,
    },
    Canceled {
        target: Option<DragTarget>,
        reason: CancelReason,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// Press/move/release lifecycle with a movement threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragMachine {
    state: DragState,
    threshold: i32,
}

impl Default for DragMachine {
    fn default() -> Self {
        Self::new(DRAG_DEFAULT_THRESHOLD)
    }
}

impl DragMachine {
    #[must_use]
    pub fn new(threshold: i32) -> Self {
        Self {
            state: DragState::Idle,
            threshold: threshold.max(0),
        }
    }

    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub const fn threshold(&self) -> i32 {
        self.threshold
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self.state, DragState::Idle)
    }

    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    #[must_use]
    pub const fn target(&self) -> Option<DragTarget> {
        match self.state {
            DragState::Idle => None,
            DragState::Armed { target, .. } | DragState::Dragging { target, .. } => Some(target),
        }
    }

    pub fn press(&mut self, target: DragTarget, position: PointerPosition) -> DragEffect {
        if self.is_active() {
            return DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress,
            };
        }
        self.state = DragState::Armed {
            target,
            origin: position,
            current: position,
        };
        DragEffect::Armed {
            target,
            origin: position,
        }
    }

    pub fn motion(&mut self, position: PointerPosition) -> DragEffect {
        match self.state {
            DragState::Idle => DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            },
            DragState::Armed { target, origin, .. } => {
                if crossed_threshold(origin, position, self.threshold) {
                    self.state = DragState::Dragging {
                        target,
                        origin,
                        current: position,
                    };
                    DragEffect::DragStarted {
                        target,
                        origin,
                        current: position,
                    }
                } else {
                    self.state = DragState::Armed {
                        target,
                        origin,
                        current: position,
                    };
                    DragEffect::Noop {
                        reason: DragNoopReason::ThresholdNotReached,
                    }
                }
            }
            DragState::Dragging {
                target,
                origin,
                current,
            } => {
                self.state = DragState::Dragging {
                    target,
                    origin,
                    current: position,
                };
                DragEffect::DragUpdated {
                    target,
                    origin,
                    previous: current,
                    current: position,
                }
            }
        }
    }

    pub fn release(&mut self, position: PointerPosition) -> DragEffect {
        let effect = match self.state {
            DragState::Idle => {
                return DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                };
            }
            DragState::Armed { target, origin, .. } => DragEffect::Committed {
                target,
                origin,
                end: position,
                dragged: false,
            },
            DragState::Dragging { target, origin, .. } => DragEffect::Committed {
                target,
                origin,
                end: position,
                dragged: true,
            },
        };
        self.state = DragState::Idle;
        effect
    }

    pub fn cancel(&mut self, reason: CancelReason) -> DragEffect {
        let target = self.target();
        if target.is_none() {
            return DragEffect::Noop {
                reason: DragNoopReason::IdleWithoutActiveDrag,
            };
        }
        self.state = DragState::Idle;
        DragEffect::Canceled { target, reason }
    }
}

fn crossed_threshold(origin: PointerPosition, current: PointerPosition, threshold: i32) -> bool {
    let dx = i64::from(current.x - origin.x);
    let dy = i64::from(current.y - origin.y);
    let threshold = i64::from(threshold);
    dx * dx + dy * dy >= threshold * threshold
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target() -> DragTarget {
        DragTarget::Splitter {
            section: NodeId::FIRST,
            index: 0,
        }
    }

    #[test]
    fn click_commits_without_drag() {
        let mut machine = DragMachine::new(3);
        let origin = PointerPosition::new(10, 10);
        assert!(matches!(machine.press(target(), origin), DragEffect::Armed { .. }));
        assert_eq!(
            machine.motion(PointerPosition::new(11, 11)),
            DragEffect::Noop {
                reason: DragNoopReason::ThresholdNotReached
            }
        );
        let effect = machine.release(PointerPosition::new(11, 11));
        assert!(matches!(effect, DragEffect::Committed { dragged: false, .. }));
        assert_eq!(machine.state(), DragState::Idle);
    }

    #[test]
    fn crossing_threshold_starts_drag() {
        let mut machine = DragMachine::new(3);
        let _ = machine.press(target(), PointerPosition::new(0, 0));
        assert!(matches!(
            machine.motion(PointerPosition::new(3, 0)),
            DragEffect::DragStarted { .. }
        ));
        let effect = machine.motion(PointerPosition::new(8, 0));
        assert_eq!(
            effect,
            DragEffect::DragUpdated {
                target: target(),
                origin: PointerPosition::new(0, 0),
                previous: PointerPosition::new(3, 0),
                current: PointerPosition::new(8, 0),
            }
        );
        assert!(machine.is_dragging());
        assert!(matches!(
            machine.release(PointerPosition::new(8, 0)),
            DragEffect::Committed { dragged: true, .. }
        ));
    }

    #[test]
    fn second_press_is_ignored() {
        let mut machine = DragMachine::default();
        let _ = machine.press(target(), PointerPosition::new(0, 0));
        assert_eq!(
            machine.press(target(), PointerPosition::new(5, 5)),
            DragEffect::Noop {
                reason: DragNoopReason::ActiveDragAlreadyInProgress
            }
        );
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut machine = DragMachine::default();
        assert!(matches!(
            machine.cancel(CancelReason::EscapeKey),
            DragEffect::Noop { .. }
        ));
        let _ = machine.press(target(), PointerPosition::new(0, 0));
        assert_eq!(
            machine.cancel(CancelReason::FocusLost),
            DragEffect::Canceled {
                target: Some(target()),
                reason: CancelReason::FocusLost
            }
        );
        assert!(!machine.is_active());
    }

    #[test]
    fn effects_serialize_tagged() {
        let json = serde_json::to_string(&DragEffect::Noop {
            reason: DragNoopReason::ThresholdNotReached,
        })
        .expect("serialize");
        assert_eq!(json, r#"{"effect":"noop","reason":"threshold_not_reached"}"#);
    }
}
