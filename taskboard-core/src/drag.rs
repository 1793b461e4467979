//! Drag-operation state machine.
//!
//! One value walks `Idle → Dragging → (drop) → Reconciling → Idle` per
//! gesture and is threaded through the grab/drop handlers explicitly. The
//! source column travels inside the `Dragging` variant, so a drop can never
//! observe a gesture with no captured source: dropping while not dragging
//! resolves to `NotDragging` and mutates nothing.

use crate::task::Status;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragOp {
    #[default]
    Idle,
    Dragging {
        task_id: String,
        source: Status,
    },
    /// A cross-column drop was made and its server round-trip is in flight.
    Reconciling {
        task_id: String,
        source: Status,
        target: Status,
    },
}

/// What a drop gesture amounts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Cross-column drop: persist `task_id` from `from` to `to`.
    Move {
        task_id: String,
        from: Status,
        to: Status,
    },
    /// Dropped on the source column: nothing to do, no server call.
    SameColumn,
    /// No gesture was in progress.
    NotDragging,
}

/// Terminal state of a reconciled drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragResolution {
    Confirmed,
    RolledBack,
}

impl DragOp {
    pub fn is_idle(&self) -> bool {
        matches!(self, DragOp::Idle)
    }

    pub fn dragging_id(&self) -> Option<&str> {
        match self {
            DragOp::Dragging { task_id, .. } => Some(task_id),
            _ => None,
        }
    }

    /// Begin a gesture. Only an idle op can pick a card up; a grab during
    /// reconciliation belongs to a fresh `DragOp` value.
    pub fn grab(&mut self, task_id: impl Into<String>, source: Status) -> bool {
        if !self.is_idle() {
            return false;
        }
        *self = DragOp::Dragging {
            task_id: task_id.into(),
            source,
        };
        true
    }

    /// Complete the gesture over `target`.
    pub fn drop_on(&mut self, target: Status) -> DropOutcome {
        match std::mem::take(self) {
            DragOp::Dragging { source, .. } if source == target => {
                // back to Idle, no call
                DropOutcome::SameColumn
            }
            DragOp::Dragging { task_id, source } => {
                *self = DragOp::Reconciling {
                    task_id: task_id.clone(),
                    source,
                    target,
                };
                DropOutcome::Move {
                    task_id,
                    from: source,
                    to: target,
                }
            }
            _ => DropOutcome::NotDragging,
        }
    }

    /// Finish reconciliation with the server's verdict. Any other state is
    /// a stray completion and leaves the op idle.
    pub fn resolve(&mut self, confirmed: bool) -> Option<DragResolution> {
        let was_reconciling = matches!(self, DragOp::Reconciling { .. });
        *self = DragOp::Idle;
        was_reconciling.then(|| {
            if confirmed {
                DragResolution::Confirmed
            } else {
                DragResolution::RolledBack
            }
        })
    }

    /// Abandon the gesture (Esc, focus loss).
    pub fn cancel(&mut self) {
        *self = DragOp::Idle;
    }
}
