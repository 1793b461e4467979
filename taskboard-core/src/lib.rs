//! taskboard-core: board state, drag reconciliation, and the task model
//! for the taskboard client. No I/O lives here; the HTTP services plug in
//! through the `TaskService` trait.

pub mod board;
pub mod date;
pub mod drag;
pub mod error;
pub mod form;
pub mod reconcile;
pub mod task;

pub use board::{BoardSnapshot, BoardState};
pub use date::{DateError, DueDate};
pub use drag::{DragOp, DragResolution, DropOutcome};
pub use error::ServiceError;
pub use form::{FormError, TaskForm};
pub use reconcile::{MoveOutcome, Reconciler, TaskService};
pub use task::{Priority, Status, Task, TaskDraft, TaskPatch};
