//! Board state reconciler.
//!
//! Single owner of the client-held board: every mutation of the rendered
//! columns flows through here, so the view can never drift from the logical
//! state.
//!
//! Write strategy: refetch-after-write. A move is applied locally for
//! immediate feedback, the status update is sent, and on either outcome the
//! board is resynchronized from the server, so the final column of every
//! task is whatever the server says it is. When the resync itself fails,
//! the optimistic move is rolled back, guarded by the board generation so a
//! resync that already landed is never clobbered.

use crate::board::{BoardSnapshot, BoardState};
use crate::error::ServiceError;
use crate::form::TaskForm;
use crate::task::{Status, TaskDraft, TaskPatch};

/// The remote task store, as the reconciler consumes it. Implementations
/// carry the bearer token and map transport/HTTP failures into
/// `ServiceError` categories.
#[allow(async_fn_in_trait)]
pub trait TaskService {
    async fn list(&self) -> Result<BoardSnapshot, ServiceError>;
    /// Returns the server's confirmation message.
    async fn create(&self, draft: &TaskDraft) -> Result<String, ServiceError>;
    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), ServiceError>;
    /// Full replace; returns the server's confirmation message.
    async fn replace(&self, id: &str, draft: &TaskDraft) -> Result<String, ServiceError>;
    async fn remove(&self, id: &str) -> Result<(), ServiceError>;
    async fn get(&self, id: &str) -> Result<crate::task::Task, ServiceError>;
}

/// What a completed move amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved,
    /// Dropped on the source column; nothing was sent.
    SamePlace,
}

#[derive(Debug)]
pub struct Reconciler<S> {
    service: S,
    board: BoardState,
}

impl<S: TaskService> Reconciler<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            board: BoardState::new(),
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    /// Direct access for reads that bypass board state (e.g. prefilling the
    /// edit form from the server copy).
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Full fetch. On failure the board keeps its previous state and the
    /// error surfaces to the caller.
    pub async fn load(&mut self) -> Result<(), ServiceError> {
        let snapshot = self.service.list().await?;
        self.board.replace_all(snapshot);
        log::debug!("board loaded: {} tasks", self.board.len());
        Ok(())
    }

    /// Persist a drop of `id` from `from` onto `to`.
    ///
    /// Preconditions: the task must currently sit in `from`; a same-column
    /// drop is a local no-op. A concurrent removal between gesture start
    /// and drop surfaces as `NotFound` without touching the board.
    pub async fn move_task(
        &mut self,
        id: &str,
        from: Status,
        to: Status,
    ) -> Result<MoveOutcome, ServiceError> {
        if from == to {
            return Ok(MoveOutcome::SamePlace);
        }
        if !self.board.contains_in(id, from) {
            return Err(ServiceError::NotFound);
        }

        let generation = self.board.generation();
        self.board.apply_move(id, from, to);

        let update = self.service.update(id, &TaskPatch::status(to)).await;
        let resync = self.load().await;

        match (update, resync) {
            (Ok(()), Ok(())) => Ok(MoveOutcome::Moved),
            (Ok(()), Err(e)) => {
                // The write landed; the optimistic board already matches it.
                log::warn!("resync after successful move failed: {e}");
                Ok(MoveOutcome::Moved)
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(resync_err)) => {
                log::warn!("resync after failed move also failed: {resync_err}");
                if self.board.generation() == generation {
                    self.board.apply_move(id, to, from);
                }
                Err(e)
            }
        }
    }

    /// Delete `id`. Confirmation is the caller's job; by the time this runs
    /// the user has already said yes.
    pub async fn delete_task(&mut self, id: &str) -> Result<(), ServiceError> {
        match self.service.remove(id).await {
            Ok(()) => {
                self.board.remove(id);
                Ok(())
            }
            Err(ServiceError::NotFound) => {
                // Vanished server-side; drop it locally and still report.
                self.board.remove(id);
                Err(ServiceError::NotFound)
            }
            Err(e) => Err(e),
        }
    }

    /// Validate the form and create (no `existing`) or fully replace
    /// (`existing` set) a task. Validation failures abort before any
    /// request; the server's confirmation message is returned verbatim.
    pub async fn save_task(
        &mut self,
        form: &TaskForm,
        existing: Option<&str>,
    ) -> Result<String, ServiceError> {
        let draft = form.validate()?;

        let message = match existing {
            None => self.service.create(&draft).await?,
            Some(id) => self.service.replace(id, &draft).await?,
        };

        if let Err(e) = self.load().await {
            // The save itself landed; the next successful load will catch up.
            log::warn!("resync after save failed: {e}");
        }
        Ok(message)
    }
}
