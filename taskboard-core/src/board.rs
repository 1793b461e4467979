//! Board state: the client-held snapshot of tasks grouped by status.
//!
//! Invariants:
//! - a task id appears in at most one column at any time
//! - column membership always matches the task's own status field
//! - `generation` increases on every authoritative replacement, so async
//!   continuations can detect that the snapshot they started from is gone
//!
//! Local (optimistic) mutations do not bump the generation; only a full
//! server snapshot does.

use serde::{Deserialize, Serialize};

use crate::task::{Status, Task};

/// The grouped shape `GET /tasks` returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    #[serde(rename = "a fazer", default)]
    pub todo: Vec<Task>,
    #[serde(rename = "fazendo", default)]
    pub doing: Vec<Task>,
    #[serde(rename = "concluido", default)]
    pub done: Vec<Task>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    todo: Vec<Task>,
    doing: Vec<Task>,
    done: Vec<Task>,
    generation: u64,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn column(&self, status: Status) -> &[Task] {
        match status {
            Status::Todo => &self.todo,
            Status::Doing => &self.doing,
            Status::Done => &self.done,
        }
    }

    fn column_mut(&mut self, status: Status) -> &mut Vec<Task> {
        match status {
            Status::Todo => &mut self.todo,
            Status::Doing => &mut self.doing,
            Status::Done => &mut self.done,
        }
    }

    pub fn count(&self, status: Status) -> usize {
        self.column(status).len()
    }

    pub fn len(&self) -> usize {
        self.todo.len() + self.doing.len() + self.done.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column currently holding the task, if any.
    pub fn locate(&self, id: &str) -> Option<Status> {
        Status::ALL
            .into_iter()
            .find(|s| self.column(*s).iter().any(|t| t.id == id))
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        Status::ALL
            .into_iter()
            .find_map(|s| self.column(s).iter().find(|t| t.id == id))
    }

    pub fn contains_in(&self, id: &str, status: Status) -> bool {
        self.column(status).iter().any(|t| t.id == id)
    }

    /// Replace the whole board with a server snapshot and bump the
    /// generation. The column a task arrives under is authoritative; a
    /// mismatched status field is normalized to it. Duplicate ids keep
    /// their first occurrence.
    pub fn replace_all(&mut self, snapshot: BoardSnapshot) {
        self.todo.clear();
        self.doing.clear();
        self.done.clear();

        let columns = [
            (Status::Todo, snapshot.todo),
            (Status::Doing, snapshot.doing),
            (Status::Done, snapshot.done),
        ];
        for (status, tasks) in columns {
            for mut task in tasks {
                if self.get(&task.id).is_some() {
                    log::warn!("duplicate task id {} in snapshot, keeping first", task.id);
                    continue;
                }
                if task.status != status {
                    log::warn!(
                        "task {} grouped under {:?} but carries status {:?}",
                        task.id,
                        status,
                        task.status
                    );
                    task.status = status;
                }
                self.column_mut(status).push(task);
            }
        }

        self.generation += 1;
    }

    /// Optimistic local move. Returns false (and mutates nothing) when the
    /// task is not currently in `from`.
    pub fn apply_move(&mut self, id: &str, from: Status, to: Status) -> bool {
        if from == to {
            return self.contains_in(id, from);
        }
        let Some(pos) = self.column(from).iter().position(|t| t.id == id) else {
            return false;
        };
        let mut task = self.column_mut(from).remove(pos);
        task.status = to;
        self.column_mut(to).push(task);
        true
    }

    /// Remove the task wherever it currently sits.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        for status in Status::ALL {
            let col = self.column_mut(status);
            if let Some(pos) = col.iter().position(|t| t.id == id) {
                return Some(col.remove(pos));
            }
        }
        None
    }

    /// Insert or update a task, placing it in the column its status names.
    pub fn upsert(&mut self, task: Task) {
        self.remove(&task.id);
        self.column_mut(task.status).push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, status: Status) -> Task {
        Task {
            id: id.to_string(),
            title: format!("task {id}"),
            description: None,
            due_date: None,
            priority: None,
            project: None,
            status,
        }
    }

    fn snapshot() -> BoardSnapshot {
        BoardSnapshot {
            todo: vec![task("1", Status::Todo), task("2", Status::Todo)],
            doing: vec![task("3", Status::Doing)],
            done: vec![],
        }
    }

    #[test]
    fn replace_all_places_every_task_in_exactly_one_column() {
        let mut b = BoardState::new();
        b.replace_all(snapshot());

        assert_eq!(b.count(Status::Todo), 2);
        assert_eq!(b.count(Status::Doing), 1);
        assert_eq!(b.count(Status::Done), 0);
        for id in ["1", "2", "3"] {
            let homes: Vec<Status> = Status::ALL
                .into_iter()
                .filter(|s| b.contains_in(id, *s))
                .collect();
            assert_eq!(homes.len(), 1, "task {id} must live in one column");
            assert_eq!(b.get(id).unwrap().status, homes[0]);
        }
    }

    #[test]
    fn replace_all_bumps_generation_and_normalizes_status() {
        let mut b = BoardState::new();
        let g0 = b.generation();

        let mut snap = snapshot();
        snap.doing[0].status = Status::Done; // column wins
        b.replace_all(snap);

        assert_eq!(b.generation(), g0 + 1);
        assert_eq!(b.get("3").unwrap().status, Status::Doing);
    }

    #[test]
    fn duplicate_ids_keep_first_occurrence() {
        let mut snap = snapshot();
        snap.done.push(task("1", Status::Done));
        let mut b = BoardState::new();
        b.replace_all(snap);

        assert_eq!(b.len(), 3);
        assert_eq!(b.locate("1"), Some(Status::Todo));
    }

    #[test]
    fn apply_move_shifts_between_columns() {
        let mut b = BoardState::new();
        b.replace_all(snapshot());
        let g = b.generation();

        assert!(b.apply_move("1", Status::Todo, Status::Doing));
        assert_eq!(b.locate("1"), Some(Status::Doing));
        assert_eq!(b.get("1").unwrap().status, Status::Doing);
        assert_eq!(b.count(Status::Todo), 1);
        assert_eq!(b.count(Status::Doing), 2);
        // local move is not authoritative
        assert_eq!(b.generation(), g);
    }

    #[test]
    fn apply_move_refuses_a_task_missing_from_the_source() {
        let mut b = BoardState::new();
        b.replace_all(snapshot());

        assert!(!b.apply_move("3", Status::Todo, Status::Done));
        assert_eq!(b.locate("3"), Some(Status::Doing));
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn remove_and_upsert() {
        let mut b = BoardState::new();
        b.replace_all(snapshot());

        let t = b.remove("2").unwrap();
        assert_eq!(t.id, "2");
        assert!(b.get("2").is_none());
        assert!(b.remove("2").is_none());

        b.upsert(task("2", Status::Done));
        assert_eq!(b.locate("2"), Some(Status::Done));

        // upsert of an existing id relocates it
        b.upsert(task("2", Status::Todo));
        assert_eq!(b.locate("2"), Some(Status::Todo));
        assert_eq!(b.len(), 3);
    }
}
