//! Form-to-record mapping for the create/edit task form.
//!
//! The form is a bag of raw strings exactly as the user typed them; a
//! single `validate` pass turns it into a `TaskDraft` or names the first
//! field that failed. Validation never touches the network.

use thiserror::Error;

use crate::date::DueDate;
use crate::task::{Priority, Status, Task, TaskDraft};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("title is required")]
    TitleRequired,
    #[error("due date is required")]
    DueDateRequired,
    #[error("due date is not a valid calendar date (expected YYYY-MM-DD)")]
    DueDateInvalid,
    #[error("priority is required")]
    PriorityRequired,
    #[error("priority must be one of Alta, Média, Baixa")]
    PriorityInvalid,
}

impl FormError {
    pub fn field(self) -> &'static str {
        match self {
            FormError::TitleRequired => "title",
            FormError::DueDateRequired | FormError::DueDateInvalid => "due date",
            FormError::PriorityRequired | FormError::PriorityInvalid => "priority",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Raw `YYYY-MM-DD` input.
    pub due_date: String,
    /// Raw priority label.
    pub priority: String,
    pub project: String,
    pub completed: bool,
}

impl TaskForm {
    /// Prefill for the edit flow.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            due_date: task
                .due()
                .map(|d| d.to_wire())
                .or_else(|| task.due_date.clone())
                .unwrap_or_default(),
            priority: task.priority.map(|p| p.wire().to_string()).unwrap_or_default(),
            project: task.project.clone().unwrap_or_default(),
            completed: task.status == Status::Done,
        }
    }

    pub fn validate(&self) -> Result<TaskDraft, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::TitleRequired);
        }

        let due_raw = self.due_date.trim();
        if due_raw.is_empty() {
            return Err(FormError::DueDateRequired);
        }
        let due_date = DueDate::parse_iso(due_raw).map_err(|_| FormError::DueDateInvalid)?;

        let priority_raw = self.priority.trim();
        if priority_raw.is_empty() {
            return Err(FormError::PriorityRequired);
        }
        let priority = Priority::from_label(priority_raw).ok_or(FormError::PriorityInvalid)?;

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };

        Ok(TaskDraft {
            title: title.to_string(),
            description: optional(&self.description),
            due_date,
            priority,
            project: optional(&self.project),
            completed: self.completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> TaskForm {
        TaskForm {
            title: "Buy milk".to_string(),
            description: String::new(),
            due_date: "2025-01-01".to_string(),
            priority: "Alta".to_string(),
            project: String::new(),
            completed: false,
        }
    }

    #[test]
    fn accepts_a_complete_form() {
        let draft = filled().validate().unwrap();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.due_date.to_wire(), "2025-01-01");
        assert_eq!(draft.priority, Priority::High);
        assert!(draft.description.is_none());
        assert!(draft.project.is_none());
    }

    #[test]
    fn empty_title_names_the_field() {
        let mut f = filled();
        f.title = "   ".to_string();
        let err = f.validate().unwrap_err();
        assert_eq!(err, FormError::TitleRequired);
        assert_eq!(err.field(), "title");
    }

    #[test]
    fn due_date_must_be_present_and_parseable() {
        let mut f = filled();
        f.due_date = String::new();
        assert_eq!(f.validate().unwrap_err(), FormError::DueDateRequired);
        f.due_date = "01/01/2025".to_string();
        assert_eq!(f.validate().unwrap_err(), FormError::DueDateInvalid);
    }

    #[test]
    fn priority_must_be_a_known_tier() {
        let mut f = filled();
        f.priority = String::new();
        assert_eq!(f.validate().unwrap_err(), FormError::PriorityRequired);
        f.priority = "urgente".to_string();
        assert_eq!(f.validate().unwrap_err(), FormError::PriorityInvalid);
    }

    #[test]
    fn prefills_from_an_existing_task() {
        let task = Task {
            id: "9".to_string(),
            title: "Review PR".to_string(),
            description: Some("small one".to_string()),
            due_date: Some("2025-06-10T00:00:00Z".to_string()),
            priority: Some(Priority::Low),
            project: None,
            status: Status::Done,
        };
        let f = TaskForm::from_task(&task);
        assert_eq!(f.due_date, "2025-06-10");
        assert_eq!(f.priority, "Baixa");
        assert!(f.completed);
        assert!(f.validate().is_ok());
    }
}
