//! Task model shared by the board, the form layer, and the HTTP services.

use serde::{Deserialize, Deserializer, Serialize};

use crate::date::DueDate;

/// Column a task lives in. A task has exactly one status at any time, and
/// the status alone decides column membership. Wire values are the
/// backend's own status strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "a fazer")]
    Todo,
    #[serde(rename = "fazendo")]
    Doing,
    #[serde(rename = "concluido")]
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Todo, Status::Doing, Status::Done];

    pub fn label(self) -> &'static str {
        match self {
            Status::Todo => "To Do",
            Status::Doing => "Doing",
            Status::Done => "Done",
        }
    }

    pub fn wire(self) -> &'static str {
        match self {
            Status::Todo => "a fazer",
            Status::Doing => "fazendo",
            Status::Done => "concluido",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "a fazer" => Some(Status::Todo),
            "fazendo" => Some(Status::Doing),
            "concluido" => Some(Status::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,
    #[serde(rename = "Média")]
    Medium,
    #[serde(rename = "Baixa")]
    Low,
}

impl Priority {
    pub fn wire(self) -> &'static str {
        match self {
            Priority::High => "Alta",
            Priority::Medium => "Média",
            Priority::Low => "Baixa",
        }
    }

    /// Accepts the wire labels case-insensitively.
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "alta" => Some(Priority::High),
            "média" | "media" => Some(Priority::Medium),
            "baixa" => Some(Priority::Low),
            _ => None,
        }
    }
}

// The backend serializes ids as numbers; clients treat them as opaque strings.
fn opaque_id<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }
    Ok(match Raw::deserialize(d)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

/// One unit of work as the server returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(deserialize_with = "opaque_id")]
    pub id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao", default)]
    pub description: Option<String>,
    /// Kept as the raw wire string when present so an unparseable value
    /// degrades to a placeholder on the card instead of dropping the task.
    #[serde(rename = "data_vencimento", default)]
    pub due_date: Option<String>,
    #[serde(rename = "prioridade", default)]
    pub priority: Option<Priority>,
    #[serde(rename = "projeto", default)]
    pub project: Option<String>,
    pub status: Status,
}

impl Task {
    /// The due date as a calendar date, if present and well-formed.
    pub fn due(&self) -> Option<DueDate> {
        self.due_date
            .as_deref()
            .and_then(|s| DueDate::parse_iso(s).ok())
    }
}

/// Validated create/replace payload. Title, due date and priority are
/// mandatory by the time a draft exists; the form layer enforces that.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "data_vencimento")]
    pub due_date: DueDate,
    #[serde(rename = "prioridade")]
    pub priority: Priority,
    #[serde(rename = "projeto")]
    pub project: Option<String>,
    #[serde(rename = "concluida")]
    pub completed: bool,
}

/// Partial update. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaskPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_wire_values_round_trip() {
        for s in Status::ALL {
            assert_eq!(Status::from_wire(s.wire()), Some(s));
            let json = serde_json::to_string(&s).unwrap();
            let back: Status = serde_json::from_str(&json).unwrap();
            assert_eq!(back, s);
        }
        assert_eq!(serde_json::to_string(&Status::Todo).unwrap(), "\"a fazer\"");
    }

    #[test]
    fn priority_labels() {
        assert_eq!(Priority::from_label("Alta"), Some(Priority::High));
        assert_eq!(Priority::from_label("média"), Some(Priority::Medium));
        assert_eq!(Priority::from_label(" baixa "), Some(Priority::Low));
        assert_eq!(Priority::from_label("urgent"), None);
        assert_eq!(serde_json::to_string(&Priority::Medium).unwrap(), "\"Média\"");
    }

    #[test]
    fn task_deserializes_from_wire_names_and_numeric_id() {
        let raw = r#"{
            "id": 7,
            "titulo": "Buy milk",
            "descricao": null,
            "data_vencimento": "2025-01-01T00:00:00Z",
            "prioridade": "Alta",
            "projeto": "home",
            "status": "a fazer"
        }"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.id, "7");
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.status, Status::Todo);
        assert_eq!(t.priority, Some(Priority::High));
        assert_eq!(t.due().unwrap().to_string(), "01/01/2025");
    }

    #[test]
    fn task_tolerates_missing_optional_fields() {
        let raw = r#"{"id": "abc", "titulo": "x", "status": "fazendo"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.status, Status::Doing);
        assert!(t.description.is_none());
        assert!(t.due().is_none());
        assert!(t.priority.is_none());
    }

    #[test]
    fn patch_serializes_only_set_fields() {
        let p = TaskPatch::status(Status::Done);
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"status":"concluido"}"#
        );
    }
}
