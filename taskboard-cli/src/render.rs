//! Pure widget builders for the board view. Kept free of terminal state so
//! the card/column presentation is testable without a TTY.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::ListItem;

use taskboard_core::{DueDate, Priority, Status, Task};

pub const EMPTY_COLUMN: &str = "no tasks here yet";

/// Column header with its count badge, e.g. `To Do (3)`.
pub fn column_title(status: Status, count: usize) -> String {
    format!("{} ({})", status.label(), count)
}

/// Badge label and tier color: high is red, medium yellow, low green,
/// unset a neutral gray.
pub fn priority_badge(priority: Option<Priority>) -> (&'static str, Color) {
    match priority {
        Some(Priority::High) => ("Alta", Color::Red),
        Some(Priority::Medium) => ("Média", Color::Yellow),
        Some(Priority::Low) => ("Baixa", Color::Green),
        None => ("N/A", Color::Gray),
    }
}

/// Due-date line for a card. A missing value degrades to a placeholder and
/// an unparseable one is flagged rather than dropped.
pub fn due_label(task: &Task) -> String {
    match task.due_date.as_deref() {
        None => "no due date".to_string(),
        Some(raw) => match DueDate::parse_iso(raw) {
            Ok(d) => format!("due {d}"),
            Err(_) => "invalid date".to_string(),
        },
    }
}

/// A card as list lines: title with badge, then due date and project.
pub fn card_item<'a>(task: &Task, selected: bool, dragged: bool) -> ListItem<'a> {
    let (badge, badge_color) = priority_badge(task.priority);

    let marker = if dragged { "» " } else { "  " };
    let title_style = if selected {
        Style::default().add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let mut detail = due_label(task);
    if let Some(project) = &task.project {
        detail.push_str(&format!("  ·  {project}"));
    }

    let lines = vec![
        Line::from(vec![
            Span::raw(marker.to_string()),
            Span::styled(task.title.clone(), title_style),
            Span::raw("  "),
            Span::styled(format!("[{badge}]"), Style::default().fg(badge_color)),
        ]),
        Line::from(Span::styled(
            format!("  {detail}"),
            Style::default().fg(Color::Gray),
        )),
    ];

    ListItem::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(priority: Option<Priority>, due: Option<&str>) -> Task {
        Task {
            id: "1".to_string(),
            title: "Buy milk".to_string(),
            description: None,
            due_date: due.map(str::to_string),
            priority,
            project: None,
            status: Status::Todo,
        }
    }

    #[test]
    fn column_title_carries_the_count() {
        assert_eq!(column_title(Status::Todo, 0), "To Do (0)");
        assert_eq!(column_title(Status::Doing, 2), "Doing (2)");
        assert_eq!(column_title(Status::Done, 10), "Done (10)");
    }

    #[test]
    fn high_priority_gets_the_red_tier() {
        assert_eq!(priority_badge(Some(Priority::High)), ("Alta", Color::Red));
        assert_eq!(
            priority_badge(Some(Priority::Medium)),
            ("Média", Color::Yellow)
        );
        assert_eq!(priority_badge(Some(Priority::Low)), ("Baixa", Color::Green));
        assert_eq!(priority_badge(None), ("N/A", Color::Gray));
    }

    #[test]
    fn due_label_is_timezone_proof_and_degrades_gracefully() {
        let t = task(None, Some("2025-03-05T00:00:00Z"));
        assert_eq!(due_label(&t), "due 05/03/2025");
        assert_eq!(due_label(&task(None, None)), "no due date");
        assert_eq!(due_label(&task(None, Some("soon"))), "invalid date");
    }
}
