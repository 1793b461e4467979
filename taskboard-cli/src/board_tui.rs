use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};
use std::io::{self, Stdout};

use taskboard_api::HttpTaskService;
use taskboard_core::{
    DragOp, DropOutcome, Reconciler, ServiceError, Status, TaskForm, TaskService,
};

use crate::render;
use crate::session;
use crate::task_cmd;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// The board UI runs on the input thread; server round-trips are bridged
/// onto the already-running runtime. We're often inside #[tokio::main], so
/// a nested runtime + block_on would panic; use block_in_place + the
/// current handle when one exists.
fn bridge<F: Future>(fut: F) -> Result<F::Output> {
    if let Ok(handle) = tokio::runtime::Handle::try_current() {
        Ok(tokio::task::block_in_place(|| handle.block_on(fut)))
    } else {
        let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
        Ok(rt.block_on(fut))
    }
}

pub fn run_board() -> Result<()> {
    let service = session::task_service()?;
    let mut rec = Reconciler::new(service);

    // First load happens before raw mode so an auth failure reads like any
    // other CLI error, pointing at login.
    bridge(rec.load())?.map_err(session::surface)?;

    // Name in the header is cosmetic; ignore failures.
    let user_name = session::session_api()
        .ok()
        .and_then(|api| bridge(api.profile()).ok())
        .and_then(|r| r.ok());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = board_loop(&mut terminal, &mut rec, user_name);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

/// Everything the event handlers are allowed to touch, in one place.
struct BoardUi {
    drag: DragOp,
    cursor_col: usize,
    cursor_row: usize,
    /// Highlighted drop column while a card is held.
    target_col: usize,
    /// Task id awaiting delete confirmation.
    confirm_delete: Option<String>,
    status_line: Option<(String, bool)>,
    show_help: bool,
}

impl BoardUi {
    fn new() -> Self {
        Self {
            drag: DragOp::default(),
            cursor_col: 0,
            cursor_row: 0,
            target_col: 0,
            confirm_delete: None,
            status_line: None,
            show_help: false,
        }
    }

    fn error(&mut self, message: impl Into<String>) {
        self.status_line = Some((message.into(), true));
    }

    fn info(&mut self, message: impl Into<String>) {
        self.status_line = Some((message.into(), false));
    }

    fn selected_task<'a, S: TaskService>(&self, rec: &'a Reconciler<S>) -> Option<&'a taskboard_core::Task> {
        rec.board()
            .column(Status::ALL[self.cursor_col])
            .get(self.cursor_row)
    }

    fn clamp_cursor<S: TaskService>(&mut self, rec: &Reconciler<S>) {
        let len = rec.board().count(Status::ALL[self.cursor_col]);
        if len == 0 {
            self.cursor_row = 0;
        } else if self.cursor_row >= len {
            self.cursor_row = len - 1;
        }
    }
}

fn board_loop(terminal: &mut Term, rec: &mut Reconciler<HttpTaskService>, user_name: Option<String>) -> Result<()> {
    let mut ui = BoardUi::new();

    loop {
        terminal.draw(|f| draw(f, rec, &ui, user_name.as_deref()))?;

        if !event::poll(std::time::Duration::from_millis(50))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        // Delete confirmation swallows everything except its own answers.
        if let Some(id) = ui.confirm_delete.clone() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    ui.confirm_delete = None;
                    match bridge(rec.delete_task(&id))? {
                        Ok(()) => ui.info("Task deleted."),
                        Err(e) => surface_in_ui(&mut ui, e),
                    }
                    ui.clamp_cursor(rec);
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    ui.confirm_delete = None;
                    ui.info("Kept.");
                }
                _ => {}
            }
            continue;
        }

        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Char('?') => ui.show_help = !ui.show_help,

            KeyCode::Char('r') => {
                match bridge(rec.load())? {
                    Ok(()) => ui.info("Reloaded."),
                    Err(e) => surface_in_ui(&mut ui, e),
                }
                ui.clamp_cursor(rec);
            }

            KeyCode::Left | KeyCode::Char('h') => {
                if ui.drag.is_idle() {
                    ui.cursor_col = ui.cursor_col.saturating_sub(1);
                    ui.clamp_cursor(rec);
                } else {
                    ui.target_col = ui.target_col.saturating_sub(1);
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if ui.drag.is_idle() {
                    ui.cursor_col = (ui.cursor_col + 1).min(Status::ALL.len() - 1);
                    ui.clamp_cursor(rec);
                } else {
                    ui.target_col = (ui.target_col + 1).min(Status::ALL.len() - 1);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                ui.cursor_row = ui.cursor_row.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                ui.cursor_row += 1;
                ui.clamp_cursor(rec);
            }

            // Grab, or drop what's held.
            KeyCode::Char(' ') | KeyCode::Enter => {
                if ui.drag.is_idle() {
                    if let Some(task) = ui.selected_task(rec) {
                        let id = task.id.clone();
                        let source = Status::ALL[ui.cursor_col];
                        ui.drag.grab(id, source);
                        ui.target_col = ui.cursor_col;
                        ui.status_line = None;
                    }
                } else {
                    handle_drop(&mut ui, rec)?;
                }
            }

            KeyCode::Esc => {
                ui.drag.cancel();
                ui.status_line = None;
            }

            KeyCode::Char('d') | KeyCode::Delete if ui.drag.is_idle() => {
                if let Some(task) = ui.selected_task(rec) {
                    ui.confirm_delete = Some(task.id.clone());
                }
            }

            KeyCode::Char('a') if ui.drag.is_idle() => {
                run_form(terminal, rec, &mut ui, None)?;
            }
            KeyCode::Char('e') if ui.drag.is_idle() => {
                if let Some(task) = ui.selected_task(rec) {
                    let prefill = TaskForm::from_task(task);
                    let id = task.id.clone();
                    run_form(terminal, rec, &mut ui, Some((id, prefill)))?;
                }
            }

            _ => {}
        }
    }

    Ok(())
}

fn handle_drop(ui: &mut BoardUi, rec: &mut Reconciler<HttpTaskService>) -> Result<()> {
    let target = Status::ALL[ui.target_col];
    match ui.drag.drop_on(target) {
        DropOutcome::SameColumn | DropOutcome::NotDragging => {}
        DropOutcome::Move { task_id, from, to } => {
            match bridge(rec.move_task(&task_id, from, to))? {
                Ok(_) => {
                    ui.drag.resolve(true);
                    ui.info(format!("Moved to {}.", to.label()));
                    ui.cursor_col = ui.target_col;
                }
                Err(e) => {
                    ui.drag.resolve(false);
                    surface_in_ui(ui, e);
                }
            }
            ui.clamp_cursor(rec);
        }
    }
    Ok(())
}

/// Leave the alternate screen for a line-based form, then come back and
/// resynchronize.
fn run_form(
    terminal: &mut Term,
    rec: &mut Reconciler<HttpTaskService>,
    ui: &mut BoardUi,
    existing: Option<(String, TaskForm)>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    let (id, prefill) = match existing {
        Some((id, form)) => (Some(id), Some(form)),
        None => (None, None),
    };
    let outcome = task_cmd::collect_form(prefill)
        .and_then(|form| bridge(rec.save_task(&form, id.as_deref())));

    enable_raw_mode()?;
    execute!(terminal.backend_mut(), EnterAlternateScreen)?;
    terminal.clear()?;

    match outcome {
        Ok(Ok(message)) => ui.info(message),
        Ok(Err(e)) => surface_in_ui(ui, e),
        Err(e) => ui.error(e.to_string()),
    }
    ui.clamp_cursor(rec);
    Ok(())
}

/// Auth failures clear the stored token like every other path; the board
/// stays up and the user is pointed at login.
fn surface_in_ui(ui: &mut BoardUi, err: ServiceError) {
    ui.error(session::surface(err).to_string());
}

fn draw(
    f: &mut ratatui::Frame,
    rec: &Reconciler<HttpTaskService>,
    ui: &BoardUi,
    user_name: Option<&str>,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = match user_name {
        Some(name) => format!("taskboard — {name}"),
        None => "taskboard".to_string(),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(title, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::raw("   "),
        Span::styled(
            "space: grab/drop  a: add  e: edit  d: delete  r: reload  ?: help  q: quit",
            Style::default().fg(Color::Gray),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(33),
            Constraint::Percentage(34),
        ])
        .split(chunks[1]);

    for (i, status) in Status::ALL.into_iter().enumerate() {
        let tasks = rec.board().column(status);

        let items: Vec<_> = if tasks.is_empty() {
            vec![ListItem::new(Line::from(Span::styled(
                format!("  {}", render::EMPTY_COLUMN),
                Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            )))]
        } else {
            tasks
                .iter()
                .enumerate()
                .map(|(row, task)| {
                    let selected = ui.drag.is_idle() && ui.cursor_col == i && ui.cursor_row == row;
                    let dragged = ui.drag.dragging_id() == Some(task.id.as_str());
                    render::card_item(task, selected, dragged)
                })
                .collect()
        };

        let is_cursor = if ui.drag.is_idle() {
            ui.cursor_col == i
        } else {
            ui.target_col == i
        };
        let border = if is_cursor && !ui.drag.is_idle() {
            Style::default().fg(Color::Yellow)
        } else if is_cursor {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };

        let list = List::new(items).block(
            Block::default()
                .title(render::column_title(status, tasks.len()))
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(list, columns[i]);
    }

    let footer_line = if let Some(id) = &ui.confirm_delete {
        let title = rec
            .board()
            .get(id)
            .map(|t| t.title.as_str())
            .unwrap_or("this task");
        Line::from(Span::styled(
            format!("Delete '{title}'? y/n"),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
    } else if let Some((message, is_error)) = &ui.status_line {
        let color = if *is_error { Color::Red } else { Color::Green };
        Line::from(Span::styled(message.clone(), Style::default().fg(color)))
    } else if ui.show_help {
        Line::from(Span::raw(
            "arrows/hjkl: move  space/enter: grab then drop  esc: cancel drag  a: add  e: edit  d: delete  r: reload  q: quit",
        ))
    } else if !ui.drag.is_idle() {
        Line::from(Span::styled(
            "holding a card — pick a column and press space to drop, esc to cancel",
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::raw(""))
    };

    let footer = Paragraph::new(footer_line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, chunks[2]);
}
