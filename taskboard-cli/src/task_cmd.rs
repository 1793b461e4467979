use anyhow::{Result, bail};
use clap::Subcommand;

use taskboard_core::{Reconciler, Status, TaskForm, TaskService};

use crate::render;
use crate::session::{self, confirm, prompt_with_default};

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// Print the board grouped by column
    List,

    /// Create a task; missing required fields are prompted for
    Add {
        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Alta, Média or Baixa
        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        project: Option<String>,

        /// Create the task directly in the Done column
        #[arg(long, default_value_t = false)]
        completed: bool,
    },

    /// Edit an existing task (full replace; unset flags keep current values)
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,

        /// Alta, Média or Baixa
        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        completed: Option<bool>,
    },

    /// Move a task to another column
    Move {
        id: String,

        /// Target column: todo, doing or done
        to: String,
    },

    /// Delete a task (asks first)
    Rm {
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

pub async fn run(cmd: TaskCommand) -> Result<()> {
    let service = session::task_service()?;
    let mut rec = Reconciler::new(service);

    match cmd {
        TaskCommand::List => {
            rec.load().await.map_err(session::surface)?;
            print_board(&rec);
        }

        TaskCommand::Add {
            title,
            description,
            due,
            priority,
            project,
            completed,
        } => {
            let form = TaskForm {
                title: or_prompt(title, "Title")?,
                description: description.unwrap_or_default(),
                due_date: or_prompt(due, "Due date (YYYY-MM-DD)")?,
                priority: or_prompt(priority, "Priority (Alta/Média/Baixa)")?,
                project: project.unwrap_or_default(),
                completed,
            };
            let message = rec.save_task(&form, None).await.map_err(session::surface)?;
            println!("{message}");
        }

        TaskCommand::Edit {
            id,
            title,
            description,
            due,
            priority,
            project,
            completed,
        } => {
            // Prefill from the server copy, like the edit page does.
            let current = rec.service().get(&id).await.map_err(session::surface)?;
            let mut form = TaskForm::from_task(&current);
            if let Some(v) = title {
                form.title = v;
            }
            if let Some(v) = description {
                form.description = v;
            }
            if let Some(v) = due {
                form.due_date = v;
            }
            if let Some(v) = priority {
                form.priority = v;
            }
            if let Some(v) = project {
                form.project = v;
            }
            if let Some(v) = completed {
                form.completed = v;
            }
            let message = rec
                .save_task(&form, Some(&id))
                .await
                .map_err(session::surface)?;
            println!("{message}");
        }

        TaskCommand::Move { id, to } => {
            let target = parse_status(&to)?;
            rec.load().await.map_err(session::surface)?;
            let Some(from) = rec.board().locate(&id) else {
                bail!("no task with id {id}");
            };
            rec.move_task(&id, from, target)
                .await
                .map_err(session::surface)?;
            println!("Task {id}: {} → {}", from.label(), target.label());
        }

        TaskCommand::Rm { id, yes } => {
            if !yes && !confirm(&format!("Delete task {id}? This cannot be undone."))? {
                println!("Kept.");
                return Ok(());
            }
            rec.delete_task(&id).await.map_err(session::surface)?;
            println!("Task {id} deleted.");
        }
    }

    Ok(())
}

fn or_prompt(value: Option<String>, label: &str) -> Result<String> {
    match value {
        Some(v) => Ok(v),
        None => prompt_with_default(label, ""),
    }
}

fn parse_status(s: &str) -> Result<Status> {
    let normalized = s.trim().to_lowercase();
    match normalized.as_str() {
        "todo" | "to-do" => Ok(Status::Todo),
        "doing" => Ok(Status::Doing),
        "done" => Ok(Status::Done),
        _ => match Status::from_wire(&normalized) {
            Some(status) => Ok(status),
            None => bail!("unknown column '{s}' (expected todo, doing or done)"),
        },
    }
}

fn print_board<S: TaskService>(rec: &Reconciler<S>) {
    for status in Status::ALL {
        let column = rec.board().column(status);
        println!("{}", render::column_title(status, column.len()));
        if column.is_empty() {
            println!("  ({})", render::EMPTY_COLUMN);
        }
        for task in column {
            let (badge, _) = render::priority_badge(task.priority);
            let mut line = format!("  [{}] {} — {badge} — {}", task.id, task.title, render::due_label(task));
            if let Some(project) = &task.project {
                line.push_str(&format!(" — {project}"));
            }
            println!("{line}");
        }
        println!();
    }
}

/// Interactive field-by-field form, used by the board UI. Prefilled values
/// are offered as defaults.
pub fn collect_form(prefill: Option<TaskForm>) -> Result<TaskForm> {
    let base = prefill.unwrap_or_default();
    let completed_default = if base.completed { "y" } else { "n" };

    let form = TaskForm {
        title: prompt_with_default("Title", &base.title)?,
        description: prompt_with_default("Description", &base.description)?,
        due_date: prompt_with_default("Due date (YYYY-MM-DD)", &base.due_date)?,
        priority: prompt_with_default("Priority (Alta/Média/Baixa)", &base.priority)?,
        project: prompt_with_default("Project", &base.project)?,
        completed: prompt_with_default("Completed? (y/n)", completed_default)?
            .eq_ignore_ascii_case("y"),
    };
    Ok(form)
}
