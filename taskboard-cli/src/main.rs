use anyhow::Result;
use clap::{Parser, Subcommand};

mod board_tui;
mod config;
mod render;
mod session;
mod state;
mod task_cmd;

#[derive(Parser, Debug)]
#[command(name = "taskboard", version, about = "Terminal client for the taskboard kanban service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session token
    Login {
        #[arg(long)]
        email: Option<String>,
    },

    /// Create an account (stores the token when the server returns one)
    Register,

    /// Tell the server goodbye and clear the local session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Open the interactive board
    Board,

    /// Task CRUD without the board UI
    Task {
        #[command(subcommand)]
        command: task_cmd::TaskCommand,
    },

    /// Write a default config file under ~/.taskboard
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Login { email } => login(email).await?,
        Command::Register => register().await?,
        Command::Logout => logout().await?,
        Command::Whoami => whoami().await?,
        Command::Board => board_tui::run_board()?,
        Command::Task { command } => task_cmd::run(command).await?,
        Command::InitConfig => config::init_config()?,
    }

    Ok(())
}

async fn login(email: Option<String>) -> Result<()> {
    let email = match email {
        Some(e) => e,
        None => session::prompt("Email")?,
    };
    let password = session::prompt("Password")?;

    let api = session::session_api()?;
    let outcome = api.login(&email, &password).await.map_err(session::surface)?;

    match outcome.token {
        Some(token) => {
            session::store_token(&token)?;
            println!("{}", outcome.message);
        }
        None => {
            println!("{}", outcome.message);
            println!("No session token came back; try logging in again.");
        }
    }
    Ok(())
}

async fn register() -> Result<()> {
    let name = session::prompt("Name")?;
    let email = session::prompt("Email")?;
    let password = session::prompt("Password (min 8 characters)")?;
    let confirm = session::prompt("Confirm password")?;

    let api = session::session_api()?;
    let outcome = api
        .register(&name, &email, &password, &confirm)
        .await
        .map_err(session::surface)?;

    println!("{}", outcome.message);
    match outcome.token {
        Some(token) => session::store_token(&token)?,
        None => println!("Account created; run: taskboard login"),
    }
    Ok(())
}

async fn logout() -> Result<()> {
    if session::current_token()?.is_none() {
        session::clear_session()?;
        println!("Already logged out.");
        return Ok(());
    }

    // Best-effort server notification; the local token goes away regardless.
    let api = session::session_api()?;
    if let Err(e) = api.logout().await {
        log::debug!("server logout failed: {e}");
    }
    session::clear_session()?;
    println!("Logged out.");
    Ok(())
}

async fn whoami() -> Result<()> {
    session::require_token()?;
    let api = session::session_api()?;
    let name = api.profile().await.map_err(session::surface)?;
    println!("Logged in as {name}");
    Ok(())
}
