use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::time::Duration;

use taskboard_api::{ApiClient, HttpTaskService, SessionApi};
use taskboard_core::ServiceError;

use crate::config::load_config;
use crate::state::ensure_taskboard_home;

/// Persisted session: the bearer token under its storage key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionState {
    pub jwt_token: Option<String>,
}

fn session_path() -> Result<std::path::PathBuf> {
    Ok(ensure_taskboard_home()?.join("auth.json"))
}

pub fn load_session() -> Result<SessionState> {
    let p = session_path()?;
    if !p.exists() {
        return Ok(SessionState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_session(session: &SessionState) -> Result<()> {
    let p = session_path()?;
    let s = serde_json::to_string_pretty(session)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn current_token() -> Result<Option<String>> {
    Ok(load_session()?.jwt_token)
}

pub fn store_token(token: &str) -> Result<()> {
    save_session(&SessionState {
        jwt_token: Some(token.to_string()),
    })
}

pub fn clear_session() -> Result<()> {
    save_session(&SessionState::default())
}

/// Token or a pointer at the login flow.
pub fn require_token() -> Result<String> {
    match current_token()? {
        Some(t) => Ok(t),
        None => bail!("not logged in. Run: taskboard login"),
    }
}

fn api_client(token: Option<String>) -> Result<ApiClient> {
    let cfg = load_config()?;
    ApiClient::new(
        &cfg.api.base_url,
        token,
        Duration::from_secs(cfg.api.timeout_secs),
    )
}

/// Task service bound to the stored session.
pub fn task_service() -> Result<HttpTaskService> {
    Ok(HttpTaskService::new(api_client(current_token()?)?))
}

/// Session endpoints; works with or without a stored token (login and
/// registration need none).
pub fn session_api() -> Result<SessionApi> {
    Ok(SessionApi::new(api_client(current_token()?)?))
}

/// Convert an operation failure into the message the user sees. Rejected
/// credentials also clear the stored token, so the next command starts at
/// login instead of re-sending a dead session.
pub fn surface(err: ServiceError) -> anyhow::Error {
    if matches!(err, ServiceError::Auth(_)) {
        if let Err(e) = clear_session() {
            log::warn!("could not clear session: {e}");
        }
        return anyhow::anyhow!("{err}. Run: taskboard login");
    }
    anyhow::anyhow!("{err}")
}

/// Minimal portable prompt: just stdin.
pub fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Prompt with a default shown in brackets; empty input keeps the default.
pub fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    if default.is_empty() {
        return prompt(label);
    }
    let answer = prompt(&format!("{label} [{default}]"))?;
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer
    })
}

/// Yes/no gate used before destructive calls.
pub fn confirm(question: &str) -> Result<bool> {
    let answer = prompt(&format!("{question} [y/N]"))?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}
