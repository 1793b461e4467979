use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

pub fn taskboard_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskboard"))
}

pub fn ensure_taskboard_home() -> Result<PathBuf> {
    let dir = taskboard_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
