use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$DAYLINE_HOME`, else `$HOME/.dayline`.
pub fn dayline_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("DAYLINE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set DAYLINE_HOME)")?;
    Ok(PathBuf::from(home).join(".dayline"))
}

pub fn ensure_dayline_home() -> Result<PathBuf> {
    let dir = dayline_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

/// Root of the local day store: `<home>/days/<staff>/<date>.json`.
pub fn days_dir() -> Result<PathBuf> {
    Ok(dayline_home()?.join("days"))
}
