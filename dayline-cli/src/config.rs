use anyhow::{Context, Result};
use dayline_ingest::{NormalizeOptions, TimeMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{dayline_home, ensure_dayline_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceSection,
    #[serde(default)]
    pub time: TimeSection,
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// JSON files under the dayline home.
    #[default]
    Local,
    /// Schedule service over HTTP.
    Remote,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceSection {
    pub kind: SourceKind,
    /// For kind = "remote", e.g. "https://schedule.example.com/api/v1"
    pub base_url: Option<String>,
    /// Bearer token for the schedule service. `DAYLINE_API_TOKEN` wins if set.
    pub api_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSection {
    /// Reject malformed "HH:MM" strings instead of defaulting missing parts to 0.
    pub strict: bool,
    /// Keep cancelled / no-show appointments on the timeline.
    pub show_cancelled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// tracing filter directive; `DAYLINE_LOG` overrides.
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// Shortest free slot `dayline slots` reports.
    pub min_slot_minutes: i32,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self { min_slot_minutes: 15 }
    }
}

impl Config {
    pub fn normalize_options(&self, strict_override: bool) -> NormalizeOptions {
        NormalizeOptions {
            time_mode: if self.time.strict || strict_override {
                TimeMode::Strict
            } else {
                TimeMode::Lenient
            },
            skip_cancelled: !self.time.show_cancelled,
        }
    }

    pub fn api_token(&self) -> Option<String> {
        std::env::var("DAYLINE_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.source.api_token.clone())
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(dayline_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = ensure_dayline_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let cfg = load_config()?;
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}
