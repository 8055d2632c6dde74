//! Where day records come from and where block mutations go.
//!
//! The compositor never writes; these stores are the external collaborators
//! behind `dayline show` (read) and `dayline block add|remove` (write).

use anyhow::{bail, Result};
use chrono::NaiveDate;
use dayline_core::parse_hhmm_strict;
use dayline_ingest::{DayRecord, RawBlock};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{Config, SourceKind};

pub mod local;
pub mod remote;

pub use local::LocalStore;
pub use remote::RemoteStore;

/// Request body for create-block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBlock {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub reason: String,
}

impl NewBlock {
    /// Writes are always strict: a block with a malformed or inverted time
    /// would silently vanish from the timeline.
    pub fn validate(&self) -> Result<()> {
        let start = parse_hhmm_strict(&self.start_time)?;
        let end = parse_hhmm_strict(&self.end_time)?;
        if start >= end {
            bail!(
                "block must end after it starts ({} >= {})",
                self.start_time,
                self.end_time
            );
        }
        if self.reason.trim().is_empty() {
            bail!("block reason must be non-empty");
        }
        Ok(())
    }
}

/// Staff ids end up in file paths and URLs.
pub fn validate_staff_id(staff_id: &str) -> Result<()> {
    let re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9_-]{0,63}$")?;
    if !re.is_match(staff_id) {
        bail!("invalid staff id '{staff_id}' (letters, digits, '_' and '-' only)");
    }
    Ok(())
}

pub enum DaySource {
    Local(LocalStore),
    Remote(RemoteStore),
}

impl DaySource {
    pub fn from_config(cfg: &Config) -> Result<Self> {
        match cfg.source.kind {
            SourceKind::Local => Ok(DaySource::Local(LocalStore::open_default()?)),
            SourceKind::Remote => {
                let Some(base_url) = cfg.source.base_url.as_deref() else {
                    bail!("source.kind = \"remote\" needs source.base_url in config.toml");
                };
                Ok(DaySource::Remote(RemoteStore::new(base_url, cfg.api_token())?))
            }
        }
    }

    pub async fn fetch_day(&self, staff_id: &str, date: NaiveDate) -> Result<DayRecord> {
        validate_staff_id(staff_id)?;
        match self {
            DaySource::Local(s) => s.fetch_day(staff_id, date).await,
            DaySource::Remote(s) => s.fetch_day(staff_id, date).await,
        }
    }

    pub async fn create_block(&self, staff_id: &str, block: &NewBlock) -> Result<RawBlock> {
        validate_staff_id(staff_id)?;
        block.validate()?;
        match self {
            DaySource::Local(s) => s.create_block(staff_id, block).await,
            DaySource::Remote(s) => s.create_block(staff_id, block).await,
        }
    }

    pub async fn delete_block(&self, staff_id: &str, block_id: &str) -> Result<()> {
        validate_staff_id(staff_id)?;
        match self {
            DaySource::Local(s) => s.delete_block(staff_id, block_id).await,
            DaySource::Remote(s) => s.delete_block(staff_id, block_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(start: &str, end: &str) -> NewBlock {
        NewBlock {
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            reason: "Training".to_string(),
        }
    }

    #[test]
    fn new_block_validation() {
        assert!(block("10:00", "10:30").validate().is_ok());
        assert!(block("10:30", "10:00").validate().is_err());
        assert!(block("10:00", "10:00").validate().is_err());
        assert!(block("10", "10:30").validate().is_err());

        let mut b = block("10:00", "10:30");
        b.reason = "  ".into();
        assert!(b.validate().is_err());
    }

    #[test]
    fn staff_id_rules() {
        assert!(validate_staff_id("stf_01").is_ok());
        assert!(validate_staff_id("a-b").is_ok());
        assert!(validate_staff_id("../etc").is_err());
        assert!(validate_staff_id("").is_err());
        assert!(validate_staff_id("a/b").is_err());
    }
}
