//! File-backed day store: one JSON day record per staff member and date.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dayline_ingest::{parse_day_record, DayRecord, RawBlock};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::NewBlock;
use crate::state::days_dir;

#[derive(Debug, Clone)]
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn open_default() -> Result<Self> {
        Ok(Self::new(days_dir()?))
    }

    fn day_path(&self, staff_id: &str, date: NaiveDate) -> PathBuf {
        self.root
            .join(staff_id)
            .join(format!("{}.json", date.format("%Y-%m-%d")))
    }

    /// A missing file is a day with no shift configured.
    pub async fn fetch_day(&self, staff_id: &str, date: NaiveDate) -> Result<DayRecord> {
        let p = self.day_path(staff_id, date);
        if !fs::try_exists(&p).await.with_context(|| format!("stat {}", p.display()))? {
            debug!(path = %p.display(), "day_record_missing");
            return Ok(DayRecord::empty(staff_id, date));
        }
        read_record(&p).await
    }

    /// Store a whole day record (import), replacing whatever was there.
    pub async fn put_day(&self, record: &DayRecord) -> Result<PathBuf> {
        let p = self.day_path(&record.staff_id, record.date);
        write_record(&p, record).await?;
        Ok(p)
    }

    pub async fn create_block(&self, staff_id: &str, block: &NewBlock) -> Result<RawBlock> {
        let mut record = self.fetch_day(staff_id, block.date).await?;

        let raw = RawBlock {
            id: format!("blk_{}", uuid::Uuid::new_v4().simple()),
            start_time: block.start_time.clone(),
            end_time: block.end_time.clone(),
            reason: block.reason.clone(),
        };
        record.blocks.push(raw.clone());

        write_record(&self.day_path(staff_id, block.date), &record).await?;
        info!(staff_id, block_id = %raw.id, date = %block.date, "block_created");
        Ok(raw)
    }

    /// Delete by id across all of the staff member's stored days.
    pub async fn delete_block(&self, staff_id: &str, block_id: &str) -> Result<()> {
        let dir = self.root.join(staff_id);
        let exists = fs::try_exists(&dir)
            .await
            .with_context(|| format!("stat {}", dir.display()))?;
        if !exists {
            bail!("block not found: {block_id}");
        }

        let mut entries = fs::read_dir(&dir)
            .await
            .with_context(|| format!("read {}", dir.display()))?;
        while let Some(entry) = entries.next_entry().await? {
            let p = entry.path();
            if p.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let mut record = read_record(&p).await?;
            let before = record.blocks.len();
            record.blocks.retain(|b| b.id != block_id);
            if record.blocks.len() != before {
                write_record(&p, &record).await?;
                info!(staff_id, block_id, date = %record.date, "block_deleted");
                return Ok(());
            }
        }

        bail!("block not found: {block_id}")
    }
}

async fn read_record(p: &Path) -> Result<DayRecord> {
    let s = fs::read_to_string(p)
        .await
        .with_context(|| format!("read {}", p.display()))?;
    parse_day_record(&s).with_context(|| format!("parse {}", p.display()))
}

async fn write_record(p: &Path, record: &DayRecord) -> Result<()> {
    if let Some(parent) = p.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(p, json)
        .await
        .with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
