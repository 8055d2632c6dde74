//! HTTP client for the schedule service.
//!
//! Routes:
//! - `GET    {base}/staff/{staff}/days/{date}`   -> day record (404 = no shift configured)
//! - `POST   {base}/staff/{staff}/blocks`        -> created block
//! - `DELETE {base}/staff/{staff}/blocks/{id}`

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dayline_ingest::{DayRecord, RawBlock};
use reqwest::{Method, RequestBuilder, StatusCode};
use std::time::Duration;
use tracing::{debug, info};

use super::NewBlock;

#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteStore {
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("dayline/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let rb = self.client.request(method, url);
        match &self.token {
            Some(t) => rb.bearer_auth(t),
            None => rb,
        }
    }

    pub async fn fetch_day(&self, staff_id: &str, date: NaiveDate) -> Result<DayRecord> {
        let path = format!("/staff/{staff_id}/days/{}", date.format("%Y-%m-%d"));
        let resp = self
            .request(Method::GET, &path)
            .send()
            .await
            .with_context(|| format!("fetching {path} (retry later)"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            debug!(%path, "day_record_missing");
            return Ok(DayRecord::empty(staff_id, date));
        }

        let resp = resp
            .error_for_status()
            .with_context(|| format!("fetching {path}"))?;
        resp.json::<DayRecord>()
            .await
            .with_context(|| format!("decoding day record from {path}"))
    }

    pub async fn create_block(&self, staff_id: &str, block: &NewBlock) -> Result<RawBlock> {
        let path = format!("/staff/{staff_id}/blocks");
        let created = self
            .request(Method::POST, &path)
            .json(block)
            .send()
            .await
            .with_context(|| format!("posting {path}"))?
            .error_for_status()
            .with_context(|| format!("creating block via {path}"))?
            .json::<RawBlock>()
            .await
            .context("decoding created block")?;

        info!(staff_id, block_id = %created.id, "block_created");
        Ok(created)
    }

    pub async fn delete_block(&self, staff_id: &str, block_id: &str) -> Result<()> {
        let path = format!("/staff/{staff_id}/blocks/{block_id}");
        let resp = self
            .request(Method::DELETE, &path)
            .send()
            .await
            .with_context(|| format!("deleting {path}"))?;

        if resp.status() == StatusCode::NOT_FOUND {
            bail!("block not found: {block_id}");
        }
        resp.error_for_status()
            .with_context(|| format!("deleting {path}"))?;

        info!(staff_id, block_id, "block_deleted");
        Ok(())
    }
}
