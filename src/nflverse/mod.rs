//! Weekly player statistics and snap counts from the nflverse data releases.

pub mod compute;
pub mod types;

use crate::core::http::expand_url;
use crate::storage::models::{SnapCount, WeeklyStat};
use crate::{Result, Season};
use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

pub use types::{parse_snap_counts, parse_weekly_stats};

/// Source of season-level stats and snap counts.
#[async_trait]
pub trait StatsProvider: Send + Sync {
    /// Skill-position weekly rows for a season, fantasy points computed.
    async fn weekly_stats(&self, season: Season) -> Result<Vec<WeeklyStat>>;

    async fn snap_counts(&self, season: Season) -> Result<Vec<SnapCount>>;
}

/// Downloads the per-season CSV releases.
#[derive(Debug, Clone)]
pub struct NflverseClient {
    client: Client,
    stats_url: String,
    snaps_url: String,
}

impl NflverseClient {
    /// `stats_url` and `snaps_url` are templates with a `{season}` placeholder.
    pub fn new(client: Client, stats_url: impl Into<String>, snaps_url: impl Into<String>) -> Self {
        Self {
            client,
            stats_url: stats_url.into(),
            snaps_url: snaps_url.into(),
        }
    }

    async fn download(&self, url: &str) -> Result<String> {
        let body = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(body)
    }
}

#[async_trait]
impl StatsProvider for NflverseClient {
    async fn weekly_stats(&self, season: Season) -> Result<Vec<WeeklyStat>> {
        let url = expand_url(&self.stats_url, season.as_u16(), None);
        info!("Fetching weekly stats for {} from {}", season, url);

        let body = self.download(&url).await?;
        let rows = parse_weekly_stats(body.as_bytes(), season)?;
        info!("Fetched {} weekly stat rows for {}", rows.len(), season);
        Ok(rows)
    }

    async fn snap_counts(&self, season: Season) -> Result<Vec<SnapCount>> {
        let url = expand_url(&self.snaps_url, season.as_u16(), None);
        info!("Fetching snap counts for {} from {}", season, url);

        let body = self.download(&url).await?;
        let rows = parse_snap_counts(body.as_bytes(), season)?;
        info!("Fetched {} snap count rows for {}", rows.len(), season);
        Ok(rows)
    }
}
