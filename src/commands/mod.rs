//! Batch ingestion jobs
//!
//! Every job works unit by unit (a season, a pipeline or a slate). A failing
//! unit is logged and reported in the job summary; the remaining units still
//! run. Rows of a unit are only replaced after its data was fetched and parsed.

use crate::error::FfdbError;
use crate::identity::OpponentTable;
use crate::jobs::JobPool;
use crate::nflverse::StatsProvider;
use crate::pricing::{load_seed_file, PricingProvider};
use crate::storage::models::PricingRecord;
use crate::storage::SharedDatabase;
use crate::{Result, Season, Week};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};


/// Outcome of a stats + snap count refresh
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub seasons: Vec<Season>,
    pub records_loaded: usize,
    pub snap_records_loaded: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SnapLoadSummary {
    pub seasons: Vec<Season>,
    pub records_loaded: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PricingBackfillSummary {
    pub records_processed: usize,
    pub weeks_fetched: usize,
    pub weeks_skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalaryLoadSummary {
    pub season: Season,
    pub weeks: Vec<Week>,
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
}

/// Runs ingestion jobs against one database.
#[derive(Clone)]
pub struct Ingestor {
    db: SharedDatabase,
    stats: Arc<dyn StatsProvider>,
    pricing: Option<Arc<dyn PricingProvider>>,
    opponents: Arc<OpponentTable>,
    pool: JobPool,
    pricing_delay: Duration,
}

impl Ingestor {
    pub fn new(db: SharedDatabase, stats: Arc<dyn StatsProvider>, pool: JobPool) -> Self {
        Self {
            db,
            stats,
            pricing: None,
            opponents: Arc::new(OpponentTable::new()),
            pool,
            pricing_delay: Duration::from_millis(500),
        }
    }

    pub fn with_pricing(mut self, pricing: Arc<dyn PricingProvider>) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn with_opponents(mut self, opponents: OpponentTable) -> Self {
        self.opponents = Arc::new(opponents);
        self
    }

    pub fn with_pricing_delay(mut self, delay: Duration) -> Self {
        self.pricing_delay = delay;
        self
    }

    pub fn database(&self) -> &SharedDatabase {
        &self.db
    }

    /// Reload weekly stats and snap counts for each season.
    ///
    /// The two pipelines of a season run side by side and fail independently.
    pub async fn refresh_seasons(&self, seasons: &[Season]) -> Result<RefreshSummary> {
        let mut summary = RefreshSummary {
            seasons: seasons.to_vec(),
            ..RefreshSummary::default()
        };

        for &season in seasons {
            info!("Refreshing season {}", season);
            let (stats, snaps) = tokio::join!(self.load_stats(season), self.load_snaps(season));

            match stats {
                Ok(n) => summary.records_loaded += n,
                Err(e) => {
                    error!("Weekly stats for {} failed: {}", season, e);
                    summary.errors.push(format!("{season} weekly stats: {e}"));
                }
            }
            match snaps {
                Ok(n) => summary.snap_records_loaded += n,
                Err(e) => {
                    error!("Snap counts for {} failed: {}", season, e);
                    summary.errors.push(format!("{season} snap counts: {e}"));
                }
            }
        }

        info!(
            "Refresh complete: {} stat rows, {} snap rows, {} errors",
            summary.records_loaded,
            summary.snap_records_loaded,
            summary.errors.len()
        );
        Ok(summary)
    }

    /// Reload only the snap counts of each season.
    pub async fn load_snap_counts(&self, seasons: &[Season]) -> Result<SnapLoadSummary> {
        let mut summary = SnapLoadSummary {
            seasons: seasons.to_vec(),
            ..SnapLoadSummary::default()
        };

        for &season in seasons {
            match self.load_snaps(season).await {
                Ok(n) => summary.records_loaded += n,
                Err(e) => {
                    error!("Snap counts for {} failed: {}", season, e);
                    summary.errors.push(format!("{season} snap counts: {e}"));
                }
            }
        }
        Ok(summary)
    }

    /// Fetch salaries for weeks `1..=through_week` of each season.
    ///
    /// Weeks that already have salaries stored are skipped without a request.
    /// Consecutive requests are spaced by the configured delay.
    pub async fn backfill_pricing(
        &self,
        seasons: &[Season],
        through_week: Week,
    ) -> Result<PricingBackfillSummary> {
        let provider = self.pricing.clone().ok_or_else(|| FfdbError::Config {
            message: "no pricing provider configured (set PRICING_API_URL)".to_string(),
        })?;

        let mut summary = PricingBackfillSummary::default();
        let mut requested = false;

        for &season in seasons {
            for week in (1..=through_week.as_u16()).map(Week::new) {
                if self.db.has_pricing(season, week).await? {
                    summary.weeks_skipped += 1;
                    continue;
                }

                if requested && !self.pricing_delay.is_zero() {
                    tokio::time::sleep(self.pricing_delay).await;
                }
                requested = true;

                match self.load_week_pricing(&provider, season, week).await {
                    Ok(n) => {
                        summary.weeks_fetched += 1;
                        summary.records_processed += n;
                    }
                    Err(e) => {
                        warn!("Salaries for {} week {} failed: {}", season, week, e);
                        summary
                            .errors
                            .push(format!("{season} week {week}: {e}"));
                    }
                }
            }
        }

        info!(
            "Pricing backfill: {} weeks fetched, {} skipped, {} records",
            summary.weeks_fetched, summary.weeks_skipped, summary.records_processed
        );
        Ok(summary)
    }

    /// Load the salary seed file for `season`, replacing the weeks it covers.
    pub async fn load_salaries(&self, path: PathBuf, season: Season) -> Result<SalaryLoadSummary> {
        let batch = self
            .pool
            .run(async move {
                tokio::task::spawn_blocking(move || load_seed_file(&path, season))
                    .await
                    .map_err(|e| FfdbError::Job {
                        message: e.to_string(),
                    })?
            })
            .await?;

        let records = resolve_opponents(batch.records, &self.opponents);
        let counts = self
            .db
            .reload_pricing_weeks(season, batch.weeks.clone(), records)
            .await?;

        info!(
            "Loaded salaries for {}: {} inserted, {} updated, {} skipped",
            season, counts.inserted, counts.updated, batch.skipped
        );
        Ok(SalaryLoadSummary {
            season,
            weeks: batch.weeks,
            inserted: counts.inserted,
            updated: counts.updated,
            skipped: batch.skipped,
        })
    }

    async fn load_stats(&self, season: Season) -> Result<usize> {
        let stats = Arc::clone(&self.stats);
        let db = self.db.clone();
        self.pool
            .run(async move {
                let rows = stats.weekly_stats(season).await?;
                if rows.is_empty() {
                    return Err(empty_payload("weekly stats", season));
                }
                db.replace_season_stats(season, rows).await
            })
            .await
    }

    async fn load_snaps(&self, season: Season) -> Result<usize> {
        let stats = Arc::clone(&self.stats);
        let db = self.db.clone();
        self.pool
            .run(async move {
                let rows = stats.snap_counts(season).await?;
                if rows.is_empty() {
                    return Err(empty_payload("snap counts", season));
                }
                db.replace_season_snap_counts(season, rows).await
            })
            .await
    }

    async fn load_week_pricing(
        &self,
        provider: &Arc<dyn PricingProvider>,
        season: Season,
        week: Week,
    ) -> Result<usize> {
        let provider = Arc::clone(provider);
        let opponents = Arc::clone(&self.opponents);
        let db = self.db.clone();
        self.pool
            .run(async move {
                let rows = provider.salaries(season, week).await?;
                let rows = resolve_opponents(rows, &opponents);
                db.replace_week_pricing(season, week, rows).await
            })
            .await
    }
}

/// Stored rows of a season are never replaced by an empty download.
fn empty_payload(dataset: &str, season: Season) -> FfdbError {
    FfdbError::Provider {
        provider: "nflverse".to_string(),
        message: format!("no {dataset} rows for {season}"),
    }
}

/// Replace raw opponent codes with resolved team codes; unresolvable ones become null.
pub fn resolve_opponents(records: Vec<PricingRecord>, table: &OpponentTable) -> Vec<PricingRecord> {
    records
        .into_iter()
        .map(|mut record| {
            record.opponent = record.opponent.take().and_then(|raw| {
                table
                    .resolve(record.season, record.week, &record.team, &raw)
                    .into_code()
            });
            record
        })
        .collect()
}
