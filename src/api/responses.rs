//! Response bodies of the JSON API

use crate::commands::{PricingBackfillSummary, RefreshSummary, SnapLoadSummary};
use crate::identity::NflTeam;
use crate::storage::models::{DatabaseSummary, PricingRecord, SnapCount};
use crate::{Season, Week};
use serde::Serialize;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "Fantasy Football Database API",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnapCountsResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<SnapCount>,
}

impl From<Vec<SnapCount>> for SnapCountsResponse {
    fn from(data: Vec<SnapCount>) -> Self {
        Self {
            success: true,
            count: data.len(),
            data,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PricingData {
    pub season: Season,
    pub week: Option<Week>,
    pub count: usize,
    pub pricing: Vec<PricingRecord>,
}

#[derive(Debug, Serialize)]
pub struct PricingResponse {
    pub success: bool,
    pub data: PricingData,
}

impl PricingResponse {
    pub fn new(season: Season, week: Option<Week>, pricing: Vec<PricingRecord>) -> Self {
        Self {
            success: true,
            data: PricingData {
                season,
                week,
                count: pricing.len(),
                pricing,
            },
        }
    }
}

/// `success` is false when any season pipeline failed; the loaded counts
/// still cover the pipelines that succeeded.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    pub message: String,
    pub records_loaded: usize,
    pub snap_records_loaded: usize,
    pub errors: Vec<String>,
    pub timestamp: String,
}

impl From<RefreshSummary> for RefreshResponse {
    fn from(summary: RefreshSummary) -> Self {
        let seasons = season_list(&summary.seasons);
        Self {
            success: summary.errors.is_empty(),
            message: format!(
                "Loaded {} stat rows and {} snap count rows for {}",
                summary.records_loaded, summary.snap_records_loaded, seasons
            ),
            records_loaded: summary.records_loaded,
            snap_records_loaded: summary.snap_records_loaded,
            errors: summary.errors,
            timestamp: now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnapLoadResponse {
    pub success: bool,
    pub message: String,
    pub records_loaded: usize,
    pub errors: Vec<String>,
    pub timestamp: String,
}

impl From<SnapLoadSummary> for SnapLoadResponse {
    fn from(summary: SnapLoadSummary) -> Self {
        Self {
            success: summary.errors.is_empty(),
            message: format!(
                "Loaded {} snap count rows for {}",
                summary.records_loaded,
                season_list(&summary.seasons)
            ),
            records_loaded: summary.records_loaded,
            errors: summary.errors,
            timestamp: now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BackfillData {
    pub weeks_fetched: usize,
    pub weeks_skipped: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct BackfillResponse {
    pub success: bool,
    pub message: String,
    pub records_processed: usize,
    pub data: BackfillData,
    pub timestamp: String,
}

impl From<PricingBackfillSummary> for BackfillResponse {
    fn from(summary: PricingBackfillSummary) -> Self {
        Self {
            success: summary.errors.is_empty(),
            message: format!(
                "Fetched salaries for {} weeks ({} already stored)",
                summary.weeks_fetched, summary.weeks_skipped
            ),
            records_processed: summary.records_processed,
            data: BackfillData {
                weeks_fetched: summary.weeks_fetched,
                weeks_skipped: summary.weeks_skipped,
                errors: summary.errors,
            },
            timestamp: now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: DatabaseSummary,
    pub last_updated: String,
}

impl From<DatabaseSummary> for SummaryResponse {
    fn from(summary: DatabaseSummary) -> Self {
        Self {
            summary,
            last_updated: now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub success: bool,
    pub count: usize,
    pub teams: &'static [NflTeam],
}

fn season_list(seasons: &[Season]) -> String {
    seasons
        .iter()
        .map(Season::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
