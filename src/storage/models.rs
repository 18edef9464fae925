//! Data models for the storage layer

use crate::identity::JoinedAttributes;
use crate::{Season, Week};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One player's box score for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyStat {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub team: String,
    pub season: Season,
    pub week: Week,
    pub opponent: Option<String>,
    pub passing_yards: f64,
    pub passing_tds: u32,
    pub interceptions: u32,
    pub rushing_yards: f64,
    pub rushing_tds: u32,
    pub receptions: u32,
    pub receiving_yards: f64,
    pub receiving_tds: u32,
    pub targets: u32,
    pub fumbles_lost: u32,
    pub fantasy_points: f64,
}

/// Snap participation for one player, team and week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapCount {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    pub team: String,
    pub opponent: Option<String>,
    pub season: Season,
    pub week: Week,
    pub offense_snaps: u32,
    /// Fraction of offensive snaps, 0.0-1.0 as published.
    pub offense_pct: f64,
    pub defense_snaps: u32,
    pub defense_pct: f64,
    pub st_snaps: u32,
    pub st_pct: f64,
}

/// Salary for one player on one weekly slate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub player_name: String,
    pub team: String,
    pub position: String,
    pub opponent: Option<String>,
    pub season: Season,
    pub week: Week,
    pub salary: u32,
}

/// A weekly row as served by `/api/players`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRow {
    #[serde(flatten)]
    pub stat: WeeklyStat,
    #[serde(flatten)]
    pub joined: JoinedAttributes,
}

/// Season aggregate for one player, served by `/api/top-performers`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonTotals {
    pub player_id: String,
    pub player_name: String,
    pub position: String,
    /// Team of the player's latest week
    pub team: String,
    pub season: Season,
    pub games_played: u32,
    pub fantasy_points: f64,
    pub avg_fantasy_points: f64,
    pub passing_yards: f64,
    pub passing_tds: u32,
    pub interceptions: u32,
    pub rushing_yards: f64,
    pub rushing_tds: u32,
    pub receptions: u32,
    pub receiving_yards: f64,
    pub receiving_tds: u32,
    pub targets: u32,
    pub fumbles_lost: u32,
    pub avg_snap_percentage: Option<f64>,
}

/// `/api/top-performers` answers with weekly rows or season totals depending
/// on whether a week was requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TopPerformers {
    Week(Vec<PlayerRow>),
    Season(Vec<SeasonTotals>),
}

impl TopPerformers {
    pub fn len(&self) -> usize {
        match self {
            TopPerformers::Week(rows) => rows.len(),
            TopPerformers::Season(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Database overview for `/api/stats/summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseSummary {
    pub total_player_stats: u64,
    pub total_snap_counts: u64,
    pub total_pricing_records: u64,
    pub seasons_available: Vec<Season>,
    /// Weeks loaded for the most recent season
    pub weeks_available: Vec<Week>,
    pub position_counts: BTreeMap<String, u64>,
}

/// Outcome of a bulk upsert where duplicates update in place.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertCounts {
    pub inserted: usize,
    pub updated: usize,
}

/// AND-composed row filter shared by the read endpoints.
///
/// `position` and `team` compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct StatFilter {
    pub season: Option<Season>,
    pub week: Option<Week>,
    pub position: Option<String>,
    pub team: Option<String>,
}

impl StatFilter {
    pub fn season(season: Season) -> Self {
        Self {
            season: Some(season),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Page {
    pub limit: u32,
    pub offset: u32,
}

impl Page {
    pub const DEFAULT_LIMIT: u32 = 500;

    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT, 0)
    }
}
