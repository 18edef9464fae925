//! nflverse CSV records and their mapping onto the storage models.
//!
//! Column names changed across nflverse releases (`recent_team` became `team`,
//! `interceptions` became `passing_interceptions`), so both spellings are read
//! as separate optional columns and reconciled here. Missing values are
//! written as `NA` or left empty.

use super::compute::{fantasy_points, FantasyStats};
use crate::identity::canonical_team;
use crate::storage::models::{SnapCount, WeeklyStat};
use crate::{Position, Result, Season, Week};
use serde::{Deserialize, Deserializer};
use std::fmt::Display;
use std::io::Read;
use std::str::FromStr;
use tracing::debug;

/// Treat empty and `NA` cells as missing.
fn na<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") | Some("NA") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// One row of `stats_player_week_{season}.csv`.
#[derive(Debug, Default, Deserialize)]
pub struct PlayerWeekRecord {
    #[serde(default, deserialize_with = "na")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub player_name: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub player_display_name: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub recent_team: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub season: Option<u16>,
    #[serde(default, deserialize_with = "na")]
    pub week: Option<u16>,
    #[serde(default, deserialize_with = "na")]
    pub season_type: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub opponent_team: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub passing_yards: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub passing_tds: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub interceptions: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub passing_interceptions: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub rushing_yards: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub rushing_tds: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub receptions: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub targets: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub receiving_yards: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub receiving_tds: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub sack_fumbles_lost: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub rushing_fumbles_lost: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub receiving_fumbles_lost: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub fumbles_lost: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub fantasy_points_ppr: Option<f64>,
}

fn count(value: Option<f64>) -> u32 {
    value.unwrap_or(0.0).max(0.0).round() as u32
}

fn sum_present(values: &[Option<f64>]) -> Option<f64> {
    values
        .iter()
        .flatten()
        .copied()
        .reduce(|a, b| a + b)
}

impl PlayerWeekRecord {
    pub fn name(&self) -> Option<&str> {
        self.player_display_name
            .as_deref()
            .or(self.player_name.as_deref())
    }

    pub fn team_code(&self) -> Option<&str> {
        self.team.as_deref().or(self.recent_team.as_deref())
    }

    pub fn interceptions_thrown(&self) -> Option<f64> {
        self.passing_interceptions.or(self.interceptions)
    }

    /// Lost fumbles across sacks, runs and catches, or the single total column
    /// older releases publish.
    pub fn fumbles_lost_total(&self) -> Option<f64> {
        sum_present(&[
            self.sack_fumbles_lost,
            self.rushing_fumbles_lost,
            self.receiving_fumbles_lost,
        ])
        .or(self.fumbles_lost)
    }

    pub fn fantasy_stats(&self) -> FantasyStats {
        FantasyStats {
            passing_yards: self.passing_yards,
            passing_tds: self.passing_tds,
            interceptions: self.interceptions_thrown(),
            rushing_yards: self.rushing_yards,
            rushing_tds: self.rushing_tds,
            receptions: self.receptions,
            receiving_yards: self.receiving_yards,
            receiving_tds: self.receiving_tds,
            fumbles_lost: self.fumbles_lost_total(),
        }
    }

    /// Map to a stored row. Non-skill positions and rows lacking an id,
    /// name, team or week are dropped.
    pub fn into_weekly_stat(self, season: Season) -> Option<WeeklyStat> {
        let position: Position = self.position.as_deref()?.parse().ok()?;
        if self.season.is_some_and(|s| s != season.as_u16()) {
            return None;
        }
        let week = Week::try_new(self.week?).ok()?;
        let player_id = self.player_id.clone()?;
        let player_name = self.name()?.trim().to_string();
        let team = canonical_team(self.team_code()?);
        let stats = self.fantasy_stats();

        Some(WeeklyStat {
            player_id,
            player_name,
            position: position.to_string(),
            team,
            season,
            week,
            opponent: self.opponent_team.as_deref().map(canonical_team),
            passing_yards: self.passing_yards.unwrap_or(0.0),
            passing_tds: count(self.passing_tds),
            interceptions: count(stats.interceptions),
            rushing_yards: self.rushing_yards.unwrap_or(0.0),
            rushing_tds: count(self.rushing_tds),
            receptions: count(self.receptions),
            receiving_yards: self.receiving_yards.unwrap_or(0.0),
            receiving_tds: count(self.receiving_tds),
            targets: count(self.targets),
            fumbles_lost: count(stats.fumbles_lost),
            fantasy_points: fantasy_points(&stats, self.fantasy_points_ppr),
        })
    }
}

/// One row of `snap_counts_{season}.csv`. Percentages are fractions.
#[derive(Debug, Default, Deserialize)]
pub struct SnapCountRecord {
    #[serde(default, deserialize_with = "na")]
    pub season: Option<u16>,
    #[serde(default, deserialize_with = "na")]
    pub week: Option<u16>,
    #[serde(default, deserialize_with = "na")]
    pub player: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub pfr_player_id: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub team: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub opponent: Option<String>,
    #[serde(default, deserialize_with = "na")]
    pub offense_snaps: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub offense_pct: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub defense_snaps: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub defense_pct: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub st_snaps: Option<f64>,
    #[serde(default, deserialize_with = "na")]
    pub st_pct: Option<f64>,
}

impl SnapCountRecord {
    /// Map to a stored row. All positions are kept; the snap join only
    /// reads skill positions through the `offense_snap_counts` view.
    pub fn into_snap_count(self, season: Season) -> Option<SnapCount> {
        if self.season.is_some_and(|s| s != season.as_u16()) {
            return None;
        }
        let week = Week::try_new(self.week?).ok()?;
        let player_name = self.player?.trim().to_string();
        if player_name.is_empty() {
            return None;
        }
        let team = canonical_team(&self.team?);
        // pfr ids are missing for some practice squad elevations
        let player_id = self
            .pfr_player_id
            .unwrap_or_else(|| format!("{}:{}", player_name, team));

        Some(SnapCount {
            player_id,
            player_name,
            position: self
                .position
                .map(|p| p.trim().to_uppercase())
                .unwrap_or_default(),
            team,
            opponent: self.opponent.as_deref().map(canonical_team),
            season,
            week,
            offense_snaps: count(self.offense_snaps),
            offense_pct: self.offense_pct.unwrap_or(0.0),
            defense_snaps: count(self.defense_snaps),
            defense_pct: self.defense_pct.unwrap_or(0.0),
            st_snaps: count(self.st_snaps),
            st_pct: self.st_pct.unwrap_or(0.0),
        })
    }
}

/// Parse a weekly stats CSV, keeping skill-position rows of `season`.
pub fn parse_weekly_stats<R: Read>(reader: R, season: Season) -> Result<Vec<WeeklyStat>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in csv.deserialize::<PlayerWeekRecord>() {
        match record?.into_weekly_stat(season) {
            Some(stat) => rows.push(stat),
            None => dropped += 1,
        }
    }

    debug!(
        "Parsed {} weekly rows for {} ({} dropped)",
        rows.len(),
        season,
        dropped
    );
    Ok(rows)
}

/// Parse a snap count CSV, keeping rows of `season`.
pub fn parse_snap_counts<R: Read>(reader: R, season: Season) -> Result<Vec<SnapCount>> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for record in csv.deserialize::<SnapCountRecord>() {
        if let Some(snap) = record?.into_snap_count(season) {
            rows.push(snap);
        }
    }
    Ok(rows)
}
