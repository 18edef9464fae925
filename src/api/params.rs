//! Query string parsing and validation.
//!
//! Query fields arrive as raw strings so that a bad value produces a 400 that
//! names the parameter instead of a generic query rejection.

use crate::cli::types::time::parse_season_list;
use crate::error::FfdbError;
use crate::identity::canonical_team;
use crate::storage::models::{Page, StatFilter};
use crate::{Position, Result, Season, Week};
use serde::Deserialize;

pub const DEFAULT_TOP_PERFORMERS_LIMIT: u32 = 20;
pub const DEFAULT_SNAP_COUNTS_LIMIT: u32 = 100;

fn present(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn season(raw: &Option<String>) -> Result<Option<Season>> {
    present(raw).map(str::parse).transpose()
}

fn week(raw: &Option<String>) -> Result<Option<Week>> {
    present(raw).map(str::parse).transpose()
}

fn position(raw: &Option<String>) -> Result<Option<String>> {
    present(raw)
        .map(|p| p.parse::<Position>().map(|p| p.to_string()))
        .transpose()
}

fn team(raw: &Option<String>) -> Option<String> {
    present(raw).map(canonical_team)
}

fn count(name: &str, raw: &Option<String>) -> Result<Option<u32>> {
    present(raw)
        .map(|v| {
            v.parse::<u32>().map_err(|_| {
                FfdbError::invalid_parameter(name, format!("'{v}' is not a non-negative integer"))
            })
        })
        .transpose()
}

/// `GET /api/players`
#[derive(Debug, Default, Deserialize)]
pub struct PlayersQuery {
    pub season: Option<String>,
    pub week: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PlayersQuery {
    /// Limit has no upper bound.
    pub fn validate(&self) -> Result<(StatFilter, Page)> {
        let filter = StatFilter {
            season: season(&self.season)?,
            week: week(&self.week)?,
            position: position(&self.position)?,
            team: team(&self.team),
        };
        let page = Page::new(
            count("limit", &self.limit)?.unwrap_or(Page::DEFAULT_LIMIT),
            count("offset", &self.offset)?.unwrap_or(0),
        );
        Ok((filter, page))
    }
}

/// `GET /api/top-performers`
#[derive(Debug, Default, Deserialize)]
pub struct TopPerformersQuery {
    pub season: Option<String>,
    pub position: Option<String>,
    pub week: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopPerformersRequest {
    pub season: Season,
    pub week: Option<Week>,
    pub position: Option<String>,
    pub limit: u32,
}

impl TopPerformersQuery {
    pub fn validate(&self, default_season: Season) -> Result<TopPerformersRequest> {
        Ok(TopPerformersRequest {
            season: season(&self.season)?.unwrap_or(default_season),
            week: week(&self.week)?,
            position: position(&self.position)?,
            limit: count("limit", &self.limit)?.unwrap_or(DEFAULT_TOP_PERFORMERS_LIMIT),
        })
    }
}

/// `GET /api/snap-counts`. Any position label is accepted here since snap
/// rows cover the whole roster.
#[derive(Debug, Default, Deserialize)]
pub struct SnapCountsQuery {
    pub season: Option<String>,
    pub week: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
    pub limit: Option<String>,
}

impl SnapCountsQuery {
    pub fn validate(&self) -> Result<(StatFilter, u32)> {
        let filter = StatFilter {
            season: season(&self.season)?,
            week: week(&self.week)?,
            position: present(&self.position).map(str::to_uppercase),
            team: team(&self.team),
        };
        let limit = count("limit", &self.limit)?.unwrap_or(DEFAULT_SNAP_COUNTS_LIMIT);
        Ok((filter, limit))
    }
}

/// `GET /api/draftkings-pricing`
#[derive(Debug, Default, Deserialize)]
pub struct PricingQuery {
    pub season: Option<String>,
    pub week: Option<String>,
    pub position: Option<String>,
    pub team: Option<String>,
}

impl PricingQuery {
    pub fn validate(&self, default_season: Season) -> Result<StatFilter> {
        Ok(StatFilter {
            season: Some(season(&self.season)?.unwrap_or(default_season)),
            week: week(&self.week)?,
            position: position(&self.position)?,
            team: team(&self.team),
        })
    }
}

/// Query string as ordered key/value pairs, repeated keys kept.
pub type QueryPairs = Vec<(String, String)>;

/// Seasons named by `seasons` (or `seasons[]`) keys, each holding one season
/// or a comma list. `None` when the query names none.
pub fn seasons_from_query(pairs: &[(String, String)]) -> Result<Option<Vec<Season>>> {
    let mut seasons = Vec::new();
    for (key, value) in pairs {
        if key == "seasons" || key == "seasons[]" {
            seasons.extend(parse_season_list(value)?);
        }
    }
    seasons.sort();
    seasons.dedup();
    Ok(if seasons.is_empty() {
        None
    } else {
        Some(seasons)
    })
}

/// `through_week` of a backfill request, regular season by default.
pub fn through_week_from_query(pairs: &[(String, String)]) -> Result<Week> {
    let value = pairs
        .iter()
        .rev()
        .find(|(key, _)| key == "through_week")
        .map(|(_, value)| value.trim())
        .filter(|v| !v.is_empty());
    match value {
        Some(v) => v.parse(),
        None => Ok(Week::new(Week::REGULAR_SEASON_WEEKS)),
    }
}
