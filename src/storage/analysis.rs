//! Read-side queries: filtered listings, the cross-source join and season aggregates

use super::{models::*, schema::PlayerDatabase};
use crate::identity::join::{resolve_attributes, round_to, salary_index, snap_index};
use crate::{Result, Season, Week};
use rusqlite::{params, Row};
use std::collections::{BTreeMap, BTreeSet, HashMap};

const WEEKLY_COLUMNS: &str = "player_id, player_name, position, team, season, week, opponent,
    passing_yards, passing_tds, interceptions, rushing_yards, rushing_tds,
    receptions, receiving_yards, receiving_tds, targets, fumbles_lost, fantasy_points";

const SNAP_COLUMNS: &str = "player_id, player_name, position, team, opponent, season, week,
    offense_snaps, offense_pct, defense_snaps, defense_pct, st_snaps, st_pct";

const PRICING_COLUMNS: &str = "player_name, team, position, opponent, season, week, salary";

/// Builds a `WHERE` clause from a [`StatFilter`] with positional parameters.
struct FilterClause {
    conditions: Vec<&'static str>,
    params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl FilterClause {
    fn new(filter: &StatFilter) -> Self {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(season) = filter.season {
            conditions.push("season = ?");
            params.push(Box::new(season.as_u16()));
        }
        if let Some(week) = filter.week {
            conditions.push("week = ?");
            params.push(Box::new(week.as_u16()));
        }
        if let Some(position) = &filter.position {
            conditions.push("UPPER(position) = UPPER(?)");
            params.push(Box::new(position.trim().to_string()));
        }
        if let Some(team) = &filter.team {
            conditions.push("UPPER(team) = UPPER(?)");
            params.push(Box::new(team.trim().to_string()));
        }

        Self { conditions, params }
    }

    fn sql(&self) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.conditions.join(" AND "))
        }
    }
}

impl PlayerDatabase {
    /// Weekly rows matching `filter`, best fantasy score first.
    pub fn query_weekly_stats(
        &self,
        filter: &StatFilter,
        page: Option<Page>,
    ) -> Result<Vec<WeeklyStat>> {
        let mut clause = FilterClause::new(filter);
        let mut query = format!(
            "SELECT {WEEKLY_COLUMNS} FROM weekly_stats{} ORDER BY fantasy_points DESC, player_name ASC",
            clause.sql()
        );

        if let Some(page) = page {
            query.push_str(" LIMIT ? OFFSET ?");
            clause.params.push(Box::new(page.limit));
            clause.params.push(Box::new(page.offset));
        }

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(clause.params.iter().map(|p| p.as_ref())),
            row_to_weekly_stat,
        )?;

        let mut stats = Vec::new();
        for row in rows {
            stats.push(row?);
        }
        Ok(stats)
    }

    /// Skill-position snap rows that can satisfy the snap join
    pub fn snap_candidates(
        &self,
        season: Option<Season>,
        week: Option<Week>,
    ) -> Result<Vec<SnapCount>> {
        let filter = StatFilter {
            season,
            week,
            ..StatFilter::default()
        };
        let clause = FilterClause::new(&filter);
        let query = format!("SELECT {SNAP_COLUMNS} FROM offense_snap_counts{}", clause.sql());

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(clause.params.iter().map(|p| p.as_ref())),
            row_to_snap_count,
        )?;

        let mut snaps = Vec::new();
        for row in rows {
            snaps.push(row?);
        }
        Ok(snaps)
    }

    pub fn pricing_candidates(
        &self,
        season: Option<Season>,
        week: Option<Week>,
    ) -> Result<Vec<PricingRecord>> {
        let filter = StatFilter {
            season,
            week,
            ..StatFilter::default()
        };
        self.query_pricing(&filter)
    }

    /// Weekly rows with snap share and salary attached.
    pub fn list_players(&self, filter: &StatFilter, page: Page) -> Result<Vec<PlayerRow>> {
        let stats = self.query_weekly_stats(filter, Some(page))?;
        if stats.is_empty() {
            return Ok(Vec::new());
        }

        // Only the weeks present on this page can match
        let weeks: BTreeSet<(Season, Week)> = stats.iter().map(|s| (s.season, s.week)).collect();
        let mut snap_rows = Vec::new();
        let mut salary_rows = Vec::new();
        for (season, week) in weeks {
            snap_rows.extend(self.snap_candidates(Some(season), Some(week))?);
            salary_rows.extend(self.pricing_candidates(Some(season), Some(week))?);
        }
        let snaps = snap_index(snap_rows);
        let salaries = salary_index(salary_rows);

        Ok(stats
            .into_iter()
            .map(|stat| {
                let joined = resolve_attributes(&stat, &snaps, &salaries);
                PlayerRow { stat, joined }
            })
            .collect())
    }

    /// Best players of a season.
    ///
    /// With a week, that week's joined rows are returned as stored. Without
    /// one, every player's weeks are folded into a single [`SeasonTotals`].
    pub fn top_performers(
        &self,
        season: Season,
        week: Option<Week>,
        position: Option<String>,
        limit: u32,
    ) -> Result<TopPerformers> {
        let filter = StatFilter {
            season: Some(season),
            week,
            position,
            team: None,
        };

        if week.is_some() {
            let rows = self.list_players(&filter, Page::new(limit, 0))?;
            return Ok(TopPerformers::Week(rows));
        }

        let stats = self.query_weekly_stats(&filter, None)?;
        let snaps = snap_index(self.snap_candidates(Some(season), None)?);
        let salaries = salary_index(Vec::new());

        let mut by_player: HashMap<String, SeasonAccumulator> = HashMap::new();
        for stat in stats {
            let joined = resolve_attributes(&stat, &snaps, &salaries);
            by_player
                .entry(stat.player_id.clone())
                .or_default()
                .add(stat, joined.snap_percentage);
        }

        let mut totals: Vec<SeasonTotals> = by_player
            .into_values()
            .filter_map(SeasonAccumulator::finish)
            .collect();
        totals.sort_by(|a, b| {
            b.fantasy_points
                .total_cmp(&a.fantasy_points)
                .then_with(|| a.player_name.cmp(&b.player_name))
        });
        totals.truncate(limit as usize);

        Ok(TopPerformers::Season(totals))
    }

    /// Snap rows ordered most recent week first, then by offensive share.
    pub fn query_snap_counts(&self, filter: &StatFilter, limit: u32) -> Result<Vec<SnapCount>> {
        let mut clause = FilterClause::new(filter);
        let query = format!(
            "SELECT {SNAP_COLUMNS} FROM snap_counts{}
             ORDER BY season DESC, week DESC, offense_pct DESC, player_name ASC
             LIMIT ?",
            clause.sql()
        );
        clause.params.push(Box::new(limit));

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(clause.params.iter().map(|p| p.as_ref())),
            row_to_snap_count,
        )?;

        let mut snaps = Vec::new();
        for row in rows {
            snaps.push(row?);
        }
        Ok(snaps)
    }

    /// Salary rows ordered by salary, most expensive first.
    pub fn query_pricing(&self, filter: &StatFilter) -> Result<Vec<PricingRecord>> {
        let clause = FilterClause::new(filter);
        let query = format!(
            "SELECT {PRICING_COLUMNS} FROM draftkings_pricing{}
             ORDER BY salary DESC, player_name ASC",
            clause.sql()
        );

        let mut stmt = self.conn.prepare(&query)?;
        let rows = stmt.query_map(
            rusqlite::params_from_iter(clause.params.iter().map(|p| p.as_ref())),
            row_to_pricing,
        )?;

        let mut prices = Vec::new();
        for row in rows {
            prices.push(row?);
        }
        Ok(prices)
    }

    /// Table totals plus the seasons, weeks and positions currently loaded.
    pub fn summary(&self) -> Result<DatabaseSummary> {
        let count = |table: &str| -> Result<u64> {
            let n: i64 = self
                .conn
                .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                    row.get(0)
                })?;
            Ok(n.max(0) as u64)
        };

        let total_player_stats = count("weekly_stats")?;
        let total_snap_counts = count("snap_counts")?;
        let total_pricing_records = count("draftkings_pricing")?;

        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT season FROM weekly_stats ORDER BY season DESC")?;
        let seasons_available = stmt
            .query_map([], |row| Ok(Season::new(row.get(0)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let weeks_available = match seasons_available.first() {
            Some(latest) => {
                let mut stmt = self.conn.prepare(
                    "SELECT DISTINCT week FROM weekly_stats WHERE season = ? ORDER BY week",
                )?;
                let weeks = stmt
                    .query_map(params![latest.as_u16()], |row| Ok(Week::new(row.get(0)?)))?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                weeks
            }
            None => Vec::new(),
        };

        let mut stmt = self
            .conn
            .prepare("SELECT position, COUNT(*) FROM weekly_stats GROUP BY position")?;
        let position_counts = stmt
            .query_map([], |row| {
                let position: String = row.get(0)?;
                let n: i64 = row.get(1)?;
                Ok((position, n.max(0) as u64))
            })?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

        Ok(DatabaseSummary {
            total_player_stats,
            total_snap_counts,
            total_pricing_records,
            seasons_available,
            weeks_available,
            position_counts,
        })
    }
}

/// Running sums for one player's season.
#[derive(Default)]
struct SeasonAccumulator {
    latest: Option<WeeklyStat>,
    games_played: u32,
    fantasy_points: f64,
    passing_yards: f64,
    passing_tds: u32,
    interceptions: u32,
    rushing_yards: f64,
    rushing_tds: u32,
    receptions: u32,
    receiving_yards: f64,
    receiving_tds: u32,
    targets: u32,
    fumbles_lost: u32,
    snap_percentages: Vec<f64>,
}

impl SeasonAccumulator {
    fn add(&mut self, stat: WeeklyStat, snap_percentage: Option<f64>) {
        self.games_played += 1;
        self.fantasy_points += stat.fantasy_points;
        self.passing_yards += stat.passing_yards;
        self.passing_tds += stat.passing_tds;
        self.interceptions += stat.interceptions;
        self.rushing_yards += stat.rushing_yards;
        self.rushing_tds += stat.rushing_tds;
        self.receptions += stat.receptions;
        self.receiving_yards += stat.receiving_yards;
        self.receiving_tds += stat.receiving_tds;
        self.targets += stat.targets;
        self.fumbles_lost += stat.fumbles_lost;
        if let Some(pct) = snap_percentage {
            self.snap_percentages.push(pct);
        }

        let is_later = self
            .latest
            .as_ref()
            .map_or(true, |latest| stat.week > latest.week);
        if is_later {
            self.latest = Some(stat);
        }
    }

    fn finish(self) -> Option<SeasonTotals> {
        let latest = self.latest?;
        let games = f64::from(self.games_played);
        let avg_snap_percentage = if self.snap_percentages.is_empty() {
            None
        } else {
            let sum: f64 = self.snap_percentages.iter().sum();
            Some(round_to(sum / self.snap_percentages.len() as f64, 1))
        };

        Some(SeasonTotals {
            player_id: latest.player_id,
            player_name: latest.player_name,
            position: latest.position,
            team: latest.team,
            season: latest.season,
            games_played: self.games_played,
            fantasy_points: round_to(self.fantasy_points, 2),
            avg_fantasy_points: round_to(self.fantasy_points / games, 2),
            passing_yards: round_to(self.passing_yards, 2),
            passing_tds: self.passing_tds,
            interceptions: self.interceptions,
            rushing_yards: round_to(self.rushing_yards, 2),
            rushing_tds: self.rushing_tds,
            receptions: self.receptions,
            receiving_yards: round_to(self.receiving_yards, 2),
            receiving_tds: self.receiving_tds,
            targets: self.targets,
            fumbles_lost: self.fumbles_lost,
            avg_snap_percentage,
        })
    }
}

fn row_to_weekly_stat(row: &Row) -> rusqlite::Result<WeeklyStat> {
    Ok(WeeklyStat {
        player_id: row.get(0)?,
        player_name: row.get(1)?,
        position: row.get(2)?,
        team: row.get(3)?,
        season: Season::new(row.get(4)?),
        week: Week::new(row.get(5)?),
        opponent: row.get(6)?,
        passing_yards: row.get(7)?,
        passing_tds: row.get(8)?,
        interceptions: row.get(9)?,
        rushing_yards: row.get(10)?,
        rushing_tds: row.get(11)?,
        receptions: row.get(12)?,
        receiving_yards: row.get(13)?,
        receiving_tds: row.get(14)?,
        targets: row.get(15)?,
        fumbles_lost: row.get(16)?,
        fantasy_points: row.get(17)?,
    })
}

fn row_to_snap_count(row: &Row) -> rusqlite::Result<SnapCount> {
    Ok(SnapCount {
        player_id: row.get(0)?,
        player_name: row.get(1)?,
        position: row.get(2)?,
        team: row.get(3)?,
        opponent: row.get(4)?,
        season: Season::new(row.get(5)?),
        week: Week::new(row.get(6)?),
        offense_snaps: row.get(7)?,
        offense_pct: row.get(8)?,
        defense_snaps: row.get(9)?,
        defense_pct: row.get(10)?,
        st_snaps: row.get(11)?,
        st_pct: row.get(12)?,
    })
}

fn row_to_pricing(row: &Row) -> rusqlite::Result<PricingRecord> {
    Ok(PricingRecord {
        player_name: row.get(0)?,
        team: row.get(1)?,
        position: row.get(2)?,
        opponent: row.get(3)?,
        season: Season::new(row.get(4)?),
        week: Week::new(row.get(5)?),
        salary: row.get(6)?,
    })
}
