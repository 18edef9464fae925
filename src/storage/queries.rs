//! Write operations: season and week replacement, salary upserts

use super::{models::*, schema::PlayerDatabase};
use crate::identity::{canonical_team, normalize_name};
use crate::{Result, Season, Week};
use rusqlite::{params, Transaction};
use tracing::debug;

fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

impl PlayerDatabase {
    /// Replace every weekly stat row of `season` with `rows`.
    ///
    /// Runs in a single transaction, so a failure leaves the previous rows intact.
    pub fn replace_season_stats(&mut self, season: Season, rows: &[WeeklyStat]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute(
            "DELETE FROM weekly_stats WHERE season = ?",
            params![season.as_u16()],
        )?;

        let now = now();
        for stat in rows {
            insert_weekly_stat(&tx, stat, now)?;
        }
        tx.commit()?;

        debug!(
            "Replaced {} weekly rows with {} for season {}",
            removed,
            rows.len(),
            season
        );
        Ok(rows.len())
    }

    /// Replace every snap count row of `season` with `rows`.
    pub fn replace_season_snap_counts(
        &mut self,
        season: Season,
        rows: &[SnapCount],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM snap_counts WHERE season = ?",
            params![season.as_u16()],
        )?;

        let now = now();
        for snap in rows {
            insert_snap_count(&tx, snap, now)?;
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Replace the salaries of one slate.
    pub fn replace_week_pricing(
        &mut self,
        season: Season,
        week: Week,
        rows: &[PricingRecord],
    ) -> Result<usize> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM draftkings_pricing WHERE season = ? AND week = ?",
            params![season.as_u16(), week.as_u16()],
        )?;

        let now = now();
        for price in rows {
            upsert_price(&tx, price, now)?;
        }
        tx.commit()?;
        Ok(rows.len())
    }

    /// Clear the given weeks of `season` and load `rows` in their place.
    ///
    /// Rows that share a key with an earlier row of the same batch update it
    /// and are counted as updated.
    pub fn reload_pricing_weeks(
        &mut self,
        season: Season,
        weeks: &[Week],
        rows: &[PricingRecord],
    ) -> Result<UpsertCounts> {
        let tx = self.conn.transaction()?;
        let removed = delete_weeks(&tx, season, weeks)?;
        debug!("Cleared {} salary rows of {} before reload", removed, season);

        let counts = upsert_prices(&tx, rows)?;
        tx.commit()?;
        Ok(counts)
    }

    /// Whether any salary for the slate is already stored
    pub fn has_pricing(&self, season: Season, week: Week) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM draftkings_pricing WHERE season = ? AND week = ?)",
            params![season.as_u16(), week.as_u16()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }
}

fn delete_weeks(tx: &Transaction<'_>, season: Season, weeks: &[Week]) -> Result<usize> {
    let mut removed = 0;
    for week in weeks {
        removed += tx.execute(
            "DELETE FROM draftkings_pricing WHERE season = ? AND week = ?",
            params![season.as_u16(), week.as_u16()],
        )?;
    }
    Ok(removed)
}

fn insert_weekly_stat(tx: &Transaction<'_>, stat: &WeeklyStat, now: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO weekly_stats
         (player_id, player_name, name_key, position, team, season, week, opponent,
          passing_yards, passing_tds, interceptions, rushing_yards, rushing_tds,
          receptions, receiving_yards, receiving_tds, targets, fumbles_lost,
          fantasy_points, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(player_id, season, week) DO UPDATE SET
            player_name = excluded.player_name,
            name_key = excluded.name_key,
            position = excluded.position,
            team = excluded.team,
            opponent = excluded.opponent,
            passing_yards = excluded.passing_yards,
            passing_tds = excluded.passing_tds,
            interceptions = excluded.interceptions,
            rushing_yards = excluded.rushing_yards,
            rushing_tds = excluded.rushing_tds,
            receptions = excluded.receptions,
            receiving_yards = excluded.receiving_yards,
            receiving_tds = excluded.receiving_tds,
            targets = excluded.targets,
            fumbles_lost = excluded.fumbles_lost,
            fantasy_points = excluded.fantasy_points,
            updated_at = excluded.updated_at",
        params![
            stat.player_id,
            stat.player_name,
            normalize_name(&stat.player_name),
            stat.position,
            canonical_team(&stat.team),
            stat.season.as_u16(),
            stat.week.as_u16(),
            stat.opponent,
            stat.passing_yards,
            stat.passing_tds,
            stat.interceptions,
            stat.rushing_yards,
            stat.rushing_tds,
            stat.receptions,
            stat.receiving_yards,
            stat.receiving_tds,
            stat.targets,
            stat.fumbles_lost,
            stat.fantasy_points,
            now,
            now
        ],
    )?;
    Ok(())
}

fn insert_snap_count(tx: &Transaction<'_>, snap: &SnapCount, now: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO snap_counts
         (player_id, player_name, name_key, position, team, opponent, season, week,
          offense_snaps, offense_pct, defense_snaps, defense_pct, st_snaps, st_pct,
          created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(player_id, team, season, week) DO UPDATE SET
            player_name = excluded.player_name,
            name_key = excluded.name_key,
            position = excluded.position,
            opponent = excluded.opponent,
            offense_snaps = excluded.offense_snaps,
            offense_pct = excluded.offense_pct,
            defense_snaps = excluded.defense_snaps,
            defense_pct = excluded.defense_pct,
            st_snaps = excluded.st_snaps,
            st_pct = excluded.st_pct",
        params![
            snap.player_id,
            snap.player_name,
            normalize_name(&snap.player_name),
            snap.position,
            canonical_team(&snap.team),
            snap.opponent,
            snap.season.as_u16(),
            snap.week.as_u16(),
            snap.offense_snaps,
            snap.offense_pct,
            snap.defense_snaps,
            snap.defense_pct,
            snap.st_snaps,
            snap.st_pct,
            now
        ],
    )?;
    Ok(())
}

fn upsert_prices(tx: &Transaction<'_>, rows: &[PricingRecord]) -> Result<UpsertCounts> {
    let mut counts = UpsertCounts::default();
    let now = now();
    for price in rows {
        let exists: bool = tx.query_row(
            "SELECT EXISTS(SELECT 1 FROM draftkings_pricing
             WHERE player_name = ? AND team = ? AND season = ? AND week = ?)",
            params![
                price.player_name,
                canonical_team(&price.team),
                price.season.as_u16(),
                price.week.as_u16()
            ],
            |row| row.get(0),
        )?;
        upsert_price(tx, price, now)?;
        if exists {
            counts.updated += 1;
        } else {
            counts.inserted += 1;
        }
    }
    Ok(counts)
}

fn upsert_price(tx: &Transaction<'_>, price: &PricingRecord, now: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO draftkings_pricing
         (player_name, name_key, team, position, opponent, season, week, salary, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(player_name, team, season, week) DO UPDATE SET
            name_key = excluded.name_key,
            position = excluded.position,
            opponent = excluded.opponent,
            salary = excluded.salary",
        params![
            price.player_name,
            normalize_name(&price.player_name),
            canonical_team(&price.team),
            price.position,
            price.opponent,
            price.season.as_u16(),
            price.week.as_u16(),
            price.salary,
            now
        ],
    )?;
    Ok(())
}
