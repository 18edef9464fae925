//! Database schema and connection management

use crate::error::FfdbError;
use crate::Result;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Database connection for stats, snap counts and salaries
pub struct PlayerDatabase {
    pub(crate) conn: Connection,
}

impl PlayerDatabase {
    /// Open (or create) the database file at `path` and ensure tables exist
    pub fn new(path: &Path) -> Result<Self> {
        // Ensure the data directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Fresh database that lives only as long as the connection
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let mut db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Default location of the database file
    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir().ok_or_else(|| FfdbError::Config {
            message: "Could not determine data directory".to_string(),
        })?;
        Ok(data_dir.join("ffdb").join("fantasy_football.db"))
    }

    /// Close the connection, surfacing any error SQLite reports on close
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| FfdbError::Database(e))
    }

    /// Initialize the database schema
    pub(crate) fn initialize_schema(&mut self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS weekly_stats (
                player_id TEXT NOT NULL,
                player_name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                position TEXT NOT NULL,
                team TEXT NOT NULL,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                opponent TEXT,
                passing_yards REAL NOT NULL DEFAULT 0,
                passing_tds INTEGER NOT NULL DEFAULT 0,
                interceptions INTEGER NOT NULL DEFAULT 0,
                rushing_yards REAL NOT NULL DEFAULT 0,
                rushing_tds INTEGER NOT NULL DEFAULT 0,
                receptions INTEGER NOT NULL DEFAULT 0,
                receiving_yards REAL NOT NULL DEFAULT 0,
                receiving_tds INTEGER NOT NULL DEFAULT 0,
                targets INTEGER NOT NULL DEFAULT 0,
                fumbles_lost INTEGER NOT NULL DEFAULT 0,
                fantasy_points REAL NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (player_id, season, week)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS snap_counts (
                player_id TEXT NOT NULL,
                player_name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                position TEXT NOT NULL,
                team TEXT NOT NULL,
                opponent TEXT,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                offense_snaps INTEGER NOT NULL DEFAULT 0,
                offense_pct REAL NOT NULL DEFAULT 0,
                defense_snaps INTEGER NOT NULL DEFAULT 0,
                defense_pct REAL NOT NULL DEFAULT 0,
                st_snaps INTEGER NOT NULL DEFAULT 0,
                st_pct REAL NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (player_id, team, season, week)
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS draftkings_pricing (
                player_name TEXT NOT NULL,
                name_key TEXT NOT NULL,
                team TEXT NOT NULL,
                position TEXT NOT NULL,
                opponent TEXT,
                season INTEGER NOT NULL,
                week INTEGER NOT NULL,
                salary INTEGER NOT NULL,
                created_at INTEGER NOT NULL,
                PRIMARY KEY (player_name, team, season, week)
            )",
            [],
        )?;

        // Candidate rows for the snap join
        self.conn.execute(
            "CREATE VIEW IF NOT EXISTS offense_snap_counts AS
             SELECT * FROM snap_counts
             WHERE position IN ('QB', 'RB', 'WR', 'TE', 'FB')",
            [],
        )?;

        // Create indexes for the join and filter paths
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_weekly_stats_season_week
             ON weekly_stats(season, week)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_snap_counts_join
             ON snap_counts(season, week, name_key, team)",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_pricing_join
             ON draftkings_pricing(season, week, name_key, team)",
            [],
        )?;

        Ok(())
    }
}
