//! Shared handle around the single database connection.
//!
//! Every call locks the connection and runs on tokio's blocking pool, so HTTP
//! handlers and ingestion jobs can share one `SharedDatabase` freely. Player
//! listings are memoized and every write clears the memo.

use super::{models::*, schema::PlayerDatabase};
use crate::core::cache::{PlayersCacheKey, QueryCache};
use crate::error::FfdbError;
use crate::{Result, Season, Week};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct SharedDatabase {
    inner: Arc<Mutex<PlayerDatabase>>,
    players_cache: QueryCache<PlayersCacheKey, Vec<PlayerRow>>,
}

impl SharedDatabase {
    pub fn new(db: PlayerDatabase) -> Self {
        Self {
            inner: Arc::new(Mutex::new(db)),
            players_cache: QueryCache::default(),
        }
    }

    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(PlayerDatabase::new(path)?))
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(PlayerDatabase::new_in_memory()?))
    }

    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PlayerDatabase) -> Result<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || {
            let mut db = inner.lock().map_err(|_| FfdbError::LockPoisoned)?;
            f(&mut *db)
        })
        .await
        .map_err(|e| FfdbError::Job {
            message: e.to_string(),
        })?
    }

    async fn write<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PlayerDatabase) -> Result<T> + Send + 'static,
    {
        let result = self.call(f).await;
        self.players_cache.clear();
        result
    }

    pub async fn replace_season_stats(&self, season: Season, rows: Vec<WeeklyStat>) -> Result<usize> {
        self.write(move |db| db.replace_season_stats(season, &rows))
            .await
    }

    pub async fn replace_season_snap_counts(
        &self,
        season: Season,
        rows: Vec<SnapCount>,
    ) -> Result<usize> {
        self.write(move |db| db.replace_season_snap_counts(season, &rows))
            .await
    }

    pub async fn replace_week_pricing(
        &self,
        season: Season,
        week: Week,
        rows: Vec<PricingRecord>,
    ) -> Result<usize> {
        self.write(move |db| db.replace_week_pricing(season, week, &rows))
            .await
    }

    pub async fn reload_pricing_weeks(
        &self,
        season: Season,
        weeks: Vec<Week>,
        rows: Vec<PricingRecord>,
    ) -> Result<UpsertCounts> {
        self.write(move |db| db.reload_pricing_weeks(season, &weeks, &rows))
            .await
    }

    pub async fn has_pricing(&self, season: Season, week: Week) -> Result<bool> {
        self.call(move |db| db.has_pricing(season, week)).await
    }

    pub async fn list_players(&self, filter: StatFilter, page: Page) -> Result<Vec<PlayerRow>> {
        let key = PlayersCacheKey {
            filter: filter.clone(),
            page,
        };
        if let Some(rows) = self.players_cache.get(&key) {
            return Ok(rows);
        }

        // A write committing during the read clears the cache first
        let generation = self.players_cache.generation();
        let rows = self.call(move |db| db.list_players(&filter, page)).await?;
        self.players_cache.put_if_current(key, rows.clone(), generation);
        Ok(rows)
    }

    pub fn cache_stats(&self) -> (usize, usize) {
        self.players_cache.memory_stats()
    }

    pub async fn top_performers(
        &self,
        season: Season,
        week: Option<Week>,
        position: Option<String>,
        limit: u32,
    ) -> Result<TopPerformers> {
        self.call(move |db| db.top_performers(season, week, position, limit))
            .await
    }

    pub async fn query_snap_counts(&self, filter: StatFilter, limit: u32) -> Result<Vec<SnapCount>> {
        self.call(move |db| db.query_snap_counts(&filter, limit))
            .await
    }

    pub async fn query_pricing(&self, filter: StatFilter) -> Result<Vec<PricingRecord>> {
        self.call(move |db| db.query_pricing(&filter)).await
    }

    pub async fn summary(&self) -> Result<DatabaseSummary> {
        self.call(|db| db.summary()).await
    }

    /// Close the connection once every other handle has been dropped.
    ///
    /// Returns an error if clones are still alive.
    pub fn close(self) -> Result<()> {
        let mutex = Arc::try_unwrap(self.inner).map_err(|_| FfdbError::Job {
            message: "database still in use at shutdown".to_string(),
        })?;
        let db = mutex.into_inner().map_err(|_| FfdbError::LockPoisoned)?;
        db.close()
    }
}
