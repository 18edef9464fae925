//! Cross-source join rules.
//!
//! A weekly stat row picks up its snap share and salary through two indexes
//! keyed on [`JoinKey`]. Each index keeps one row per key, chosen by the
//! table's tie-break rule:
//! - snap counts: highest offensive snap percentage wins
//! - salaries: highest salary wins
//!
//! A key with no row yields `None`. That is an expected outcome for players
//! who were not on a salary slate or have no snap record.

use super::{normalize_name, teams::canonical_team};
use crate::storage::models::{PricingRecord, SnapCount, WeeklyStat};
use crate::{Season, Week};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

/// `(normalized name, canonical team, season, week)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinKey {
    pub name_key: String,
    pub team: String,
    pub season: Season,
    pub week: Week,
}

impl JoinKey {
    pub fn new(name: &str, team: &str, season: Season, week: Week) -> Self {
        Self {
            name_key: normalize_name(name),
            team: canonical_team(team),
            season,
            week,
        }
    }

    pub fn for_stat(stat: &WeeklyStat) -> Self {
        Self::new(&stat.player_name, &stat.team, stat.season, stat.week)
    }

    pub fn for_snap(snap: &SnapCount) -> Self {
        Self::new(&snap.player_name, &snap.team, snap.season, snap.week)
    }

    pub fn for_price(price: &PricingRecord) -> Self {
        Self::new(&price.player_name, &price.team, price.season, price.week)
    }
}

/// One winning row per join key.
#[derive(Debug)]
pub struct JoinIndex<T> {
    rows: HashMap<JoinKey, T>,
}

impl<T> JoinIndex<T> {
    /// Index `rows` by `key`, keeping the row that `prefer` orders highest.
    ///
    /// On equal ordering the first row seen is kept.
    pub fn build<I, K, P>(rows: I, key: K, prefer: P) -> Self
    where
        I: IntoIterator<Item = T>,
        K: Fn(&T) -> JoinKey,
        P: Fn(&T, &T) -> Ordering,
    {
        let mut index: HashMap<JoinKey, T> = HashMap::new();
        for row in rows {
            let k = key(&row);
            let replace = match index.get(&k) {
                Some(current) => prefer(&row, current) == Ordering::Greater,
                None => true,
            };
            if replace {
                index.insert(k, row);
            }
        }
        Self { rows: index }
    }

    pub fn get(&self, key: &JoinKey) -> Option<&T> {
        self.rows.get(key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Duplicate snap rows: the larger offensive share is the real one.
pub fn prefer_offense_pct(a: &SnapCount, b: &SnapCount) -> Ordering {
    a.offense_pct.total_cmp(&b.offense_pct)
}

/// Duplicate salary rows: the higher salary wins.
pub fn prefer_salary(a: &PricingRecord, b: &PricingRecord) -> Ordering {
    a.salary.cmp(&b.salary)
}

pub fn snap_index(rows: Vec<SnapCount>) -> JoinIndex<SnapCount> {
    JoinIndex::build(rows, JoinKey::for_snap, prefer_offense_pct)
}

pub fn salary_index(rows: Vec<PricingRecord>) -> JoinIndex<PricingRecord> {
    JoinIndex::build(rows, JoinKey::for_price, prefer_salary)
}

/// Fields a weekly row gains from the other two tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct JoinedAttributes {
    /// Offensive snap share as a percentage (0-100).
    pub snap_percentage: Option<f64>,
    pub snap_count: Option<u32>,
    pub dk_salary: Option<u32>,
}

/// Attach snap share and salary to one weekly row.
pub fn resolve_attributes(
    stat: &WeeklyStat,
    snaps: &JoinIndex<SnapCount>,
    salaries: &JoinIndex<PricingRecord>,
) -> JoinedAttributes {
    let key = JoinKey::for_stat(stat);
    let snap = snaps.get(&key);

    JoinedAttributes {
        snap_percentage: snap.map(|s| round_to(s.offense_pct * 100.0, 1)),
        snap_count: snap.map(|s| s.offense_snaps),
        dk_salary: salaries.get(&key).map(|p| p.salary),
    }
}

pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
