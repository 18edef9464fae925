//! Resolution of ambiguous opponent codes.
//!
//! Salary slates list opponents by metro code, and `LA` / `NY` each cover two
//! franchises. Which one is meant depends on the week, so resolution goes
//! through a week-keyed table. The table is known to be incomplete; anything
//! it does not cover comes back as [`Opponent::Unknown`] instead of a guess.

use super::teams::canonical_team;
use crate::{Result, Season, Week};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Metro codes shared by two franchises.
pub const AMBIGUOUS_CODES: [&str; 2] = ["LA", "NY"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Opponent {
    Team(String),
    Unknown,
}

impl Opponent {
    pub fn into_code(self) -> Option<String> {
        match self {
            Opponent::Team(code) => Some(code),
            Opponent::Unknown => None,
        }
    }
}

/// One row of `opponent_disambiguation.csv`.
#[derive(Debug, Deserialize)]
struct OpponentEntry {
    season: u16,
    week: u16,
    team: String,
    code: String,
    opponent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    season: Season,
    week: Week,
    team: String,
    code: String,
}

/// Week-keyed map from `(team, ambiguous code)` to the actual opponent.
#[derive(Debug, Default, Clone)]
pub struct OpponentTable {
    entries: HashMap<EntryKey, String>,
}

impl OpponentTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, season: Season, week: Week, team: &str, code: &str, opponent: &str) {
        self.entries.insert(
            EntryKey {
                season,
                week,
                team: canonical_team(team),
                code: code.trim().to_uppercase(),
            },
            canonical_team(opponent),
        );
    }

    /// Read a `season,week,team,code,opponent` CSV.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut csv = csv::Reader::from_reader(reader);
        for entry in csv.deserialize::<OpponentEntry>() {
            let entry = entry?;
            table.insert(
                Season::new(entry.season),
                Week::new(entry.week),
                &entry.team,
                &entry.code,
                &entry.opponent,
            );
        }
        Ok(table)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve the opponent code a feed reported for `team` in a given week.
    ///
    /// Home/away markers (`@KC`, `vs KC`) are tolerated.
    pub fn resolve(&self, season: Season, week: Week, team: &str, raw_code: &str) -> Opponent {
        let code = strip_venue_marker(raw_code);
        if code.is_empty() {
            return Opponent::Unknown;
        }

        if !AMBIGUOUS_CODES.contains(&code.as_str()) {
            return Opponent::Team(canonical_team(&code));
        }

        let key = EntryKey {
            season,
            week,
            team: canonical_team(team),
            code,
        };
        match self.entries.get(&key) {
            Some(opponent) => Opponent::Team(opponent.clone()),
            None => {
                debug!(
                    "No disambiguation for {} vs {} in {} week {}",
                    key.team, key.code, season, week
                );
                Opponent::Unknown
            }
        }
    }
}

fn strip_venue_marker(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let lowered = trimmed.to_lowercase();
    let trimmed = if lowered.starts_with("vs") {
        trimmed[2..].trim_start_matches('.')
    } else {
        trimmed
    };
    trimmed.trim().to_uppercase()
}
