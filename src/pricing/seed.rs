//! Bundled salary seed file (`WEEK,NAME,TEAM,POS,$`).

use super::types::{parse_salary, priced_row};
use crate::storage::models::PricingRecord;
use crate::{Result, Season, Week};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SeedRow {
    #[serde(rename = "WEEK", default)]
    week: Option<String>,
    #[serde(rename = "NAME", default)]
    name: Option<String>,
    #[serde(rename = "TEAM", default)]
    team: Option<String>,
    #[serde(rename = "POS", default)]
    position: Option<String>,
    #[serde(rename = "$", default)]
    salary: Option<String>,
}

/// Accepted rows of a seed file plus what was thrown away.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SeedBatch {
    pub records: Vec<PricingRecord>,
    /// Weeks that have at least one accepted row
    pub weeks: Vec<Week>,
    pub skipped: usize,
}

/// Read seed rows for `season`. A row without a week counts as week 1.
pub fn read_seed<R: Read>(reader: R, season: Season) -> Result<SeedBatch> {
    let mut csv = csv::Reader::from_reader(reader);
    let mut batch = SeedBatch::default();
    let mut weeks = BTreeSet::new();

    for (idx, row) in csv.deserialize::<SeedRow>().enumerate() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                debug!("Skipping seed row {}: {}", idx + 1, e);
                batch.skipped += 1;
                continue;
            }
        };

        let week = match row.week.as_deref().map(str::trim).filter(|w| !w.is_empty()) {
            Some(raw) => match raw.parse::<Week>() {
                Ok(week) => week,
                Err(_) => {
                    batch.skipped += 1;
                    continue;
                }
            },
            None => Week::new(1),
        };

        let salary = row.salary.as_deref().and_then(parse_salary);
        match priced_row(
            row.name.as_deref(),
            row.team.as_deref(),
            row.position.as_deref(),
            None,
            salary,
            season,
            week,
        ) {
            Some(record) => {
                weeks.insert(week);
                batch.records.push(record);
            }
            None => batch.skipped += 1,
        }
    }

    batch.weeks = weeks.into_iter().collect();
    Ok(batch)
}

pub fn load_seed_file(path: &Path, season: Season) -> Result<SeedBatch> {
    let file = std::fs::File::open(path)?;
    read_seed(file, season)
}
