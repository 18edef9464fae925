//! Time-related types for NFL seasons and weeks.

use crate::error::{FfdbError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Type-safe wrapper for Season years
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Season(pub u16);

impl Season {
    /// First season published by the play-by-play era data sources.
    pub const MIN: u16 = 1999;
    pub const MAX: u16 = 2100;

    pub fn new(year: u16) -> Self {
        Self(year)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// Validate a raw year coming from a query string or CLI flag.
    pub fn try_new(year: u16) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&year) {
            Ok(Self(year))
        } else {
            Err(FfdbError::invalid_parameter(
                "season",
                format!("{year} is outside {}-{}", Self::MIN, Self::MAX),
            ))
        }
    }
}

impl Default for Season {
    fn default() -> Self {
        Self(2024)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Season {
    type Err = FfdbError;

    fn from_str(s: &str) -> Result<Self> {
        let year = s
            .trim()
            .parse::<u16>()
            .map_err(|_| FfdbError::invalid_parameter("season", format!("'{s}' is not a year")))?;
        Self::try_new(year)
    }
}

/// Type-safe wrapper for Week numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Week(pub u16);

impl Week {
    /// Regular season weeks plus the four playoff rounds.
    pub const MAX: u16 = 22;
    pub const REGULAR_SEASON_WEEKS: u16 = 18;

    pub fn new(week: u16) -> Self {
        Self(week)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    pub fn try_new(week: u16) -> Result<Self> {
        if (1..=Self::MAX).contains(&week) {
            Ok(Self(week))
        } else {
            Err(FfdbError::invalid_parameter(
                "week",
                format!("{week} is outside 1-{}", Self::MAX),
            ))
        }
    }
}

impl Default for Week {
    fn default() -> Self {
        Self(1)
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Week {
    type Err = FfdbError;

    fn from_str(s: &str) -> Result<Self> {
        let week = s
            .trim()
            .parse::<u16>()
            .map_err(|_| FfdbError::invalid_parameter("week", format!("'{s}' is not a week number")))?;
        Self::try_new(week)
    }
}

/// Parse a season list such as `2024,2025`.
pub fn parse_season_list(raw: &str) -> Result<Vec<Season>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(Season::from_str)
        .collect()
}
