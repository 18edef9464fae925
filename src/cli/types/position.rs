//! Offensive skill positions tracked by the service.

use crate::error::FfdbError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positions kept by the weekly stats loader.
///
/// The upstream feeds carry every rostered player; only these four are
/// loaded into `weekly_stats` and priced by the salary loaders.
///
/// # Examples
///
/// ```rust
/// use ffdb::Position;
///
/// let qb: Position = "qb".parse().unwrap();
/// assert_eq!(qb, Position::QB);
/// assert_eq!(qb.to_string(), "QB");
/// assert!("K".parse::<Position>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    QB,
    RB,
    WR,
    TE,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::QB => "QB",
            Position::RB => "RB",
            Position::WR => "WR",
            Position::TE => "TE",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = FfdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "QB" => Ok(Position::QB),
            "RB" => Ok(Position::RB),
            "WR" => Ok(Position::WR),
            "TE" => Ok(Position::TE),
            _ => Err(FfdbError::InvalidPosition {
                position: s.to_string(),
            }),
        }
    }
}
