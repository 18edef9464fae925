//! PPR fantasy point computation.

use crate::identity::join::round_to;


/// Counting stats that score in PPR. Missing values score nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FantasyStats {
    pub passing_yards: Option<f64>,
    pub passing_tds: Option<f64>,
    pub interceptions: Option<f64>,
    pub rushing_yards: Option<f64>,
    pub rushing_tds: Option<f64>,
    pub receptions: Option<f64>,
    pub receiving_yards: Option<f64>,
    pub receiving_tds: Option<f64>,
    pub fumbles_lost: Option<f64>,
}

pub const PASSING_YARD: f64 = 0.04;
pub const PASSING_TD: f64 = 4.0;
pub const INTERCEPTION: f64 = -1.0;
pub const RUSHING_YARD: f64 = 0.1;
pub const RUSHING_TD: f64 = 6.0;
pub const RECEPTION: f64 = 1.0;
pub const RECEIVING_YARD: f64 = 0.1;
pub const RECEIVING_TD: f64 = 6.0;
pub const FUMBLE_LOST: f64 = -1.0;

impl FantasyStats {
    fn weighted(&self) -> [(Option<f64>, f64); 9] {
        [
            (self.passing_yards, PASSING_YARD),
            (self.passing_tds, PASSING_TD),
            (self.interceptions, INTERCEPTION),
            (self.rushing_yards, RUSHING_YARD),
            (self.rushing_tds, RUSHING_TD),
            (self.receptions, RECEPTION),
            (self.receiving_yards, RECEIVING_YARD),
            (self.receiving_tds, RECEIVING_TD),
            (self.fumbles_lost, FUMBLE_LOST),
        ]
    }
}

/// PPR total rounded to two decimals.
pub fn calculate_fantasy_points(stats: &FantasyStats) -> f64 {
    let total: f64 = stats
        .weighted()
        .iter()
        .map(|(value, weight)| value.unwrap_or(0.0) * weight)
        .sum();
    round_to(total, 2)
}

/// The provider's own PPR total when it published one, else the formula.
pub fn fantasy_points(stats: &FantasyStats, provider_ppr: Option<f64>) -> f64 {
    match provider_ppr {
        Some(points) if points.is_finite() => round_to(points, 2),
        _ => calculate_fantasy_points(stats),
    }
}
