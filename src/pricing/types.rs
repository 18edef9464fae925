//! Salary payloads and the row rules shared by every salary loader.

use crate::storage::models::PricingRecord;
use crate::{Position, Result, Season, Week};
use serde::Deserialize;
use tracing::debug;

/// Salaries below this are placeholders, not real slate prices.
pub const MIN_SALARY: u32 = 2000;

/// Team recorded when a salary row does not name one.
pub const UNKNOWN_TEAM: &str = "UNK";

/// Parse a salary cell such as `8200`, `"8,200"` or `"$8,200"`.
///
/// ```rust
/// use ffdb::pricing::types::parse_salary;
///
/// assert_eq!(parse_salary("$8,200"), Some(8200));
/// assert_eq!(parse_salary(" 4500 "), Some(4500));
/// assert_eq!(parse_salary("n/a"), None);
/// ```
pub fn parse_salary(raw: &str) -> Option<u32> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    match cleaned.parse::<u32>() {
        Ok(salary) => Some(salary),
        Err(_) => cleaned
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.round() as u32),
    }
}

/// Salary as published: a number or a formatted string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SalaryValue {
    Number(f64),
    Text(String),
}

impl SalaryValue {
    pub fn amount(&self) -> Option<u32> {
        match self {
            SalaryValue::Number(n) if n.is_finite() && *n >= 0.0 => Some(n.round() as u32),
            SalaryValue::Number(_) => None,
            SalaryValue::Text(s) => parse_salary(s),
        }
    }
}

/// One player of a salary API slate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SalaryEntry {
    #[serde(alias = "name", alias = "player")]
    pub player_name: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default, alias = "pos")]
    pub position: Option<String>,
    #[serde(default)]
    pub opponent: Option<String>,
    pub salary: Option<SalaryValue>,
}

/// Salary API response: a bare list or wrapped in `{"salaries": [...]}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SalaryResponse {
    List(Vec<SalaryEntry>),
    Wrapped { salaries: Vec<SalaryEntry> },
}

impl SalaryResponse {
    pub fn into_entries(self) -> Vec<SalaryEntry> {
        match self {
            SalaryResponse::List(entries) => entries,
            SalaryResponse::Wrapped { salaries } => salaries,
        }
    }
}

/// Apply the salary row rules and build a record.
///
/// Rows with an empty name, a salary under [`MIN_SALARY`] or a non-skill
/// position are rejected. A missing team becomes [`UNKNOWN_TEAM`]. The
/// opponent is kept as the raw code; resolution happens at load time.
pub fn priced_row(
    name: Option<&str>,
    team: Option<&str>,
    position: Option<&str>,
    opponent: Option<&str>,
    salary: Option<u32>,
    season: Season,
    week: Week,
) -> Option<PricingRecord> {
    let name = name.map(str::trim).filter(|n| !n.is_empty())?;
    let salary = salary.filter(|s| *s >= MIN_SALARY)?;
    let position: Position = position?.parse().ok()?;
    let team = team
        .map(|t| t.trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNKNOWN_TEAM.to_string());

    Some(PricingRecord {
        player_name: name.to_string(),
        team,
        position: position.to_string(),
        opponent: opponent
            .map(|o| o.trim().to_uppercase())
            .filter(|o| !o.is_empty()),
        season,
        week,
        salary,
    })
}

impl SalaryEntry {
    pub fn into_record(self, season: Season, week: Week) -> Option<PricingRecord> {
        priced_row(
            self.player_name.as_deref(),
            self.team.as_deref(),
            self.position.as_deref(),
            self.opponent.as_deref(),
            self.salary.as_ref().and_then(SalaryValue::amount),
            season,
            week,
        )
    }
}

/// Decode a salary API body into the rows that pass [`priced_row`].
pub fn parse_salary_response(body: &str, season: Season, week: Week) -> Result<Vec<PricingRecord>> {
    let entries = serde_json::from_str::<SalaryResponse>(body)?.into_entries();
    let total = entries.len();
    let records: Vec<PricingRecord> = entries
        .into_iter()
        .filter_map(|entry| entry.into_record(season, week))
        .collect();

    debug!(
        "Kept {} of {} salary rows for {} week {}",
        records.len(),
        total,
        season,
        week
    );
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, team: &str, position: &str, salary: u32) -> Option<PricingRecord> {
        priced_row(
            Some(name),
            Some(team),
            Some(position),
            None,
            Some(salary),
            Season::new(2025),
            Week::new(1),
        )
    }

    #[test]
    fn test_parse_salary_formats() {
        assert_eq!(parse_salary("$8,200"), Some(8200));
        assert_eq!(parse_salary("8200"), Some(8200));
        assert_eq!(parse_salary("8200.0"), Some(8200));
        assert_eq!(parse_salary("$"), None);
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("-300"), None);
    }

    #[test]
    fn test_row_rules() {
        assert!(row("Ja'Marr Chase", "CIN", "WR", 8100).is_some());
        assert!(row("", "CIN", "WR", 8100).is_none());
        assert!(row("   ", "CIN", "WR", 8100).is_none());
        assert!(row("Ja'Marr Chase", "CIN", "WR", 1999).is_none());
        assert!(row("Ja'Marr Chase", "CIN", "WR", 2000).is_some());
        assert!(row("Bills", "BUF", "DST", 3200).is_none());
        assert!(row("Brandon Aubrey", "DAL", "K", 4000).is_none());
    }

    #[test]
    fn test_missing_team_is_unknown() {
        let record = priced_row(
            Some("Jonnu Smith"),
            None,
            Some("te"),
            Some(" @nyj "),
            Some(3500),
            Season::new(2025),
            Week::new(2),
        )
        .unwrap();
        assert_eq!(record.team, UNKNOWN_TEAM);
        assert_eq!(record.position, "TE");
        assert_eq!(record.opponent.as_deref(), Some("@NYJ"));
    }

    #[test]
    fn test_salary_response_shapes() {
        let list: SalaryResponse = serde_json::from_str(
            r#"[{"name": "Josh Allen", "team": "BUF", "position": "QB", "salary": 7100}]"#,
        )
        .unwrap();
        assert_eq!(list.into_entries().len(), 1);

        let wrapped: SalaryResponse = serde_json::from_str(
            r#"{"salaries": [{"player_name": "Josh Allen", "team": "BUF", "pos": "QB", "salary": "$7,100", "opponent": "NY"}]}"#,
        )
        .unwrap();
        let entries = wrapped.into_entries();
        let record = entries[0]
            .clone()
            .into_record(Season::new(2025), Week::new(3))
            .unwrap();
        assert_eq!(record.salary, 7100);
        assert_eq!(record.opponent.as_deref(), Some("NY"));
    }

    #[test]
    fn test_parse_salary_response() {
        let body = r#"[
            {"name": "Josh Allen", "team": "BUF", "position": "QB", "salary": 7100},
            {"name": "Bills", "team": "BUF", "position": "DST", "salary": 3200}
        ]"#;
        let rows = parse_salary_response(body, Season::new(2025), Week::new(1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].player_name, "Josh Allen");

        let err =
            parse_salary_response("<html>rate limited</html>", Season::new(2025), Week::new(1))
                .unwrap_err();
        assert!(matches!(err, crate::error::FfdbError::Json(_)));
    }
}
