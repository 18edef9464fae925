//! NFL franchise reference data and team code canonicalization.

use serde::Serialize;

/// A franchise as listed by `GET /api/nfl-teams`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NflTeam {
    pub abbreviation: &'static str,
    pub name: &'static str,
    pub conference: &'static str,
    pub division: &'static str,
}

const fn team(
    abbreviation: &'static str,
    name: &'static str,
    conference: &'static str,
    division: &'static str,
) -> NflTeam {
    NflTeam {
        abbreviation,
        name,
        conference,
        division,
    }
}

/// Abbreviations follow the nflverse convention (`LA` is the Rams).
pub const NFL_TEAMS: [NflTeam; 32] = [
    team("BUF", "Buffalo Bills", "AFC", "East"),
    team("MIA", "Miami Dolphins", "AFC", "East"),
    team("NE", "New England Patriots", "AFC", "East"),
    team("NYJ", "New York Jets", "AFC", "East"),
    team("BAL", "Baltimore Ravens", "AFC", "North"),
    team("CIN", "Cincinnati Bengals", "AFC", "North"),
    team("CLE", "Cleveland Browns", "AFC", "North"),
    team("PIT", "Pittsburgh Steelers", "AFC", "North"),
    team("HOU", "Houston Texans", "AFC", "South"),
    team("IND", "Indianapolis Colts", "AFC", "South"),
    team("JAX", "Jacksonville Jaguars", "AFC", "South"),
    team("TEN", "Tennessee Titans", "AFC", "South"),
    team("DEN", "Denver Broncos", "AFC", "West"),
    team("KC", "Kansas City Chiefs", "AFC", "West"),
    team("LAC", "Los Angeles Chargers", "AFC", "West"),
    team("LV", "Las Vegas Raiders", "AFC", "West"),
    team("DAL", "Dallas Cowboys", "NFC", "East"),
    team("NYG", "New York Giants", "NFC", "East"),
    team("PHI", "Philadelphia Eagles", "NFC", "East"),
    team("WAS", "Washington Commanders", "NFC", "East"),
    team("CHI", "Chicago Bears", "NFC", "North"),
    team("DET", "Detroit Lions", "NFC", "North"),
    team("GB", "Green Bay Packers", "NFC", "North"),
    team("MIN", "Minnesota Vikings", "NFC", "North"),
    team("ATL", "Atlanta Falcons", "NFC", "South"),
    team("CAR", "Carolina Panthers", "NFC", "South"),
    team("NO", "New Orleans Saints", "NFC", "South"),
    team("TB", "Tampa Bay Buccaneers", "NFC", "South"),
    team("ARI", "Arizona Cardinals", "NFC", "West"),
    team("LA", "Los Angeles Rams", "NFC", "West"),
    team("SEA", "Seattle Seahawks", "NFC", "West"),
    team("SF", "San Francisco 49ers", "NFC", "West"),
];

/// Spellings used by salary sites and older feeds, mapped to the nflverse code.
const TEAM_ALIASES: [(&str, &str); 11] = [
    ("JAC", "JAX"),
    ("WSH", "WAS"),
    ("LAR", "LA"),
    ("ARZ", "ARI"),
    ("BLT", "BAL"),
    ("CLV", "CLE"),
    ("HST", "HOU"),
    ("GNB", "GB"),
    ("KAN", "KC"),
    ("NWE", "NE"),
    ("NOR", "NO"),
];

/// Canonical team code used in join keys: upper-cased, trimmed, aliases resolved.
///
/// Unknown codes pass through upper-cased so that a feed's own spelling still
/// matches itself.
pub fn canonical_team(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    TEAM_ALIASES
        .iter()
        .find(|(alias, _)| *alias == upper)
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or(upper)
}
