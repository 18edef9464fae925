//! Player identity resolution across data sources.
//!
//! None of the three feeds (weekly stats, snap counts, salaries) share a
//! stable player identifier, so rows are matched on a
//! `(normalized name, team, season, week)` key:
//! - `normalize_name`: the name half of the key
//! - `teams`: team code canonicalization and the franchise table
//! - `join`: the match rules and tie-breaks used at query time
//! - `opponent`: week-keyed resolution of ambiguous metro opponent codes

pub mod join;
pub mod opponent;
pub mod teams;


pub use join::{JoinIndex, JoinKey, JoinedAttributes};
pub use opponent::{Opponent, OpponentTable};
pub use teams::{canonical_team, NflTeam, NFL_TEAMS};

/// Generational suffixes dropped from the end of a name.
const SUFFIXES: [&str; 5] = ["jr", "sr", "ii", "iii", "iv"];

/// Build the name part of a cross-source join key.
///
/// Lower-cases, removes periods, collapses whitespace and strips trailing
/// generational suffixes so that `"A.J. Brown"`, `"AJ Brown"` and
/// `"Michael Pittman Jr."` / `"michael pittman"` line up. A name made of a
/// single suffix-looking token is kept as is.
///
/// ```rust
/// use ffdb::identity::normalize_name;
///
/// assert_eq!(normalize_name("Michael Pittman Jr."), "michael pittman");
/// assert_eq!(normalize_name("A.J. Brown"), normalize_name("AJ Brown"));
/// assert_eq!(normalize_name(""), "");
/// ```
pub fn normalize_name(name: &str) -> String {
    let lowered = name.to_lowercase().replace('.', "");
    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();

    while tokens.len() > 1 {
        let Some(last) = tokens.last() else {
            break;
        };
        if !SUFFIXES.contains(last) {
            break;
        }
        tokens.pop();

        // "Pittman, Jr." leaves a dangling comma on the surname
        if let Some(tail) = tokens.last_mut() {
            *tail = tail.trim_end_matches(',');
            if tail.is_empty() {
                tokens.pop();
            }
        }
    }

    tokens.join(" ")
}
