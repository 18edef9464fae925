//! Service configuration assembled from the environment

use crate::cli::types::time::parse_season_list;
use crate::error::FfdbError;
use crate::storage::PlayerDatabase;
use crate::{Result, Season};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_STATS_URL: &str = "https://github.com/nflverse/nflverse-data/releases/download/stats_player/stats_player_week_{season}.csv";
pub const DEFAULT_SNAPS_URL: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/snap_counts/snap_counts_{season}.csv";

/// Salary API location; absent means pricing backfill is disabled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingApiConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database_path: PathBuf,
    pub bind: SocketAddr,
    /// `["*"]` allows any origin
    pub cors_origins: Vec<String>,
    pub default_season: Season,
    pub refresh_seasons: Vec<Season>,
    /// URL template with a `{season}` placeholder
    pub stats_url: String,
    pub snaps_url: String,
    pub pricing: Option<PricingApiConfig>,
    pub http_timeout: Duration,
    pub pricing_delay: Duration,
    pub workers: usize,
    pub opponent_table: PathBuf,
    pub salary_seed: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: PlayerDatabase::default_path()
                .unwrap_or_else(|_| PathBuf::from("fantasy_football.db")),
            bind: SocketAddr::from(([127, 0, 0, 1], 8001)),
            cors_origins: vec!["*".to_string()],
            default_season: Season::new(2024),
            refresh_seasons: vec![Season::new(2024), Season::new(2025)],
            stats_url: DEFAULT_STATS_URL.to_string(),
            snaps_url: DEFAULT_SNAPS_URL.to_string(),
            pricing: None,
            http_timeout: Duration::from_secs(15),
            pricing_delay: Duration::from_millis(500),
            workers: 3,
            opponent_table: PathBuf::from("data/opponent_disambiguation.csv"),
            salary_seed: PathBuf::from("data/dk_salaries_2025.csv"),
        }
    }
}

impl AppConfig {
    /// Read the process environment (after loading `.env`, if any).
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup, starting from the defaults.
    ///
    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(path) = get("FFDB_DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }
        if let Some(bind) = get("FFDB_BIND") {
            config.bind = parse_value("FFDB_BIND", &bind)?;
        }
        if let Some(origins) = get("CORS_ORIGINS") {
            config.cors_origins = parse_origins(&origins)?;
        }
        if let Some(season) = get("FFDB_DEFAULT_SEASON") {
            config.default_season = season
                .parse()
                .map_err(|e| config_error("FFDB_DEFAULT_SEASON", e))?;
        }
        if let Some(seasons) = get("FFDB_REFRESH_SEASONS") {
            let seasons =
                parse_season_list(&seasons).map_err(|e| config_error("FFDB_REFRESH_SEASONS", e))?;
            if seasons.is_empty() {
                return Err(FfdbError::Config {
                    message: "FFDB_REFRESH_SEASONS lists no seasons".to_string(),
                });
            }
            config.refresh_seasons = seasons;
        }
        if let Some(url) = get("NFLVERSE_STATS_URL") {
            config.stats_url = url;
        }
        if let Some(url) = get("NFLVERSE_SNAPS_URL") {
            config.snaps_url = url;
        }
        if let Some(base_url) = get("PRICING_API_URL") {
            config.pricing = Some(PricingApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key: get("PRICING_API_KEY"),
            });
        }
        if let Some(secs) = get("FFDB_HTTP_TIMEOUT_SECS") {
            config.http_timeout = Duration::from_secs(parse_value("FFDB_HTTP_TIMEOUT_SECS", &secs)?);
        }
        if let Some(ms) = get("FFDB_PRICING_DELAY_MS") {
            config.pricing_delay = Duration::from_millis(parse_value("FFDB_PRICING_DELAY_MS", &ms)?);
        }
        if let Some(workers) = get("FFDB_WORKERS") {
            let workers: usize = parse_value("FFDB_WORKERS", &workers)?;
            if workers == 0 {
                return Err(FfdbError::Config {
                    message: "FFDB_WORKERS must be at least 1".to_string(),
                });
            }
            config.workers = workers;
        }
        if let Some(path) = get("FFDB_OPPONENT_TABLE") {
            config.opponent_table = PathBuf::from(path);
        }
        if let Some(path) = get("FFDB_SALARY_SEED") {
            config.salary_seed = PathBuf::from(path);
        }

        Ok(config)
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// `*` or a list of `scheme://host[:port]` origins.
fn parse_origins(raw: &str) -> Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect();

    for origin in &origins {
        let valid = origin == "*"
            || ["http://", "https://"]
                .iter()
                .any(|scheme| origin.len() > scheme.len() && origin.starts_with(scheme));
        if !valid {
            return Err(config_error("CORS_ORIGINS", format!("'{origin}' is not an origin")));
        }
    }
    Ok(origins)
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| config_error(key, e))
}

fn config_error(key: &str, err: impl std::fmt::Display) -> FfdbError {
    FfdbError::Config {
        message: format!("{key}: {err}"),
    }
}
