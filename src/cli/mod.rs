//! CLI argument definitions and parsing.

pub mod types;

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use types::time::{Season, Week};

#[derive(Debug, Parser)]
#[clap(
    name = "ffdb",
    version,
    about = "Fantasy football stats database and JSON API"
)]
pub struct Cli {
    /// SQLite database file (or set `FFDB_DATABASE_PATH`).
    #[clap(long, global = true)]
    pub db: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the HTTP API until Ctrl-C
    Serve {
        /// Listen address (or set `FFDB_BIND`).
        #[clap(long)]
        bind: Option<SocketAddr>,
    },

    /// Reload weekly stats and snap counts: `--seasons 2024,2025`.
    Refresh {
        /// Seasons to reload; defaults to `FFDB_REFRESH_SEASONS`.
        #[clap(long, short, value_delimiter = ',')]
        seasons: Vec<Season>,
    },

    /// Reload snap counts only.
    LoadSnapCounts {
        #[clap(long, short, value_delimiter = ',')]
        seasons: Vec<Season>,
    },

    /// Backfill weekly salaries from the pricing API.
    LoadPricing {
        #[clap(long, short, value_delimiter = ',')]
        seasons: Vec<Season>,

        /// Last week to fetch.
        #[clap(long, default_value_t = Week::new(Week::REGULAR_SEASON_WEEKS))]
        through_week: Week,
    },

    /// Load a salary CSV (WEEK,NAME,TEAM,POS,$), replacing the weeks it covers.
    LoadSalaries {
        /// Defaults to `FFDB_SALARY_SEED`.
        #[clap(long, short)]
        file: Option<PathBuf>,

        #[clap(long, short = 'y', default_value_t = Season::new(2025))]
        season: Season,
    },

    /// Print table counts and available seasons as JSON.
    Summary,
}
