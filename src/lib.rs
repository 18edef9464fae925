//! Fantasy Football Database Library
//!
//! Aggregates NFL weekly player statistics, offensive snap counts and daily
//! fantasy salaries into a local SQLite database and serves them through a
//! JSON HTTP API.
//!
//! ## Features
//!
//! - **Ingestion**: Season reloads from the nflverse CSV releases, salary
//!   backfill from a pricing API or a bundled CSV seed
//! - **Identity Join**: Rows from the three sources are matched on a
//!   normalized `(name, team, season, week)` key
//! - **Fantasy Scoring**: PPR points computed from raw stat lines when the
//!   provider does not supply them
//! - **HTTP API**: Filtered listings, top performers, snap counts, salaries
//!   and ingestion triggers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ffdb::storage::{SharedDatabase, StatFilter, Page};
//! use ffdb::Season;
//!
//! # async fn example() -> ffdb::Result<()> {
//! let db = SharedDatabase::open_in_memory()?;
//! let rows = db
//!     .list_players(StatFilter::season(Season::new(2024)), Page::default())
//!     .await?;
//! println!("{} rows", rows.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Configuration
//!
//! Every setting has a default; see [`core::AppConfig`]. A `.env` file in the
//! working directory is loaded at startup:
//! ```bash
//! export FFDB_DATABASE_PATH=./fantasy_football.db
//! export PRICING_API_URL=https://salaries.example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod core;
pub mod error;
pub mod identity;
pub mod jobs;
pub mod nflverse;
pub mod pricing;
pub mod storage;

// Re-export commonly used types
pub use cli::types::{
    position::Position,
    time::{Season, Week},
};
pub use error::{FfdbError, Result};
