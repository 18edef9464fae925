//! Storage layer for the fantasy football database
//!
//! This module wraps the SQLite database, organized into:
//! - `models`: Data structures
//! - `schema`: Database connection and schema management
//! - `queries`: Season/week replacement and salary upserts
//! - `analysis`: Filtered reads, the cross-source join and season aggregates
//! - `repository`: Async, thread-safe handle shared by the server and jobs

pub mod analysis;
pub mod models;
pub mod queries;
pub mod repository;
pub mod schema;

#[cfg(test)]
mod tests;

// Re-export the main types and database struct for easy access
pub use models::*;
pub use repository::SharedDatabase;
pub use schema::PlayerDatabase;
