//! Core utilities shared across the service
//!
//! - `cache`: LRU memoization of read queries
//! - `config`: Environment-driven service configuration
//! - `http`: HTTP client construction for the data providers

pub mod cache;
pub mod config;
pub mod http;

// Re-export commonly used items for convenience
pub use cache::{PlayersCacheKey, QueryCache};
pub use config::{AppConfig, PricingApiConfig};
pub use http::build_client;
