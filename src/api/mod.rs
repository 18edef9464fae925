//! JSON HTTP API
//!
//! Read endpoints serve the stored tables (with the identity join applied to
//! `/api/players`); the `POST` endpoints run ingestion jobs and answer once the
//! job has finished. Every failure is answered with the
//! `{error: {code, message}, timestamp}` envelope from [`rejection`].

pub mod handlers;
pub mod params;
pub mod rejection;
pub mod responses;

#[cfg(test)]
mod tests;

use crate::commands::Ingestor;
use crate::Season;
use std::convert::Infallible;
use warp::Filter;

pub use rejection::{handle_rejection, ApiError};

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub ingestor: Ingestor,
    pub default_season: Season,
    /// Seasons reloaded when a job request names none
    pub refresh_seasons: Vec<Season>,
}

fn with_state(state: AppState) -> impl Filter<Extract = (AppState,), Error = Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Query pairs in request order; `seasons` may repeat.
fn query_pairs() -> impl Filter<Extract = (params::QueryPairs,), Error = warp::Rejection> + Clone {
    warp::query::<params::QueryPairs>()
}

fn cors(origins: &[String]) -> warp::cors::Builder {
    let builder = warp::cors()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);
    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(origins.iter().map(String::as_str))
    }
}

/// Build every route of the service.
///
/// `cors_origins` must hold `*` or valid `scheme://host[:port]` origins, as
/// produced by [`AppConfig`](crate::core::AppConfig).
pub fn create_routes(
    state: AppState,
    cors_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let root = warp::path("api")
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::root);

    let players = warp::path!("api" / "players")
        .and(warp::get())
        .and(warp::query::<params::PlayersQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_players);

    let top_performers = warp::path!("api" / "top-performers")
        .and(warp::get())
        .and(warp::query::<params::TopPerformersQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_top_performers);

    let snap_counts = warp::path!("api" / "snap-counts")
        .and(warp::get())
        .and(warp::query::<params::SnapCountsQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_snap_counts);

    let pricing = warp::path!("api" / "draftkings-pricing")
        .and(warp::get())
        .and(warp::query::<params::PricingQuery>())
        .and(with_state(state.clone()))
        .and_then(handlers::get_pricing);

    let refresh = warp::path!("api" / "refresh-data")
        .and(warp::post())
        .and(query_pairs())
        .and(with_state(state.clone()))
        .and_then(handlers::refresh_data);

    let load_snaps = warp::path!("api" / "load-snap-counts")
        .and(warp::post())
        .and(query_pairs())
        .and(with_state(state.clone()))
        .and_then(handlers::load_snap_counts);

    let load_pricing = warp::path!("api" / "load-historical-pricing")
        .and(warp::post())
        .and(query_pairs())
        .and(with_state(state.clone()))
        .and_then(handlers::load_historical_pricing);

    let summary = warp::path!("api" / "stats" / "summary")
        .and(warp::get())
        .and(with_state(state))
        .and_then(handlers::get_summary);

    let teams = warp::path!("api" / "nfl-teams")
        .and(warp::get())
        .and_then(handlers::get_nfl_teams);

    let health = warp::path("health")
        .and(warp::path::end())
        .and(warp::get())
        .map(|| {
            warp::reply::json(&serde_json::json!({
                "status": "healthy",
                "timestamp": chrono::Utc::now().to_rfc3339()
            }))
        });

    root.or(players)
        .or(top_performers)
        .or(snap_counts)
        .or(pricing)
        .or(refresh)
        .or(load_snaps)
        .or(load_pricing)
        .or(summary)
        .or(teams)
        .or(health)
        .recover(handle_rejection)
        .with(cors(cors_origins))
        .with(warp::trace::request())
}
