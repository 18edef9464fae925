//! Endpoint handlers

use super::params::{
    seasons_from_query, through_week_from_query, PlayersQuery, PricingQuery, QueryPairs,
    SnapCountsQuery, TopPerformersQuery,
};
use super::rejection::reject;
use super::responses::{
    BackfillResponse, PricingResponse, RefreshResponse, RootResponse, SnapCountsResponse,
    SnapLoadResponse, SummaryResponse, TeamsResponse,
};
use super::AppState;
use crate::identity::NFL_TEAMS;
use tracing::info;
use warp::Rejection;

type Reply = Result<warp::reply::Json, Rejection>;

pub async fn root() -> Reply {
    Ok(warp::reply::json(&RootResponse::default()))
}

pub async fn get_players(query: PlayersQuery, state: AppState) -> Reply {
    let (filter, page) = query.validate().map_err(reject)?;
    let rows = state
        .ingestor
        .database()
        .list_players(filter, page)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&rows))
}

pub async fn get_top_performers(query: TopPerformersQuery, state: AppState) -> Reply {
    let request = query.validate(state.default_season).map_err(reject)?;
    let performers = state
        .ingestor
        .database()
        .top_performers(request.season, request.week, request.position, request.limit)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&performers))
}

pub async fn get_snap_counts(query: SnapCountsQuery, state: AppState) -> Reply {
    let (filter, limit) = query.validate().map_err(reject)?;
    let rows = state
        .ingestor
        .database()
        .query_snap_counts(filter, limit)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&SnapCountsResponse::from(rows)))
}

pub async fn get_pricing(query: PricingQuery, state: AppState) -> Reply {
    let filter = query.validate(state.default_season).map_err(reject)?;
    let season = filter.season.unwrap_or(state.default_season);
    let week = filter.week;
    let rows = state
        .ingestor
        .database()
        .query_pricing(filter)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&PricingResponse::new(season, week, rows)))
}

pub async fn refresh_data(query: QueryPairs, state: AppState) -> Reply {
    let seasons = seasons_from_query(&query)
        .map_err(reject)?
        .unwrap_or_else(|| state.refresh_seasons.clone());
    info!("Refresh requested for {:?}", seasons);

    let summary = state
        .ingestor
        .refresh_seasons(&seasons)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&RefreshResponse::from(summary)))
}

pub async fn load_snap_counts(query: QueryPairs, state: AppState) -> Reply {
    let seasons = seasons_from_query(&query)
        .map_err(reject)?
        .unwrap_or_else(|| state.refresh_seasons.clone());

    let summary = state
        .ingestor
        .load_snap_counts(&seasons)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&SnapLoadResponse::from(summary)))
}

pub async fn load_historical_pricing(query: QueryPairs, state: AppState) -> Reply {
    let seasons = seasons_from_query(&query)
        .map_err(reject)?
        .unwrap_or_else(|| state.refresh_seasons.clone());
    let through_week = through_week_from_query(&query).map_err(reject)?;

    let summary = state
        .ingestor
        .backfill_pricing(&seasons, through_week)
        .await
        .map_err(reject)?;
    Ok(warp::reply::json(&BackfillResponse::from(summary)))
}

pub async fn get_summary(state: AppState) -> Reply {
    let summary = state.ingestor.database().summary().await.map_err(reject)?;
    Ok(warp::reply::json(&SummaryResponse::from(summary)))
}

pub async fn get_nfl_teams() -> Reply {
    Ok(warp::reply::json(&TeamsResponse {
        success: true,
        count: NFL_TEAMS.len(),
        teams: &NFL_TEAMS,
    }))
}
