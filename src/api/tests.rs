//! Route tests driven through `warp::test`

use super::*;
use crate::error::{FfdbError, Result};
use crate::jobs::JobPool;
use crate::nflverse::StatsProvider;
use crate::storage::models::{PricingRecord, SnapCount, WeeklyStat};
use crate::storage::SharedDatabase;
use crate::Week;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

struct StubStats;

fn stat(id: &str, name: &str, position: &str, team: &str, week: u16, points: f64) -> WeeklyStat {
    WeeklyStat {
        player_id: id.to_string(),
        player_name: name.to_string(),
        position: position.to_string(),
        team: team.to_string(),
        season: Season::new(2024),
        week: Week::new(week),
        opponent: Some("BUF".to_string()),
        passing_yards: 0.0,
        passing_tds: 0,
        interceptions: 0,
        rushing_yards: 0.0,
        rushing_tds: 0,
        receptions: 0,
        receiving_yards: 0.0,
        receiving_tds: 0,
        targets: 0,
        fumbles_lost: 0,
        fantasy_points: points,
    }
}

#[async_trait]
impl StatsProvider for StubStats {
    async fn weekly_stats(&self, season: Season) -> Result<Vec<WeeklyStat>> {
        if season.as_u16() == 2023 {
            return Err(FfdbError::Provider {
                provider: "stub".to_string(),
                message: "season not published".to_string(),
            });
        }
        Ok(vec![stat("00-9", "Derrick Henry", "RB", "BAL", 1, 25.0)])
    }

    async fn snap_counts(&self, season: Season) -> Result<Vec<SnapCount>> {
        Ok(vec![SnapCount {
            player_id: "HenrDe00".to_string(),
            player_name: "Derrick Henry".to_string(),
            position: "RB".to_string(),
            team: "BAL".to_string(),
            opponent: Some("BUF".to_string()),
            season,
            week: Week::new(1),
            offense_snaps: 48,
            offense_pct: 0.71,
            defense_snaps: 0,
            defense_pct: 0.0,
            st_snaps: 0,
            st_pct: 0.0,
        }])
    }
}

async fn seeded_state() -> AppState {
    let db = SharedDatabase::open_in_memory().unwrap();
    db.replace_season_stats(
        Season::new(2024),
        vec![
            stat("00-1", "Patrick Mahomes", "QB", "KC", 1, 24.0),
            stat("00-1", "Patrick Mahomes", "QB", "KC", 2, 18.0),
            stat("00-2", "Travis Kelce", "TE", "KC", 1, 15.5),
            stat("00-3", "Josh Allen", "QB", "BUF", 1, 30.0),
        ],
    )
    .await
    .unwrap();
    db.replace_season_snap_counts(
        Season::new(2024),
        vec![SnapCount {
            player_id: "MahoPa00".to_string(),
            player_name: "Patrick Mahomes".to_string(),
            position: "QB".to_string(),
            team: "KC".to_string(),
            opponent: Some("BUF".to_string()),
            season: Season::new(2024),
            week: Week::new(1),
            offense_snaps: 70,
            offense_pct: 1.0,
            defense_snaps: 0,
            defense_pct: 0.0,
            st_snaps: 0,
            st_pct: 0.0,
        }],
    )
    .await
    .unwrap();
    db.replace_week_pricing(
        Season::new(2024),
        Week::new(1),
        vec![PricingRecord {
            player_name: "Patrick Mahomes".to_string(),
            team: "KC".to_string(),
            position: "QB".to_string(),
            opponent: Some("BUF".to_string()),
            season: Season::new(2024),
            week: Week::new(1),
            salary: 8200,
        }],
    )
    .await
    .unwrap();

    let ingestor = Ingestor::new(db, Arc::new(StubStats), JobPool::new(2))
        .with_pricing_delay(Duration::ZERO);
    AppState {
        ingestor,
        default_season: Season::new(2024),
        refresh_seasons: vec![Season::new(2024)],
    }
}

async fn get_json(state: AppState, path: &str) -> (u16, Value) {
    let routes = create_routes(state, &["*".to_string()]);
    let response = warp::test::request().method("GET").path(path).reply(&routes).await;
    let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
    (response.status().as_u16(), body)
}

async fn post_json(state: AppState, path: &str) -> (u16, Value) {
    let routes = create_routes(state, &["*".to_string()]);
    let response = warp::test::request().method("POST").path(path).reply(&routes).await;
    let body = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
    (response.status().as_u16(), body)
}

#[tokio::test]
async fn test_root_and_health() {
    let state = seeded_state().await;
    let (status, body) = get_json(state.clone(), "/api/").await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Fantasy Football Database API");

    let (status, body) = get_json(state.clone(), "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");

    let (status, _) = get_json(state, "/health/extra").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_players_position_filter() {
    let (status, body) = get_json(seeded_state().await, "/api/players?season=2024&position=qb").await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["position"] == "QB"));
    // Highest scoring first
    assert_eq!(rows[0]["player_name"], "Josh Allen");
}

#[tokio::test]
async fn test_players_join_attributes() {
    let (_, body) = get_json(
        seeded_state().await,
        "/api/players?season=2024&week=1&team=kc&position=QB",
    )
    .await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["snap_percentage"], 100.0);
    assert_eq!(rows[0]["snap_count"], 70);
    assert_eq!(rows[0]["dk_salary"], 8200);
}

#[tokio::test]
async fn test_players_team_alias_matches_stored_code() {
    let (status, body) = get_json(seeded_state().await, "/api/players?team=KAN").await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["team"] == "KC"));
}

#[tokio::test]
async fn test_players_large_limit_is_allowed() {
    let (status, body) = get_json(seeded_state().await, "/api/players?limit=100000").await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_invalid_parameters_are_bad_requests() {
    let state = seeded_state().await;
    for path in [
        "/api/players?season=1950",
        "/api/players?week=0",
        "/api/players?limit=-1",
        "/api/players?position=K",
        "/api/top-performers?week=40",
        "/api/draftkings-pricing?season=abc",
    ] {
        let (status, body) = get_json(state.clone(), path).await;
        assert_eq!(status, 400, "{path}");
        assert!(body["error"]["code"].is_string(), "{path}");
        assert!(body["timestamp"].is_string(), "{path}");
    }
}

#[tokio::test]
async fn test_top_performers_season_totals() {
    let (status, body) =
        get_json(seeded_state().await, "/api/top-performers?position=QB&limit=1").await;
    assert_eq!(status, 200);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["player_name"], "Patrick Mahomes");
    assert_eq!(rows[0]["games_played"], 2);
    assert_eq!(rows[0]["fantasy_points"], 42.0);
}

#[tokio::test]
async fn test_top_performers_single_week() {
    let (_, body) = get_json(seeded_state().await, "/api/top-performers?week=1").await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0]["player_name"], "Josh Allen");
}

#[tokio::test]
async fn test_snap_counts_envelope() {
    let (status, body) = get_json(seeded_state().await, "/api/snap-counts?team=KC").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["offense_snaps"], 70);
}

#[tokio::test]
async fn test_pricing_envelope() {
    let (status, body) =
        get_json(seeded_state().await, "/api/draftkings-pricing?week=1").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["season"], 2024);
    assert_eq!(body["data"]["week"], 1);
    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["pricing"][0]["salary"], 8200);
}

#[tokio::test]
async fn test_refresh_reports_partial_failure() {
    let state = seeded_state().await;
    let (status, body) = post_json(state.clone(), "/api/refresh-data?seasons=2023,2024").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], false);
    assert_eq!(body["records_loaded"], 1);
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);

    // The 2024 reload replaced the seeded rows
    let (_, rows) = get_json(state, "/api/players?season=2024").await;
    assert_eq!(rows.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_refresh_rejects_bad_season_list() {
    let (status, _) = post_json(seeded_state().await, "/api/refresh-data?seasons=20x4").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_load_snap_counts_defaults_to_configured_seasons() {
    let (status, body) = post_json(seeded_state().await, "/api/load-snap-counts").await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(body["records_loaded"], 1);
}

#[tokio::test]
async fn test_pricing_backfill_without_provider_is_server_error() {
    let (status, body) =
        post_json(seeded_state().await, "/api/load-historical-pricing?seasons=2024").await;
    assert_eq!(status, 500);
    assert_eq!(body["error"]["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn test_summary() {
    let (status, body) = get_json(seeded_state().await, "/api/stats/summary").await;
    assert_eq!(status, 200);
    assert_eq!(body["total_player_stats"], 4);
    assert_eq!(body["total_snap_counts"], 1);
    assert_eq!(body["total_pricing_records"], 1);
    assert!(body["last_updated"].is_string());
}

#[tokio::test]
async fn test_nfl_teams() {
    let (status, body) = get_json(seeded_state().await, "/api/nfl-teams").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 32);
    assert_eq!(body["teams"].as_array().unwrap().len(), 32);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (status, body) = get_json(seeded_state().await, "/api/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_wrong_method_is_rejected() {
    let (status, _) = get_json(seeded_state().await, "/api/refresh-data").await;
    assert_eq!(status, 405);
}
