//! Unit tests for storage functionality

use super::*;
use crate::{Season, Week};

fn create_test_db() -> PlayerDatabase {
    PlayerDatabase::new_in_memory().unwrap()
}

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

fn snap(id: &str, name: &str, position: &str, team: &str, week: u16, pct: f64) -> SnapCount {
    SnapCount {
        player_id: id.to_string(),
        player_name: name.to_string(),
        position: position.to_string(),
        team: team.to_string(),
        opponent: None,
        season: Season::new(2024),
        week: Week::new(week),
        offense_snaps: (pct * 70.0).round() as u32,
        offense_pct: pct,
        defense_snaps: 0,
        defense_pct: 0.0,
        st_snaps: 2,
        st_pct: 0.07,
    }
}

fn price(name: &str, team: &str, week: u16, salary: u32) -> PricingRecord {
    PricingRecord {
        player_name: name.to_string(),
        team: team.to_string(),
        position: "WR".to_string(),
        opponent: None,
        season: Season::new(2024),
        week: Week::new(week),
        salary,
    }
}

fn seeded_db() -> PlayerDatabase {
    let mut db = create_test_db();
    db.replace_season_stats(
        Season::new(2024),
        &[
            stat("00-001", "Patrick Mahomes", "QB", "KC", 1, 24.5),
            stat("00-002", "Travis Kelce", "TE", "KC", 1, 12.0),
            stat("00-003", "Josh Allen", "QB", "BUF", 1, 30.1),
            stat("00-004", "Michael Pittman Jr.", "WR", "IND", 1, 15.2),
            stat("00-001", "Patrick Mahomes", "QB", "KC", 2, 18.0),
            stat("00-003", "Josh Allen", "QB", "BUF", 2, 21.4),
        ],
    )
    .unwrap();
    db
}

#[test]
fn test_database_creation() {
    let db = create_test_db();
    let summary = db.summary().unwrap();
    assert_eq!(summary.total_player_stats, 0);
    assert!(summary.seasons_available.is_empty());
    assert!(summary.weeks_available.is_empty());
}

#[test]
fn test_schema_is_reentrant() {
    let mut db = create_test_db();
    db.initialize_schema().unwrap();
    db.initialize_schema().unwrap();
}

#[test]
fn test_replace_season_is_idempotent() {
    let mut db = seeded_db();
    let first = db
        .query_weekly_stats(&StatFilter::season(Season::new(2024)), None)
        .unwrap();

    let rows = first.clone();
    db.replace_season_stats(Season::new(2024), &rows).unwrap();
    let second = db
        .query_weekly_stats(&StatFilter::season(Season::new(2024)), None)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(second.len(), 6);
}

#[test]
fn test_replace_season_leaves_other_seasons_alone() {
    let mut db = seeded_db();
    let mut old = stat("00-001", "Patrick Mahomes", "QB", "KC", 1, 20.0);
    old.season = Season::new(2023);
    db.replace_season_stats(Season::new(2023), &[old]).unwrap();

    db.replace_season_stats(Season::new(2024), &[]).unwrap();

    let summary = db.summary().unwrap();
    assert_eq!(summary.total_player_stats, 1);
    assert_eq!(summary.seasons_available, vec![Season::new(2023)]);
}

#[test]
fn test_duplicate_key_updates_in_place() {
    let mut db = create_test_db();
    db.replace_season_stats(
        Season::new(2024),
        &[
            stat("00-001", "Patrick Mahomes", "QB", "KC", 1, 10.0),
            stat("00-001", "Patrick Mahomes", "QB", "KC", 1, 24.5),
        ],
    )
    .unwrap();

    let rows = db.query_weekly_stats(&StatFilter::default(), None).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].fantasy_points, 24.5);
}

#[test]
fn test_query_orders_by_points_then_name() {
    let mut db = create_test_db();
    db.replace_season_stats(
        Season::new(2024),
        &[
            stat("a", "Zay Jones", "WR", "ARI", 1, 10.0),
            stat("b", "Adam Thielen", "WR", "CAR", 1, 10.0),
            stat("c", "Justin Jefferson", "WR", "MIN", 1, 22.0),
        ],
    )
    .unwrap();

    let rows = db.query_weekly_stats(&StatFilter::default(), None).unwrap();
    let names: Vec<_> = rows.iter().map(|r| r.player_name.as_str()).collect();
    assert_eq!(names, vec!["Justin Jefferson", "Adam Thielen", "Zay Jones"]);
}

#[test]
fn test_position_and_team_filters_are_case_insensitive() {
    let db = seeded_db();

    let filter = StatFilter {
        position: Some("qb".to_string()),
        ..StatFilter::season(Season::new(2024))
    };
    let rows = db.query_weekly_stats(&filter, None).unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows.iter().all(|r| r.position == "QB"));

    let filter = StatFilter {
        team: Some("kc".to_string()),
        ..StatFilter::default()
    };
    let rows = db.query_weekly_stats(&filter, None).unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r.team == "KC"));
}

#[test]
fn test_pagination() {
    let db = seeded_db();
    let all = db.query_weekly_stats(&StatFilter::default(), None).unwrap();

    let page = db
        .query_weekly_stats(&StatFilter::default(), Some(Page::new(2, 1)))
        .unwrap();
    assert_eq!(page.len(), 2);
    assert_eq!(page[0], all[1]);
    assert_eq!(page[1], all[2]);

    let past_end = db
        .query_weekly_stats(&StatFilter::default(), Some(Page::new(10, 50)))
        .unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn test_list_players_attaches_snaps_and_salary() {
    let mut db = seeded_db();
    db.replace_season_snap_counts(
        Season::new(2024),
        &[
            snap("PittMi00", "Michael Pittman", "WR", "IND", 1, 0.912),
            snap("KelcTr00", "Travis Kelce", "TE", "KC", 1, 0.85),
        ],
    )
    .unwrap();
    db.replace_week_pricing(
        Season::new(2024),
        Week::new(1),
        &[price("Michael Pittman Jr.", "IND", 1, 5600)],
    )
    .unwrap();

    let filter = StatFilter {
        week: Some(Week::new(1)),
        ..StatFilter::season(Season::new(2024))
    };
    let rows = db.list_players(&filter, Page::default()).unwrap();

    let pittman = rows
        .iter()
        .find(|r| r.stat.player_id == "00-004")
        .unwrap();
    assert_eq!(pittman.joined.snap_percentage, Some(91.2));
    assert_eq!(pittman.joined.snap_count, Some(64));
    assert_eq!(pittman.joined.dk_salary, Some(5600));

    let kelce = rows.iter().find(|r| r.stat.player_id == "00-002").unwrap();
    assert_eq!(kelce.joined.snap_percentage, Some(85.0));
    assert_eq!(kelce.joined.dk_salary, None);

    let allen = rows.iter().find(|r| r.stat.player_id == "00-003").unwrap();
    assert_eq!(allen.joined.snap_percentage, None);
    assert_eq!(allen.joined.snap_count, None);
}

#[test]
fn test_unfiltered_listing_joins_each_rows_own_week() {
    let mut db = seeded_db();
    db.replace_season_snap_counts(
        Season::new(2024),
        &[
            snap("AlleJo00", "Josh Allen", "QB", "BUF", 1, 1.0),
            snap("AlleJo00", "Josh Allen", "QB", "BUF", 2, 0.95),
            snap("MahoPa00", "Patrick Mahomes", "QB", "KC", 3, 0.99),
        ],
    )
    .unwrap();
    db.replace_week_pricing(
        Season::new(2024),
        Week::new(2),
        &[price("Josh Allen", "BUF", 2, 8400)],
    )
    .unwrap();

    let rows = db
        .list_players(&StatFilter::default(), Page::new(2, 0))
        .unwrap();
    assert_eq!(rows.len(), 2);

    let week1 = &rows[0];
    assert_eq!((week1.stat.player_id.as_str(), week1.stat.week), ("00-003", Week::new(1)));
    assert_eq!(week1.joined.snap_percentage, Some(100.0));
    assert_eq!(week1.joined.dk_salary, None);

    // Mahomes week 1 has no snap row; his week 3 row is not on this page
    let mahomes = &rows[1];
    assert_eq!(mahomes.stat.player_id, "00-001");
    assert_eq!(mahomes.joined.snap_percentage, None);

    let week2 = db
        .list_players(&StatFilter::default(), Page::new(1, 2))
        .unwrap();
    assert_eq!(week2[0].stat.week, Week::new(2));
    assert_eq!(week2[0].joined.snap_percentage, Some(95.0));
    assert_eq!(week2[0].joined.dk_salary, Some(8400));
}

#[test]
fn test_snap_join_ignores_non_offensive_positions() {
    let mut db = seeded_db();
    db.replace_season_snap_counts(
        Season::new(2024),
        &[snap("KelcTr00", "Travis Kelce", "LB", "KC", 1, 0.40)],
    )
    .unwrap();

    let filter = StatFilter {
        team: Some("KC".to_string()),
        week: Some(Week::new(1)),
        ..StatFilter::season(Season::new(2024))
    };
    let rows = db.list_players(&filter, Page::default()).unwrap();
    let kelce = rows.iter().find(|r| r.stat.player_id == "00-002").unwrap();
    assert_eq!(kelce.joined.snap_percentage, None);
}

#[test]
fn test_top_performers_season_totals() {
    let db = seeded_db();
    let result = db
        .top_performers(Season::new(2024), None, None, 20)
        .unwrap();

    let TopPerformers::Season(totals) = result else {
        panic!("expected season totals");
    };
    assert_eq!(totals.len(), 4);

    let allen = &totals[0];
    assert_eq!(allen.player_name, "Josh Allen");
    assert_eq!(allen.games_played, 2);
    assert_eq!(allen.fantasy_points, 51.5);
    assert_eq!(allen.avg_fantasy_points, 25.75);

    let mahomes = &totals[1];
    assert_eq!(mahomes.games_played, 2);
    assert_eq!(mahomes.fantasy_points, 42.5);
}

#[test]
fn test_top_performers_with_week_and_limit() {
    let db = seeded_db();
    let result = db
        .top_performers(Season::new(2024), Some(Week::new(1)), None, 2)
        .unwrap();

    let TopPerformers::Week(rows) = result else {
        panic!("expected weekly rows");
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].stat.player_name, "Josh Allen");
    assert_eq!(rows[0].stat.fantasy_points, 30.1);
    assert_eq!(rows[1].stat.player_name, "Patrick Mahomes");
}

#[test]
fn test_top_performers_position_filter() {
    let db = seeded_db();
    let result = db
        .top_performers(Season::new(2024), None, Some("TE".to_string()), 20)
        .unwrap();
    assert_eq!(result.len(), 1);
}

#[test]
fn test_pricing_upsert_counts() {
    let mut db = create_test_db();
    let counts = db
        .reload_pricing_weeks(Season::new(2024), &[], &[
            price("Ja'Marr Chase", "CIN", 1, 8100),
            price("Ja'Marr Chase", "CIN", 1, 8200),
            price("Tee Higgins", "CIN", 1, 6400),
        ])
        .unwrap();

    assert_eq!(counts.inserted, 2);
    assert_eq!(counts.updated, 1);

    let rows = db.query_pricing(&StatFilter::default()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].salary, 8200);
}

#[test]
fn test_reload_pricing_weeks_clears_covered_weeks_only() {
    let mut db = create_test_db();
    db.reload_pricing_weeks(Season::new(2024), &[], &[
        price("Old Row", "CIN", 1, 3000),
        price("Other Week", "CIN", 2, 4000),
    ])
    .unwrap();

    let counts = db
        .reload_pricing_weeks(
            Season::new(2024),
            &[Week::new(1)],
            &[price("New Row", "CIN", 1, 5000)],
        )
        .unwrap();
    assert_eq!(counts.inserted, 1);
    assert_eq!(counts.updated, 0);

    let names: Vec<_> = db
        .query_pricing(&StatFilter::default())
        .unwrap()
        .into_iter()
        .map(|p| p.player_name)
        .collect();
    assert_eq!(names, vec!["New Row", "Other Week"]);
}

#[test]
fn test_has_pricing() {
    let mut db = create_test_db();
    assert!(!db.has_pricing(Season::new(2024), Week::new(1)).unwrap());

    db.replace_week_pricing(
        Season::new(2024),
        Week::new(1),
        &[price("Tee Higgins", "CIN", 1, 6400)],
    )
    .unwrap();
    assert!(db.has_pricing(Season::new(2024), Week::new(1)).unwrap());
    assert!(!db.has_pricing(Season::new(2024), Week::new(2)).unwrap());

    db.reload_pricing_weeks(Season::new(2024), &[Week::new(1)], &[])
        .unwrap();
    assert!(!db.has_pricing(Season::new(2024), Week::new(1)).unwrap());
}

#[test]
fn test_team_codes_are_canonicalized_on_write() {
    let mut db = create_test_db();
    db.reload_pricing_weeks(
        Season::new(2024),
        &[],
        &[price("Travis Etienne Jr.", "JAC", 1, 6000)],
    )
    .unwrap();

    let rows = db
        .query_pricing(&StatFilter {
            team: Some("JAX".to_string()),
            ..StatFilter::default()
        })
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn test_query_snap_counts_order_and_limit() {
    let mut db = create_test_db();
    db.replace_season_snap_counts(
        Season::new(2024),
        &[
            snap("a", "Tyreek Hill", "WR", "MIA", 1, 0.80),
            snap("b", "Jaylen Waddle", "WR", "MIA", 2, 0.75),
            snap("c", "De'Von Achane", "RB", "MIA", 2, 0.60),
        ],
    )
    .unwrap();

    let rows = db.query_snap_counts(&StatFilter::default(), 2).unwrap();
    let names: Vec<_> = rows.iter().map(|s| s.player_name.as_str()).collect();
    assert_eq!(names, vec!["Jaylen Waddle", "De'Von Achane"]);
}

#[test]
fn test_summary() {
    let mut db = seeded_db();
    db.replace_season_snap_counts(
        Season::new(2024),
        &[snap("a", "Tyreek Hill", "WR", "MIA", 1, 0.80)],
    )
    .unwrap();

    let summary = db.summary().unwrap();
    assert_eq!(summary.total_player_stats, 6);
    assert_eq!(summary.total_snap_counts, 1);
    assert_eq!(summary.total_pricing_records, 0);
    assert_eq!(summary.seasons_available, vec![Season::new(2024)]);
    assert_eq!(summary.weeks_available, vec![Week::new(1), Week::new(2)]);
    assert_eq!(summary.position_counts.get("QB"), Some(&4));
    assert_eq!(summary.position_counts.get("TE"), Some(&1));
}

#[tokio::test]
async fn test_shared_database_round_trip() {
    let db = SharedDatabase::open_in_memory().unwrap();
    db.replace_season_stats(
        Season::new(2024),
        vec![stat("00-003", "Josh Allen", "QB", "BUF", 1, 30.1)],
    )
    .await
    .unwrap();

    let rows = db
        .list_players(StatFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert!(db.close().is_ok());
}

#[tokio::test]
async fn test_shared_database_close_fails_while_cloned() {
    let db = SharedDatabase::open_in_memory().unwrap();
    let other = db.clone();
    assert!(db.close().is_err());
    assert!(other.close().is_ok());
}

#[tokio::test]
async fn test_writes_clear_memoized_listings() {
    let db = SharedDatabase::open_in_memory().unwrap();
    db.replace_season_stats(
        Season::new(2024),
        vec![stat("00-003", "Josh Allen", "QB", "BUF", 1, 30.1)],
    )
    .await
    .unwrap();

    let first = db
        .list_players(StatFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(db.cache_stats().0, 1);

    db.replace_season_stats(
        Season::new(2024),
        vec![
            stat("00-003", "Josh Allen", "QB", "BUF", 1, 30.1),
            stat("00-001", "Patrick Mahomes", "QB", "KC", 1, 24.5),
        ],
    )
    .await
    .unwrap();
    assert_eq!(db.cache_stats().0, 0);

    let second = db
        .list_players(StatFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(second.len(), 2);
}
