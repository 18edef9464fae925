//! Entry point: parse CLI, assemble the service and dispatch.

use anyhow::Context;
use clap::Parser;
use ffdb::{
    api::{create_routes, AppState},
    cli::{Cli, Command},
    commands::Ingestor,
    core::{build_client, AppConfig},
    identity::OpponentTable,
    jobs::JobPool,
    nflverse::NflverseClient,
    pricing::SalaryApiClient,
    storage::SharedDatabase,
    Season,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ffdb=info,warp=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn build_ingestor(config: &AppConfig, db: SharedDatabase) -> anyhow::Result<Ingestor> {
    let client = build_client(config.http_timeout).context("building HTTP client")?;
    let stats = NflverseClient::new(client.clone(), &config.stats_url, &config.snaps_url);

    let opponents = if config.opponent_table.exists() {
        OpponentTable::from_path(&config.opponent_table).with_context(|| {
            format!("reading opponent table {}", config.opponent_table.display())
        })?
    } else {
        warn!(
            "Opponent table {} not found; ambiguous opponent codes will be stored as null",
            config.opponent_table.display()
        );
        OpponentTable::new()
    };
    info!("Loaded {} opponent disambiguation entries", opponents.len());

    let mut ingestor = Ingestor::new(db, Arc::new(stats), JobPool::new(config.workers))
        .with_opponents(opponents)
        .with_pricing_delay(config.pricing_delay);

    match &config.pricing {
        Some(pricing) => {
            info!("Pricing API at {}", pricing.base_url);
            ingestor = ingestor.with_pricing(Arc::new(SalaryApiClient::new(
                client,
                &pricing.base_url,
                pricing.api_key.clone(),
            )));
        }
        None => info!("PRICING_API_URL not set; pricing backfill disabled"),
    }
    Ok(ingestor)
}

fn seasons_or_default(seasons: Vec<Season>, config: &AppConfig) -> Vec<Season> {
    if seasons.is_empty() {
        config.refresh_seasons.clone()
    } else {
        seasons
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("loading configuration")?;
    if let Some(db) = cli.db {
        config.database_path = db;
    }

    let db = SharedDatabase::open(&config.database_path)
        .with_context(|| format!("opening database {}", config.database_path.display()))?;
    info!("Using database {}", config.database_path.display());

    let ingestor = build_ingestor(&config, db.clone())?;
    run(cli.command, ingestor, &config).await?;

    if let Err(e) = db.close() {
        warn!("Database not closed cleanly: {}", e);
    } else {
        info!("Database closed");
    }
    Ok(())
}

/// Runs one command; the ingestor (and its database handle) is dropped on return.
async fn run(command: Command, ingestor: Ingestor, config: &AppConfig) -> anyhow::Result<()> {
    match command {
        Command::Serve { bind } => {
            let bind = bind.unwrap_or(config.bind);
            let state = AppState {
                ingestor,
                default_season: config.default_season,
                refresh_seasons: config.refresh_seasons.clone(),
            };
            if config.allows_any_origin() {
                info!("CORS allows any origin");
            } else {
                info!("CORS origins: {}", config.cors_origins.join(", "));
            }
            let routes = create_routes(state, &config.cors_origins);

            let (addr, server) = warp::serve(routes)
                .try_bind_with_graceful_shutdown(bind, async {
                    let _ = tokio::signal::ctrl_c().await;
                    info!("Shutdown signal received");
                })
                .with_context(|| format!("binding {bind}"))?;
            info!("Listening on http://{}", addr);
            server.await;
        }
        Command::Refresh { seasons } => {
            let seasons = seasons_or_default(seasons, config);
            print_json(&ingestor.refresh_seasons(&seasons).await?)?;
        }
        Command::LoadSnapCounts { seasons } => {
            let seasons = seasons_or_default(seasons, config);
            print_json(&ingestor.load_snap_counts(&seasons).await?)?;
        }
        Command::LoadPricing {
            seasons,
            through_week,
        } => {
            let seasons = seasons_or_default(seasons, config);
            print_json(&ingestor.backfill_pricing(&seasons, through_week).await?)?;
        }
        Command::LoadSalaries { file, season } => {
            let file = file.unwrap_or_else(|| config.salary_seed.clone());
            let summary = ingestor
                .load_salaries(file.clone(), season)
                .await
                .with_context(|| format!("loading salaries from {}", file.display()))?;
            print_json(&summary)?;
        }
        Command::Summary => {
            print_json(&ingestor.database().summary().await?)?;
        }
    }
    Ok(())
}
