use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use faceit_stats::api::state::AppState;
use faceit_stats::calculate::pace_message;
use faceit_stats::config::AppConfig;
use faceit_stats::engine::StatsService;
use faceit_stats::fetch::{FaceitClient, FetcherConfig};

#[derive(Parser)]
#[command(name = "faceit-stats")]
#[command(about = "CS2 match statistics from the FACEIT Data API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a player's current elo
    Elo { username: String },

    /// Print averages over a player's most recent matches
    Window {
        username: String,

        /// Number of matches to average (defaults to engine.default_window)
        #[arg(long)]
        size: Option<u32>,
    },

    /// Print a player's most recent match
    LastGame { username: String },

    /// Print the tracked player's win/loss tally
    Tally,

    /// Print the tracked player's goal pace message
    Pace,
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn build_service(config: &AppConfig) -> Result<StatsService> {
    let client = FaceitClient::new(FetcherConfig::from(&config.faceit))
        .context("Failed to create FACEIT client")?;
    Ok(StatsService::new(
        Arc::new(client),
        config.engine.clone(),
        config.faceit.game.clone(),
    ))
}

fn tracked_player(config: &AppConfig) -> Result<&str> {
    if config.tracker.player_id.is_empty() {
        bail!("tracker.player_id is not configured");
    }
    Ok(&config.tracker.player_id)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting faceit-stats v{}", env!("CARGO_PKG_VERSION"));

    let service = build_service(&config)?;
    tracing::info!(
        "Using {} stat source for {}",
        service.source_name(),
        config.faceit.game
    );

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState {
                stats: service,
                tracker: Arc::new(config.tracker.clone()),
                cors_origin: config.server.cors_origin.clone(),
            };
            let app = faceit_stats::api::build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Elo { username } => {
            let elo = service.player_elo(&username).await?;
            println!("{}", elo);
        }
        Commands::Window { username, size } => {
            let size = size.unwrap_or(config.engine.default_window);
            let player_id = service.resolve_player_id(&username).await?;
            print_json(&service.window_stats(&player_id, size).await?)?;
        }
        Commands::LastGame { username } => {
            let player_id = service.resolve_player_id(&username).await?;
            print_json(&service.last_match(&player_id).await?)?;
        }
        Commands::Tally => {
            let player_id = tracked_player(&config)?;
            let tally = service
                .history_tally(player_id, config.tracker.since_timestamp)
                .await?;
            print_json(&tally)?;
        }
        Commands::Pace => {
            let player_id = tracked_player(&config)?;
            let tally = service
                .history_tally(player_id, config.tracker.since_timestamp)
                .await?;
            let pace = service.goal_pace(
                tally.wins,
                config.tracker.goal_wins,
                Utc::now(),
                config.tracker.hour_offset,
            )?;
            println!("{}", pace_message(&config.tracker.display_name, &pace));
        }
    }

    Ok(())
}
