//! fairplayd — the Fairplay daemon.
//!
//! Single binary that assembles the Fairplay pieces:
//! - Roster store (redb)
//! - Balance job runner
//! - REST API
//!
//! It also runs the engine offline against the stored roster.
//!
//! # Usage
//!
//! ```text
//! fairplayd serve --port 8080 --data-dir /var/lib/fairplay
//! fairplayd import --file roster.json
//! fairplayd balance --teams 2 --player Ana --player Bia --player Caio --player Davi
//! ```

mod config;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use fairplay_api::{ApiState, BalanceOutcome, PlayerInput, load_selection, render_pair};
use fairplay_core::two_options;
use fairplay_roster::RosterStore;
use tracing::{error, info};

use crate::config::DaemonConfig;

const DEFAULT_FILTER: &str = "info,fairplayd=debug,fairplay=debug";

#[derive(Parser)]
#[command(name = "fairplayd", about = "Fairplay team balancing daemon")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the REST API.
    Serve {
        /// Port to listen on.
        #[arg(long)]
        port: Option<u16>,

        /// Data directory for the roster database.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to fairplay.toml.
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Balance players from the stored roster and print both options.
    Balance {
        /// Number of teams.
        #[arg(long)]
        teams: usize,

        /// Player to include (repeatable). All players when omitted.
        #[arg(long = "player")]
        players: Vec<String>,

        /// Data directory for the roster database.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to fairplay.toml.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Load players from a JSON file into the roster, replacing same-name players.
    Import {
        /// JSON array of players.
        #[arg(long)]
        file: PathBuf,

        /// Data directory for the roster database.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Path to fairplay.toml.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            port,
            data_dir,
            config,
        } => {
            let config = DaemonConfig::load(config.as_deref())?.with_overrides(port, data_dir);
            run_serve(config).await
        }
        Command::Balance {
            teams,
            players,
            data_dir,
            config,
            json,
        } => {
            let config = DaemonConfig::load(config.as_deref())?.with_overrides(None, data_dir);
            run_balance(config, teams, players, json).await
        }
        Command::Import {
            file,
            data_dir,
            config,
        } => {
            let config = DaemonConfig::load(config.as_deref())?.with_overrides(None, data_dir);
            run_import(config, file)
        }
    }
}

fn open_store(config: &DaemonConfig) -> anyhow::Result<RosterStore> {
    std::fs::create_dir_all(&config.server.data_dir)
        .with_context(|| format!("creating {}", config.server.data_dir.display()))?;
    let db_path = config.roster_path();
    let store = RosterStore::open(&db_path)?;
    info!(path = ?db_path, "roster store opened");
    Ok(store)
}

async fn run_serve(config: DaemonConfig) -> anyhow::Result<()> {
    info!(scheme = %config.balance.scheme, remainder = ?config.server.remainder, "Fairplay daemon starting");

    let store = open_store(&config)?;
    let state = ApiState::new(store, config.balance.clone(), config.server.remainder);

    let router = fairplay_api::build_router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));

    info!(%addr, "API server starting");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    // Graceful shutdown on Ctrl-C.
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
        })
        .await?;

    info!("Fairplay daemon stopped");
    Ok(())
}

async fn run_balance(
    config: DaemonConfig,
    teams: usize,
    players: Vec<String>,
    json: bool,
) -> anyhow::Result<()> {
    let store = open_store(&config)?;
    let balance = config.balance;
    let roster = load_selection(
        &store,
        &players,
        teams,
        balance.scheme,
        config.server.remainder,
    )?;
    info!(players = roster.len(), teams, "balancing");

    let outcome = tokio::task::spawn_blocking(move || {
        two_options(&roster, teams, &balance)
            .map(|pair| render_pair(&pair, teams, balance.scheme, &balance.tiers))
    })
    .await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }
    Ok(())
}

fn print_outcome(outcome: &BalanceOutcome) {
    for (i, option) in outcome.options.iter().enumerate() {
        println!("── Option {} ──", i + 1);
        println!("{}", option.summary);
        println!();
    }
    if outcome.identical {
        println!("Only one distinct arrangement was found; both options are the same.");
    } else {
        println!(
            "Options share {} teammate pairs ({} distinct arrangements considered).",
            outcome.overlap, outcome.distinct_candidates
        );
    }
}

fn run_import(config: DaemonConfig, file: PathBuf) -> anyhow::Result<()> {
    let content =
        std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
    let inputs: Vec<PlayerInput> =
        serde_json::from_str(&content).with_context(|| format!("parsing {}", file.display()))?;
    let players = fairplay_api::validate::parse_players(inputs, config.balance.scheme)?;

    let store = open_store(&config)?;
    let count = store.import(&players)?;
    info!(count, file = %file.display(), "roster imported");
    println!("Imported {count} players.");
    Ok(())
}
