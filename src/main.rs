//! tictactoe_bot - unified CLI
//!
//! HTTP game server, terminal play, and statistics listing.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tictactoe_bot::server::{AppState, router};
use tictactoe_bot::{
    Difficulty, GameRepository, GameStore, MemoryStore, MoveEngine, MoveOutcome, MoveRequest,
    Position, ServerConfig, UserId,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Http {
            config,
            port,
            host,
            db_path,
            in_memory,
        } => run_http(config, host, port, db_path, in_memory).await,
        Command::Play {
            user,
            difficulty,
            db_path,
        } => {
            init_tracing("warn");
            run_play(user, difficulty, db_path).await
        }
        Command::Stats { user, db_path } => {
            init_tracing("warn");
            run_stats(user, db_path)
        }
    }
}

/// Installs the global subscriber, preferring `RUST_LOG` over `fallback`.
fn init_tracing(fallback: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .init();
}

/// Run the HTTP game server
async fn run_http(
    config_path: PathBuf,
    host: Option<String>,
    port: Option<u16>,
    db_path: Option<String>,
    in_memory: bool,
) -> Result<()> {
    let config = ServerConfig::load_or_default(&config_path)?.with_overrides(host, port, db_path);
    init_tracing(config.log_filter());

    info!(config = %config_path.display(), "Starting tictactoe_bot HTTP server");

    if in_memory {
        warn!("Using in-memory store; nothing survives a restart");
        serve(&config, MemoryStore::new()).await
    } else {
        let repo = GameRepository::open(config.db_path().clone())
            .with_context(|| format!("Failed to open database '{}'", config.db_path()))?;
        serve(&config, repo).await
    }
}

#[instrument(skip_all, fields(host = %config.host(), port = config.port()))]
async fn serve<S: GameStore + 'static>(config: &ServerConfig, store: S) -> Result<()> {
    let app = router(AppState::new(MoveEngine::new(store)));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port())).await?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app).await?;
    info!("Server stopped");
    Ok(())
}

/// Play against the bot on stdin/stdout
#[instrument(skip_all, fields(user = %user, %difficulty))]
async fn run_play(user: String, difficulty: Difficulty, db_path: String) -> Result<()> {
    let repo = GameRepository::open(db_path)?;
    let engine = MoveEngine::new(repo);
    let user = UserId::from(user);

    let profile = engine.store().load_profile(&user).await?;
    println!("Playing as {} against the {} bot.", user, difficulty);
    println!("Enter moves as \"row column\" (0-2), or \"q\" to quit.\n");
    println!("{}\n", profile.current_game().board().display());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.eq_ignore_ascii_case("q") {
            break;
        }
        let Some(request) = parse_move(line) else {
            println!("Expected two numbers, like \"1 1\".");
            continue;
        };

        match engine
            .handle_move(&user, &difficulty.to_string(), request)
            .await
        {
            Ok(MoveOutcome::Played(turn)) => {
                if let Some(pos) = turn.bot_move {
                    println!("Bot plays {}.", describe(pos));
                }
                println!("{}\n", turn.board.display());
                if turn.status.is_terminal() {
                    let profile = engine.store().load_profile(&user).await?;
                    let stats = profile.statistics();
                    println!(
                        "Game over: {}. Played {}, won {}, lost {}. New game started.\n",
                        turn.status, stats.games_played, stats.wins, stats.losses
                    );
                }
            }
            Ok(MoveOutcome::SpotTaken { error }) => println!("{}", error),
            Err(e) if e.is_client_error() => println!("{}", e),
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn parse_move(line: &str) -> Option<MoveRequest> {
    let mut parts = line.split(|c: char| c.is_whitespace() || c == ',').filter(|s| !s.is_empty());
    let row = parts.next()?.parse().ok()?;
    let column = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some(MoveRequest::new(row, column))
}

/// Names a cell along with the `row column` input that selects it.
fn describe(pos: Position) -> String {
    format!("{} ({} {})", pos, pos.row(), pos.column())
}

/// Print statistics for one user or all users
#[instrument]
fn run_stats(user: Option<String>, db_path: String) -> Result<()> {
    let repo = GameRepository::open(db_path)?;

    let users = match user {
        Some(key) => repo
            .get_user(&key)?
            .map(|u| vec![u])
            .with_context(|| format!("No user named '{}'", key))?,
        None => repo.list_users()?,
    };

    println!("{:<32} {:>6} {:>6} {:>6} {:>8}", "user", "played", "wins", "losses", "win %");
    for user in users {
        let stats = user.statistics();
        println!(
            "{:<32} {:>6} {:>6} {:>6} {:>7.1}%",
            user.user_key(),
            stats.games_played,
            stats.wins,
            stats.losses,
            stats.win_rate()
        );
    }
    Ok(())
}
