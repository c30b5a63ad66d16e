//! Command-line interface for tictactoe_bot.

use clap::{Parser, Subcommand};
use tictactoe_bot::Difficulty;

/// Tic-tac-toe against a bot, over HTTP or in the terminal
#[derive(Parser, Debug)]
#[command(name = "tictactoe_bot")]
#[command(about = "Tic-tac-toe engine with a difficulty-tiered bot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Http {
        /// Path to a TOML config file
        #[arg(short, long, default_value = "tictactoe_bot.toml")]
        config: std::path::PathBuf,

        /// Port to bind to (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Database file (overrides config)
        #[arg(long)]
        db_path: Option<String>,

        /// Keep everything in memory instead of SQLite
        #[arg(long)]
        in_memory: bool,
    },

    /// Play against the bot in the terminal
    Play {
        /// User identity whose game and statistics are used
        #[arg(short, long)]
        user: String,

        /// Bot difficulty
        #[arg(short, long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,

        /// Database file
        #[arg(long, default_value = "tictactoe_bot.db")]
        db_path: String,
    },

    /// Show statistics for one user, or for everyone
    Stats {
        /// User identity (lists all users if omitted)
        #[arg(short, long)]
        user: Option<String>,

        /// Database file
        #[arg(long, default_value = "tictactoe_bot.db")]
        db_path: String,
    },
}
