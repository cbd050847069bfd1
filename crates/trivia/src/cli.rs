//! CLI command definitions.

use clap::{Args, Parser, Subcommand, ValueEnum};
use trivia_core::question::Difficulty;
use uuid::Uuid;

/// Offline-first trivia: fetch, cache, favorite and quiz.
#[derive(Debug, Parser)]
#[command(name = "trivia")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Trivia API base URL (overrides configuration).
    #[arg(long, env = "TRIVIA_API_URL")]
    pub api_url: Option<String>,

    /// SQLite database path (overrides configuration).
    #[arg(long, env = "TRIVIA_DB_PATH")]
    pub db_path: Option<String>,

    /// Output format.
    #[arg(long, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Which questions to request.
#[derive(Debug, Clone, Args)]
pub struct QuestionArgs {
    /// Number of questions (1-50).
    #[arg(long, short, default_value_t = 10)]
    pub amount: u8,

    /// Category id (see `trivia categories`).
    #[arg(long, short)]
    pub category: Option<u32>,

    /// easy, medium or hard.
    #[arg(long, short, default_value = "easy")]
    pub difficulty: Difficulty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch questions from the API and cache them.
    Fetch(QuestionArgs),
    /// List the API's categories.
    Categories,
    /// List cached questions, newest first.
    Cached,
    /// Search cached questions by text (case-sensitive).
    Search {
        /// Substring to look for.
        query: String,
    },
    /// Toggle a cached question's favorite flag.
    Favorite {
        /// Question ID.
        id: Uuid,
    },
    /// List favorite questions.
    Favorites,
    /// Play a quiz on the terminal and save the result.
    Play(QuestionArgs),
    /// Show quiz history, newest first.
    History,
    /// Show cache and history statistics.
    Stats,
    /// Delete all cached questions.
    ClearCache,
    /// Delete all quiz history.
    ClearHistory,
}
