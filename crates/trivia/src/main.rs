use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::rng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trivia::cli::{Cli, Commands, OutputFormat, QuestionArgs};
use trivia::output::{format_output, pretty, Statistics};
use trivia::play::{quiz_category, run_quiz};
use trivia::{Config, SqliteStore, TriviaRepository};
use trivia_client::TriviaClient;
use trivia_core::quiz::QuizSession;

type Repository = TriviaRepository<TriviaClient, SqliteStore>;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output on stdout stays parseable.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trivia=info,trivia_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(api_url) = cli.api_url.clone() {
        config.api_url = api_url;
    }
    if let Some(db_path) = cli.db_path.clone() {
        config.db_path = db_path;
    }

    let repository = build_repository(&config).await?;
    run(cli, &repository).await
}

async fn build_repository(config: &Config) -> Result<Repository> {
    let client = match config.http_timeout() {
        Some(timeout) => TriviaClient::with_timeout(&config.api_url, timeout)
            .context("Failed to build HTTP client")?,
        None => TriviaClient::new(&config.api_url),
    };
    let store = SqliteStore::open(&config.db_path)
        .await
        .with_context(|| format!("Failed to open database at {}", config.db_path))?;

    tracing::debug!(api_url = %config.api_url, db_path = %config.db_path, "Repository ready");
    Ok(TriviaRepository::new(Arc::new(client), Arc::new(store))
        .with_retention(config.result_retention))
}

async fn run(cli: Cli, repository: &Repository) -> Result<()> {
    let format = cli.format;

    match cli.command {
        Commands::Fetch(QuestionArgs {
            amount,
            category,
            difficulty,
        }) => {
            let questions = repository.get_questions(amount, category, difficulty).await?;
            print_questions("FETCHED", &questions, format);
        }
        Commands::Categories => {
            let categories = repository.get_categories().await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&categories, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_categories(&categories)),
            }
        }
        Commands::Cached => {
            let questions = repository.cached_questions().await?;
            print_questions("CACHED", &questions, format);
        }
        Commands::Search { query } => {
            let questions = repository.search_questions(&query).await?;
            print_questions("MATCHES", &questions, format);
        }
        Commands::Favorite { id } => {
            let Some(question) = repository.find_question(id).await? else {
                bail!("No cached question with id {id}");
            };
            let favorite = repository.toggle_favorite(&question).await?;
            match format {
                OutputFormat::Json => println!(
                    "{}",
                    format_output(&serde_json::json!({ "id": id, "is_favorite": favorite }), format)
                ),
                OutputFormat::Pretty if !cli.quiet => {
                    let verb = if favorite { "Added" } else { "Removed" };
                    println!("{verb} favorite: {}", question.question);
                }
                OutputFormat::Pretty => {}
            }
        }
        Commands::Favorites => {
            let questions = repository.favorite_questions().await?;
            print_questions("FAVORITES", &questions, format);
        }
        Commands::Play(QuestionArgs {
            amount,
            category,
            difficulty,
        }) => {
            let questions = repository.get_questions(amount, category, difficulty).await?;
            let category = quiz_category(category, &questions);
            let session = QuizSession::shuffled(category, questions, &mut rng())?;

            let record = {
                let stdin = io::stdin();
                let mut input = stdin.lock();
                let mut output = io::stdout();
                run_quiz(session, &mut input, &mut output)?
            };
            let pruned = repository.save_quiz_result(&record).await?;
            tracing::debug!(pruned, "History pruned");

            match format {
                OutputFormat::Json => println!("{}", format_output(&record, format)),
                OutputFormat::Pretty if !cli.quiet => {
                    println!("Saved:\n{}", pretty::format_record(&record))
                }
                OutputFormat::Pretty => {}
            }
        }
        Commands::History => {
            let records = repository.quiz_results().await?;
            match format {
                OutputFormat::Json => println!("{}", format_output(&records, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_records(&records)),
            }
        }
        Commands::Stats => {
            let cached = repository.count_cached_questions().await?;
            let favorites = repository.favorite_questions().await?.len();
            let history = repository.quiz_results().await?;
            let stats = Statistics::new(cached, favorites, &history);
            match format {
                OutputFormat::Json => println!("{}", format_output(&stats, format)),
                OutputFormat::Pretty => println!("{}", pretty::format_statistics(&stats)),
            }
        }
        Commands::ClearCache => {
            repository.clear_cache().await?;
            if !cli.quiet {
                println!("Question cache cleared");
            }
        }
        Commands::ClearHistory => {
            repository.clear_history().await?;
            if !cli.quiet {
                println!("Quiz history cleared");
            }
        }
    }

    Ok(())
}

fn print_questions(title: &str, questions: &[trivia_core::question::Question], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(&questions, format)),
        OutputFormat::Pretty => println!("{}", pretty::format_questions(title, questions)),
    }
}
