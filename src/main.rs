//! Strictly Cricket - command-line scorer.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strictly_cricket::{
    InsightSource, LiveBoard, LiveFeed, LlmClient, LlmInsightSource, LlmLiveFeed, MatchScript,
    Replay, ScorerConfig, Scorecard, generate_insight, refresh_once, spawn_refresher,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

/// How often watch mode checks the board for a finished refresh.
const BOARD_POLL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ScorerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Score { script, json } => run_score(&config, &script, json),
        Command::Insight { script } => run_insight(&config, &script).await,
        Command::Live { watch } => run_live(&config, watch).await,
    }
}

fn play_script(config: &ScorerConfig, path: &Path) -> Result<Replay> {
    let script = MatchScript::from_file(path)?;
    let replay = script
        .play(config.defaults())
        .with_context(|| format!("Failed to replay {}", path.display()))?;
    Ok(replay)
}

/// Replay a script and print the result
#[instrument(skip(config))]
fn run_score(config: &ScorerConfig, path: &Path, json: bool) -> Result<()> {
    let replay = play_script(config, path)?;
    info!(events = replay.events.len(), status = %replay.current.status(), "Script scored");

    if json {
        println!("{}", serde_json::to_string_pretty(&replay.current)?);
    } else {
        print!("{}", Scorecard::from_match(&replay.current).render());
    }
    Ok(())
}

/// Replay a script and print commentary on the final state
#[instrument(skip(config))]
async fn run_insight(config: &ScorerConfig, path: &Path) -> Result<()> {
    let replay = play_script(config, path)?;
    let client = LlmClient::new(config.create_llm_config()?)?;
    let source: Box<dyn InsightSource> = Box::new(LlmInsightSource::new(client));

    print!("{}", Scorecard::from_match(&replay.current).render());
    println!();
    println!("{}", generate_insight(source.as_ref(), &replay.current).await);
    Ok(())
}

/// Fetch live scores once, or keep refreshing
#[instrument(skip(config))]
async fn run_live(config: &ScorerConfig, watch: bool) -> Result<()> {
    let client = LlmClient::new(config.create_llm_config()?)?;
    let feed: Arc<dyn LiveFeed> = Arc::new(LlmLiveFeed::new(client));
    let board = Arc::new(Mutex::new(LiveBoard::new()));

    if !watch {
        let outcome = refresh_once(feed.as_ref(), &board).await;
        info!(%outcome, "Live feed fetched");
        print_board(&board);
        return Ok(());
    }

    let period = config.refresh_interval();
    info!(seconds = period.as_secs(), "Watching live feed");
    let refresher = spawn_refresher(feed, Arc::clone(&board), period);
    let mut ticker = tokio::time::interval(BOARD_POLL);
    let mut shown = 0;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                // Only redraw once a refresh has reported something new.
                let revision = *lock_board(&board).revision();
                if revision != shown {
                    shown = revision;
                    print_board(&board);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }
    refresher.abort();
    Ok(())
}

fn lock_board(board: &Mutex<LiveBoard>) -> std::sync::MutexGuard<'_, LiveBoard> {
    board.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn print_board(board: &Mutex<LiveBoard>) {
    let board = lock_board(board);
    if board.matches().is_empty() {
        println!("No live matches.");
    }
    for summary in board.matches() {
        println!("{} [{}] {}", summary.title(), summary.status(), summary.venue());
        println!("  {:<20} {}", summary.team_a(), summary.team_a_score());
        println!("  {:<20} {}", summary.team_b(), summary.team_b_score());
        if let Some(text) = summary.status_text() {
            println!("  {}", text);
        }
    }
    if *board.stale() {
        match board.last_error() {
            Some(error) => println!("(showing previous results: {})", error),
            None => println!("(showing previous results)"),
        }
    }
}
