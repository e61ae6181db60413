use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use glossa_config::log::LogConfig;
use tokio::signal;
use tracing_subscriber::EnvFilter;

pub mod commands;
pub mod controller;
pub mod events;
pub mod io;
pub mod profile;
pub mod render;
pub mod state;

use self::controller::AppController;
use self::state::AppState;

#[derive(Parser)]
#[command(name = "glossa", version, about = "Offline dictionary lookups and a saved-word list")]
struct Cli {
    /// JSON config file; fields it omits fall back to the environment
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Look up one or more words
    Lookup {
        #[arg(required = true)]
        words: Vec<String>,
        /// Print one JSON object per word
        #[arg(long)]
        json: bool,
    },
    /// Add a word to the saved list
    Save { word: String },
    /// Remove a word from the saved list
    Unsave { word: String },
    /// Show saved words, most recent first
    Saved,
    /// Look words up, then print cache and shard statistics
    Stats { words: Vec<String> },
    /// Read queries from stdin, debounced
    Interactive,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = profile::load_config(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.log.level = level;
    }
    init_tracing(&config.log);

    let state = Arc::new(AppState::new(config).await);
    let mut stdout = std::io::stdout();

    match cli.command.unwrap_or(Command::Interactive) {
        Command::Lookup { words, json } => {
            let found = commands::lookup(&state, &words, json, &mut stdout).await?;
            tracing::debug!("{} of {} words found", found, words.len());
        }
        Command::Save { word } => commands::save(&state, &word, &mut stdout).await?,
        Command::Unsave { word } => commands::unsave(&state, &word, &mut stdout).await?,
        Command::Saved => commands::saved(&state, &mut stdout)?,
        Command::Stats { words } => commands::stats(&state, &words, &mut stdout).await?,
        Command::Interactive => {
            run_interactive(state).await?;
        }
    }

    Ok(())
}

fn init_tracing(log: &LogConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log.json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

async fn run_interactive(state: Arc<AppState>) -> anyhow::Result<()> {
    let controller = AppController::new(state);
    let mut tasks = controller.spawn_tasks();

    loop {
        tokio::select! {
            _ = signal::ctrl_c() => {
                tracing::info!("Shutdown requested");
                break;
            }
            joined = tasks.join_next() => match joined {
                None => break,
                Some(Ok(Ok(()))) => {}
                Some(Ok(Err(e))) => {
                    tracing::error!("Task exited: {e}");
                    break;
                }
                Some(Err(e)) => {
                    tracing::error!("Task panicked: {e}");
                    break;
                }
            }
        }
    }

    controller.shutdown();
    tasks.abort_all();
    Ok(())
}
