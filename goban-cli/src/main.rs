//! Command-line front end for `goban-engine`.
//!
//! - `goban replay <FILE>` - print the final position of an SGF main line
//! - `goban query <FILE>` - print an analysis-engine query as JSON
//! - `goban export <FILE>` - normalize a record to setup + moves SGF

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use goban_engine::Goban;
use goban_engine::sgf;

/// Read SGF game records and work with their positions.
#[derive(Parser)]
#[command(name = "goban")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay the main line and print the board
    Replay {
        file: PathBuf,
        /// Print every position instead of only the last one
        #[arg(long)]
        all: bool,
    },
    /// Print the engine query for a position as JSON
    Query {
        file: PathBuf,
        /// Move number to query (0 is the starting position; default: last)
        #[arg(long)]
        position: Option<usize>,
    },
    /// Re-emit the final position as SGF
    Export { file: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "goban_engine=warn,goban=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay { file, all } => {
            let boards = load(&file)?;
            if all {
                for (i, goban) in boards.iter().enumerate() {
                    println!("move {i}:{goban}");
                }
            } else {
                print!("{}", last(&boards)?);
            }
        }
        Commands::Query { file, position } => {
            let boards = load(&file)?;
            let goban = match position {
                Some(n) => boards.get(n).with_context(|| {
                    format!("position {n} out of range (0..={})", boards.len() - 1)
                })?,
                None => last(&boards)?,
            };
            let json = serde_json::to_string_pretty(&goban.engine_query())?;
            println!("{json}");
        }
        Commands::Export { file } => {
            let boards = load(&file)?;
            println!("{}", last(&boards)?.as_sgf());
        }
    }
    Ok(())
}

fn load(path: &Path) -> Result<Vec<Goban>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let tree = sgf::parse(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    let boards = tree
        .to_goban_list()
        .with_context(|| format!("failed to replay {}", path.display()))?;
    tracing::info!(file = %path.display(), positions = boards.len(), "loaded game record");
    Ok(boards)
}

fn last(boards: &[Goban]) -> Result<&Goban> {
    match boards.last() {
        Some(goban) => Ok(goban),
        None => bail!("game record has no positions"),
    }
}
