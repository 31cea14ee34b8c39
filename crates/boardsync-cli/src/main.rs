//! Command-line client for monday.com boards.
//!
//! Usage:
//! ```bash
//! boardsync init Roadmap --board-id 123 --api-key env:MONDAY_TOKEN
//! boardsync columns Roadmap                      # Show the cached column map
//! boardsync items Roadmap --limit 20             # Newest items first
//! boardsync create Roadmap "Launch" -v Owner=Ada # Create one item
//! boardsync update Roadmap 456 Status Done       # Change one column
//! boardsync import Roadmap tasks.xlsx --sheet 1  # One item per row
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod prompt;

#[derive(Debug, Parser)]
#[command(name = "boardsync", author, version, about)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store a board (or refresh a stored one) and fetch its columns
    Init(commands::init::InitArgs),

    /// Show the board's columns
    Columns(commands::columns::ColumnsArgs),

    /// List the newest items of a board
    Items(commands::items::ItemsArgs),

    /// Create one item
    Create(commands::create::CreateArgs),

    /// Change one column value of an item
    Update(commands::update::UpdateArgs),

    /// Create one item per row of a CSV or spreadsheet file
    Import(commands::import::ImportArgs),
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Init(_) => f.debug_tuple("Init").finish(),
            Self::Columns(_) => f.debug_tuple("Columns").finish(),
            Self::Items(_) => f.debug_tuple("Items").finish(),
            Self::Create(_) => f.debug_tuple("Create").finish(),
            Self::Update(_) => f.debug_tuple("Update").finish(),
            Self::Import(_) => f.debug_tuple("Import").finish(),
        }
    }
}

fn init_tracing(json: bool) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive("info".parse().context("failed to parse log directive")?);
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json)?;

    match &cli.command {
        Command::Init(args) => commands::init::run(args).await,
        Command::Columns(args) => commands::columns::run(args).await,
        Command::Items(args) => commands::items::run(args).await,
        Command::Create(args) => commands::create::run(args).await,
        Command::Update(args) => commands::update::run(args).await,
        Command::Import(args) => commands::import::run(args).await,
    }
}
