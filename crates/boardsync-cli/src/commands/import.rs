//! `boardsync import` command implementation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use boardsync_core::{SheetSelector, import};
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use super::BoardArgs;

/// Arguments for the `import` command.
#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// CSV (`.csv`) or spreadsheet file to import.
    pub file: PathBuf,

    /// Worksheet name or zero-based index. Defaults to the first sheet.
    #[arg(short, long)]
    pub sheet: Option<SheetSelector>,

    /// Column holding the item name. Defaults to the first column.
    #[arg(short, long)]
    pub name_column: Option<String>,
}

pub async fn run(args: &ImportArgs) -> Result<()> {
    let board = args.board.open().await?;

    let table = import::read_table(&args.file, args.sheet.as_ref())
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let pb = ProgressBar::new(u64::try_from(table.rows.len()).unwrap_or(u64::MAX));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .context("invalid progress template")?
            .progress_chars("=> "),
    );

    let report = import::import_table(&board, &table, args.name_column.as_deref(), |progress| {
        pb.set_message(progress.item_name.to_string());
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    println!(
        "{} Created {} of {} items in {}",
        style("✓").green().bold(),
        report.created.len(),
        report.total(),
        style(board.name()).bold()
    );
    for failure in &report.failures {
        println!(
            "{} Row {} ({}): {}",
            style("✗").red().bold(),
            failure.row,
            failure.item_name,
            failure.error
        );
    }

    Ok(())
}
