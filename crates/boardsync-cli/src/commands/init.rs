//! `boardsync init` command implementation.

use anyhow::Result;
use clap::Args;
use console::style;

use super::BoardArgs;

/// Arguments for the `init` command.
#[derive(Args)]
pub struct InitArgs {
    #[command(flatten)]
    pub board: BoardArgs,
}

pub async fn run(args: &InitArgs) -> Result<()> {
    let board = args.board.open().await?;
    let store = args.board.store();

    println!(
        "{} Board {} ({}) saved to {} with {} columns",
        style("✓").green().bold(),
        style(board.name()).bold(),
        board.id(),
        store.path().display(),
        board.columns().len()
    );

    Ok(())
}
