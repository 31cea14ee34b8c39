//! `boardsync update` command implementation.

use anyhow::Result;
use clap::Args;
use console::style;

use super::BoardArgs;

/// Arguments for the `update` command.
#[derive(Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// ID of the item to change.
    pub item_id: String,

    /// Column title as shown on the board.
    pub column: String,

    /// New plain-text value.
    pub value: String,
}

pub async fn run(args: &UpdateArgs) -> Result<()> {
    let board = args.board.open().await?;
    let item = board
        .update_column_value(&args.item_id, &args.column, &args.value)
        .await?;

    println!(
        "{} Updated {} on item {}",
        style("✓").green().bold(),
        style(&args.column).bold(),
        item.id
    );
    Ok(())
}
