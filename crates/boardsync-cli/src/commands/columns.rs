//! `boardsync columns` command implementation.

use anyhow::Result;
use boardsync_core::ColumnMap;
use clap::Args;
use console::style;

use super::BoardArgs;

/// Arguments for the `columns` command.
#[derive(Args)]
pub struct ColumnsArgs {
    #[command(flatten)]
    pub board: BoardArgs,
}

pub async fn run(args: &ColumnsArgs) -> Result<()> {
    let board = args.board.open().await?;

    println!(
        "\nAvailable columns in board '{}':",
        style(board.name()).bold()
    );
    print!("{}", render_columns(board.columns()));

    Ok(())
}

fn render_columns(columns: &ColumnMap) -> String {
    let rule = "=".repeat(50);
    let mut out = format!("{rule}\n");
    for (title, info) in columns.ordered() {
        out.push_str(&format!(
            "{title:<30} | ID: {:<15} | Index: {}\n",
            info.id, info.index
        ));
    }
    out.push_str(&rule);
    out.push('\n');
    out
}
