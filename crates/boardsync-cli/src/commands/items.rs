//! `boardsync items` command implementation.

use anyhow::{Result, bail};
use boardsync_core::{ItemsPage, query::DEFAULT_ITEMS_LIMIT};
use clap::Args;
use console::style;

use super::BoardArgs;

/// Arguments for the `items` command.
#[derive(Args)]
pub struct ItemsArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Maximum number of items to fetch (first page only).
    #[arg(short, long, default_value_t = DEFAULT_ITEMS_LIMIT)]
    pub limit: u32,

    /// Output format: "table" or "json"
    #[arg(short, long, default_value = "table")]
    pub format: String,
}

pub async fn run(args: &ItemsArgs) -> Result<()> {
    if args.format != "table" && args.format != "json" {
        bail!("unknown format '{}': expected table or json", args.format);
    }

    let board = args.board.open().await?;
    let page = board.items(args.limit).await?;

    if args.format == "json" {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_table(&page);
    }

    Ok(())
}

fn print_table(page: &ItemsPage) {
    if page.items.is_empty() {
        println!("{} No items", style("?").yellow().bold());
        return;
    }

    println!("{:<14} {}", style("ID").bold(), style("NAME").bold());
    for item in &page.items {
        println!("{:<14} {}", item.id, item.name);
    }
    if let Some(cursor) = &page.cursor {
        println!("{} more items available (cursor {cursor})", style("…").dim());
    }
}
