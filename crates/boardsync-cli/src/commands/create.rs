//! `boardsync create` command implementation.

use anyhow::Result;
use clap::Args;
use console::style;

use super::BoardArgs;

/// Arguments for the `create` command.
#[derive(Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub board: BoardArgs,

    /// Name of the new item.
    pub item_name: String,

    /// Column value as `Title=Value`. Can be specified multiple times.
    #[arg(short, long = "value", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,
}

pub async fn run(args: &CreateArgs) -> Result<()> {
    let board = args.board.open().await?;
    let item = board
        .create_item(&args.item_name, args.values.iter().map(|(k, v)| (k, v)))
        .await?;

    println!(
        "{} Created item {} ({})",
        style("✓").green().bold(),
        style(&item.name).bold(),
        item.id
    );
    Ok(())
}

fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected Title=Value, got '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("missing column title in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}
