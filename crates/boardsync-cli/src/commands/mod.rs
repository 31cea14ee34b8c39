//! CLI command implementations.
//!
//! Each command module exports an `*Args` struct implementing `clap::Args`
//! and an async `run(&Args) -> Result<()>` function. Every command opens its
//! board through [`BoardArgs::open`], which refreshes the stored
//! configuration and column map before doing anything else.

use std::path::PathBuf;

use anyhow::{Context, Result};
use boardsync_core::{Board, BoardRequest, ConfigStore};
use clap::Args;

use crate::prompt::ConsolePrompt;

pub mod columns;
pub mod create;
pub mod import;
pub mod init;
pub mod items;
pub mod update;

/// Arguments identifying a board, shared by every command.
#[derive(Args)]
pub struct BoardArgs {
    /// Board name as stored in the config file.
    pub name: String,

    /// Board ID (required the first time a board is used).
    #[arg(long)]
    pub board_id: Option<String>,

    /// API key. Values starting with `env:` are read from that environment
    /// variable.
    #[arg(long)]
    pub api_key: Option<String>,

    /// GraphQL endpoint (defaults to the stored one, then
    /// `https://api.monday.com/v2`).
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path to the board config file. Defaults to `$BOARDSYNC_CONFIG_PATH`,
    /// then `boards.json`.
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl BoardArgs {
    pub fn store(&self) -> ConfigStore {
        ConfigStore::resolve(self.config.clone())
    }

    pub fn request(&self) -> Result<BoardRequest> {
        Ok(BoardRequest {
            name: self.name.clone(),
            board_id: self.board_id.clone(),
            api_key: self.api_key.as_deref().map(process_value).transpose()?,
            api_url: self.api_url.clone(),
        })
    }

    /// Loads (or creates) the board entry and returns an open session.
    pub async fn open(&self) -> Result<Board> {
        let store = self.store();
        let request = self.request()?;
        Board::open(&store, &request, &mut ConsolePrompt::default())
            .await
            .with_context(|| format!("failed to open board '{}'", self.name))
    }
}

fn process_value(value: &str) -> Result<String> {
    if let Some(var_name) = value.strip_prefix("env:") {
        std::env::var(var_name)
            .with_context(|| format!("environment variable not found: {var_name}"))
    } else {
        Ok(value.to_string())
    }
}
