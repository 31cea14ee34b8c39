//! Client library for monday.com boards.
//!
//! Keeps a local JSON file of named board configurations (credentials,
//! endpoint and a cached column map), issues GraphQL queries and mutations
//! for listing, creating and updating items, and bulk-imports CSV or
//! spreadsheet rows as items.
//!
//! # Key Components
//!
//! - **Configuration**: [`ConfigStore`] loads, completes and upserts
//!   [`BoardConfig`] entries; missing credentials come from a
//!   [`CredentialResolver`]
//! - **Schema**: [`schema::fetch_columns`] builds the title to column
//!   [`ColumnMap`]
//! - **Requests**: [`query`] builds parameterized GraphQL requests which
//!   [`Transport`] sends
//! - **Import**: [`import`] reads tabular files and creates one item per row,
//!   collecting per-row failures instead of aborting
//!
//! # Example
//!
//! ```no_run
//! use boardsync_core::{Board, BoardRequest, ConfigStore, ImportOptions, NoPrompt};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::resolve(None);
//! let board = Board::open(&store, &BoardRequest::named("Roadmap"), &mut NoPrompt).await?;
//!
//! let report = board.import_file("tasks.csv", &ImportOptions::default()).await?;
//! println!("created {} items, {} failed", report.created.len(), report.failures.len());
//! # Ok(())
//! # }
//! ```
//!
//! All remote calls are awaited one after another; nothing is retried.

mod board;
pub mod coerce;
mod config;
mod error;
pub mod import;
pub mod query;
pub mod schema;
mod transport;
mod types;

pub use board::{Board, MAX_ITEMS_LIMIT};
pub use config::{
    BoardConfig, BoardProperties, BoardRequest, BoardsFile, CONFIG_PATH_ENV, ColumnInfo, ColumnMap,
    ConfigStore, CredentialResolver, DEFAULT_API_URL, DEFAULT_CONFIG_FILE, NoPrompt,
};
pub use error::{
    ApiError, ConfigError, CredentialField, Error, GraphQlError, ImportError, RequestError, Result,
    SchemaFetchError, TransportError, ValueFormatError,
};
pub use import::{ImportOptions, ImportReport, RowFailure, SheetSelector, Table};
pub use transport::Transport;
pub use types::{ColumnRef, ColumnValue, CreatedItem, Item, ItemRef, ItemsPage, RemoteColumn};
