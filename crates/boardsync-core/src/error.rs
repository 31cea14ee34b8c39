//! Error types for board configuration, remote calls and tabular import.
//!
//! Each concern gets its own enum so callers can decide per failure kind
//! whether to recover, skip or abort. [`Error`] aggregates them for the
//! operations that can fail in more than one way.

use std::{fmt, path::PathBuf};

use serde::{Deserialize, Serialize};

/// Errors raised while reading, completing or writing the board configuration
/// file.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The configuration file exists but could not be read.
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON or does not have the expected
    /// shape.
    #[error("malformed config file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No board with the given name is stored in the file.
    #[error("board '{0}' not found in config")]
    BoardNotFound(String),

    /// A required credential was neither supplied, stored nor resolved.
    #[error("missing {0}")]
    MissingCredential(CredentialField),

    /// The configuration file could not be written.
    #[error("failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns `true` for the load failures that fall back to creating a fresh
    /// configuration instead of aborting.
    pub fn is_recoverable_load_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::Io { .. } | Self::Malformed { .. } | Self::BoardNotFound(_)
        )
    }
}

/// A value needed to talk to a board that may have to be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialField {
    ApiKey,
    BoardId,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ApiKey => f.write_str("API key"),
            Self::BoardId => f.write_str("board ID"),
        }
    }
}

/// Network or HTTP-level failures of a single remote call.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TransportError {
    /// A configured header name or value is not valid HTTP.
    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not JSON or does not match the expected shape.
    #[error("failed to decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    /// A successful response carried neither `data` nor `errors`.
    #[error("no data in GraphQL response")]
    MissingData,
}

/// A single error record from a GraphQL `errors` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQlError {
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Value>,
}

/// The remote API rejected the request despite a successful HTTP status.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("API error: {}", join_messages(.errors))]
pub struct ApiError {
    pub errors: Vec<GraphQlError>,
}

fn join_messages(errors: &[GraphQlError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Outcome of a failed remote call.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// The board schema could not be fetched.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaFetchError {
    #[error("schema query failed: {0}")]
    Request(#[from] RequestError),

    /// The response did not contain the requested board.
    #[error("board {0} missing from schema response")]
    BoardMissing(String),
}

/// A cell value could not be coerced into its column's representation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not format '{value}' for column '{column}': {reason}")]
pub struct ValueFormatError {
    pub column: String,
    pub value: String,
    pub reason: String,
}

/// Tabular input could not be read.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImportError {
    #[error("failed to read CSV {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read spreadsheet {}: {message}", path.display())]
    Spreadsheet { path: PathBuf, message: String },

    #[error("sheet {0} not found")]
    SheetNotFound(String),

    #[error("{} has no header row", .0.display())]
    MissingHeader(PathBuf),
}

/// Aggregate error for board operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Schema(#[from] SchemaFetchError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    ValueFormat(#[from] ValueFormatError),

    #[error(transparent)]
    Import(#[from] ImportError),

    /// The column title is not present in the board's column map.
    #[error("column '{0}' not found in board")]
    ColumnNotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<RequestError> for Error {
    fn from(err: RequestError) -> Self {
        match err {
            RequestError::Transport(e) => Self::Transport(e),
            RequestError::Api(e) => Self::Api(e),
        }
    }
}

/// Result alias defaulting to the crate-level [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;
