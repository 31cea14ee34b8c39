//! Board configuration store.
//!
//! Board connection settings and cached column maps live in a single JSON
//! file:
//!
//! ```json
//! {
//!   "Boards": {
//!     "1234567890": {
//!       "name": "Roadmap",
//!       "id": "1234567890",
//!       "properties": {
//!         "apiKey": "...",
//!         "apiUrl": "https://api.monday.com/v2",
//!         "headers": { "Authorization": "..." },
//!         "board": "1234567890"
//!       },
//!       "columns": { "Status": { "id": "status", "index": 0 } }
//!     }
//!   }
//! }
//! ```
//!
//! Entries are upserted by board id and never removed. Writes go through a
//! temporary file and a rename so the file is always valid JSON, but there is
//! no locking: concurrent writers race and the last one wins.

use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    error::{ConfigError, CredentialField, Error, TransportError},
    schema,
    transport::Transport,
    types::RemoteColumn,
};

/// Endpoint used when neither the caller nor the stored entry names one.
pub const DEFAULT_API_URL: &str = "https://api.monday.com/v2";

/// File name used when no path is configured.
pub const DEFAULT_CONFIG_FILE: &str = "boards.json";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "BOARDSYNC_CONFIG_PATH";

// ============================================================================
// COLUMN MAP
// ============================================================================

/// Remote id and display position of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub id: String,
    /// Zero-based position among the non-name columns. The leading name
    /// column sits at `-1`.
    pub index: i32,
}

/// Column title to [`ColumnInfo`] lookup for one board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMap(BTreeMap<String, ColumnInfo>);

impl ColumnMap {
    /// Builds the map from the board's columns in display order.
    ///
    /// The first column is the item name column and receives index `-1`;
    /// every following column is numbered from `0`. Titles must be unique, so
    /// a repeated title keeps its first column.
    pub fn from_columns(columns: impl IntoIterator<Item = RemoteColumn>) -> Self {
        let mut map = BTreeMap::new();
        let mut index = -1;

        for column in columns {
            if map.contains_key(&column.title) {
                warn!(title = %column.title, id = %column.id, "duplicate column title ignored");
            } else {
                map.insert(column.title, ColumnInfo { id: column.id, index });
            }
            index += 1;
        }

        Self(map)
    }

    pub fn get(&self, title: &str) -> Option<&ColumnInfo> {
        self.0.get(title)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Columns sorted by display index.
    pub fn ordered(&self) -> Vec<(&str, &ColumnInfo)> {
        let mut columns: Vec<_> = self.0.iter().map(|(t, c)| (t.as_str(), c)).collect();
        columns.sort_by_key(|(_, c)| c.index);
        columns
    }
}

// ============================================================================
// BOARD CONFIG
// ============================================================================

/// Connection properties of a board.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardProperties {
    pub api_key: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    pub board: String,
}

impl std::fmt::Debug for BoardProperties {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardProperties")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("headers", &self.headers.keys().collect::<Vec<_>>())
            .field("board", &self.board)
            .finish()
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

/// A named board with its credentials, endpoint and cached column map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    pub name: String,
    pub id: String,
    pub properties: BoardProperties,
    #[serde(default)]
    pub columns: ColumnMap,
}

impl BoardConfig {
    /// Creates a config authenticating with `api_key` as the `Authorization`
    /// header. The column map starts empty.
    pub fn new(name: &str, board_id: &str, api_key: &str, api_url: &str) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), api_key.to_string());

        Self {
            name: name.to_string(),
            id: board_id.to_string(),
            properties: BoardProperties {
                api_key: api_key.to_string(),
                api_url: api_url.to_string(),
                headers,
                board: board_id.to_string(),
            },
            columns: ColumnMap::default(),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.properties.api_key
    }

    pub fn api_url(&self) -> &str {
        &self.properties.api_url
    }

    /// Builds a transport for this board's endpoint and headers.
    ///
    /// # Errors
    ///
    /// Returns an error if a stored header is not valid HTTP.
    pub fn transport(&self) -> Result<Transport, TransportError> {
        Transport::new(&self.properties.api_url, &self.properties.headers)
    }
}

/// The whole configuration document.
///
/// Entries are kept as raw JSON and only the one being looked up is decoded,
/// so an entry that no longer matches [`BoardConfig`] is written back as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BoardsFile {
    #[serde(rename = "Boards", default)]
    pub boards: BTreeMap<String, Value>,
    /// Unknown top-level members, preserved across writes.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BoardsFile {
    /// Decodes the entry whose `name` member is `name`.
    ///
    /// # Errors
    ///
    /// Returns the decode error if that entry is not a valid board config.
    pub fn find_by_name(&self, name: &str) -> Result<Option<BoardConfig>, serde_json::Error> {
        self.boards
            .values()
            .find(|entry| entry.get("name").and_then(Value::as_str) == Some(name))
            .map(BoardConfig::deserialize)
            .transpose()
    }

    /// Decodes the entry stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns the decode error if that entry is not a valid board config.
    pub fn get(&self, id: &str) -> Result<Option<BoardConfig>, serde_json::Error> {
        self.boards.get(id).map(BoardConfig::deserialize).transpose()
    }

    /// Inserts or replaces the entry keyed by the board's id.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be encoded.
    pub fn upsert(&mut self, config: &BoardConfig) -> Result<(), serde_json::Error> {
        self.boards.insert(config.id.clone(), serde_json::to_value(config)?);
        Ok(())
    }
}

// ============================================================================
// CREDENTIAL RESOLUTION
// ============================================================================

/// Supplies credentials that were neither passed in nor stored.
///
/// Closures `FnMut(&str, CredentialField) -> Result<String, ConfigError>`
/// implement this trait.
pub trait CredentialResolver {
    /// Returns the value of `field` for the board called `board_name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be obtained.
    fn resolve(&mut self, board_name: &str, field: CredentialField) -> Result<String, ConfigError>;
}

impl<F> CredentialResolver for F
where
    F: FnMut(&str, CredentialField) -> Result<String, ConfigError>,
{
    fn resolve(&mut self, board_name: &str, field: CredentialField) -> Result<String, ConfigError> {
        self(board_name, field)
    }
}

/// Resolver for non-interactive use: every missing value is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompt;

impl CredentialResolver for NoPrompt {
    fn resolve(
        &mut self,
        _board_name: &str,
        field: CredentialField,
    ) -> Result<String, ConfigError> {
        Err(ConfigError::MissingCredential(field))
    }
}

/// What the caller knows about the board it wants to open.
#[derive(Debug, Clone, Default)]
pub struct BoardRequest {
    pub name: String,
    pub board_id: Option<String>,
    pub api_key: Option<String>,
    pub api_url: Option<String>,
}

impl BoardRequest {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

// ============================================================================
// STORE
// ============================================================================

/// Reads and writes the board configuration file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Picks the config file: `explicit`, else `$BOARDSYNC_CONFIG_PATH`, else
    /// `boards.json` in the current directory.
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::new(resolve_path(explicit, std::env::var(CONFIG_PATH_ENV).ok()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the whole configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] if it cannot be read and
    /// [`ConfigError::Malformed`] if it is not a valid document.
    pub fn load(&self) -> Result<BoardsFile, ConfigError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigError::NotFound(self.path.clone())
            } else {
                ConfigError::Io {
                    path: self.path.clone(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&contents).map_err(|source| ConfigError::Malformed {
            path: self.path.clone(),
            source,
        })
    }

    /// Looks up a stored board by name.
    ///
    /// # Errors
    ///
    /// Returns the load error, [`ConfigError::Malformed`] if the entry with
    /// that name is invalid, or [`ConfigError::BoardNotFound`] if no entry
    /// has that name.
    pub fn load_board(&self, name: &str) -> Result<BoardConfig, ConfigError> {
        self.load()?
            .find_by_name(name)
            .map_err(|source| ConfigError::Malformed {
                path: self.path.clone(),
                source,
            })?
            .ok_or_else(|| ConfigError::BoardNotFound(name.to_string()))
    }

    /// Writes the document atomically.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Write`] if the temporary file cannot be created,
    /// written or renamed over the target.
    pub fn save(&self, file: &BoardsFile) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(write_err)?;

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        serde_json::to_writer_pretty(&mut tmp, file)
            .map_err(io::Error::from)
            .map_err(write_err)?;
        tmp.write_all(b"\n").map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        Ok(())
    }

    /// Reads the document for an update. Any load failure starts from an
    /// empty document.
    fn load_or_default(&self) -> BoardsFile {
        match self.load() {
            Ok(file) => file,
            Err(ConfigError::NotFound(path)) => {
                info!(path = %path.display(), "config file not found, creating it");
                BoardsFile::default()
            }
            Err(err) => {
                warn!("{err}; starting from an empty config");
                BoardsFile::default()
            }
        }
    }

    /// Loads the board called `request.name`, completing credentials as
    /// needed, refreshes its column map and writes the entry back.
    ///
    /// Supplied values win over stored ones; `resolver` is consulted only for
    /// values that are still missing. The schema is fetched on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A credential is missing and `resolver` cannot supply it
    /// - The board's schema cannot be fetched
    /// - The config file cannot be written
    pub async fn load_or_create(
        &self,
        request: &BoardRequest,
        resolver: &mut dyn CredentialResolver,
    ) -> Result<BoardConfig, Error> {
        if request.name.trim().is_empty() {
            return Err(Error::InvalidInput("board name must not be empty".to_string()));
        }

        let mut file = self.load_or_default();
        let stored = file.find_by_name(&request.name).unwrap_or_else(|err| {
            warn!(board = %request.name, "stored entry is invalid, replacing it: {err}");
            None
        });
        let stored = stored.as_ref();
        if stored.is_none() {
            info!(board = %request.name, "board not in config, creating entry");
        }

        let board_id = complete(
            request.board_id.as_deref(),
            stored.map(|b| b.id.as_str()),
            &request.name,
            CredentialField::BoardId,
            resolver,
        )?;
        let api_key = complete(
            request.api_key.as_deref(),
            stored.map(BoardConfig::api_key),
            &request.name,
            CredentialField::ApiKey,
            resolver,
        )?;
        let api_url = request
            .api_url
            .as_deref()
            .or(stored.map(BoardConfig::api_url))
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        let mut config = BoardConfig::new(&request.name, &board_id, &api_key, &api_url);
        let transport = config.transport()?;
        config.columns = schema::fetch_columns(&transport, &board_id).await?;

        file.upsert(&config).map_err(|source| ConfigError::Write {
            path: self.path.clone(),
            source: io::Error::from(source),
        })?;
        self.save(&file)?;
        info!(
            board = %config.name,
            id = %config.id,
            columns = config.columns.len(),
            path = %self.path.display(),
            "board saved"
        );

        Ok(config)
    }
}

fn resolve_path(explicit: Option<PathBuf>, env_value: Option<String>) -> PathBuf {
    explicit
        .or_else(|| env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

fn complete(
    supplied: Option<&str>,
    stored: Option<&str>,
    board_name: &str,
    field: CredentialField,
    resolver: &mut dyn CredentialResolver,
) -> Result<String, ConfigError> {
    let known = supplied
        .or(stored)
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let value = match known {
        Some(value) => value.to_string(),
        None => resolver.resolve(board_name, field)?.trim().to_string(),
    };

    if value.is_empty() {
        return Err(ConfigError::MissingCredential(field));
    }
    Ok(value)
}
