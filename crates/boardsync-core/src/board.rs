//! Board session: a loaded configuration plus a transport.

use std::path::Path;

use tracing::{debug, info};

use crate::{
    coerce::{self, ColumnValues},
    config::{BoardConfig, BoardRequest, ColumnMap, ConfigStore, CredentialResolver},
    error::{Error, ImportError, Result},
    import::{self, ImportOptions, ImportReport},
    query,
    transport::Transport,
    types::{ChangeColumnData, CreateItemData, CreatedItem, ItemRef, ItemsPage, ListItemsData},
};

/// Largest page the item listing accepts.
pub const MAX_ITEMS_LIMIT: u32 = 500;

/// An open board. Owns its column map; nothing is shared between sessions.
#[derive(Debug, Clone)]
pub struct Board {
    config: BoardConfig,
    transport: Transport,
}

impl Board {
    /// Opens the board described by `request`, refreshing its stored
    /// configuration through [`ConfigStore::load_or_create`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be completed, the schema
    /// cannot be fetched or the config file cannot be written.
    pub async fn open(
        store: &ConfigStore,
        request: &BoardRequest,
        resolver: &mut dyn CredentialResolver,
    ) -> Result<Self> {
        let config = store.load_or_create(request, resolver).await?;
        Self::from_config(config)
    }

    /// Wraps an already loaded configuration without touching the network.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored headers are not valid HTTP.
    pub fn from_config(config: BoardConfig) -> Result<Self> {
        let transport = config.transport()?;
        Ok(Self { config, transport })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.config.columns
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    /// Creates an item named `item_name`. `values` are keyed by column title;
    /// unknown titles are skipped and values that fail coercion are dropped
    /// with a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `item_name` is empty or contains only whitespace
    /// - The request fails at the HTTP level or cannot be decoded
    /// - The API reports errors
    pub async fn create_item<I, K, V>(&self, item_name: &str, values: I) -> Result<CreatedItem>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let payload = coerce::build_column_values(&self.config.columns, values);
        if !payload.unmatched.is_empty() {
            debug!(columns = ?payload.unmatched, "skipping values without a matching column");
        }
        self.create_item_with_values(item_name, &payload.values).await
    }

    /// Creates an item from values already keyed by column id.
    ///
    /// # Errors
    ///
    /// Same as [`Board::create_item`].
    pub async fn create_item_with_values(
        &self,
        item_name: &str,
        values: &ColumnValues,
    ) -> Result<CreatedItem> {
        if item_name.trim().is_empty() {
            return Err(Error::InvalidInput("item name must not be empty".to_string()));
        }

        let request = query::create_item(&self.config.id, item_name, values);
        let data: CreateItemData = self.transport.send(&request).await?;

        info!(
            board = %self.config.id,
            item = %data.create_item.id,
            name = item_name,
            "created item"
        );
        Ok(data.create_item)
    }

    /// Sets the column titled `column_title` on `item_id` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ColumnNotFound`] if the title is not in the column
    /// map, or the request error.
    pub async fn update_column_value(
        &self,
        item_id: &str,
        column_title: &str,
        value: &str,
    ) -> Result<ItemRef> {
        if item_id.trim().is_empty() {
            return Err(Error::InvalidInput("item id must not be empty".to_string()));
        }
        let column = self
            .config
            .columns
            .get(column_title)
            .ok_or_else(|| Error::ColumnNotFound(column_title.to_string()))?;

        let request = query::update_column(item_id, &self.config.id, &column.id, value);
        let data: ChangeColumnData = self.transport.send(&request).await?;
        Ok(data.change_simple_column_value)
    }

    /// Returns the first page of items, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if `limit` is not between 1 and
    /// [`MAX_ITEMS_LIMIT`], or the request error.
    pub async fn items(&self, limit: u32) -> Result<ItemsPage> {
        if limit == 0 || limit > MAX_ITEMS_LIMIT {
            return Err(Error::InvalidInput(format!(
                "limit must be between 1 and {MAX_ITEMS_LIMIT}"
            )));
        }

        let data: ListItemsData = self
            .transport
            .send(&query::list_items(&self.config.id, limit))
            .await?;

        Ok(data
            .boards
            .into_iter()
            .next()
            .map(|b| b.items_page)
            .unwrap_or_default())
    }

    /// Imports every row of a CSV or spreadsheet file as an item.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file cannot be read. Per-row failures are
    /// collected in the report.
    pub async fn import_file(
        &self,
        path: impl AsRef<Path>,
        options: &ImportOptions,
    ) -> Result<ImportReport, ImportError> {
        import::import_file(self, path.as_ref(), options).await
    }
}
