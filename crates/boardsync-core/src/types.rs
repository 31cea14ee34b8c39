//! Type definitions for monday.com API requests and responses.

use serde::{Deserialize, Serialize};

/// A column definition as returned by the schema query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteColumn {
    pub id: String,
    pub title: String,
}

/// Represents an item (row) in a board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub column_values: Vec<ColumnValue>,
}

impl Item {
    /// Returns the display text of the column with the given title, if any.
    pub fn text(&self, title: &str) -> Option<&str> {
        self.column_values
            .iter()
            .find(|cv| cv.column.as_ref().is_some_and(|c| c.title == title))
            .and_then(|cv| cv.text.as_deref())
    }
}

/// One column value of an item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnValue {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    /// JSON-encoded structured value, as the API returns it.
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub column: Option<ColumnRef>,
}

/// Reference to a column by title.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRef {
    pub title: String,
}

/// First page of a board's items.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemsPage {
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default)]
    pub items: Vec<Item>,
}

/// Identifier and name of a freshly created item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedItem {
    pub id: String,
    pub name: String,
}

/// Identifier of an item after a column change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: String,
}

// ============================================================================
// RESPONSE ENVELOPES
// ============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct ColumnsData {
    pub boards: Vec<BoardColumns>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoardColumns {
    pub columns: Vec<RemoteColumn>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListItemsData {
    pub boards: Vec<BoardWithItems>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BoardWithItems {
    pub items_page: ItemsPage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateItemData {
    pub create_item: CreatedItem,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChangeColumnData {
    pub change_simple_column_value: ItemRef,
}
