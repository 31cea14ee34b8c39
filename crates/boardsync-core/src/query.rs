//! GraphQL request construction.
//!
//! Every builder is a pure function returning a [`GraphQlRequest`]. User
//! supplied values always travel as variables, never inside the query text.

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::coerce::ColumnValues;

/// Column the item listing is ordered by (the board's numeric item id).
pub const ORDER_COLUMN_ID: &str = "item_id__1";

/// Default page size for item listings.
pub const DEFAULT_ITEMS_LIMIT: u32 = 500;

const COLUMNS_QUERY: &str =
    "query ($boardId: ID!) { boards(ids: [$boardId]) { columns { id title } } }";

const LIST_ITEMS_QUERY: &str =
    r#"query ($boardId: ID!, $limit: Int!) { boards(ids: [$boardId]) { items_page(limit: $limit, query_params: { order_by: [{ column_id: "item_id__1", direction: desc }] }) { cursor items { id name column_values { id text value column { title } } } } } }"#;

const CREATE_ITEM_MUTATION: &str =
    "mutation ($boardId: ID!, $itemName: String!, $columnValues: JSON!) { create_item(board_id: $boardId, item_name: $itemName, column_values: $columnValues) { id name } }";

const CHANGE_COLUMN_MUTATION: &str =
    "mutation ($itemId: ID!, $boardId: ID!, $columnId: String!, $value: String) { change_simple_column_value(item_id: $itemId, board_id: $boardId, column_id: $columnId, value: $value) { id } }";

/// A GraphQL request body: `{ "query": ..., "variables": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphQlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub variables: Map<String, Value>,
}

impl GraphQlRequest {
    fn new(query: &str, variables: Value) -> Self {
        let variables = match variables {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            query: query.to_string(),
            variables,
        }
    }
}

/// Builds the schema query returning a board's `{ id, title }` columns.
pub fn columns(board_id: &str) -> GraphQlRequest {
    GraphQlRequest::new(COLUMNS_QUERY, json!({ "boardId": board_id }))
}

/// Builds the first-page item listing, newest items first.
///
/// Only one page is requested; the returned cursor is not followed.
pub fn list_items(board_id: &str, limit: u32) -> GraphQlRequest {
    GraphQlRequest::new(
        LIST_ITEMS_QUERY,
        json!({ "boardId": board_id, "limit": limit }),
    )
}

/// Builds the item creation mutation.
///
/// The API expects `column_values` as a single JSON-encoded string keyed by
/// column id.
pub fn create_item(
    board_id: &str,
    item_name: &str,
    column_values: &ColumnValues,
) -> GraphQlRequest {
    let encoded = Value::Object(column_values.clone()).to_string();
    GraphQlRequest::new(
        CREATE_ITEM_MUTATION,
        json!({
            "boardId": board_id,
            "itemName": item_name,
            "columnValues": encoded,
        }),
    )
}

/// Builds the mutation changing one column of one item to a plain value.
pub fn update_column(
    item_id: &str,
    board_id: &str,
    column_id: &str,
    value: &str,
) -> GraphQlRequest {
    GraphQlRequest::new(
        CHANGE_COLUMN_MUTATION,
        json!({
            "itemId": item_id,
            "boardId": board_id,
            "columnId": column_id,
            "value": value,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_items_orders_by_item_id_descending() {
        let request = list_items("123", 25);

        assert!(request.query.contains(ORDER_COLUMN_ID));
        assert!(request.query.contains("direction: desc"));
        assert!(request.query.contains("cursor"));
        assert_eq!(request.variables["boardId"], "123");
        assert_eq!(request.variables["limit"], 25);
    }

    #[test]
    fn test_create_item_encodes_column_values_as_string() {
        let mut values = ColumnValues::new();
        values.insert("text__1".to_string(), json!("hello"));
        values.insert("date4".to_string(), json!({ "date": "2025-04-30" }));

        let request = create_item("123", "Launch", &values);

        let encoded = request.variables["columnValues"]
            .as_str()
            .expect("columnValues should be a string");
        let decoded: Value = serde_json::from_str(encoded).unwrap();
        assert_eq!(decoded["date4"]["date"], "2025-04-30");
        assert_eq!(decoded["text__1"], "hello");
        assert_eq!(request.variables["itemName"], "Launch");
    }

    #[test]
    fn test_create_item_with_no_values_sends_empty_object() {
        let request = create_item("123", "Test", &ColumnValues::new());
        assert_eq!(request.variables["columnValues"], "{}");
    }

    #[test]
    fn test_update_column_keeps_value_out_of_query_text() {
        let value = r#"say "hi" {now}"#;
        let request = update_column("456", "123", "text__1", value);

        assert!(!request.query.contains(value));
        assert_eq!(request.variables["value"], value);
        assert_eq!(request.variables["columnId"], "text__1");
    }

    #[test]
    fn test_request_serializes_query_and_variables() {
        let body = serde_json::to_value(columns("42")).unwrap();

        assert!(body["query"].as_str().unwrap().contains("columns { id title }"));
        assert_eq!(body["variables"]["boardId"], "42");
    }
}
