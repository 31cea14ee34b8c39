//! Board schema import.

use tracing::debug;

use crate::{
    config::ColumnMap,
    error::SchemaFetchError,
    query,
    transport::Transport,
    types::ColumnsData,
};

/// Fetches the columns of `board_id` and builds the title lookup.
///
/// # Errors
///
/// Returns [`SchemaFetchError::Request`] if the request fails or the response
/// does not have the `boards[].columns[] { id title }` shape, and
/// [`SchemaFetchError::BoardMissing`] if the board list comes back empty.
pub async fn fetch_columns(
    transport: &Transport,
    board_id: &str,
) -> Result<ColumnMap, SchemaFetchError> {
    let data: ColumnsData = transport.send(&query::columns(board_id)).await?;

    let board = data
        .boards
        .into_iter()
        .next()
        .ok_or_else(|| SchemaFetchError::BoardMissing(board_id.to_string()))?;

    debug!(board = board_id, columns = board.columns.len(), "fetched board schema");
    Ok(ColumnMap::from_columns(board.columns))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, method},
    };

    use super::*;
    use crate::error::{RequestError, TransportError};

    fn transport(server: &MockServer) -> Transport {
        Transport::new(&server.uri(), &BTreeMap::new()).unwrap()
    }

    async fn respond_with(server: &MockServer, body: &str) {
        Mock::given(method("POST"))
            .and(body_string_contains("columns"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(body.to_string(), "application/json"),
            )
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_fetch_columns_builds_indexed_map() {
        let server = MockServer::start().await;
        respond_with(
            &server,
            r#"{"data":{"boards":[{"columns":[{"id":"name","title":"Name"},{"id":"person","title":"Owner"},{"id":"date4","title":"Due"}]}]}}"#,
        )
        .await;

        let columns = fetch_columns(&transport(&server), "123").await.unwrap();

        assert_eq!(columns.get("Name").unwrap().index, -1);
        assert_eq!(columns.get("Owner").unwrap().id, "person");
        assert_eq!(columns.get("Owner").unwrap().index, 0);
        assert_eq!(columns.get("Due").unwrap().index, 1);
    }

    #[tokio::test]
    async fn test_fetch_columns_missing_keys_is_schema_error() {
        let server = MockServer::start().await;
        respond_with(&server, r#"{"data":{"boards":[{"columns":[{"id":"name"}]}]}}"#).await;

        let err = fetch_columns(&transport(&server), "123").await.unwrap_err();

        assert!(matches!(
            err,
            SchemaFetchError::Request(RequestError::Transport(TransportError::Decode { .. }))
        ));
    }

    #[tokio::test]
    async fn test_fetch_columns_unknown_board_is_board_missing() {
        let server = MockServer::start().await;
        respond_with(&server, r#"{"data":{"boards":[]}}"#).await;

        let err = fetch_columns(&transport(&server), "999").await.unwrap_err();

        assert!(matches!(err, SchemaFetchError::BoardMissing(id) if id == "999"));
    }
}
