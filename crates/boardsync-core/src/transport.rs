//! HTTP transport for GraphQL requests.

use std::collections::BTreeMap;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ApiError, GraphQlError, RequestError, TransportError},
    query::GraphQlRequest,
};

/// Sends GraphQL requests to one endpoint with a fixed set of headers.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    endpoint: String,
    headers: HeaderMap,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Creates a transport for `endpoint` sending `headers` with every request.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::InvalidHeader`] if a header name or value is
    /// not valid HTTP.
    pub fn new(endpoint: &str, headers: &BTreeMap<String, String>) -> Result<Self, TransportError> {
        let mut header_map = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::InvalidHeader(name.clone()))?;
            header_map.insert(header_name, header_value);
        }

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint: normalize_endpoint(endpoint),
            headers: header_map,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POSTs `request` and decodes the `data` member of the response into `T`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [`TransportError::Network`] if no response was received
    /// - [`TransportError::Status`] for a non-2xx status, with the body text
    /// - [`TransportError::Decode`] if the body is not JSON or `data` does not
    ///   match `T`
    /// - [`ApiError`] if a 2xx response carries a non-empty `errors` member
    /// - [`TransportError::MissingData`] if neither `data` nor `errors` is set
    pub async fn send<T: DeserializeOwned>(
        &self,
        request: &GraphQlRequest,
    ) -> Result<T, RequestError> {
        debug!(endpoint = %self.endpoint, "sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .header(CONTENT_TYPE, "application/json")
            .json(request)
            .send()
            .await
            .map_err(TransportError::Network)?;

        let status = response.status();
        let body = response.text().await.map_err(TransportError::Network)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        decode_body(&body)
    }
}

fn decode_body<T: DeserializeOwned>(body: &str) -> Result<T, RequestError> {
    let decode = |source| TransportError::Decode {
        source,
        body: body.to_string(),
    };

    let mut envelope: Value = serde_json::from_str(body).map_err(decode)?;

    if let Some(errors) = envelope.get_mut("errors").map(Value::take)
        && !errors.is_null()
    {
        let errors: Vec<GraphQlError> = serde_json::from_value(errors).map_err(decode)?;
        if !errors.is_empty() {
            return Err(ApiError { errors }.into());
        }
    }

    match envelope.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Err(TransportError::MissingData.into()),
        Some(data) => Ok(serde_json::from_value(data).map_err(decode)?),
    }
}

fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header, method},
    };

    use super::*;
    use crate::query;

    #[derive(Debug, Deserialize)]
    struct Echo {
        ok: bool,
    }

    fn transport(server: &MockServer) -> Transport {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "test-token".to_string());
        Transport::new(&server.uri(), &headers).unwrap()
    }

    #[tokio::test]
    async fn test_send_decodes_data_and_sends_auth_header() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("authorization", "test-token"))
            .and(body_string_contains("boardId"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"data":{"ok":true}}"#, "application/json"),
            )
            .mount(&server)
            .await;

        let echo: Echo = transport(&server).send(&query::columns("1")).await.unwrap();
        assert!(echo.ok);
    }

    #[tokio::test]
    async fn test_send_non_success_status_returns_status_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<Echo>(&query::columns("1"))
            .await
            .unwrap_err();

        match err {
            RequestError::Transport(TransportError::Status { status, body }) => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_invalid_json_returns_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<Echo>(&query::columns("1"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RequestError::Transport(TransportError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn test_send_errors_member_returns_api_error() {
        let server = MockServer::start().await;
        let body = r#"{"errors":[{"message":"Invalid token","locations":[{"line":1,"column":1}]}]}"#;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;

        let err = transport(&server)
            .send::<Echo>(&query::columns("1"))
            .await
            .unwrap_err();

        let RequestError::Api(api) = err else {
            panic!("expected API error");
        };
        assert_eq!(api.errors.len(), 1);
        assert!(api.to_string().contains("Invalid token"));
    }

    #[test]
    fn test_decode_body_empty_errors_is_not_an_api_error() {
        let echo: Echo = decode_body(r#"{"data":{"ok":true},"errors":[]}"#).unwrap();
        assert!(echo.ok);

        let err = decode_body::<Echo>(r#"{"errors":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            RequestError::Transport(TransportError::MissingData)
        ));
    }

    #[test]
    fn test_decode_body_without_data_is_missing_data() {
        let err = decode_body::<Echo>(r#"{"data":null}"#).unwrap_err();
        assert!(matches!(
            err,
            RequestError::Transport(TransportError::MissingData)
        ));
    }

    #[test]
    fn test_new_rejects_invalid_header_value() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "bad\nvalue".to_string());

        let err = Transport::new("https://api.monday.com/v2", &headers).unwrap_err();
        assert!(matches!(err, TransportError::InvalidHeader(name) if name == "Authorization"));
    }

    #[test]
    fn test_debug_does_not_print_headers() {
        let mut headers = BTreeMap::new();
        headers.insert("Authorization".to_string(), "secret-token".to_string());
        let transport = Transport::new("https://api.monday.com/v2/", &headers).unwrap();

        let debug = format!("{transport:?}");
        assert!(!debug.contains("secret-token"));
        assert_eq!(transport.endpoint(), "https://api.monday.com/v2");
    }
}
