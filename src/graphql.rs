//! Minimal typed GraphQL transport over reqwest.
//!
//! Each Shopify operation implements [`GraphqlOperation`]; the client posts
//! `{query, variables, operationName}` bodies and deserializes the standard
//! `{data, errors}` envelope. There is no retry, batching, or schema
//! validation here: every failure is terminal for the one request that hit it.

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ShopifyConfig;
use crate::error::{InventoryError, InventoryResult};

/// Header carrying the Admin API credential.
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

/// Typed GraphQL operation definition.
///
/// Implement this for each query/mutation.
pub trait GraphqlOperation {
    /// Variables type.
    type Variables: Serialize + Send + Sync;
    /// Response data type.
    type ResponseData: DeserializeOwned + Send + Sync;

    /// GraphQL query text.
    const QUERY: &'static str;
    /// Operation name, echoed in the request body.
    const OPERATION_NAME: &'static str;
}

/// GraphQL request payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphqlRequest<V> {
    /// Query text.
    pub query: &'static str,
    /// Variables payload.
    pub variables: V,
    /// Operation name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<&'static str>,
}

/// GraphQL error location (1-based).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlErrorLocation {
    /// Line number in the query.
    pub line: u32,
    /// Column number in the query.
    pub column: u32,
}

/// GraphQL path segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GraphqlPathSegment {
    /// Field name.
    Key(String),
    /// Array index.
    Index(i64),
}

/// GraphQL error (per GraphQL spec).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphqlError {
    /// Human-readable error message.
    pub message: String,
    /// Location(s) within the query.
    #[serde(default)]
    pub locations: Vec<GraphqlErrorLocation>,
    /// Path within the response where the error occurred.
    #[serde(default)]
    pub path: Vec<GraphqlPathSegment>,
}

/// GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct GraphqlResponse<T> {
    /// Response data.
    #[serde(default)]
    pub data: Option<T>,
    /// GraphQL errors.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

impl<T> GraphqlResponse<T> {
    /// Returns `true` when the server reported no GraphQL errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// GraphQL client bound to one shop endpoint.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    endpoint: String,
    http: reqwest::Client,
}

impl GraphqlClient {
    /// Build a client from connector configuration.
    ///
    /// The access token is installed as a default header on every request.
    pub fn new(config: &ShopifyConfig) -> InventoryResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut token = HeaderValue::from_str(&config.access_token)
            .map_err(|_| InventoryError::NotConfigured(crate::config::ENV_ACCESS_TOKEN.into()))?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            endpoint: config.endpoint(),
            http,
        })
    }

    /// Point the client at a different endpoint (for tests).
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// The endpoint this client posts to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a typed operation and return the full response envelope.
    pub async fn execute<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> InventoryResult<GraphqlResponse<O::ResponseData>> {
        let request = GraphqlRequest {
            query: O::QUERY,
            variables,
            operation_name: Some(O::OPERATION_NAME),
        };
        debug!(operation = O::OPERATION_NAME, "sending GraphQL request");

        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        if !status.is_success() {
            return Err(InventoryError::HttpStatus {
                status,
                body: truncate_body(&bytes),
            });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Execute a typed operation and unwrap the data block.
    ///
    /// GraphQL errors and a missing `data` block are both failures here.
    pub async fn execute_strict<O: GraphqlOperation>(
        &self,
        variables: O::Variables,
    ) -> InventoryResult<O::ResponseData> {
        let response = self.execute::<O>(variables).await?;
        if !response.errors.is_empty() {
            return Err(InventoryError::Graphql(response.errors));
        }
        response
            .data
            .ok_or_else(|| InventoryError::MissingData(O::OPERATION_NAME.to_string()))
    }
}

fn truncate_body(bytes: &[u8]) -> String {
    const MAX_LEN: usize = 4096;
    let mut body = String::from_utf8_lossy(bytes).to_string();
    if body.len() > MAX_LEN {
        // Back off to a char boundary; truncating mid-character panics.
        let mut cut = MAX_LEN;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_envelope_defaults() {
        let parsed: GraphqlResponse<serde_json::Value> = serde_json::from_str("{}").unwrap();
        assert!(parsed.data.is_none());
        assert!(parsed.is_ok());
    }

    #[test]
    fn error_envelope_parses_locations_and_path() {
        let raw = r#"{
            "errors": [{
                "message": "Field 'bogus' doesn't exist",
                "locations": [{"line": 2, "column": 3}],
                "path": ["location", 0]
            }]
        }"#;
        let parsed: GraphqlResponse<serde_json::Value> = serde_json::from_str(raw).unwrap();
        assert!(!parsed.is_ok());
        let error = &parsed.errors[0];
        assert_eq!(error.locations[0].line, 2);
        assert_eq!(error.path[0], GraphqlPathSegment::Key("location".into()));
        assert_eq!(error.path[1], GraphqlPathSegment::Index(0));
    }

    #[test]
    fn oversized_body_truncates_on_char_boundary() {
        // Byte 4096 lands inside the two-byte 'é'.
        let mut raw = vec![b'a'; 4095];
        raw.extend_from_slice("équipe".as_bytes());
        let body = truncate_body(&raw);
        assert!(body.ends_with('…'));
        assert_eq!(body.chars().filter(|c| *c == 'a').count(), 4095);
        assert!(!body.contains('é'));

        let exact = vec![b'b'; 4096];
        assert_eq!(truncate_body(&exact).len(), 4096);
    }

    #[test]
    fn request_body_shape() {
        let request = GraphqlRequest {
            query: "query Q { id }",
            variables: serde_json::json!({"first": 3}),
            operation_name: Some("Q"),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["query"], "query Q { id }");
        assert_eq!(value["operationName"], "Q");
        assert_eq!(value["variables"]["first"], 3);
    }
}
