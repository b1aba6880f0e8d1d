//! Error types for the Shopify inventory connector.

use reqwest::StatusCode;
use thiserror::Error;

use crate::graphql::GraphqlError;

/// Result type for connector operations.
pub type InventoryResult<T> = Result<T, InventoryError>;

/// Connector error taxonomy.
///
/// Transport failures, non-2xx statuses, and malformed JSON are terminal for
/// the one operation that hit them; there is no retry policy anywhere.
/// Server-side validation failures on mutations are not errors at this level:
/// they surface as an unsuccessful [`crate::types::AdjustmentOutcome`].
#[derive(Debug, Error)]
pub enum InventoryError {
    /// HTTP/network error (DNS, connect, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx HTTP response.
    #[error("HTTP status {status} with body: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: StatusCode,
        /// Response body, truncated if oversized.
        body: String,
    },

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// GraphQL-level errors returned by the server.
    #[error("GraphQL errors: {0:?}")]
    Graphql(Vec<GraphqlError>),

    /// An expected block was absent from the response data.
    #[error("missing data in GraphQL response: {0}")]
    MissingData(String),

    /// Required configuration value is absent or unusable.
    #[error("missing configuration: {0}")]
    NotConfigured(String),
}

impl InventoryError {
    /// Returns `true` for transport-level failures (as opposed to
    /// application-level or shape errors).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::HttpStatus { .. })
    }
}
