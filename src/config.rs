//! Connector configuration.
//!
//! Credentials live in an explicit struct handed to the client constructor,
//! so tests can point a client at a fake endpoint with fake credentials.
//! [`ShopifyConfig::from_env`] is a convenience for the demo binary only.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{InventoryError, InventoryResult};

/// Admin API version used when none is configured.
pub const DEFAULT_API_VERSION: &str = "2024-07";

/// Environment variable holding the shop domain.
pub const ENV_SHOP_DOMAIN: &str = "SHOPIFY_SHOP_DOMAIN";
/// Environment variable holding the Admin API access token.
pub const ENV_ACCESS_TOKEN: &str = "SHOPIFY_ACCESS_TOKEN";
/// Environment variable overriding the Admin API version.
pub const ENV_API_VERSION: &str = "SHOPIFY_API_VERSION";

/// Configuration for the Shopify inventory connector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopifyConfig {
    /// Shop domain, e.g. `my-store.myshopify.com`.
    pub shop_domain: String,

    /// Admin API access token (sent as `X-Shopify-Access-Token`).
    pub access_token: String,

    /// Admin API version path segment.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Request timeout.
    #[serde(default = "default_timeout", with = "duration_secs")]
    pub timeout: Duration,
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.into()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl ShopifyConfig {
    /// Create a configuration with the default API version and timeout.
    #[must_use]
    pub fn new(shop_domain: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            shop_domain: shop_domain.into(),
            access_token: access_token.into(),
            api_version: default_api_version(),
            timeout: default_timeout(),
        }
    }

    /// Override the API version.
    #[must_use]
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from the process environment.
    ///
    /// `SHOPIFY_SHOP_DOMAIN` and `SHOPIFY_ACCESS_TOKEN` are required;
    /// `SHOPIFY_API_VERSION` falls back to [`DEFAULT_API_VERSION`].
    pub fn from_env() -> InventoryResult<Self> {
        let shop_domain = require_env(ENV_SHOP_DOMAIN)?;
        let access_token = require_env(ENV_ACCESS_TOKEN)?;
        let api_version =
            std::env::var(ENV_API_VERSION).unwrap_or_else(|_| default_api_version());
        Ok(Self {
            shop_domain,
            access_token,
            api_version,
            timeout: default_timeout(),
        })
    }

    /// The GraphQL endpoint URL for this shop and API version.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.shop_domain, self.api_version
        )
    }
}

fn require_env(name: &'static str) -> InventoryResult<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| InventoryError::NotConfigured(name.to_string()))
}
