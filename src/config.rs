//! # Client Configuration
//!
//! Configuration for the Printavo API client. Credentials and the API base
//! URL come from the environment, read once at process start — there is no
//! file layer and no hot reload.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PrintavoError, PrintavoResult};

/// Default Printavo API endpoint (GraphQL v2)
pub const DEFAULT_API_URL: &str = "https://www.printavo.com/api/v2";

/// Client configuration for the Printavo API
///
/// # Examples
///
/// ```rust
/// use printavo_core::config::PrintavoConfig;
///
/// let config = PrintavoConfig::default();
/// assert_eq!(config.api_url, "https://www.printavo.com/api/v2");
/// assert_eq!(config.timeout_ms, 30000);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintavoConfig {
    /// Base URL for the API (the `/graphql` path is appended per request)
    pub api_url: String,
    /// Account email, sent as the `email` header
    pub email: String,
    /// API token, sent as the `token` header
    pub token: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// Default cache TTL in milliseconds (5 minutes)
    pub default_cache_ttl_ms: u64,
}

impl Default for PrintavoConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            email: String::new(),
            token: String::new(),
            timeout_ms: 30000,
            default_cache_ttl_ms: 5 * 60 * 1000,
        }
    }
}

impl PrintavoConfig {
    /// Load configuration from environment variables
    ///
    /// Reads `PRINTAVO_API_URL`, `PRINTAVO_EMAIL`, and `PRINTAVO_TOKEN`,
    /// falling back to defaults where a variable is unset. Fails with a
    /// `Config` error when credentials are missing.
    pub fn from_env() -> PrintavoResult<Self> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("PRINTAVO_API_URL") {
            config.api_url = url;
        }
        if let Ok(email) = std::env::var("PRINTAVO_EMAIL") {
            config.email = email;
        }
        if let Ok(token) = std::env::var("PRINTAVO_TOKEN") {
            config.token = token;
        }
        if let Ok(timeout) = std::env::var("PRINTAVO_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                config.timeout_ms = timeout_ms;
            }
        }

        config.validate()?;
        debug!(api_url = %config.api_url, "Loaded Printavo client configuration");
        Ok(config)
    }

    /// Validate credentials are present
    pub fn validate(&self) -> PrintavoResult<()> {
        if self.email.is_empty() || self.token.is_empty() {
            return Err(PrintavoError::config_error(
                "Printavo credentials not set: PRINTAVO_EMAIL and PRINTAVO_TOKEN are required",
            ));
        }
        Ok(())
    }

    /// The GraphQL endpoint with a guaranteed scheme.
    ///
    /// The upstream docs show the base URL without a scheme in places, so a
    /// bare host is accepted and promoted to https.
    #[must_use]
    pub fn graphql_endpoint(&self) -> String {
        let base = if self.api_url.starts_with("http") {
            self.api_url.clone()
        } else {
            format!("https://{}", self.api_url)
        };
        format!("{}/graphql", base.trim_end_matches('/'))
    }
}
