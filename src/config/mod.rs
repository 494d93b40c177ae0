//! Job configuration.
//!
//! Configuration is instance-based and passed explicitly: the binaries
//! resolve an [`AppConfig`] once in `main` and hand it down, so nothing in
//! the library reads process-wide state at import time.
//!
//! # Environment surface
//!
//! | Variable | Meaning |
//! |---|---|
//! | `TOKEN` | Admin API access token (required) |
//! | `MERCHANT` | Shop subdomain, e.g. `my-store` (required) |
//! | `API_HOST` | Optional base-URL override, used by the integration tests |

mod newtypes;
mod version;

pub use newtypes::{AccessToken, ApiHost, ShopDomain};
pub use version::ApiVersion;

use crate::error::ConfigError;

/// Resolved configuration for one pipeline run.
///
/// # Example
///
/// ```rust
/// use order_tagger::{AccessToken, AppConfig, ShopDomain};
///
/// let config = AppConfig::new(
///     ShopDomain::new("my-store").unwrap(),
///     AccessToken::new("shpat_example").unwrap(),
/// );
/// assert_eq!(config.base_uri(), "https://my-store.myshopify.com");
/// ```
#[derive(Clone, Debug)]
pub struct AppConfig {
    shop: ShopDomain,
    access_token: AccessToken,
    api_version: ApiVersion,
    api_host: Option<ApiHost>,
}

impl AppConfig {
    /// Creates a configuration with the pinned default API version.
    #[must_use]
    pub fn new(shop: ShopDomain, access_token: AccessToken) -> Self {
        Self {
            shop,
            access_token,
            api_version: ApiVersion::default(),
            api_host: None,
        }
    }

    /// Resolves configuration from the process environment.
    ///
    /// Reads `TOKEN` and `MERCHANT` (required) and `API_HOST` (optional).
    /// The caller is expected to have loaded the `.env` file beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required value is missing or any value
    /// fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("TOKEN").ok(),
            std::env::var("MERCHANT").ok(),
            std::env::var("API_HOST").ok(),
        )
    }

    /// Builds a configuration from already-read environment values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a required value is missing or invalid.
    pub fn from_values(
        token: Option<String>,
        merchant: Option<String>,
        api_host: Option<String>,
    ) -> Result<Self, ConfigError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::MissingEnvVar { name: "TOKEN" })?;
        let merchant = merchant
            .filter(|m| !m.is_empty())
            .ok_or(ConfigError::MissingEnvVar { name: "MERCHANT" })?;

        let mut config = Self::new(ShopDomain::new(merchant)?, AccessToken::new(token)?);
        if let Some(host) = api_host {
            config.api_host = Some(ApiHost::new(host)?);
        }
        Ok(config)
    }

    /// Overrides the API version.
    #[must_use]
    pub fn with_api_version(mut self, version: ApiVersion) -> Self {
        self.api_version = version;
        self
    }

    /// Overrides the base URI, redirecting all requests to `host`.
    #[must_use]
    pub fn with_api_host(mut self, host: ApiHost) -> Self {
        self.api_host = Some(host);
        self
    }

    /// Returns the shop this configuration is bound to.
    #[must_use]
    pub const fn shop(&self) -> &ShopDomain {
        &self.shop
    }

    /// Returns the access token.
    #[must_use]
    pub const fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Returns the pinned API version.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Returns the API host override, if configured.
    #[must_use]
    pub const fn api_host(&self) -> Option<&ApiHost> {
        self.api_host.as_ref()
    }

    /// Returns the base URI every request is made against.
    ///
    /// This is the API host override when set, otherwise the shop domain
    /// over HTTPS.
    #[must_use]
    pub fn base_uri(&self) -> String {
        self.api_host.as_ref().map_or_else(
            || format!("https://{}", self.shop.as_ref()),
            |host| host.as_ref().to_string(),
        )
    }
}
