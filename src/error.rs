//! Error types for configuration and credential validation.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! bad environment is rejected before any remote call is made. Error
//! messages are designed to be clear and actionable.

use thiserror::Error;

/// Errors that can occur while resolving the job configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment value was not set.
    #[error("Missing environment value '{name}'. Set it in the environment or in the .env file.")]
    MissingEnvVar {
        /// The name of the missing environment value.
        name: &'static str,
    },

    /// The access token is empty.
    #[error("Access token cannot be empty. Please provide a valid Admin API access token.")]
    EmptyAccessToken,

    /// The shop domain is invalid.
    #[error("Invalid shop domain '{domain}'. Expected format: 'shop-name' or 'shop-name.myshopify.com'.")]
    InvalidShopDomain {
        /// The invalid domain that was provided.
        domain: String,
    },

    /// The API version string is invalid.
    #[error("Invalid API version '{version}'. Expected format: 'YYYY-MM' (e.g., '2024-07') or 'unstable'.")]
    InvalidApiVersion {
        /// The invalid version string that was provided.
        version: String,
    },

    /// The API host override is invalid.
    #[error("Invalid API host '{url}'. Please provide a valid URL with scheme (e.g., 'https://127.0.0.1:8080').")]
    InvalidApiHost {
        /// The invalid URL that was provided.
        url: String,
    },
}
