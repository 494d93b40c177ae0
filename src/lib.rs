//! # Shopify Order Tagger
//!
//! Batch reconciliation jobs for a Shopify store's order tags: classify
//! each order by its shipping country against a CSV-driven mapping and
//! apply the matching tag, or bulk-remove a set of tags from every order.
//!
//! ## Overview
//!
//! The crate provides:
//! - Validated configuration from the environment via [`AppConfig`]
//! - An authenticated [`Session`] gating all remote access
//! - REST and GraphQL clients with throttle-aware retries via [`clients`]
//! - Lazy order enumeration over both pagination styles via [`orders`]
//! - The classification and tag-mutation pipelines via [`tagging`]
//!
//! ## Running a tagging pass
//!
//! ```rust,ignore
//! use order_tagger::{AppConfig, Session};
//! use order_tagger::tagging::{tag_untagged_orders, CountryMapping, TagSource};
//!
//! let config = AppConfig::from_env()?;
//! let session = Session::new(&config);
//! let source = TagSource::Categories(CountryMapping::load("00i_country_mappings.csv")?);
//!
//! let summary = tag_untagged_orders(&session, &config, &source).await?;
//! tracing::info!(?summary, "tagging run finished");
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: configuration is resolved once in `main` and
//!   passed explicitly; nothing reads the environment at import time
//! - **Fail-fast setup**: credentials and mapping files validate before
//!   the first remote call; after that, failures are isolated per order
//! - **Single-writer batch**: strictly sequential mutations, no
//!   concurrency, run-to-completion semantics

pub mod clients;
pub mod config;
pub mod error;
pub mod orders;
pub mod session;
pub mod tagging;

// Re-export the types every entry point needs at the crate root
pub use config::{AccessToken, ApiHost, ApiVersion, AppConfig, ShopDomain};
pub use error::ConfigError;
pub use session::Session;
