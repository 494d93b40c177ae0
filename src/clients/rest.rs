//! REST Admin API client.
//!
//! A thin wrapper over [`HttpClient`] for the two REST endpoints this job
//! touches: the paged order listing and the per-order update.

use std::collections::HashMap;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest, HttpResponse};
use crate::config::{ApiVersion, AppConfig};
use crate::session::Session;

/// REST API client bound to one shop and one API version.
///
/// # Example
///
/// ```rust,ignore
/// let client = RestClient::new(&session, &config);
///
/// let response = client.get("orders.json", None, 3).await?;
/// let orders = &response.body["orders"];
/// ```
#[derive(Debug)]
pub struct RestClient {
    /// The internal HTTP client.
    http_client: HttpClient,
    /// The API version being used.
    api_version: ApiVersion,
}

impl RestClient {
    /// Creates a REST client for the given session and configuration.
    #[must_use]
    pub fn new(session: &Session, config: &AppConfig) -> Self {
        let api_version = config.api_version().clone();
        let base_path = format!("/admin/api/{api_version}");
        Self {
            http_client: HttpClient::new(base_path, session, config),
            api_version,
        }
    }

    /// Returns the API version being used by this client.
    #[must_use]
    pub const fn api_version(&self) -> &ApiVersion {
        &self.api_version
    }

    /// Sends a GET request to the given resource path.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for transport-level failures, including retry
    /// exhaustion.
    pub async fn get(
        &self,
        path: &str,
        query: Option<HashMap<String, String>>,
        tries: u32,
    ) -> Result<HttpResponse, HttpError> {
        let mut builder = HttpRequest::builder(HttpMethod::Get, path).tries(tries);
        if let Some(query) = query {
            for (key, value) in query {
                builder = builder.query_param(key, value);
            }
        }
        let request = builder.build()?;
        self.http_client.request(request).await
    }

    /// Sends a PUT request with a JSON body to the given resource path.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for transport-level failures, including retry
    /// exhaustion.
    pub async fn put(
        &self,
        path: &str,
        body: serde_json::Value,
        tries: u32,
    ) -> Result<HttpResponse, HttpError> {
        let request = HttpRequest::builder(HttpMethod::Put, path)
            .body(body)
            .tries(tries)
            .build()?;
        self.http_client.request(request).await
    }
}

// Verify RestClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RestClient>();
};
