//! GraphQL Admin API client.
//!
//! Executes queries and mutations against the `graphql.json` endpoint and
//! splits each 200 response into its `data` and top-level `errors` parts.
//! Business-rule `userErrors` inside mutation payloads are left to the
//! caller; they belong to the operation, not the transport.

use serde::Deserialize;

use crate::clients::{HttpClient, HttpError, HttpMethod, HttpRequest};
use crate::config::{ApiVersion, AppConfig};
use crate::session::Session;

/// The `data`/`errors` envelope of a GraphQL response.
///
/// A populated `errors` list means the query itself was rejected (syntax,
/// access, throttling at the GraphQL layer); `data` may still be partially
/// present.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct GraphqlEnvelope {
    /// The `data` payload; `Null` when the query produced none.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Top-level GraphQL errors, empty on success.
    #[serde(default)]
    pub errors: Vec<serde_json::Value>,
}

impl GraphqlEnvelope {
    /// Returns `true` if the response carried top-level GraphQL errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// GraphQL API client bound to one shop and one API version.
///
/// # Example
///
/// ```rust,ignore
/// use serde_json::json;
///
/// let client = GraphqlClient::new(&session, &config);
/// let envelope = client
///     .query(
///         "query($id: ID!) { order(id: $id) { id tags } }",
///         Some(json!({"id": "gid://shopify/Order/1"})),
///         3,
///     )
///     .await?;
/// let tags = &envelope.data["order"]["tags"];
/// ```
#[derive(Debug)]
pub struct GraphqlClient {
    /// The internal HTTP client.
    http_client: HttpClient,
    /// The API version being used.
    api_version: ApiVersion,
}

impl GraphqlClient {
    /// Creates a GraphQL client for the given session and configuration.
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

    /// Executes a GraphQL query or mutation.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] for transport-level failures (network errors,
    /// non-2xx responses, retry exhaustion). GraphQL-level errors come back
    /// inside the envelope.
    pub async fn query(
        &self,
        query: &str,
        variables: Option<serde_json::Value>,
        tries: u32,
    ) -> Result<GraphqlEnvelope, HttpError> {
        let body = serde_json::json!({
            "query": query,
            "variables": variables,
        });

        let request = HttpRequest::builder(HttpMethod::Post, "graphql.json")
            .body(body)
            .tries(tries)
            .build()?;

        let response = self.http_client.request(request).await?;
        let envelope =
            serde_json::from_value(response.body).unwrap_or_default();
        Ok(envelope)
    }
}

// Verify GraphqlClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<GraphqlClient>();
};
