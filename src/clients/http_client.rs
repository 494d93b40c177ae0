//! Authenticated HTTP client with retry handling.
//!
//! Wraps `reqwest` with the headers the Admin API expects and a bounded
//! retry loop for throttling (429) and server errors (500), with
//! exponential backoff. Retries only ever apply to transport-level
//! failures; a 2xx response is final even when its body carries
//! business-rule errors.

use std::collections::HashMap;

use crate::clients::errors::{HttpError, HttpResponseError, MaxHttpRetriesExceededError};
use crate::clients::http_request::{HttpMethod, HttpRequest};
use crate::clients::http_response::HttpResponse;
use crate::config::AppConfig;
use crate::session::Session;

/// Base retry wait in seconds; doubles with each failed attempt.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Crate version, sent in the User-Agent header.
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client bound to one shop and one API version.
///
/// Handles base URI construction (shop domain or the configured API host
/// override), default headers including the access token, and the retry
/// loop.
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`.
#[derive(Debug)]
pub struct HttpClient {
    /// The internal reqwest client.
    client: reqwest::Client,
    /// Base URI, e.g. `https://my-store.myshopify.com`.
    base_uri: String,
    /// Versioned base path, e.g. `/admin/api/2024-07`.
    base_path: String,
    /// Default headers included in every request.
    default_headers: HashMap<String, String>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a client for the given session and configuration.
    ///
    /// # Panics
    ///
    /// Panics if the underlying reqwest client cannot be created (TLS
    /// initialization failure).
    #[must_use]
    pub fn new(base_path: impl Into<String>, session: &Session, config: &AppConfig) -> Self {
        let base_path = base_path.into();
        let base_uri = config.base_uri();

        let user_agent = format!("shopify-order-tagger v{CLIENT_VERSION} | Rust");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        // Preserve the shop identity when requests are redirected to an
        // API host override
        if config.api_host().is_some() {
            default_headers.insert("Host".to_string(), session.shop.as_ref().to_string());
        }

        if !session.access_token.is_empty() {
            default_headers.insert(
                "X-Shopify-Access-Token".to_string(),
                session.access_token.clone(),
            );
        }

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_uri,
            base_path,
            default_headers,
        }
    }

    /// Returns the base URI for this client.
    #[must_use]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Returns the versioned base path for this client.
    #[must_use]
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Sends a request, retrying 429 and 500 responses up to
    /// `request.tries` attempts.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - request validation fails (`InvalidRequest`)
    /// - a network error occurs (`Network`)
    /// - a non-retriable non-2xx response is received (`Response`)
    /// - retries are exhausted (`MaxRetries`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let url = format!("{}{}/{}", self.base_uri, self.base_path, request.path);

        let mut headers = self.default_headers.clone();
        if request.body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = match request.http_method {
                HttpMethod::Get => self.client.get(&url),
                HttpMethod::Post => self.client.post(&url),
                HttpMethod::Put => self.client.put(&url),
            };

            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }

            if let Some(query) = &request.query {
                req_builder = req_builder.query(query);
            }

            if let Some(body) = &request.body {
                req_builder = req_builder.body(body.to_string());
            }

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();

            let body = if body_text.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text).unwrap_or_else(|_| {
                    if code >= 500 {
                        serde_json::json!({ "raw_body": body_text })
                    } else {
                        serde_json::json!({})
                    }
                })
            };

            let response = HttpResponse::new(code, res_headers, body);

            if let Some(limit) = response.api_call_limit {
                if limit.is_nearly_exhausted() {
                    tracing::debug!(
                        used = limit.request_count,
                        bucket = limit.bucket_size,
                        "API call limit nearly exhausted"
                    );
                }
            }

            if response.is_ok() {
                return Ok(response);
            }

            let error_message = Self::serialize_error(&response);

            let should_retry = code == 429 || code == 500;
            if !should_retry {
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message: error_message,
                    error_reference: response.request_id().map(String::from),
                }));
            }

            if tries >= request.tries {
                if request.tries == 1 {
                    return Err(HttpError::Response(HttpResponseError {
                        code,
                        message: error_message,
                        error_reference: response.request_id().map(String::from),
                    }));
                }
                return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                    code,
                    tries: request.tries,
                    message: error_message,
                    error_reference: response.request_id().map(String::from),
                }));
            }

            let delay = Self::retry_delay(&response, code, tries);
            tracing::debug!(
                code,
                attempt = tries,
                delay_secs = delay.as_secs_f64(),
                "retrying request to {}",
                request.path
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Parses response headers into a map, lowercasing the names.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Backoff before the next attempt.
    ///
    /// Honors `Retry-After` on 429 when the server provides one, otherwise
    /// doubles the base wait with each failed attempt.
    fn retry_delay(response: &HttpResponse, status: u16, attempt: u32) -> std::time::Duration {
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                return std::time::Duration::from_secs_f64(retry_after);
            }
        }
        let exponent = attempt.saturating_sub(1).min(6);
        std::time::Duration::from_secs(RETRY_WAIT_TIME << exponent)
    }

    /// Serializes the error fields of a failed response to a JSON string.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        if let Some(errors) = response.body.get("errors") {
            error_body.insert("errors".to_string(), errors.clone());
        }
        if let Some(error) = response.body.get("error") {
            error_body.insert("error".to_string(), error.clone());
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}
