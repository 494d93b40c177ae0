//! Error types for HTTP transport operations.
//!
//! Everything here is a *transport-level* failure: non-2xx responses, retry
//! exhaustion, request validation, and network errors. Business-rule
//! rejections that Shopify returns inside a 200 response (GraphQL
//! `userErrors`) are not represented here; they live in
//! [`crate::orders::MutationError`] and must never be conflated with a
//! transport failure.

use thiserror::Error;

/// Error returned when a request receives a non-successful response.
///
/// The message carries the serialized `errors`/`error` fields of the
/// response body, plus the request id reference when the API provided one.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when retry attempts have been exhausted.
///
/// Raised when a request keeps failing with 429 or 500 after all configured
/// tries.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the `X-Request-Id` header).
    pub error_reference: Option<String>,
}

/// Error returned when a request fails validation before being sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// A POST or PUT request was built without a body.
    #[error("Cannot use {method} without specifying data.")]
    MissingBody {
        /// The HTTP method that requires a body.
        method: String,
    },
}

/// Unified error type for all transport-level failures.
///
/// # Example
///
/// ```rust,ignore
/// match client.request(request).await {
///     Ok(response) => { /* handle success */ }
///     Err(HttpError::Response(e)) => eprintln!("API error {}: {}", e.code, e.message),
///     Err(HttpError::MaxRetries(e)) => eprintln!("gave up after {} tries", e.tries),
///     Err(HttpError::InvalidRequest(e)) => eprintln!("bad request: {e}"),
///     Err(HttpError::Network(e)) => eprintln!("network error: {e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum HttpError {
    /// An HTTP response error (non-2xx status code).
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_error_displays_message() {
        let error = HttpResponseError {
            code: 404,
            message: r#"{"errors":"Not Found"}"#.to_string(),
            error_reference: None,
        };
        assert_eq!(error.to_string(), r#"{"errors":"Not Found"}"#);
    }

    #[test]
    fn max_retries_error_includes_retry_count() {
        let error = MaxHttpRetriesExceededError {
            code: 429,
            tries: 3,
            message: r#"{"errors":"Throttled"}"#.to_string(),
            error_reference: None,
        };
        let message = error.to_string();
        assert!(message.contains("Exceeded maximum retry count of 3"));
        assert!(message.contains("Throttled"));
    }

    #[test]
    fn invalid_request_error_names_the_method() {
        let error = InvalidHttpRequestError::MissingBody {
            method: "put".to_string(),
        };
        assert_eq!(error.to_string(), "Cannot use put without specifying data.");
    }

    #[test]
    fn error_types_implement_std_error() {
        let error: &dyn std::error::Error = &HttpError::Response(HttpResponseError {
            code: 400,
            message: "test".to_string(),
            error_reference: None,
        });
        let _ = error;
    }
}
