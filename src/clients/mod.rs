//! HTTP plumbing for the Admin API.
//!
//! The layering mirrors how requests flow: [`HttpRequest`] values go
//! through the retrying [`HttpClient`] and come back as [`HttpResponse`]s
//! with the Shopify headers parsed; [`RestClient`] and [`GraphqlClient`]
//! sit on top and speak the two API dialects the pipelines use.
//!
//! Every call is a blocking round trip from the pipeline's point of view:
//! the caller awaits each page fetch or mutation to completion before
//! issuing the next one.

mod errors;
mod graphql;
mod http_client;
mod http_request;
mod http_response;
mod rest;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use graphql::{GraphqlClient, GraphqlEnvelope};
pub use http_client::{HttpClient, CLIENT_VERSION, RETRY_WAIT_TIME};
pub use http_request::{HttpMethod, HttpRequest, HttpRequestBuilder};
pub use http_response::{ApiCallLimit, HttpResponse, PaginationInfo};
pub use rest::RestClient;
