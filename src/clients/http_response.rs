//! HTTP response type with Shopify header parsing.
//!
//! Besides the status code and JSON body, a response carries the parsed
//! values of the Shopify-specific headers this job cares about: `Link`
//! cursor pagination, the API call-limit bucket, and `Retry-After`.

use std::collections::HashMap;

/// Rate limit information from the `X-Shopify-Shop-Api-Call-Limit` header.
///
/// The header format is `X/Y`: X requests used out of a bucket of Y.
///
/// # Example
///
/// ```rust
/// use order_tagger::clients::ApiCallLimit;
///
/// let limit = ApiCallLimit::parse("39/40").unwrap();
/// assert_eq!(limit.request_count, 39);
/// assert_eq!(limit.bucket_size, 40);
/// assert!(limit.is_nearly_exhausted());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ApiCallLimit {
    /// The current number of requests counted in this bucket.
    pub request_count: u32,
    /// The maximum number of requests allowed in this bucket.
    pub bucket_size: u32,
}

impl ApiCallLimit {
    /// Parses the rate limit header value, `None` if it is malformed.
    #[must_use]
    pub fn parse(header_value: &str) -> Option<Self> {
        let (count, size) = header_value.split_once('/')?;
        Some(Self {
            request_count: count.parse().ok()?,
            bucket_size: size.parse().ok()?,
        })
    }

    /// Returns `true` when 90% or more of the bucket is used.
    #[must_use]
    pub const fn is_nearly_exhausted(&self) -> bool {
        self.request_count * 10 >= self.bucket_size * 9
    }
}

/// Pagination information parsed from the `Link` response header.
///
/// The REST Admin API paginates with opaque `page_info` cursors embedded in
/// `Link` header URLs, each valid only for the immediately following
/// request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationInfo {
    /// The `page_info` cursor for the previous page, if any.
    pub prev_page_info: Option<String>,
    /// The `page_info` cursor for the next page, if any.
    pub next_page_info: Option<String>,
}

impl PaginationInfo {
    /// Parses a `Link` header value of the form
    /// `<url>; rel="previous", <url>; rel="next"`.
    #[must_use]
    pub fn parse_link_header(header_value: &str) -> Self {
        let mut result = Self::default();

        for link in header_value.split(',') {
            let link = link.trim();

            let rel = link.split(';').find_map(|part| {
                part.trim()
                    .strip_prefix("rel=")
                    .map(|r| r.trim_matches('"'))
            });

            let url = link
                .split(';')
                .next()
                .map(|s| s.trim().trim_start_matches('<').trim_end_matches('>'));

            if let (Some(rel), Some(url)) = (rel, url) {
                if let Some(page_info) = Self::extract_page_info(url) {
                    match rel {
                        "previous" => result.prev_page_info = Some(page_info),
                        "next" => result.next_page_info = Some(page_info),
                        _ => {}
                    }
                }
            }
        }

        result
    }

    /// Extracts the `page_info` query parameter from a URL.
    fn extract_page_info(url: &str) -> Option<String> {
        let (_, query) = url.split_once('?')?;
        for param in query.split('&') {
            if let Some((key, value)) = param.split_once('=') {
                if key == "page_info" {
                    return Some(value.to_string());
                }
            }
        }
        None
    }
}

/// An HTTP response from the Admin API.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers (a header may have multiple values).
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON response body.
    pub body: serde_json::Value,
    /// `page_info` cursor for the previous page (from the `Link` header).
    pub prev_page_info: Option<String>,
    /// `page_info` cursor for the next page (from the `Link` header).
    pub next_page_info: Option<String>,
    /// Rate limit bucket state, when reported.
    pub api_call_limit: Option<ApiCallLimit>,
    /// Seconds to wait before retrying (from the `Retry-After` header).
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a response, parsing the Shopify-specific headers.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let (prev_page_info, next_page_info) = headers
            .get("link")
            .and_then(|values| values.first())
            .map_or((None, None), |link| {
                let info = PaginationInfo::parse_link_header(link);
                (info.prev_page_info, info.next_page_info)
            });

        let api_call_limit = headers
            .get("x-shopify-shop-api-call-limit")
            .and_then(|values| values.first())
            .and_then(|value| ApiCallLimit::parse(value));

        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            prev_page_info,
            next_page_info,
            api_call_limit,
            retry_request_after,
        }
    }

    /// Returns `true` if the status code is in the 2xx range.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.headers
            .get("x-request-id")
            .and_then(|values| values.first())
            .map(String::as_str)
    }
}
