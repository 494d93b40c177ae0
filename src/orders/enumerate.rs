//! Order enumeration across page boundaries.
//!
//! Two pager strategies cover the two Admin API dialects. Both yield a
//! lazy, finite, non-restartable sequence of pages: each `next_page` call
//! is one remote round trip, and the sequence ends with `Ok(None)` once
//! the remote collection is exhausted.
//!
//! Error containment follows the batch-job contract: a malformed page is
//! logged and contributes zero orders without aborting enumeration, and a
//! transport failure ends the sequence early with whatever earlier pages
//! already produced (the caller still sees the error). Enumeration assumes
//! no concurrent remote mutation; that consistency risk is accepted, not
//! solved here.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::clients::{GraphqlClient, HttpError, RestClient};
use crate::orders::{Order, OrderNode, REMOTE_TRIES};

/// Orders requested per page, the REST/GraphQL maximum.
pub const PAGE_SIZE: u32 = 250;

/// Pages through the REST order listing via `Link`-header cursors.
///
/// The first request pins `status=any` so closed orders are included;
/// follow-up requests carry only `limit` and the `page_info` cursor, since
/// the API rejects other filters alongside a cursor.
///
/// # Example
///
/// ```rust,ignore
/// let mut pages = RestOrderPages::new(&client);
/// while let Some(orders) = pages.next_page().await? {
///     for order in orders {
///         // ...
///     }
/// }
/// ```
#[derive(Debug)]
pub struct RestOrderPages<'a> {
    client: &'a RestClient,
    next_page_info: Option<String>,
    done: bool,
}

impl<'a> RestOrderPages<'a> {
    /// Creates a pager over the entire order collection.
    #[must_use]
    pub const fn new(client: &'a RestClient) -> Self {
        Self {
            client,
            next_page_info: None,
            done: false,
        }
    }

    /// Fetches the next page of orders.
    ///
    /// Returns `Ok(None)` once the collection is exhausted. Order records
    /// that fail to deserialize are logged and skipped; a page whose
    /// envelope is malformed contributes zero orders.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure; the pager is finished
    /// afterwards.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Order>>, HttpError> {
        if self.done {
            return Ok(None);
        }

        let mut query = HashMap::new();
        query.insert("limit".to_string(), PAGE_SIZE.to_string());
        match &self.next_page_info {
            Some(page_info) => {
                query.insert("page_info".to_string(), page_info.clone());
            }
            None => {
                query.insert("status".to_string(), "any".to_string());
            }
        }

        let response = match self.client.get("orders.json", Some(query), REMOTE_TRIES).await {
            Ok(response) => response,
            Err(error) => {
                self.done = true;
                return Err(error);
            }
        };

        self.next_page_info = response.next_page_info.clone();
        self.done = self.next_page_info.is_none();

        Ok(Some(parse_order_records(&response.body)))
    }
}

/// Extracts the order records from a listing response body.
fn parse_order_records(body: &Value) -> Vec<Order> {
    let Some(records) = body.get("orders").and_then(Value::as_array) else {
        tracing::warn!("order page response is missing the 'orders' array, dropping the page");
        return Vec::new();
    };

    records
        .iter()
        .filter_map(|record| match serde_json::from_value(record.clone()) {
            Ok(order) => Some(order),
            Err(error) => {
                tracing::warn!(%error, "skipping order record that failed to deserialize");
                None
            }
        })
        .collect()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OrdersConnection {
    edges: Vec<OrderEdge>,
    page_info: PageInfo,
}

#[derive(Debug, Deserialize)]
struct OrderEdge {
    node: OrderNode,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

/// Pages through all orders via the GraphQL `orders` connection.
///
/// Carries `endCursor` forward while `pageInfo.hasNextPage` holds. A
/// malformed response (GraphQL errors or missing fields) logs a warning
/// and ends the sequence, returning whatever earlier pages produced,
/// rather than failing the run.
#[derive(Debug)]
pub struct GraphqlOrderPages<'a> {
    client: &'a GraphqlClient,
    cursor: Option<String>,
    done: bool,
}

impl<'a> GraphqlOrderPages<'a> {
    /// Creates a pager over the entire order collection.
    #[must_use]
    pub const fn new(client: &'a GraphqlClient) -> Self {
        Self {
            client,
            cursor: None,
            done: false,
        }
    }

    fn orders_query() -> String {
        format!(
            "query($cursor: String) {{ orders(first: {PAGE_SIZE}, after: $cursor) {{ \
             edges {{ node {{ id tags }} }} \
             pageInfo {{ hasNextPage endCursor }} }} }}"
        )
    }

    /// Fetches the next page of order nodes.
    ///
    /// Returns `Ok(None)` once the collection is exhausted or after a
    /// malformed response ended enumeration early.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] on transport failure; the pager is finished
    /// afterwards.
    pub async fn next_page(&mut self) -> Result<Option<Vec<OrderNode>>, HttpError> {
        if self.done {
            return Ok(None);
        }

        let variables = serde_json::json!({ "cursor": self.cursor });
        let envelope = match self
            .client
            .query(&Self::orders_query(), Some(variables), REMOTE_TRIES)
            .await
        {
            Ok(envelope) => envelope,
            Err(error) => {
                self.done = true;
                return Err(error);
            }
        };

        if envelope.has_errors() {
            tracing::warn!(
                errors = %serde_json::Value::Array(envelope.errors),
                "GraphQL errors while listing orders, ending enumeration early"
            );
            self.done = true;
            return Ok(None);
        }

        let connection = envelope
            .data
            .get("orders")
            .cloned()
            .map(serde_json::from_value::<OrdersConnection>);
        let connection = match connection {
            Some(Ok(connection)) => connection,
            _ => {
                tracing::warn!("malformed orders page, ending enumeration early");
                self.done = true;
                return Ok(None);
            }
        };

        if connection.page_info.has_next_page {
            match connection.page_info.end_cursor {
                Some(cursor) => self.cursor = Some(cursor),
                None => {
                    tracing::warn!(
                        "orders page claims a next page but carries no cursor, ending enumeration"
                    );
                    self.done = true;
                }
            }
        } else {
            self.done = true;
        }

        Ok(Some(
            connection.edges.into_iter().map(|edge| edge.node).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_order_records_reads_well_formed_page() {
        let body = json!({
            "orders": [
                {"id": 1, "tags": "vip"},
                {"id": 2, "tags": "", "shipping_address": {"country_code": "SE"}},
            ]
        });
        let orders = parse_order_records(&body);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, Some(1));
        assert_eq!(orders[1].country_code(), Some("SE"));
    }

    #[test]
    fn parse_order_records_drops_malformed_envelope() {
        let body = json!({"not_orders": []});
        assert!(parse_order_records(&body).is_empty());

        let body = json!({"orders": "not-an-array"});
        assert!(parse_order_records(&body).is_empty());
    }

    #[test]
    fn parse_order_records_skips_bad_records_keeps_rest() {
        let body = json!({
            "orders": [
                {"id": 1},
                {"id": "not-a-number"},
                {"id": 3},
            ]
        });
        let orders = parse_order_records(&body);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].id, Some(1));
        assert_eq!(orders[1].id, Some(3));
    }

    #[test]
    fn graphql_query_embeds_page_size() {
        let query = GraphqlOrderPages::orders_query();
        assert!(query.contains("first: 250"));
        assert!(query.contains("hasNextPage"));
        assert!(query.contains("endCursor"));
    }
}
