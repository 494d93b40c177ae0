//! The two batch pipelines.
//!
//! Both are strictly sequential reconciliation loops: enumerate, then one
//! remote write at a time, with per-order failure isolation. One bad
//! order is logged and skipped, never allowed to block the rest of the
//! batch. The only fatal condition is an inactive session, checked before
//! any remote call is issued.

use thiserror::Error;

use crate::clients::{GraphqlClient, RestClient};
use crate::config::AppConfig;
use crate::orders::{
    add_tag, remove_tags, GraphqlOrderPages, MutationError, Order, OrderNode, RestOrderPages,
};
use crate::session::Session;
use crate::tagging::{classify, classify_by_name, is_untagged, CountryMapping, CountryNames, TagDecision};

/// Fatal pipeline setup errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PipelineError {
    /// The session cannot authenticate; no orders will be read or mutated.
    #[error("session is not active, refusing to enumerate or mutate orders")]
    SessionInactive,
}

/// Where the tag for an order comes from.
///
/// One pipeline, two mapping variants: the category mapping applies the
/// fixed `to_customer`/`to_dragon` tags, the names table applies the
/// shipping country's display name.
#[derive(Clone, Debug)]
pub enum TagSource {
    /// Classify into the two fixed categories.
    Categories(CountryMapping),
    /// Tag with the country's display name.
    Names(CountryNames),
}

impl TagSource {
    /// Decides the tag for one order.
    #[must_use]
    pub fn decide(&self, order: &Order) -> TagDecision {
        match self {
            Self::Categories(mapping) => classify(order, mapping),
            Self::Names(names) => classify_by_name(order, names),
        }
    }
}

/// Per-run tally of outcomes.
///
/// `updated` orders got a tag change written, `skipped` were left alone
/// (unclassified), `failed` hit a per-order error. Failures never abort
/// the run, so all three can be non-zero at once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Orders whose tags were written.
    pub updated: u32,
    /// Orders deliberately left untouched.
    pub skipped: u32,
    /// Orders that hit an error and were passed over.
    pub failed: u32,
}

/// Tags every untagged order according to `source`.
///
/// Enumerates the whole order collection through the REST pager, keeping
/// only orders that carry neither classification tag (filtered per page),
/// then applies one tag per qualifying order. Classification outcomes and
/// per-order failures are logged with the order id and tallied; an
/// enumeration failure ends collection early and the orders gathered so
/// far are still processed.
///
/// # Errors
///
/// Returns [`PipelineError::SessionInactive`] before any remote call if
/// the session cannot authenticate.
pub async fn tag_untagged_orders(
    session: &Session,
    config: &AppConfig,
    source: &TagSource,
) -> Result<RunSummary, PipelineError> {
    if !session.is_active() {
        return Err(PipelineError::SessionInactive);
    }

    let client = RestClient::new(session, config);
    let untagged = collect_untagged_orders(&client).await;
    tracing::info!(count = untagged.len(), "collected untagged orders");

    let mut summary = RunSummary::default();
    for order in &untagged {
        match source.decide(order) {
            TagDecision::Unclassified(reason) => {
                summary.skipped += 1;
                tracing::info!(order_id = ?order.id, %reason, "order left untagged");
            }
            decision => {
                // tag() is Some for every decision but Unclassified
                let Some(tag) = decision.tag() else { continue };
                match add_tag(&client, order, tag).await {
                    Ok(tags) => {
                        summary.updated += 1;
                        tracing::info!(order_id = ?order.id, tag, tags = %tags, "tagged order");
                    }
                    Err(error) => {
                        summary.failed += 1;
                        tracing::error!(order_id = ?order.id, %error, "failed to tag order");
                    }
                }
            }
        }
    }

    Ok(summary)
}

/// Collects untagged orders across all pages, filtering per page.
async fn collect_untagged_orders(client: &RestClient) -> Vec<Order> {
    let mut pages = RestOrderPages::new(client);
    let mut untagged = Vec::new();

    loop {
        match pages.next_page().await {
            Ok(Some(orders)) => {
                let page_total = orders.len();
                let mut kept: Vec<Order> = orders.into_iter().filter(is_untagged).collect();
                tracing::debug!(page_total, kept = kept.len(), "filtered order page");
                untagged.append(&mut kept);
            }
            Ok(None) => break,
            Err(error) => {
                tracing::error!(
                    %error,
                    "order enumeration stopped early, continuing with orders collected so far"
                );
                break;
            }
        }
    }

    untagged
}

/// Removes the given tags from every order in the store.
///
/// Enumerates all orders through the GraphQL cursor pager (no tag-based
/// pre-filter, unlike the tagging pipeline), then runs one
/// read-modify-write removal per order.
/// `userErrors` are logged distinctly from transport failures; both count
/// as that order's failure and neither aborts the batch.
///
/// # Errors
///
/// Returns [`PipelineError::SessionInactive`] before any remote call if
/// the session cannot authenticate.
pub async fn remove_tags_from_all_orders(
    session: &Session,
    config: &AppConfig,
    tags_to_remove: &[String],
) -> Result<RunSummary, PipelineError> {
    if !session.is_active() {
        return Err(PipelineError::SessionInactive);
    }

    let client = GraphqlClient::new(session, config);
    let orders = collect_all_order_nodes(&client).await;
    tracing::info!(count = orders.len(), ?tags_to_remove, "collected orders for tag removal");

    let mut summary = RunSummary::default();
    for order in &orders {
        match remove_tags(&client, &order.id, tags_to_remove).await {
            Ok(tags) => {
                summary.updated += 1;
                tracing::info!(order_id = %order.id, ?tags, "updated order tags");
            }
            Err(MutationError::UserErrors { errors }) => {
                summary.failed += 1;
                let rejections: Vec<String> = errors.iter().map(ToString::to_string).collect();
                tracing::warn!(order_id = %order.id, ?rejections, "mutation rejected by user errors");
            }
            Err(error) => {
                summary.failed += 1;
                tracing::error!(order_id = %order.id, %error, "failed to remove tags from order");
            }
        }
    }

    Ok(summary)
}

/// Collects every order node across all cursor pages.
async fn collect_all_order_nodes(client: &GraphqlClient) -> Vec<OrderNode> {
    let mut pages = GraphqlOrderPages::new(client);
    let mut orders = Vec::new();

    loop {
        match pages.next_page().await {
            Ok(Some(mut page)) => orders.append(&mut page),
            Ok(None) => break,
            Err(error) => {
                tracing::error!(
                    %error,
                    "order enumeration stopped early, continuing with orders collected so far"
                );
                break;
            }
        }
    }

    orders
}
