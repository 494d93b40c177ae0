//! Idempotence-adjacent tag mutations.
//!
//! The add path goes through REST (read the comma-joined field, append,
//! write back); the remove path goes through GraphQL (read the current
//! list, submit the full replacement list via `orderUpdate`).
//!
//! The remove path is a read-then-overwrite: the mutation accepts only a
//! complete replacement tag list, so a tag added by another actor between
//! the read and the write is lost. The remote API offers no delta mutation
//! or optimistic-concurrency token on `orderUpdate`, so that race window
//! remains; runs should not overlap other tag writers.

use std::fmt;

use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::clients::{GraphqlClient, HttpError, RestClient};
use crate::orders::{Order, TagSet, REMOTE_TRIES};

/// A business-rule rejection from a GraphQL mutation payload.
///
/// Returned inside a 200 response, these are deterministic rejections of
/// the submitted input. They are reported separately from transport
/// failures and never retried.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct UserError {
    /// Path to the input field the error refers to, when given.
    #[serde(default)]
    pub field: Option<Vec<String>>,
    /// Human-readable description of the rejection.
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "{}: {}", field.join("."), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Errors from a single tag mutation.
///
/// The variants keep the three failure classes distinct: transport
/// failures, top-level GraphQL errors, and business-rule `userErrors`.
#[derive(Debug, Error)]
pub enum MutationError {
    /// A transport-level failure (network, non-2xx, retries exhausted).
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// The GraphQL layer rejected the request itself.
    #[error("GraphQL errors: {}", Value::Array(errors.clone()))]
    Graphql {
        /// The top-level `errors` list from the response.
        errors: Vec<Value>,
    },

    /// The mutation ran and rejected the submitted input.
    #[error("user errors: {}", format_user_errors(errors))]
    UserErrors {
        /// The `userErrors` list from the mutation payload.
        errors: Vec<UserError>,
    },

    /// The order carries no identifier to address the update at.
    #[error("order has no id, cannot update tags")]
    MissingOrderId,

    /// A 200 response did not contain the fields the operation needs.
    #[error("unexpected response shape: {context}")]
    UnexpectedResponse {
        /// Which expectation the response violated.
        context: &'static str,
    },
}

fn format_user_errors(errors: &[UserError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Appends `tag` to the order's tags and writes the result back via REST.
///
/// The current tag string is split, the new tag appended (no duplicate
/// check), and the rejoined field submitted with a `PUT` carrying only the
/// order id and the tags field. Returns the tag set that was submitted.
///
/// # Errors
///
/// Returns [`MutationError::MissingOrderId`] for an unsaved order and
/// [`MutationError::Transport`] for transport failures. The caller owns
/// failure isolation; nothing here aborts a batch.
pub async fn add_tag(
    client: &RestClient,
    order: &Order,
    tag: &str,
) -> Result<TagSet, MutationError> {
    let id = order.id.ok_or(MutationError::MissingOrderId)?;

    let mut tags = order.tag_set();
    tags.push(tag);

    let body = json!({"order": {"id": id, "tags": tags.to_field()}});
    client
        .put(&format!("orders/{id}.json"), body, REMOTE_TRIES)
        .await?;

    Ok(tags)
}

const ORDER_TAGS_QUERY: &str = "query($id: ID!) { order(id: $id) { id tags } }";

const ORDER_UPDATE_MUTATION: &str = "mutation($id: ID!, $tags: [String!]!) { \
     orderUpdate(input: {id: $id, tags: $tags}) { \
     order { id tags } userErrors { field message } } }";

/// Reads an order's current tags via GraphQL.
///
/// # Errors
///
/// Returns [`MutationError::Graphql`] when the query is rejected,
/// [`MutationError::UnexpectedResponse`] when the response lacks the tag
/// list, and [`MutationError::Transport`] for transport failures.
pub async fn current_tags(
    client: &GraphqlClient,
    order_id: &str,
) -> Result<Vec<String>, MutationError> {
    let envelope = client
        .query(ORDER_TAGS_QUERY, Some(json!({"id": order_id})), REMOTE_TRIES)
        .await?;

    if envelope.has_errors() {
        return Err(MutationError::Graphql {
            errors: envelope.errors,
        });
    }

    envelope
        .data
        .get("order")
        .and_then(|order| order.get("tags"))
        .cloned()
        .and_then(|tags| serde_json::from_value(tags).ok())
        .ok_or(MutationError::UnexpectedResponse {
            context: "order.tags missing from tag read query",
        })
}

/// The tags left after removing `to_remove`, preserving order.
///
/// Removing a tag that is not present leaves the list unchanged.
#[must_use]
pub fn remaining_tags(current: &[String], to_remove: &[String]) -> Vec<String> {
    current
        .iter()
        .filter(|tag| !to_remove.contains(tag))
        .cloned()
        .collect()
}

/// Removes `tags_to_remove` from an order via read-then-replace.
///
/// Reads the current tags, computes the remaining set, and submits the
/// full replacement list through `orderUpdate`. Returns the tag list the
/// mutation confirmed.
///
/// # Errors
///
/// Returns [`MutationError::UserErrors`] when the mutation rejected the
/// input (reported distinctly from transport failures, never retried),
/// [`MutationError::Graphql`] for top-level GraphQL errors,
/// [`MutationError::UnexpectedResponse`] for a payload missing the
/// `orderUpdate` field, and [`MutationError::Transport`] for transport
/// failures.
pub async fn remove_tags(
    client: &GraphqlClient,
    order_id: &str,
    tags_to_remove: &[String],
) -> Result<Vec<String>, MutationError> {
    let current = current_tags(client, order_id).await?;
    let remaining = remaining_tags(&current, tags_to_remove);

    let variables = json!({"id": order_id, "tags": remaining});
    let envelope = client
        .query(ORDER_UPDATE_MUTATION, Some(variables), REMOTE_TRIES)
        .await?;

    if envelope.has_errors() {
        return Err(MutationError::Graphql {
            errors: envelope.errors,
        });
    }

    let payload = envelope
        .data
        .get("orderUpdate")
        .filter(|payload| !payload.is_null())
        .ok_or(MutationError::UnexpectedResponse {
            context: "orderUpdate missing from mutation response",
        })?;

    let user_errors: Vec<UserError> = payload
        .get("userErrors")
        .cloned()
        .and_then(|errors| serde_json::from_value(errors).ok())
        .unwrap_or_default();
    if !user_errors.is_empty() {
        return Err(MutationError::UserErrors {
            errors: user_errors,
        });
    }

    let confirmed = payload
        .get("order")
        .and_then(|order| order.get("tags"))
        .cloned()
        .and_then(|tags| serde_json::from_value(tags).ok())
        .unwrap_or(remaining);
    Ok(confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn remaining_tags_removes_present_tag() {
        let result = remaining_tags(&tags(&["A", "B", "C"]), &tags(&["B"]));
        assert_eq!(result, tags(&["A", "C"]));
    }

    #[test]
    fn remaining_tags_ignores_absent_tag() {
        let result = remaining_tags(&tags(&["A", "B", "C"]), &tags(&["Z"]));
        assert_eq!(result, tags(&["A", "B", "C"]));
    }

    #[test]
    fn remaining_tags_removes_multiple_preserving_order() {
        let result = remaining_tags(&tags(&["A", "B", "C", "D"]), &tags(&["D", "A"]));
        assert_eq!(result, tags(&["B", "C"]));
    }

    #[test]
    fn remaining_tags_on_empty_current_is_empty() {
        let result = remaining_tags(&[], &tags(&["A"]));
        assert!(result.is_empty());
    }

    #[test]
    fn user_error_display_includes_field_path() {
        let error = UserError {
            field: Some(tags(&["input", "tags"])),
            message: "is invalid".to_string(),
        };
        assert_eq!(error.to_string(), "input.tags: is invalid");

        let error = UserError {
            field: None,
            message: "is invalid".to_string(),
        };
        assert_eq!(error.to_string(), "is invalid");
    }

    #[test]
    fn mutation_error_keeps_user_errors_distinct_from_transport() {
        let error = MutationError::UserErrors {
            errors: vec![UserError {
                field: None,
                message: "Order does not exist".to_string(),
            }],
        };
        assert!(matches!(error, MutationError::UserErrors { .. }));
        assert!(error.to_string().contains("Order does not exist"));
    }
}
