//! Order data model and remote operations.
//!
//! Orders live remotely; everything here is a transient view that exists
//! for one pipeline run. The REST API carries tags as one comma-joined
//! string ([`Order::tags`]), the GraphQL API as a proper list
//! ([`OrderNode::tags`]); [`TagSet`] is the in-memory set both sides
//! convert through.

mod enumerate;
mod mutate;

pub use enumerate::{GraphqlOrderPages, RestOrderPages, PAGE_SIZE};
pub use mutate::{add_tag, current_tags, remaining_tags, remove_tags, MutationError, UserError};

use std::fmt;

use serde::{Deserialize, Serialize};

/// Attempts per remote call issued by the pipelines.
///
/// Transient transport failures (429, 500) are retried with backoff up to
/// this many times; deterministic rejections are never retried.
pub const REMOTE_TRIES: u32 = 3;

/// A shipping address, reduced to the field classification reads.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ShippingAddress {
    /// ISO alpha-2 country code, when the address carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

/// An order as the REST Admin API returns it.
///
/// Only the fields this job reads are modeled; everything else in the
/// payload is ignored on deserialize and never written back.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct Order {
    /// Opaque stable identifier.
    pub id: Option<u64>,
    /// Comma-joined tags, absent when the order has none.
    pub tags: Option<String>,
    /// Shipping address, absent for orders without one.
    pub shipping_address: Option<ShippingAddress>,
}

impl Order {
    /// Returns the order's tags as a set, recomputed from the raw string.
    #[must_use]
    pub fn tag_set(&self) -> TagSet {
        self.tags.as_deref().map_or_else(TagSet::default, TagSet::parse)
    }

    /// Returns the shipping country code, if the order has one.
    #[must_use]
    pub fn country_code(&self) -> Option<&str> {
        self.shipping_address
            .as_ref()
            .and_then(|address| address.country_code.as_deref())
    }
}

/// An order node as the GraphQL Admin API returns it.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct OrderNode {
    /// Opaque `gid://shopify/Order/...` identifier.
    pub id: String,
    /// The order's tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An order's tags, modeled as an ordered set of strings.
///
/// Parsing splits the REST comma-joined form and trims surrounding
/// whitespace (the API joins with `", "`); serializing joins with `", "`.
/// Membership is exact string comparison over the trimmed tags.
///
/// Tags containing a comma cannot survive the comma-joined REST form.
/// That is a boundary-encoding limitation of the remote API; writing such
/// a tag is logged as a warning rather than silently altered.
///
/// # Example
///
/// ```rust
/// use order_tagger::orders::TagSet;
///
/// let mut tags = TagSet::parse("vip, wholesale");
/// assert!(tags.contains("vip"));
/// tags.push("to_customer");
/// assert_eq!(tags.to_field(), "vip, wholesale, to_customer");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagSet(Vec<String>);

impl TagSet {
    /// Parses the comma-joined REST representation.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(
            raw.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// Returns `true` if `tag` is present, by exact string comparison.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Appends a tag.
    ///
    /// No duplicate check is performed; appending an already-present tag
    /// yields a duplicate entry, matching the remote add semantics this
    /// job reconciles against.
    pub fn push(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if tag.contains(',') {
            tracing::warn!(
                %tag,
                "tag contains a comma and will not survive the comma-joined tag field"
            );
        }
        self.0.push(tag);
    }

    /// Returns the number of tags.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the tags in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Serializes to the comma-joined REST field value.
    #[must_use]
    pub fn to_field(&self) -> String {
        self.0.join(", ")
    }
}

impl fmt::Display for TagSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_field())
    }
}
