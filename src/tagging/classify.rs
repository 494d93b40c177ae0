//! Shipping-country classification.
//!
//! Pure functions from an order and a mapping table to a [`TagDecision`].
//! No side effects; the pipelines own all logging and mutation.

use std::fmt;

use crate::orders::Order;
use crate::tagging::{CountryMapping, CountryNames};

/// Tag applied to orders shipping to a `to_customer` country.
pub const TO_CUSTOMER_TAG: &str = "to_customer";

/// Tag applied to orders shipping to a `to_dragon` country.
pub const TO_DRAGON_TAG: &str = "to_dragon";

/// Why an order could not be classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnclassifiedReason {
    /// The order has no shipping address or no country code on it.
    NoShippingCountry,
    /// The shipping country code is in neither mapping column.
    CodeNotInMapping,
}

impl fmt::Display for UnclassifiedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoShippingCountry => f.write_str("no shipping country"),
            Self::CodeNotInMapping => f.write_str("code not in mapping"),
        }
    }
}

/// The outcome of classifying one order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TagDecision {
    /// Apply the `to_customer` tag.
    AddToCustomer,
    /// Apply the `to_dragon` tag.
    AddToDragon,
    /// Apply the country's display name as the tag.
    AddCountryName(String),
    /// Leave the order untouched, with the reason.
    Unclassified(UnclassifiedReason),
}

impl TagDecision {
    /// The tag to apply, `None` when the order stays untouched.
    #[must_use]
    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::AddToCustomer => Some(TO_CUSTOMER_TAG),
            Self::AddToDragon => Some(TO_DRAGON_TAG),
            Self::AddCountryName(name) => Some(name),
            Self::Unclassified(_) => None,
        }
    }
}

/// Returns `true` if the order carries neither classification tag.
///
/// This is the enumeration filter of the tagging pipeline: orders already
/// carrying `to_customer` or `to_dragon` are never re-classified, which is
/// what keeps the add path from stacking duplicate classification tags.
#[must_use]
pub fn is_untagged(order: &Order) -> bool {
    let tags = order.tag_set();
    !tags.contains(TO_CUSTOMER_TAG) && !tags.contains(TO_DRAGON_TAG)
}

/// Classifies an order against the category mapping.
///
/// `to_customer` is checked before `to_dragon`, so a code present in both
/// sets resolves to [`TagDecision::AddToCustomer`]. That precedence is
/// inherited source behavior with no documented rationale; it is pinned by
/// test and must not be reordered without a product decision.
#[must_use]
pub fn classify(order: &Order, mapping: &CountryMapping) -> TagDecision {
    let Some(code) = order.country_code() else {
        return TagDecision::Unclassified(UnclassifiedReason::NoShippingCountry);
    };

    if mapping.is_to_customer(code) {
        TagDecision::AddToCustomer
    } else if mapping.is_to_dragon(code) {
        TagDecision::AddToDragon
    } else {
        TagDecision::Unclassified(UnclassifiedReason::CodeNotInMapping)
    }
}

/// Classifies an order against the display-name table.
///
/// The resulting tag is the country's human-readable name.
#[must_use]
pub fn classify_by_name(order: &Order, names: &CountryNames) -> TagDecision {
    let Some(code) = order.country_code() else {
        return TagDecision::Unclassified(UnclassifiedReason::NoShippingCountry);
    };

    names.get(code).map_or(
        TagDecision::Unclassified(UnclassifiedReason::CodeNotInMapping),
        |name| TagDecision::AddCountryName(name.to_string()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orders::ShippingAddress;
    use std::collections::HashSet;

    fn set(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(ToString::to_string).collect()
    }

    fn order_shipping_to(code: Option<&str>) -> Order {
        Order {
            id: Some(1),
            tags: None,
            shipping_address: code.map(|code| ShippingAddress {
                country_code: Some(code.to_string()),
            }),
        }
    }

    fn mapping() -> CountryMapping {
        CountryMapping::from_sets(set(&["SE", "NO"]), set(&["DE", "FR"]))
    }

    #[test]
    fn classify_customer_country_yields_add_to_customer() {
        let decision = classify(&order_shipping_to(Some("SE")), &mapping());
        assert_eq!(decision, TagDecision::AddToCustomer);
        assert_eq!(decision.tag(), Some("to_customer"));
    }

    #[test]
    fn classify_dragon_country_yields_add_to_dragon() {
        let decision = classify(&order_shipping_to(Some("DE")), &mapping());
        assert_eq!(decision, TagDecision::AddToDragon);
        assert_eq!(decision.tag(), Some("to_dragon"));
    }

    #[test]
    fn classify_unknown_code_is_unclassified() {
        let decision = classify(&order_shipping_to(Some("JP")), &mapping());
        assert_eq!(
            decision,
            TagDecision::Unclassified(UnclassifiedReason::CodeNotInMapping)
        );
        assert_eq!(decision.tag(), None);
    }

    #[test]
    fn classify_without_address_is_unclassified() {
        let decision = classify(&order_shipping_to(None), &mapping());
        assert_eq!(
            decision,
            TagDecision::Unclassified(UnclassifiedReason::NoShippingCountry)
        );

        let order = Order {
            id: Some(1),
            tags: None,
            shipping_address: Some(ShippingAddress { country_code: None }),
        };
        assert_eq!(
            classify(&order, &mapping()),
            TagDecision::Unclassified(UnclassifiedReason::NoShippingCountry)
        );
    }

    #[test]
    fn classify_prefers_customer_when_code_in_both_sets() {
        let mapping = CountryMapping::from_sets(set(&["SE"]), set(&["SE"]));
        assert_eq!(
            classify(&order_shipping_to(Some("SE")), &mapping),
            TagDecision::AddToCustomer
        );
    }

    #[test]
    fn classify_by_name_yields_display_name() {
        let names =
            CountryNames::from_pairs([("SE".to_string(), "Sweden".to_string())]);
        let decision = classify_by_name(&order_shipping_to(Some("SE")), &names);
        assert_eq!(decision, TagDecision::AddCountryName("Sweden".to_string()));
        assert_eq!(decision.tag(), Some("Sweden"));

        assert_eq!(
            classify_by_name(&order_shipping_to(Some("JP")), &names),
            TagDecision::Unclassified(UnclassifiedReason::CodeNotInMapping)
        );
    }

    #[test]
    fn untagged_filter_excludes_either_classification_tag() {
        let tagged = |tags: &str| Order {
            id: Some(1),
            tags: Some(tags.to_string()),
            shipping_address: None,
        };

        assert!(is_untagged(&tagged("")));
        assert!(is_untagged(&tagged("vip, wholesale")));
        assert!(!is_untagged(&tagged("to_customer")));
        assert!(!is_untagged(&tagged("vip, to_dragon")));
        assert!(!is_untagged(&tagged("to_customer, to_dragon")));
    }

    #[test]
    fn untagged_filter_does_not_match_substrings_of_other_tags() {
        let order = Order {
            id: Some(1),
            tags: Some("to_customer_eu".to_string()),
            shipping_address: None,
        };
        assert!(is_untagged(&order));
    }
}
