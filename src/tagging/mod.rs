//! Country-driven order tagging.
//!
//! The mapping tables come from CSV ([`mapping`]), classification is pure
//! ([`classify`]), and the pipelines ([`pipeline`]) wire enumeration,
//! classification, and mutation together with per-order failure isolation.

mod classify;
mod mapping;
mod pipeline;

pub use classify::{
    classify, classify_by_name, is_untagged, TagDecision, UnclassifiedReason, TO_CUSTOMER_TAG,
    TO_DRAGON_TAG,
};
pub use mapping::{CountryMapping, CountryNames, MappingError};
pub use pipeline::{
    remove_tags_from_all_orders, tag_untagged_orders, PipelineError, RunSummary, TagSource,
};
