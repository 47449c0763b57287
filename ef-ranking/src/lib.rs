//! Relevance ranking for eventflow search results.
//!
//! Scores candidate items (plain JSON documents) against a free-text query:
//! a weighted sum over the fields that contain the query, multiplied by
//! status boosts (featured, new supplier, high rating, verified, active
//! subscription), plus additive bonuses when the caller's filter context
//! matches the item. With no query text, ranking falls back to intrinsic
//! quality signals (rating, review volume, view volume).
//!
//! Every weight, boost factor, bonus, and threshold lives in
//! [`ScoringConfig`]; the scorer consults nothing else. All functions are
//! pure and synchronous, and items may omit any or all fields.

pub mod config;
pub mod fields;
pub mod quality;
pub mod rank;
pub mod relevance;
pub mod snippets;

pub use config::{BoostFactors, FieldWeights, FilterBonuses, QualityWeights, ScoringConfig};
pub use fields::matching_fields;
pub use rank::{rank_candidates, RankedResult};
pub use relevance::{FilterContext, RelevanceScorer};
pub use snippets::{snippets, snippets_for_field, DEFAULT_WINDOW, MAX_SNIPPETS};

/// Scores are reported with two decimal places; relative order is the only
/// contract beyond that.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
