use serde::{Deserialize, Serialize};

/// Weight of each searchable field in the base relevance score, in strictly
/// descending order of importance: a name match must always outrank a
/// description-only match for the same term.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    pub name: f64,
    pub tagline: f64,
    pub description: f64,
    pub tags: f64,
    pub category: f64,
    pub amenities: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 10.0,
            tagline: 8.0,
            description: 6.0,
            tags: 4.0,
            category: 3.0,
            amenities: 2.0,
        }
    }
}

/// Multiplicative score boosts, each strictly greater than 1.0 and each
/// independently triggerable; simultaneously active boosts compose
/// multiplicatively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostFactors {
    pub featured: f64,
    pub new_supplier: f64,
    pub high_rating: f64,
    pub verified: f64,
    pub active_subscription: f64,
}

impl Default for BoostFactors {
    fn default() -> Self {
        Self {
            featured: 1.5,
            new_supplier: 1.3,
            high_rating: 1.4,
            verified: 1.2,
            active_subscription: 1.25,
        }
    }
}

/// Additive bonuses applied when the caller-supplied filter context matches
/// the item. Distinct from boosts: these add, they do not multiply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterBonuses {
    pub category_match: f64,
    pub amenity_overlap: f64,
}

impl Default for FilterBonuses {
    fn default() -> Self {
        Self {
            category_match: 5.0,
            amenity_overlap: 3.0,
        }
    }
}

/// Weights of the intrinsic quality signals used when no query text is
/// supplied. Review and view volume enter through `ln(1 + n)`, so piling up
/// counts has diminishing returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub rating: f64,
    pub reviews: f64,
    pub views: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            rating: 2.0,
            reviews: 1.5,
            views: 0.5,
        }
    }
}

/// Full scoring configuration. The scorer consults nothing but this struct,
/// so synthetic tables can be injected for testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub field_weights: FieldWeights,
    pub boosts: BoostFactors,
    pub bonuses: FilterBonuses,
    pub quality: QualityWeights,
    /// Rating at or above this triggers the high-rating boost.
    pub high_rating_threshold: f64,
    /// Suppliers created within this many days get the new-supplier boost.
    pub new_supplier_window_days: i64,
    /// Subscription tier that does not count as an active subscription.
    pub baseline_tier: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            field_weights: FieldWeights::default(),
            boosts: BoostFactors::default(),
            bonuses: FilterBonuses::default(),
            quality: QualityWeights::default(),
            high_rating_threshold: 4.5,
            new_supplier_window_days: 30,
            baseline_tier: "free".to_string(),
        }
    }
}
