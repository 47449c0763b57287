use crate::config::QualityWeights;
use crate::fields::number_field;
use serde_json::Value;

/// Baseline score from an item's intrinsic quality signals, used when no
/// query text is supplied. Items with no signals score zero; never
/// negative, never fails on missing fields.
pub(crate) fn quality_score_raw(item: &Value, weights: &QualityWeights) -> f64 {
    let rating = number_field(item, "rating").unwrap_or(0.0).max(0.0);
    let reviews = number_field(item, "reviewCount").unwrap_or(0.0).max(0.0);
    let views = number_field(item, "viewCount").unwrap_or(0.0).max(0.0);

    rating * weights.rating
        + (1.0 + reviews).ln() * weights.reviews
        + (1.0 + views).ln() * weights.views
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_signals_scores_zero() {
        let weights = QualityWeights::default();
        assert_eq!(quality_score_raw(&json!({}), &weights), 0.0);
    }

    #[test]
    fn test_rating_term_is_proportional() {
        let weights = QualityWeights::default();
        let low = quality_score_raw(&json!({"rating": 2.0}), &weights);
        let high = quality_score_raw(&json!({"rating": 4.0}), &weights);
        assert!((high - 2.0 * low).abs() < 1e-9);
    }

    #[test]
    fn test_review_volume_has_diminishing_returns() {
        let weights = QualityWeights::default();
        let few = quality_score_raw(&json!({"reviewCount": 10}), &weights);
        let many = quality_score_raw(&json!({"reviewCount": 1000}), &weights);
        assert!(many > few);
        assert!(many < 100.0 * few);
    }

    #[test]
    fn test_negative_signals_are_clamped() {
        let weights = QualityWeights::default();
        let score = quality_score_raw(&json!({"rating": -3, "viewCount": -10}), &weights);
        assert_eq!(score, 0.0);
    }
}
