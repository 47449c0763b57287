use crate::config::ScoringConfig;
use crate::fields::{bool_field, contains_ci, list_field, number_field, text_field};
use crate::quality::quality_score_raw;
use crate::round2;
use chrono::{DateTime, Duration, Utc};
use serde_json::Value;

/// Filter context supplied by the executor alongside the query, used for
/// the additive bonuses only.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FilterContext {
    pub category: Option<String>,
    pub amenities: Vec<String>,
}

/// Scores candidate items against a query: a weighted field base score,
/// multiplied by status boosts, plus filter bonuses. All tables come from
/// the [`ScoringConfig`] passed at construction.
pub struct RelevanceScorer {
    config: ScoringConfig,
}

impl Default for RelevanceScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

impl RelevanceScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Intrinsic quality score, rounded to two decimals.
    pub fn quality_score(&self, item: &Value) -> f64 {
        round2(quality_score_raw(item, &self.config.quality))
    }

    /// Score `item` against `query`. A blank query falls back entirely to
    /// the quality score. Rounded to two decimals, never negative, never
    /// fails on items missing any or all fields.
    pub fn score(&self, item: &Value, query: &str, context: Option<&FilterContext>) -> f64 {
        self.score_at(item, query, context, Utc::now())
    }

    /// Same as [`RelevanceScorer::score`] with a pinned instant for the
    /// new-supplier recency check.
    pub fn score_at(
        &self,
        item: &Value,
        query: &str,
        context: Option<&FilterContext>,
        now: DateTime<Utc>,
    ) -> f64 {
        let query = query.trim();
        if query.is_empty() {
            return self.quality_score(item);
        }

        let mut score = self.base_score(item, query);

        let boosts = &self.config.boosts;
        if bool_field(item, "featured") {
            score *= boosts.featured;
        }
        if self.is_new_supplier(item, now) {
            score *= boosts.new_supplier;
        }
        if number_field(item, "rating").unwrap_or(0.0) >= self.config.high_rating_threshold {
            score *= boosts.high_rating;
        }
        if bool_field(item, "verified") {
            score *= boosts.verified;
        }
        if self.has_active_subscription(item) {
            score *= boosts.active_subscription;
        }

        if let Some(context) = context {
            score += self.filter_bonuses(item, context);
        }

        round2(score.max(0.0))
    }

    fn base_score(&self, item: &Value, query: &str) -> f64 {
        let weights = &self.config.field_weights;
        let mut base = 0.0;

        if text_field(item, "name").is_some_and(|text| contains_ci(text, query)) {
            base += weights.name;
        }
        if text_field(item, "tagline").is_some_and(|text| contains_ci(text, query)) {
            base += weights.tagline;
        }
        if text_field(item, "description").is_some_and(|text| contains_ci(text, query)) {
            base += weights.description;
        }
        if list_field(item, "tags")
            .iter()
            .any(|tag| contains_ci(tag, query))
        {
            base += weights.tags;
        }
        if text_field(item, "category").is_some_and(|text| contains_ci(text, query)) {
            base += weights.category;
        }
        if list_field(item, "amenities")
            .iter()
            .any(|amenity| contains_ci(amenity, query))
        {
            base += weights.amenities;
        }
        base
    }

    fn is_new_supplier(&self, item: &Value, now: DateTime<Utc>) -> bool {
        let created = match text_field(item, "createdAt") {
            Some(created) => created,
            None => return false,
        };
        match DateTime::parse_from_rfc3339(created) {
            Ok(created) => {
                let age = now.signed_duration_since(created.with_timezone(&Utc));
                age <= Duration::days(self.config.new_supplier_window_days)
            }
            Err(e) => {
                log::debug!("Unparseable createdAt {:?}: {}", created, e);
                false
            }
        }
    }

    fn has_active_subscription(&self, item: &Value) -> bool {
        text_field(item, "subscriptionTier")
            .map(|tier| !tier.eq_ignore_ascii_case(&self.config.baseline_tier))
            .unwrap_or(false)
    }

    fn filter_bonuses(&self, item: &Value, context: &FilterContext) -> f64 {
        let bonuses = &self.config.bonuses;
        let mut bonus = 0.0;

        if let (Some(wanted), Some(category)) = (&context.category, text_field(item, "category")) {
            if category.eq_ignore_ascii_case(wanted) {
                bonus += bonuses.category_match;
            }
        }

        if !context.amenities.is_empty() {
            let amenities = list_field(item, "amenities");
            let overlaps = context.amenities.iter().any(|wanted| {
                amenities
                    .iter()
                    .any(|amenity| amenity.eq_ignore_ascii_case(wanted))
            });
            if overlaps {
                bonus += bonuses.amenity_overlap;
            }
        }

        bonus
    }
}
