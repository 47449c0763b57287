use crate::fields::matching_fields;
use crate::relevance::{FilterContext, RelevanceScorer};
use crate::snippets::snippets_for_field;
use ef_query::ParsedQuery;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// A scored candidate with its highlight metadata.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    pub item: Value,
    pub score: f64,
    pub matched_fields: Vec<&'static str>,
    pub snippets: Vec<String>,
}

/// In-memory executor flow: apply the parsed filters to each candidate,
/// score the survivors against the free-text query, and return them sorted
/// by descending score with match annotations. External stores execute
/// `parsed.filters` natively instead and call the scorer per candidate.
pub fn rank_candidates(
    items: &[Value],
    parsed: &ParsedQuery,
    scorer: &RelevanceScorer,
    context: Option<&FilterContext>,
) -> Vec<RankedResult> {
    let text = parsed.text_query();
    let mut results: Vec<RankedResult> = items
        .iter()
        .filter(|item| parsed.filters.matches(item))
        .map(|item| RankedResult {
            score: scorer.score(item, &text, context),
            matched_fields: matching_fields(item, &text),
            snippets: snippets_for_field(item, "description", &text),
            item: item.clone(),
        })
        .collect();
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results
}
