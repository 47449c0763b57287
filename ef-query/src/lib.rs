//! Search query language for the eventflow marketplace.
//!
//! Turns a free-form search string like
//! `from:alice@example.com is:unread larger:1mb hello world` into a
//! [`ParsedQuery`]: storage-agnostic filter predicates plus the free-text
//! terms left over for full-text search. Executors translate the predicates
//! into their store's native query form; [`FilterSet::matches`] is the
//! in-memory reference behavior.
//!
//! Parsing never fails. Malformed operator values (a bad duration, size, or
//! date token) drop that one operator and the rest of the query parses
//! normally.

pub mod builder;
pub mod duration;
pub mod operators;
pub mod predicate;
pub mod size;
pub mod tokenizer;

pub use builder::{FilterBuilder, UnknownOperators};
pub use duration::parse_duration;
pub use operators::OperatorKind;
pub use predicate::{FilterClause, FilterSet, Predicate, RangeBounds};
pub use size::parse_size_token;
pub use tokenizer::{tokenize, RawOperator, Tokenized};

use chrono::{DateTime, Utc};
use serde::Serialize;

/// The structured form of a raw search string. `filters` and `text_search`
/// are derived from `operators`; the raw sequence is retained so the
/// builder step can be re-run independently of tokenization (diagnostics,
/// autocomplete).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedQuery {
    pub filters: FilterSet,
    pub text_search: Vec<String>,
    pub operators: Vec<RawOperator>,
}

impl ParsedQuery {
    /// Free-text terms joined with spaces, the form handed to a store's
    /// full-text search.
    pub fn text_query(&self) -> String {
        self.text_search.join(" ")
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty() && self.text_search.is_empty()
    }
}

/// Knobs for [`parse_with`]. The defaults match [`parse`].
#[derive(Debug, Default, Clone)]
pub struct ParseOptions {
    /// Reference instant for the relative-date operators; pin it to make
    /// parsing fully deterministic. Defaults to now.
    pub now: Option<DateTime<Utc>>,
    pub unknown_operators: UnknownOperators,
}

/// Parse a raw search string with default options.
pub fn parse(raw: &str) -> ParsedQuery {
    parse_with(raw, &ParseOptions::default())
}

/// Parse a raw search string. Pure and synchronous; safe to call from any
/// number of request contexts concurrently.
pub fn parse_with(raw: &str, options: &ParseOptions) -> ParsedQuery {
    let tokenized = tokenize(raw);
    let builder = FilterBuilder::at(options.now.unwrap_or_else(Utc::now))
        .unknown_operators(options.unknown_operators);
    let (filters, extra_text) = builder.build(&tokenized.operators);
    let mut text_search = tokenized.free_text;
    text_search.extend(extra_text);
    ParsedQuery {
        filters,
        text_search,
        operators: tokenized.operators,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_query_joins_fragments() {
        let parsed = parse("hello from:alice world");
        assert_eq!(parsed.text_query(), "hello world");
    }

    #[test]
    fn test_empty_input() {
        let parsed = parse("");
        assert!(parsed.is_empty());
        assert!(parsed.operators.is_empty());
    }
}
