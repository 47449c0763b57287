use crate::builder::BuildState;
use crate::duration::parse_duration;
use crate::predicate::{FilterClause, Predicate, RangeBounds};
use crate::size::parse_size_token;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use strsim::jaro_winkler;

/// Every recognized search operator. Each variant owns its
/// predicate-construction rule in [`OperatorKind::apply`], so adding an
/// operator is one variant and one arm, testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    From,
    To,
    Subject,
    Body,
    Before,
    After,
    Date,
    Older,
    Newer,
    Is,
    Has,
    Filename,
    Larger,
    Smaller,
    Folder,
    Label,
    Thread,
}

impl FromStr for OperatorKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "from" => Ok(OperatorKind::From),
            "to" => Ok(OperatorKind::To),
            "subject" => Ok(OperatorKind::Subject),
            "body" | "text" => Ok(OperatorKind::Body),
            "before" => Ok(OperatorKind::Before),
            "after" => Ok(OperatorKind::After),
            "date" => Ok(OperatorKind::Date),
            "older" => Ok(OperatorKind::Older),
            "newer" => Ok(OperatorKind::Newer),
            "is" => Ok(OperatorKind::Is),
            "has" => Ok(OperatorKind::Has),
            "filename" => Ok(OperatorKind::Filename),
            "larger" => Ok(OperatorKind::Larger),
            "smaller" => Ok(OperatorKind::Smaller),
            "folder" => Ok(OperatorKind::Folder),
            "label" => Ok(OperatorKind::Label),
            "thread" => Ok(OperatorKind::Thread),
            _ => anyhow::bail!("Unknown search operator: {}", s),
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperatorKind::From => "from",
            OperatorKind::To => "to",
            OperatorKind::Subject => "subject",
            OperatorKind::Body => "body",
            OperatorKind::Before => "before",
            OperatorKind::After => "after",
            OperatorKind::Date => "date",
            OperatorKind::Older => "older",
            OperatorKind::Newer => "newer",
            OperatorKind::Is => "is",
            OperatorKind::Has => "has",
            OperatorKind::Filename => "filename",
            OperatorKind::Larger => "larger",
            OperatorKind::Smaller => "smaller",
            OperatorKind::Folder => "folder",
            OperatorKind::Label => "label",
            OperatorKind::Thread => "thread",
        };
        write!(f, "{}", name)
    }
}

const KNOWN_KEYS: &[&str] = &[
    "from", "to", "subject", "body", "text", "before", "after", "date", "older", "newer", "is",
    "has", "filename", "larger", "smaller", "folder", "label", "thread",
];

/// Nearest known operator key for an unrecognized one, for diagnostics.
pub fn suggest(key: &str) -> Option<&'static str> {
    let key = key.to_lowercase();
    KNOWN_KEYS
        .iter()
        .map(|name| (*name, jaro_winkler(&key, name)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .filter(|(_, score)| *score >= 0.8)
        .map(|(name, _)| name)
}

impl OperatorKind {
    pub(crate) fn apply(self, value: &str, state: &mut BuildState) {
        match self {
            OperatorKind::From => {
                state.filters.set("senderId", Predicate::Equals(json!(value)));
            }
            OperatorKind::To => {
                state.filters.set("recipients", Predicate::Member(json!(value)));
            }
            OperatorKind::Subject => {
                state
                    .filters
                    .set("subject", Predicate::Contains(regex::escape(value)));
            }
            OperatorKind::Body => state.free_text.push(value.to_string()),
            OperatorKind::Before => match parse_day(value) {
                Some(day) => state.filters.merge_range("createdAt", |b| {
                    b.less_than = Some(timestamp(start_of_day(day)));
                }),
                None => drop_operator(self, value),
            },
            OperatorKind::After => match parse_day(value) {
                Some(day) => state.filters.merge_range("createdAt", |b| {
                    b.greater_than = Some(timestamp(start_of_day(day)));
                }),
                None => drop_operator(self, value),
            },
            // `date:` pins a single day and overwrites any range already
            // accumulated on the timestamp field.
            OperatorKind::Date => match parse_day(value) {
                Some(day) => state.filters.set(
                    "createdAt",
                    Predicate::Range(RangeBounds {
                        greater_or_equal: Some(timestamp(start_of_day(day))),
                        less_or_equal: Some(timestamp(end_of_day(day))),
                        ..RangeBounds::default()
                    }),
                ),
                None => drop_operator(self, value),
            },
            OperatorKind::Older => match parse_duration(value) {
                Some(days) => {
                    let cutoff = state.now - Duration::days(days);
                    state.filters.merge_range("createdAt", |b| {
                        b.less_than = Some(timestamp(cutoff));
                    });
                }
                None => drop_operator(self, value),
            },
            OperatorKind::Newer => match parse_duration(value) {
                Some(days) => {
                    let cutoff = state.now - Duration::days(days);
                    state.filters.merge_range("createdAt", |b| {
                        b.greater_than = Some(timestamp(cutoff));
                    });
                }
                None => drop_operator(self, value),
            },
            OperatorKind::Is => match value.to_lowercase().as_str() {
                "read" => state.filters.set("readBy", Predicate::Exists),
                "unread" => state.filters.set(
                    "readBy",
                    Predicate::AnyOf(vec![
                        FilterClause::new("readBy", Predicate::Missing),
                        FilterClause::new("readBy", Predicate::Empty),
                    ]),
                ),
                "starred" | "flagged" => {
                    state.filters.set("starred", Predicate::Equals(json!(true)));
                }
                "archived" => state.filters.set("archived", Predicate::Equals(json!(true))),
                "sent" => state.filters.set("draft", Predicate::Equals(json!(false))),
                "draft" => state.filters.set("draft", Predicate::Equals(json!(true))),
                _ => drop_operator(self, value),
            },
            OperatorKind::Has => match value.to_lowercase().as_str() {
                "attachment" | "file" => state.filters.set("attachments", Predicate::Exists),
                "image" => state
                    .filters
                    .set("attachments.type", Predicate::Equals(json!("image"))),
                "document" => state
                    .filters
                    .set("attachments.type", Predicate::Equals(json!("document"))),
                _ => drop_operator(self, value),
            },
            OperatorKind::Filename => {
                state.filters.set(
                    "attachments.filename",
                    Predicate::Contains(wildcard_pattern(value)),
                );
            }
            OperatorKind::Larger => match parse_size_token(value) {
                Some(bytes) => state.filters.merge_range("attachments.size", |b| {
                    b.greater_than = Some(json!(bytes));
                }),
                None => drop_operator(self, value),
            },
            OperatorKind::Smaller => match parse_size_token(value) {
                Some(bytes) => state.filters.merge_range("attachments.size", |b| {
                    b.less_than = Some(json!(bytes));
                }),
                None => drop_operator(self, value),
            },
            OperatorKind::Folder => {
                state.filters.set(
                    "folderId",
                    Predicate::AnyOf(vec![
                        FilterClause::new("folderId", Predicate::Equals(json!(value))),
                        FilterClause::new("folderName", Predicate::Contains(regex::escape(value))),
                    ]),
                );
            }
            OperatorKind::Label => state.filters.set("labelIds", Predicate::Equals(json!(value))),
            OperatorKind::Thread => state.filters.set("threadId", Predicate::Equals(json!(value))),
        }
    }
}

fn drop_operator(kind: OperatorKind, value: &str) {
    log::debug!("Dropping search operator {}:{}: unusable value", kind, value);
}

/// Escape a user value for the contains predicate, turning `*` into a
/// match-anything wildcard.
fn wildcard_pattern(value: &str) -> String {
    regex::escape(value).replace(r"\*", ".*")
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(day) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(day);
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|instant| instant.with_timezone(&Utc).date_naive())
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

/// 23:59:59.999 of the same day.
fn end_of_day(day: NaiveDate) -> DateTime<Utc> {
    start_of_day(day) + Duration::milliseconds(86_399_999)
}

/// Timestamps are emitted as RFC 3339 strings with millisecond precision in
/// UTC, which order lexicographically.
fn timestamp(instant: DateTime<Utc>) -> Value {
    Value::String(instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_round_trip() {
        for key in ["from", "to", "subject", "older", "has", "thread"] {
            let kind = OperatorKind::from_str(key).unwrap();
            assert_eq!(kind.to_string(), key);
        }
    }

    #[test]
    fn test_body_aliases() {
        assert_eq!(OperatorKind::from_str("text").unwrap(), OperatorKind::Body);
        assert_eq!(OperatorKind::from_str("BODY").unwrap(), OperatorKind::Body);
    }

    #[test]
    fn test_unknown_key_is_an_error() {
        assert!(OperatorKind::from_str("sender").is_err());
        assert!(OperatorKind::from_str("").is_err());
    }

    #[test]
    fn test_suggest_close_misspellings() {
        assert_eq!(suggest("form"), Some("from"));
        assert_eq!(suggest("subjct"), Some("subject"));
        assert_eq!(suggest("zzzz"), None);
    }

    #[test]
    fn test_wildcard_pattern_escapes_literals() {
        assert_eq!(wildcard_pattern("report*.pdf"), "report.*\\.pdf");
    }

    #[test]
    fn test_parse_day_formats() {
        assert!(parse_day("2024-05-01").is_some());
        assert!(parse_day("2024-05-01T10:30:00Z").is_some());
        assert!(parse_day("yesterday").is_none());
    }

    #[test]
    fn test_day_bounds() {
        let day = parse_day("2024-05-01").unwrap();
        assert_eq!(
            timestamp(start_of_day(day)),
            json!("2024-05-01T00:00:00.000Z")
        );
        assert_eq!(timestamp(end_of_day(day)), json!("2024-05-01T23:59:59.999Z"));
    }
}
