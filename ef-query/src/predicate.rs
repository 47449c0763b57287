use indexmap::IndexMap;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;

/// A single storage-agnostic filter condition. Executors translate each
/// variant into their store's native query form; [`FilterSet::matches`]
/// provides the in-memory reference behavior.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", content = "value", rename_all = "camelCase")]
pub enum Predicate {
    /// Scalar equality; on a collection field, any element equal.
    Equals(Value),
    /// Membership in a collection field.
    Member(Value),
    /// Case-insensitive contains. The pattern is regex-ready: literal
    /// characters are escaped and `*` wildcards appear as `.*`.
    Contains(String),
    /// One- or two-sided range over numbers or RFC 3339 timestamps.
    Range(RangeBounds),
    /// Field present with a non-empty value.
    Exists,
    /// Field absent or null.
    Missing,
    /// Field present and an empty collection.
    Empty,
    /// OR-group: at least one clause must hold.
    AnyOf(Vec<FilterClause>),
}

/// Bounds of a [`Predicate::Range`]. Bound values are JSON numbers (byte
/// counts) or RFC 3339 strings (timestamps, which compare lexicographically
/// in that format).
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeBounds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greater_than: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_than: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub greater_or_equal: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub less_or_equal: Option<Value>,
}

/// A predicate bound to a document field, used inside OR-groups where the
/// alternatives may target different fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterClause {
    pub field: String,
    pub predicate: Predicate,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, predicate: Predicate) -> Self {
        Self {
            field: field.into(),
            predicate,
        }
    }
}

/// The accumulated filters of a parsed query: an insertion-ordered mapping
/// from document field to predicate, so that parsing the same input always
/// produces the same structure.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FilterSet {
    clauses: IndexMap<String, Predicate>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.clauses.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Predicate)> {
        self.clauses.iter()
    }

    /// Insert a predicate, replacing any prior predicate on the same field.
    pub fn set(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.clauses.insert(field.into(), predicate);
    }

    /// Merge a bound into the range predicate on `field`, creating the range
    /// if needed. This is how `after:X before:Y` composes into a two-sided
    /// range, and `smaller:` narrows an earlier `larger:`. A non-range
    /// predicate already on the field is replaced.
    pub fn merge_range(&mut self, field: &str, merge: impl FnOnce(&mut RangeBounds)) {
        let entry = self
            .clauses
            .entry(field.to_string())
            .or_insert_with(|| Predicate::Range(RangeBounds::default()));
        if !matches!(entry, Predicate::Range(_)) {
            *entry = Predicate::Range(RangeBounds::default());
        }
        if let Predicate::Range(bounds) = entry {
            merge(bounds);
        }
    }

    /// In-memory reference evaluation: every clause must hold for `doc`.
    pub fn matches(&self, doc: &Value) -> bool {
        self.clauses
            .iter()
            .all(|(field, predicate)| clause_matches(doc, field, predicate))
    }
}

fn clause_matches(doc: &Value, field: &str, predicate: &Predicate) -> bool {
    if let Predicate::AnyOf(clauses) = predicate {
        return clauses
            .iter()
            .any(|clause| clause_matches(doc, &clause.field, &clause.predicate));
    }

    let mut leaves = Vec::new();
    resolve(doc, field, &mut leaves);

    match predicate {
        Predicate::Missing => leaves.iter().all(|leaf| leaf.is_null()),
        Predicate::Equals(expected) => leaves
            .iter()
            .any(|leaf| elements(leaf).any(|v| values_equal(v, expected))),
        Predicate::Member(expected) => leaves
            .iter()
            .any(|leaf| elements(leaf).any(|v| values_equal(v, expected))),
        Predicate::Contains(pattern) => {
            let matcher = Regex::new(&format!("(?i){}", pattern));
            leaves.iter().any(|leaf| {
                elements(leaf).any(|v| match (v.as_str(), &matcher) {
                    (Some(text), Ok(re)) => re.is_match(text),
                    _ => false,
                })
            })
        }
        Predicate::Range(bounds) => leaves
            .iter()
            .any(|leaf| elements(leaf).any(|v| bounds.contain(v))),
        Predicate::Exists => leaves.iter().any(|leaf| match leaf {
            Value::Null => false,
            Value::Array(items) => !items.is_empty(),
            Value::String(s) => !s.is_empty(),
            _ => true,
        }),
        Predicate::Empty => leaves.iter().any(|leaf| match leaf {
            Value::Array(items) => items.is_empty(),
            _ => false,
        }),
        Predicate::AnyOf(_) => false,
    }
}

/// Collect every value reachable at a dotted path, descending into arrays
/// along the way (so `attachments.size` visits the size of each attachment).
fn resolve<'a>(value: &'a Value, path: &str, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => {
            for item in items {
                resolve(item, path, out);
            }
        }
        Value::Object(map) => {
            if let Some((head, rest)) = path.split_once('.') {
                if let Some(child) = map.get(head) {
                    resolve(child, rest, out);
                }
            } else if let Some(child) = map.get(path) {
                out.push(child);
            }
        }
        _ => {}
    }
}

/// A leaf array is compared element-wise; a scalar leaf as itself.
fn elements(leaf: &Value) -> Box<dyn Iterator<Item = &Value> + '_> {
    match leaf {
        Value::Array(items) => Box::new(items.iter()),
        other => Box::new(std::iter::once(other)),
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => a == b,
    }
}

impl RangeBounds {
    fn contain(&self, value: &Value) -> bool {
        let checks = [
            (&self.greater_than, Ordering::Greater, false),
            (&self.less_than, Ordering::Less, false),
            (&self.greater_or_equal, Ordering::Greater, true),
            (&self.less_or_equal, Ordering::Less, true),
        ];
        checks.iter().all(|(bound, wanted, or_equal)| {
            let Some(bound) = bound else { return true };
            match compare_values(value, bound) {
                Some(ordering) => ordering == *wanted || (*or_equal && ordering == Ordering::Equal),
                None => false,
            }
        })
    }

    pub fn is_empty(&self) -> bool {
        self.greater_than.is_none()
            && self.less_than.is_none()
            && self.greater_or_equal.is_none()
            && self.less_or_equal.is_none()
    }
}

/// Numbers compare numerically, strings lexicographically (RFC 3339
/// timestamps order correctly that way). Mixed types do not compare.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.partial_cmp(&y),
        _ => match (a.as_str(), b.as_str()) {
            (Some(x), Some(y)) => Some(x.cmp(y)),
            _ => None,
        },
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(v) => write!(f, "== {}", v),
            Predicate::Member(v) => write!(f, "includes {}", v),
            Predicate::Contains(p) => write!(f, "contains /{}/", p),
            Predicate::Range(b) => write!(f, "{}", b),
            Predicate::Exists => write!(f, "exists"),
            Predicate::Missing => write!(f, "missing"),
            Predicate::Empty => write!(f, "empty"),
            Predicate::AnyOf(clauses) => {
                write!(f, "(")?;
                for (i, clause) in clauses.iter().enumerate() {
                    if i > 0 {
                        write!(f, " OR ")?;
                    }
                    write!(f, "{} {}", clause.field, clause.predicate)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl fmt::Display for RangeBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = &self.greater_than {
            parts.push(format!("> {}", v));
        }
        if let Some(v) = &self.greater_or_equal {
            parts.push(format!(">= {}", v));
        }
        if let Some(v) = &self.less_than {
            parts.push(format!("< {}", v));
        }
        if let Some(v) = &self.less_or_equal {
            parts.push(format!("<= {}", v));
        }
        write!(f, "{}", parts.join(" and "))
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, predicate)) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            write!(f, "{} {}", field, predicate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_equality_on_scalar_and_collection() {
        let mut filters = FilterSet::new();
        filters.set("senderId", Predicate::Equals(json!("alice")));
        assert!(filters.matches(&json!({"senderId": "alice"})));
        assert!(!filters.matches(&json!({"senderId": "bob"})));
        assert!(!filters.matches(&json!({})));

        let mut filters = FilterSet::new();
        filters.set("labelIds", Predicate::Equals(json!("l1")));
        assert!(filters.matches(&json!({"labelIds": ["l0", "l1"]})));
        assert!(!filters.matches(&json!({"labelIds": ["l2"]})));
    }

    #[test]
    fn test_numeric_equality_across_representations() {
        let mut filters = FilterSet::new();
        filters.set("count", Predicate::Equals(json!(2)));
        assert!(filters.matches(&json!({"count": 2.0})));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let mut filters = FilterSet::new();
        filters.set("subject", Predicate::Contains(regex::escape("Budget")));
        assert!(filters.matches(&json!({"subject": "q3 BUDGET review"})));
        assert!(!filters.matches(&json!({"subject": "agenda"})));
    }

    #[test]
    fn test_contains_wildcard() {
        let mut filters = FilterSet::new();
        let pattern = regex::escape("report*.pdf").replace(r"\*", ".*");
        filters.set("attachments.filename", Predicate::Contains(pattern));
        assert!(filters.matches(&json!({
            "attachments": [{"filename": "report-2024.pdf"}]
        })));
        assert!(!filters.matches(&json!({
            "attachments": [{"filename": "report-2024.docx"}]
        })));
    }

    #[test]
    fn test_dotted_path_descends_into_arrays() {
        let mut filters = FilterSet::new();
        filters.set("attachments.type", Predicate::Equals(json!("image")));
        let doc = json!({"attachments": [
            {"type": "document"},
            {"type": "image"},
        ]});
        assert!(filters.matches(&doc));
        assert!(!filters.matches(&json!({"attachments": [{"type": "document"}]})));
    }

    #[test]
    fn test_range_bounds_compose() {
        let mut filters = FilterSet::new();
        filters.merge_range("attachments.size", |b| b.greater_than = Some(json!(1024)));
        filters.merge_range("attachments.size", |b| b.less_than = Some(json!(4096)));

        match filters.get("attachments.size") {
            Some(Predicate::Range(bounds)) => {
                assert_eq!(bounds.greater_than, Some(json!(1024)));
                assert_eq!(bounds.less_than, Some(json!(4096)));
            }
            other => panic!("expected a range predicate, got {:?}", other),
        }

        assert!(filters.matches(&json!({"attachments": [{"size": 2048}]})));
        assert!(!filters.matches(&json!({"attachments": [{"size": 512}]})));
        assert!(!filters.matches(&json!({"attachments": [{"size": 8192}]})));
    }

    #[test]
    fn test_range_over_timestamps() {
        let mut filters = FilterSet::new();
        filters.merge_range("createdAt", |b| {
            b.greater_or_equal = Some(json!("2024-05-01T00:00:00.000Z"));
            b.less_or_equal = Some(json!("2024-05-01T23:59:59.999Z"));
        });
        assert!(filters.matches(&json!({"createdAt": "2024-05-01T12:30:00.000Z"})));
        assert!(!filters.matches(&json!({"createdAt": "2024-05-02T00:00:00.000Z"})));
    }

    #[test]
    fn test_exists_requires_non_empty() {
        let mut filters = FilterSet::new();
        filters.set("attachments", Predicate::Exists);
        assert!(filters.matches(&json!({"attachments": [{"size": 10}]})));
        assert!(!filters.matches(&json!({"attachments": []})));
        assert!(!filters.matches(&json!({})));
    }

    #[test]
    fn test_or_group_missing_or_empty() {
        let unread = Predicate::AnyOf(vec![
            FilterClause::new("readBy", Predicate::Missing),
            FilterClause::new("readBy", Predicate::Empty),
        ]);
        let mut filters = FilterSet::new();
        filters.set("readBy", unread);

        assert!(filters.matches(&json!({"readBy": []})));
        assert!(filters.matches(&json!({})));
        assert!(!filters.matches(&json!({"readBy": ["u1"]})));
    }

    #[test]
    fn test_serialized_shape() {
        let mut filters = FilterSet::new();
        filters.set("senderId", Predicate::Equals(json!("alice")));
        filters.merge_range("attachments.size", |b| b.greater_than = Some(json!(1048576)));

        let encoded = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            encoded,
            json!({
                "senderId": {"op": "equals", "value": "alice"},
                "attachments.size": {"op": "range", "value": {"greaterThan": 1048576}},
            })
        );
    }

    #[test]
    fn test_display_summary() {
        let mut filters = FilterSet::new();
        filters.set("senderId", Predicate::Equals(json!("alice")));
        filters.merge_range("attachments.size", |b| b.greater_than = Some(json!(1024)));
        let summary = filters.to_string();
        assert!(summary.contains("senderId == \"alice\""));
        assert!(summary.contains("attachments.size > 1024"));
    }
}
