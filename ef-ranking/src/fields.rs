use serde_json::Value;

/// The secondary title and long description count as one logical
/// "description" field in match reports.
const DESCRIPTION_VARIANTS: &[&str] = &["tagline", "description"];

pub(crate) fn text_field<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

pub(crate) fn list_field<'a>(item: &'a Value, key: &str) -> Vec<&'a str> {
    item.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

pub(crate) fn number_field(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

pub(crate) fn bool_field(item: &Value, key: &str) -> bool {
    item.get(key).and_then(Value::as_bool).unwrap_or(false)
}

pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Which logical fields of `item` contain `query`, case-insensitively.
/// Returns distinct names; empty for a blank query or an item with none of
/// the fields.
pub fn matching_fields(item: &Value, query: &str) -> Vec<&'static str> {
    let query = query.trim();
    let mut fields = Vec::new();
    if query.is_empty() {
        return fields;
    }

    if text_field(item, "name").is_some_and(|text| contains_ci(text, query)) {
        fields.push("name");
    }
    if DESCRIPTION_VARIANTS
        .iter()
        .any(|key| text_field(item, key).is_some_and(|text| contains_ci(text, query)))
    {
        fields.push("description");
    }
    if list_field(item, "tags")
        .iter()
        .any(|tag| contains_ci(tag, query))
    {
        fields.push("tags");
    }
    if text_field(item, "category").is_some_and(|text| contains_ci(text, query)) {
        fields.push("category");
    }
    if list_field(item, "amenities")
        .iter()
        .any(|amenity| contains_ci(amenity, query))
    {
        fields.push("amenities");
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_description_variants_collapse() {
        let item = json!({
            "tagline": "rooftop venue",
            "description": "a rooftop venue with a view",
        });
        assert_eq!(matching_fields(&item, "rooftop"), vec!["description"]);
    }

    #[test]
    fn test_list_fields_match_any_element() {
        let item = json!({
            "tags": ["wedding", "corporate"],
            "amenities": ["parking", "wifi"],
        });
        assert_eq!(matching_fields(&item, "corporate"), vec!["tags"]);
        assert_eq!(matching_fields(&item, "wifi"), vec!["amenities"]);
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let item = json!({"name": "Grand Ballroom"});
        assert_eq!(matching_fields(&item, "BALLROOM"), vec!["name"]);
    }

    #[test]
    fn test_blank_query_and_missing_fields() {
        let item = json!({"name": "Grand Ballroom"});
        assert!(matching_fields(&item, "").is_empty());
        assert!(matching_fields(&item, "   ").is_empty());
        assert!(matching_fields(&json!({}), "ballroom").is_empty());
        // Non-string field values are simply skipped.
        assert!(matching_fields(&json!({"name": 42}), "42").is_empty());
    }
}
