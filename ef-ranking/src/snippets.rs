use serde_json::Value;

/// Characters kept on each side of a match.
pub const DEFAULT_WINDOW: usize = 40;

/// At most this many excerpts per text.
pub const MAX_SNIPPETS: usize = 3;

/// Bounded excerpts around each case-insensitive occurrence of `query` in
/// `text`, for result highlighting. An ellipsis marks a side that was
/// truncated. Empty input or no match yields an empty list.
///
/// Windows are measured in characters, so multi-byte text never splits a
/// code point.
pub fn snippets(text: &str, query: &str, window: usize) -> Vec<String> {
    let query = query.trim();
    if text.is_empty() || query.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let haystack = fold_chars(&chars);
    let needle = fold_chars(&query.chars().collect::<Vec<_>>());

    let mut out = Vec::new();
    let mut from = 0;
    while out.len() < MAX_SNIPPETS {
        let pos = match find_from(&haystack, &needle, from) {
            Some(pos) => pos,
            None => break,
        };
        let begin = pos.saturating_sub(window);
        let end = (pos + needle.len() + window).min(chars.len());

        let mut snippet = String::new();
        if begin > 0 {
            snippet.push_str("...");
        }
        snippet.extend(&chars[begin..end]);
        if end < chars.len() {
            snippet.push_str("...");
        }
        out.push(snippet);

        from = pos + needle.len();
    }
    out
}

/// [`snippets`] with the default window, over an optional JSON text field.
pub fn snippets_for_field(item: &Value, key: &str, query: &str) -> Vec<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(|text| snippets(text, query, DEFAULT_WINDOW))
        .unwrap_or_default()
}

/// Per-character case folding keeps positions aligned with the original
/// text (a full `str::to_lowercase` may change the character count).
fn fold_chars(chars: &[char]) -> Vec<char> {
    chars
        .iter()
        .map(|c| c.to_lowercase().next().unwrap_or(*c))
        .collect()
}

fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() || from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()] == *needle)
}
