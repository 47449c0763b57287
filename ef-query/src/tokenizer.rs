use regex::Regex;
use serde::{Deserialize, Serialize};

/// A raw `key:value` token, in the order it appeared in the search string.
/// Keys are case-folded to lowercase; values are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOperator {
    pub key: String,
    pub value: String,
}

/// Output of [`tokenize`]: the operator sequence plus the free-text
/// fragments found between and around operators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub operators: Vec<RawOperator>,
    pub free_text: Vec<String>,
}

/// Split a raw search string into `key:value` operators and free text.
///
/// An operator value is either a quoted phrase (`subject:"board meeting"`)
/// or a run of non-whitespace characters. Never fails; empty input yields
/// an empty result.
pub fn tokenize(raw: &str) -> Tokenized {
    let raw = raw.trim();
    if raw.is_empty() {
        return Tokenized::default();
    }

    let re = Regex::new(r#"(\w+):(?:"([^"]*)"|(\S+))"#).unwrap();
    let mut operators = Vec::new();
    let mut free_text = Vec::new();
    let mut cursor = 0;

    for caps in re.captures_iter(raw) {
        let whole = caps.get(0).unwrap();
        push_fragment(&raw[cursor..whole.start()], &mut free_text);
        let value = caps
            .get(2)
            .or_else(|| caps.get(3))
            .map(|m| m.as_str())
            .unwrap_or_default();
        operators.push(RawOperator {
            key: caps[1].to_lowercase(),
            value: value.to_string(),
        });
        cursor = whole.end();
    }
    push_fragment(&raw[cursor..], &mut free_text);

    Tokenized {
        operators,
        free_text,
    }
}

fn push_fragment(text: &str, out: &mut Vec<String>) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(text.to_string());
    }
}
