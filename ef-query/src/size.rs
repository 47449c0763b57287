use regex::Regex;

/// Parse a byte-size token (`10mb`, `500kb`, `1.5gb`) into a byte count.
///
/// Multipliers are binary (kb = 1024, mb = 1024², gb = 1024³); the
/// arithmetic is delegated to the `parse-size` crate configured for binary
/// units. A bare number without a unit is rejected, as is any other
/// non-matching token.
pub fn parse_size_token(token: &str) -> Option<u64> {
    let token = token.trim();
    let re = Regex::new(r"^(?i)\d+(\.\d+)?\s*[kmg]b$").unwrap();
    if !re.is_match(token) {
        return None;
    }
    parse_size::Config::new().with_binary().parse_size(token).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table() {
        assert_eq!(parse_size_token("10mb"), Some(10 * 1024 * 1024));
        assert_eq!(parse_size_token("500kb"), Some(500 * 1024));
        assert_eq!(parse_size_token("1.5gb"), Some(1_610_612_736));
    }

    #[test]
    fn test_case_insensitive_units() {
        assert_eq!(parse_size_token("10MB"), Some(10 * 1024 * 1024));
        assert_eq!(parse_size_token("1Gb"), Some(1024 * 1024 * 1024));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert_eq!(parse_size_token("nonsense"), None);
        assert_eq!(parse_size_token("500"), None);
        assert_eq!(parse_size_token("mb10"), None);
        assert_eq!(parse_size_token("10tb"), None);
        assert_eq!(parse_size_token(""), None);
    }
}
