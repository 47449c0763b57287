use regex::Regex;

/// Parse a relative-time token (`30d`, `2w`, `6m`, `1y`) into a day count.
///
/// Multipliers are calendar-approximate: a month is 30 days, a year 365.
/// Returns `None` for anything that does not match; callers drop the
/// operator in that case.
pub fn parse_duration(token: &str) -> Option<i64> {
    let re = Regex::new(r"^(?i)(\d+)\s*([dwmy])$").unwrap();
    let caps = re.captures(token.trim())?;
    let count: i64 = caps[1].parse().ok()?;
    let per_unit = match caps[2].to_lowercase().as_str() {
        "d" => 1,
        "w" => 7,
        "m" => 30,
        "y" => 365,
        _ => return None,
    };
    Some(count * per_unit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table() {
        assert_eq!(parse_duration("30d"), Some(30));
        assert_eq!(parse_duration("2w"), Some(14));
        assert_eq!(parse_duration("6m"), Some(180));
        assert_eq!(parse_duration("1y"), Some(365));
    }

    #[test]
    fn test_case_insensitive_units() {
        assert_eq!(parse_duration("2W"), Some(14));
        assert_eq!(parse_duration("1Y"), Some(365));
    }

    #[test]
    fn test_rejects_malformed_tokens() {
        assert_eq!(parse_duration("abc"), None);
        assert_eq!(parse_duration("30"), None);
        assert_eq!(parse_duration("d30"), None);
        assert_eq!(parse_duration("30h"), None);
        assert_eq!(parse_duration(""), None);
    }
}
