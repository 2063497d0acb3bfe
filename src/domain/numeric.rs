//! Defensive parsing for numeric fields that arrive as free-form text.
//!
//! Every helper here is total: malformed input yields `0.0` (or `0`), never a
//! panic, `NaN` or infinity.

/// Parses a decimal that may carry thousands separators or trailing junk.
///
/// Mirrors the leniency of the upstream feed: `"1,234.5"` → `1234.5`,
/// `"82 Rs"` → `82.0`, `"abc"` → `0.0`.
pub fn parse_number(raw: &str) -> f64 {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '_')
        .collect();

    if let Ok(value) = cleaned.parse::<f64>() {
        return finite_or_zero(value);
    }

    let prefix = numeric_prefix(&cleaned);
    prefix.parse::<f64>().map(finite_or_zero).unwrap_or(0.0)
}

/// Optional variant used for fields the API may omit.
pub fn parse_optional(raw: Option<&str>) -> f64 {
    raw.map(parse_number).unwrap_or(0.0)
}

/// Integer counts (package quantity). Fractions truncate, negatives clamp to zero.
pub fn parse_count(raw: &str) -> u32 {
    let value = parse_number(raw).trunc();
    if value <= 0.0 {
        0
    } else if value >= u32::MAX as f64 {
        u32::MAX
    } else {
        value as u32
    }
}

/// Formats a whole number with Indian-style comma grouping (`12,34,567`).
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round();
    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts: Vec<String> = Vec::new();
        let head_chars: Vec<char> = head.chars().collect();
        let mut end = head_chars.len();
        while end > 0 {
            let start = end.saturating_sub(2);
            parts.push(head_chars[start..end].iter().collect());
            end = start;
        }
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    if negative {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

fn numeric_prefix(input: &str) -> &str {
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    for (idx, ch) in input.char_indices() {
        match ch {
            '+' | '-' if idx == 0 => {}
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + ch.len_utf8();
    }

    if seen_digit {
        &input[..end]
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_thousands_separators() {
        assert_eq!(parse_number("1,234"), 1234.0);
        assert_eq!(parse_number(" 12,34,567.50 "), 1234567.5);
    }

    #[test]
    fn malformed_input_falls_back_to_zero() {
        assert_eq!(parse_number("abc"), 0.0);
        assert_eq!(parse_number(""), 0.0);
        assert_eq!(parse_number("-"), 0.0);
        assert_eq!(parse_number("NaN"), 0.0);
        assert_eq!(parse_number("inf"), 0.0);
        assert_eq!(parse_optional(None), 0.0);
    }

    #[test]
    fn leading_number_is_kept() {
        assert_eq!(parse_number("82 Rs"), 82.0);
        assert_eq!(parse_number("3.5kg"), 3.5);
    }

    #[test]
    fn counts_truncate_and_clamp() {
        assert_eq!(parse_count("3"), 3);
        assert_eq!(parse_count("2.9"), 2);
        assert_eq!(parse_count("-4"), 0);
        assert_eq!(parse_count("many"), 0);
    }

    #[test]
    fn grouping_uses_lakh_separators() {
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(1234.0), "1,234");
        assert_eq!(format_grouped(1234567.0), "12,34,567");
        assert_eq!(format_grouped(-25000.4), "-25,000");
    }
}
