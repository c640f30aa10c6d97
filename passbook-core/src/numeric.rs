//! Locale-formatted number handling.
//!
//! Statement text carries amounts like `₹ 1,260.50`, `9,500.00` or `12.3456-`
//! (a NAV that wrapped onto the next line). Nothing in here fails loudly:
//! callers decide whether a bad token rejects a candidate.

/// Strip everything except digits and the decimal point, drop trailing points
/// and parse. Returns `0.0` for anything that is not a number.
pub fn clean_number(token: &str) -> f64 {
    let cleaned: String = token
        .replace(',', "")
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    let cleaned = cleaned.trim_end_matches('.');
    if cleaned.is_empty() {
        return 0.0;
    }
    cleaned.parse().unwrap_or(0.0)
}

/// Signed parse for change amounts and percentages (`-1,234.50`, `3.2`).
pub fn parse_signed(token: &str) -> Option<f64> {
    let cleaned: String = token
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',' && *c != '₹')
        .collect();
    cleaned.parse::<f64>().ok()
}

/// Parse a money token into integer cents. Fraction digits past the second
/// are truncated.
pub fn parse_cents(token: &str) -> Option<i64> {
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    let (negative, body) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.as_str()),
    };
    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit()) || !frac_part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let whole: i64 = if int_part.is_empty() { 0 } else { int_part.parse().ok()? };
    let mut frac: String = frac_part.chars().take(2).collect();
    while frac.len() < 2 {
        frac.push('0');
    }
    let cents = whole.checked_mul(100)?.checked_add(frac.parse::<i64>().ok()?)?;
    Some(if negative { -cents } else { cents })
}

/// Render cents as a plain decimal string with two fraction digits
pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

/// Reduce a source amount to at most two fraction digits without rounding.
///
/// Currency symbols, grouping separators, whitespace and the sign are dropped
/// (direction lives in the transaction type). The integer part is kept as
/// written. An empty or digit-free token yields an empty string.
pub fn truncate_amount(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return String::new();
    }

    let (int_part, frac_part) = match cleaned.split_once('.') {
        Some((i, f)) => (i, f),
        None => return cleaned,
    };
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac: String = frac_part.chars().filter(|c| c.is_ascii_digit()).take(2).collect();
    if frac.is_empty() {
        int_part.to_string()
    } else {
        format!("{}.{}", int_part, frac)
    }
}

/// Largest relative gap tolerated between the stated NAV and valuation / units
pub const NAV_TOLERANCE: f64 = 0.30;

/// Cross-check a mutual fund row: valuation / units must land within
/// [`NAV_TOLERANCE`] of the declared NAV.
pub fn is_coherent(units: &str, nav: &str, valuation: &str) -> bool {
    let units = clean_number(units);
    let nav = clean_number(nav);
    let valuation = clean_number(valuation);
    if units == 0.0 || nav == 0.0 || valuation == 0.0 {
        return false;
    }
    let derived_nav = valuation / units;
    (derived_nav - nav).abs() / nav <= NAV_TOLERANCE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_number_grouped() {
        assert_eq!(clean_number("1,260.50"), 1260.50);
        assert_eq!(clean_number("₹ 12,34,567.00"), 1234567.0);
        assert_eq!(clean_number("1260.,"), 1260.0);
    }

    #[test]
    fn test_clean_number_is_total() {
        assert_eq!(clean_number("--"), 0.0);
        assert_eq!(clean_number(""), 0.0);
        assert_eq!(clean_number("N/A"), 0.0);
        assert_eq!(clean_number("1.2.3"), 0.0);
    }

    #[test]
    fn test_clean_number_idempotent_on_clean_input() {
        for s in ["0.5", "10", "1005.00", "123.456"] {
            let once = clean_number(s);
            assert_eq!(clean_number(&once.to_string()), once);
        }
    }

    #[test]
    fn test_parse_signed() {
        assert_eq!(parse_signed("-1,234.50"), Some(-1234.5));
        assert_eq!(parse_signed("3.2"), Some(3.2));
        assert_eq!(parse_signed("-"), None);
    }

    #[test]
    fn test_cents_round_trip() {
        assert_eq!(parse_cents("9,500.00"), Some(950000));
        assert_eq!(parse_cents("500"), Some(50000));
        assert_eq!(parse_cents("0.5"), Some(50));
        assert_eq!(parse_cents("12.349"), Some(1234));
        assert_eq!(parse_cents("-"), None);
        assert_eq!(parse_cents(""), None);
        assert_eq!(format_cents(50000), "500.00");
        assert_eq!(format_cents(-30005), "-300.05");
    }

    #[test]
    fn test_truncate_never_rounds() {
        assert_eq!(truncate_amount("123.456"), "123.45");
        assert_eq!(truncate_amount("99.999"), "99.99");
        assert_eq!(truncate_amount("₹1,234.5"), "1234.5");
        assert_eq!(truncate_amount("-₹14.05"), "14.05");
        assert_eq!(truncate_amount("500"), "500");
        assert_eq!(truncate_amount("500."), "500");
        assert_eq!(truncate_amount(""), "");
    }

    #[test]
    fn test_coherence_window() {
        // implied NAV 10.05
        assert!(is_coherent("100", "10.00", "1005.00"));
        // implied NAV 20.00
        assert!(!is_coherent("100", "10.00", "2000.00"));
        assert!(!is_coherent("0", "10.00", "1005.00"));
        assert!(!is_coherent("100", "--", "1005.00"));
    }
}
