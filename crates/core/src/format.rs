//! Pure text helpers used by the renderer: BRL price formatting, HTML escaping,
//! and method labels.

use std::borrow::Cow;

use crate::types::SearchMethod;

/// Placeholder for listings without a usable price.
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a price as Brazilian reais, e.g. `R$ 95.000,00`.
///
/// Missing, zero, and NaN prices render as [`NOT_AVAILABLE`]. Amounts are
/// rounded to centavos half away from zero; negatives carry a leading `-`.
pub fn format_price(price: Option<f64>) -> String {
    let value = match price {
        Some(v) if v != 0.0 && !v.is_nan() => v,
        _ => return NOT_AVAILABLE.to_string(),
    };

    let sign = if value < 0.0 { "-" } else { "" };
    if value.is_infinite() {
        return format!("{sign}R$ \u{221E}");
    }

    let value = value.abs();
    // Past 2^53 every f64 is a whole number, so its own digits are exact.
    let (units, centavos) = if value >= EXACT_INTEGER_LIMIT {
        (format!("{value:.0}"), 0)
    } else {
        let cents = (value * 100.0).round() as u64;
        ((cents / 100).to_string(), cents % 100)
    };
    format!("{sign}R$ {},{centavos:02}", group_thousands(&units))
}

const EXACT_INTEGER_LIMIT: f64 = 9_007_199_254_740_992.0;

/// Insert `.` every three digits from the right.
fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(ch);
    }
    out
}

/// Escape text for embedding in HTML element content or quoted attributes.
pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Display label for a method identifier. Unknown identifiers are echoed as-is.
pub fn algorithm_name(method: &str) -> Cow<'_, str> {
    match method.parse::<SearchMethod>() {
        Ok(known) => Cow::Borrowed(known.label()),
        Err(_) => Cow::Borrowed(method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_zero_prices_are_not_available() {
        assert_eq!(format_price(None), "N/A");
        assert_eq!(format_price(Some(0.0)), "N/A");
        assert_eq!(format_price(Some(-0.0)), "N/A");
        assert_eq!(format_price(Some(f64::NAN)), "N/A");
    }

    #[test]
    fn prices_use_brazilian_grouping() {
        assert_eq!(format_price(Some(95000.0)), "R$ 95.000,00");
        assert_eq!(format_price(Some(1234567.891)), "R$ 1.234.567,89");
        assert_eq!(format_price(Some(999.5)), "R$ 999,50");
        assert_eq!(format_price(Some(12.0)), "R$ 12,00");
        assert_eq!(format_price(Some(0.125)), "R$ 0,13");
    }

    #[test]
    fn negative_prices_keep_sign_before_symbol() {
        assert_eq!(format_price(Some(-1500.0)), "-R$ 1.500,00");
    }

    #[test]
    fn huge_prices_keep_their_exact_digits() {
        assert_eq!(
            format_price(Some(2f64.powi(80))),
            "R$ 1.208.925.819.614.629.174.706.176,00"
        );
        assert_eq!(format_price(Some(9_007_199_254_740_992.0)), "R$ 9.007.199.254.740.992,00");
        let s = format_price(Some(1e40));
        assert!(s.starts_with("R$ 10.000.000.000.000.000.303."), "{s}");
        assert!(s.ends_with(",00"), "{s}");
    }

    #[test]
    fn positive_prices_always_show_currency_symbol() {
        for p in [0.01, 1.0, 42.42, 1e6, 3.5e9] {
            let s = format_price(Some(p));
            assert!(s.starts_with("R$ "), "{p} formatted as {s}");
        }
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        let raw = r#"<script>alert("x" & 'y')</script>"#;
        let escaped = escape_html(raw);
        for ch in ['<', '>', '"', '\''] {
            assert!(!escaped.contains(ch), "found raw {ch:?} in {escaped}");
        }
        // Every remaining '&' must start an entity we produced
        let stripped = escaped
            .replace("&amp;", "")
            .replace("&lt;", "")
            .replace("&gt;", "")
            .replace("&quot;", "")
            .replace("&#39;", "");
        assert!(!stripped.contains('&'));
    }

    #[test]
    fn escape_html_borrows_clean_text() {
        assert!(matches!(escape_html("Civic"), Cow::Borrowed("Civic")));
        assert_eq!(escape_html("Fusca & Kombi"), "Fusca &amp; Kombi");
    }

    #[test]
    fn known_methods_have_fixed_labels() {
        assert_eq!(algorithm_name("sequential"), "Busca Sequencial");
        assert_eq!(algorithm_name("indexed"), "Busca Indexada");
        assert_eq!(algorithm_name("hash"), "Busca HashMap");
    }

    #[test]
    fn unknown_methods_are_echoed() {
        assert_eq!(algorithm_name("binary"), "binary");
        assert_eq!(algorithm_name(""), "");
        assert_eq!(algorithm_name("HASH"), "HASH");
    }
}
