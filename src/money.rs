//! Coercion of loosely typed form values into numbers and display text.
//!
//! Nothing here fails: a value that cannot be read becomes `0` or a visible
//! placeholder, so a statement never loses a row to a type error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Blank-line marker printed where a text field was left empty.
pub const PLACEHOLDER: &str = "____________";

/// How a zero amount is printed at a given call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroPolicy {
    /// Zero prints as an empty cell.
    Blank,
    /// Zero prints as `$0.00`.
    Show,
}

/// Coerce any field value into a finite number. Absent, null, empty and
/// unparseable values are `0`.
pub fn to_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_decimal(s),
        _ => 0.0,
    };
    if n.is_finite() { n } else { 0.0 }
}

/// Accepts an optional sign, an optional `$`, digits with `,` grouping and
/// at most one decimal point. Anything else is `0`.
fn parse_decimal(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(r) => (true, r.trim_start()),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let rest = rest.strip_prefix('$').unwrap_or(rest);
    let cleaned: String = rest.chars().filter(|&c| c != ',').collect();

    let well_formed = cleaned.chars().any(|c| c.is_ascii_digit())
        && cleaned.chars().all(|c| c.is_ascii_digit() || c == '.')
        && cleaned.matches('.').count() <= 1;
    if !well_formed {
        return 0.0;
    }
    let v = cleaned.parse::<f64>().unwrap_or(0.0);
    if negative { -v } else { v }
}

/// Format an amount as `$1,234.56` (negatives as `-$1,234.56`), rounded to
/// the cent.
pub fn format_currency(amount: f64) -> String {
    let cents = if amount.is_finite() {
        (amount * 100.0).round()
    } else {
        0.0
    };
    let negative = cents < 0.0;
    // integral f64 prints exactly, so no amount is clamped to an integer type
    let mut digits = format!("{:.0}", cents.abs());
    if digits.len() < 3 {
        digits = format!("{digits:0>3}");
    }
    let (whole, frac) = digits.split_at(digits.len() - 2);

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac}")
}

/// Coerce then format a field value, applying the caller's zero policy.
pub fn to_currency_text(value: Option<&Value>, policy: ZeroPolicy) -> String {
    amount_text(to_number(value), policy)
}

/// Format an already coerced amount under a zero policy.
pub fn amount_text(amount: f64, policy: ZeroPolicy) -> String {
    let text = format_currency(amount);
    if policy == ZeroPolicy::Blank && text == "$0.00" {
        String::new()
    } else {
        text
    }
}

/// Stringify a field value, or return `fallback` when it is absent, null,
/// blank after trimming, or not a scalar.
pub fn safe_text(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(true)) => "Yes".to_string(),
        Some(Value::Bool(false)) => "No".to_string(),
        _ => fallback.to_string(),
    }
}

/// Like [`safe_text`], but ISO dates (`YYYY-MM-DD`, optionally followed by a
/// time) are printed as `MM/DD/YYYY`.
pub fn format_date(value: Option<&Value>, fallback: &str) -> String {
    let text = safe_text(value, fallback);
    if text == fallback {
        return text;
    }
    let date_part = match text.char_indices().nth(10) {
        Some((idx, 'T')) | Some((idx, ' ')) => &text[..idx],
        _ => text.as_str(),
    };
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%m/%d/%Y").to_string(),
        Err(_) => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coercion_is_total() {
        let inputs = [
            None,
            Some(json!(null)),
            Some(json!("")),
            Some(json!("abc")),
            Some(json!("12.50")),
            Some(json!(12.5)),
            Some(json!("-3")),
            Some(json!("NaN")),
            Some(json!("inf")),
            Some(json!([1, 2])),
            Some(json!({"a": 1})),
            Some(json!(true)),
        ];
        for input in &inputs {
            let n = to_number(input.as_ref());
            assert!(n.is_finite(), "{input:?} -> {n}");
        }
        assert_eq!(to_number(Some(&json!("-3"))), -3.0);
        assert_eq!(to_number(Some(&json!("abc"))), 0.0);
        assert_eq!(to_number(Some(&json!("12.50"))), 12.5);
        assert_eq!(to_number(Some(&json!(12.5))), 12.5);
        assert_eq!(to_number(Some(&json!(""))), 0.0);
        assert_eq!(to_number(None), 0.0);
    }

    #[test]
    fn accepts_typed_currency() {
        assert_eq!(to_number(Some(&json!("$1,234.56"))), 1234.56);
        assert_eq!(to_number(Some(&json!("  -$20 "))), -20.0);
        assert_eq!(to_number(Some(&json!("+7"))), 7.0);
        assert_eq!(to_number(Some(&json!("1.2.3"))), 0.0);
        assert_eq!(to_number(Some(&json!("."))), 0.0);
        assert_eq!(to_number(Some(&json!("1e5"))), 0.0);
    }

    #[test]
    fn currency_formatting() {
        assert_eq!(format_currency(1234.56), "$1,234.56");
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(-4500.0), "-$4,500.00");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(12.345_1), "$12.35");
        assert_eq!(format_currency(999.999), "$1,000.00");
        assert_eq!(format_currency(0.1 + 0.2), "$0.30");
        assert_eq!(format_currency(0.05), "$0.05");
    }

    #[test]
    fn huge_amounts_keep_every_digit() {
        assert_eq!(format_currency(12_345_678_901_234.0), "$12,345,678,901,234.00");
        assert_eq!(format_currency(1e20), "$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(-1e20), "-$100,000,000,000,000,000,000.00");
        assert_eq!(format_currency(f64::INFINITY), "$0.00");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }

    #[test]
    fn zero_policy_is_explicit() {
        assert_eq!(to_currency_text(Some(&json!("")), ZeroPolicy::Blank), "");
        assert_eq!(to_currency_text(Some(&json!("")), ZeroPolicy::Show), "$0.00");
        assert_eq!(to_currency_text(Some(&json!("5")), ZeroPolicy::Blank), "$5.00");
    }

    #[test]
    fn safe_text_uses_fallback() {
        assert_eq!(safe_text(None, PLACEHOLDER), PLACEHOLDER);
        assert_eq!(safe_text(Some(&json!("   ")), "-"), "-");
        assert_eq!(safe_text(Some(&json!(" Jane ")), "-"), "Jane");
        assert_eq!(safe_text(Some(&json!(3)), "-"), "3");
        assert_eq!(safe_text(Some(&json!(false)), "-"), "No");
        assert_eq!(safe_text(Some(&json!(["x"])), "-"), "-");
    }

    #[test]
    fn dates_are_normalized() {
        assert_eq!(format_date(Some(&json!("2019-06-01")), "-"), "06/01/2019");
        assert_eq!(format_date(Some(&json!("2019-06-01T00:00:00Z")), "-"), "06/01/2019");
        assert_eq!(format_date(Some(&json!("June 2019")), "-"), "June 2019");
        assert_eq!(format_date(None, "-"), "-");
    }
}
