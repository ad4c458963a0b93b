use regex::Regex;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::LazyLock;

/// Digits, optional 3-digit groups, then a decimal separator and exactly two
/// fraction digits: "6.25", "2340.00", "1,200.00", "1.200,00".
/// ASCII digits only; `\d` is Unicode-aware.
static MONEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]+(?:[,.][0-9]{3})*[.,][0-9]{2}$").expect("valid money regex")
});

const CURRENCY_SYMBOLS: &[char] = &['$', '€', '£', '¥', '₡'];
const CURRENCY_CODES: &[&str] = &["USD", "US"];

/// Remove currency symbols and codes from a token.
///
/// "$6.25" -> "6.25", "USD1,200.00" -> "1,200.00", "$" -> "".
pub fn strip_currency(token: &str) -> String {
    let mut s: String = token
        .trim()
        .chars()
        .filter(|c| !CURRENCY_SYMBOLS.contains(c))
        .collect();

    for code in CURRENCY_CODES {
        if let Some(rest) = s.strip_prefix(code) {
            s = rest.to_string();
            break;
        }
        if let Some(rest) = s.strip_suffix(code) {
            s = rest.to_string();
            break;
        }
    }

    s.trim().to_string()
}

pub fn contains_currency_symbol(token: &str) -> bool {
    token.chars().any(|c| CURRENCY_SYMBOLS.contains(&c))
}

/// Strict decimal-money test, after stripping currency.
pub fn is_money(token: &str) -> bool {
    MONEY.is_match(&strip_currency(token))
}

/// Looser test used to corroborate row anchors: a strict money value, or
/// anything carrying a currency symbol (OCR often mangles the digits).
pub fn is_money_like(token: &str) -> bool {
    is_money(token) || contains_currency_symbol(token)
}

/// Pick the most plausible monetary value from a price column's tokens.
///
/// Scans in reverse and returns the first token that is a decimal-money value
/// once currency is stripped; the last token in a price column is usually the
/// cleanest read. Returns an empty string when nothing matches.
pub fn extract_money<S: AsRef<str>>(tokens: &[S]) -> String {
    tokens
        .iter()
        .rev()
        .map(|t| strip_currency(t.as_ref()))
        .find(|t| MONEY.is_match(t))
        .unwrap_or_default()
}

/// Parse a money string into a Decimal.
///
/// The separator before the last two digits is the decimal separator; any
/// other separator is a thousands group: "1,200.00" and "1.200,00" both give 1200.00.
pub fn parse_money(token: &str) -> Option<Decimal> {
    let s = strip_currency(token);
    if !MONEY.is_match(&s) {
        return None;
    }

    let split = s.len() - 3;
    let (int_part, frac_part) = (&s[..split], &s[split + 1..]);
    let digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    Decimal::from_str(&format!("{digits}.{frac_part}")).ok()
}

/// Parse a quantity ("234", "1,500") into a Decimal.
pub fn parse_quantity(token: &str) -> Option<Decimal> {
    let s = token.trim().replace(',', "");
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    Decimal::from_str(&s).ok()
}
