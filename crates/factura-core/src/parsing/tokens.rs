use crate::template::schema::CodeRules;
use regex::Regex;
use std::sync::LazyLock;

static PLAIN_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("valid quantity regex"));

static GROUPED_QUANTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{1,3}(?:,[0-9]{3})+$").expect("valid grouped quantity regex"));

/// Check if a token can start a table row as a quantity.
///
/// Plain digit runs always qualify. With `allow_grouping`, comma-grouped
/// thousands ("1,500") qualify too.
pub fn is_quantity_like(token: &str, allow_grouping: bool) -> bool {
    let token = token.trim();
    PLAIN_QUANTITY.is_match(token) || (allow_grouping && GROUPED_QUANTITY.is_match(token))
}

/// Check if a token in the code column is a real product/UPC code.
///
/// Accepts numeric-only tokens, configured literals (e.g. country codes),
/// and uppercase alphanumeric codes with at least one digit whose length is
/// within `[min_len, max_len]`. Anything else is description text that
/// overflowed into the code column.
pub fn looks_like_code(token: &str, rules: &CodeRules) -> bool {
    let token = token.trim();
    if token.is_empty() {
        return false;
    }

    if token.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }

    if rules.literals.iter().any(|lit| lit == token) {
        return true;
    }

    let len = token.chars().count();
    (rules.min_len..=rules.max_len).contains(&len)
        && token
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        && token.chars().any(|c| c.is_ascii_digit())
}

/// Rewrite a leading 'A' that OCR misread from '4' on long numeric codes.
///
/// "A12345678901" -> "412345678901". Short tokens and tokens with other
/// letters are returned unchanged.
pub fn correct_leading_a(token: &str, min_len: usize) -> String {
    let token = token.trim();
    match token.strip_prefix('A') {
        Some(rest)
            if token.len() >= min_len
                && !rest.is_empty()
                && rest.chars().all(|c| c.is_ascii_digit()) =>
        {
            format!("4{rest}")
        }
        _ => token.to_string(),
    }
}
