use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScraperError;

/// Optional non-digit prefix (currency sign, "Nu", ...), then euros and
/// cents separated by a decimal comma.
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^0-9]*([0-9]+),([0-9]+)$").expect("valid price regex"));

/// Parses sanitized price text such as `"1,09"` or `"€ 12,50"` into cents.
///
/// The two digit groups are combined as `euros * 100 + cents` without any
/// rounding, so `"1,5"` is 105 cents. `field` names the markup field in
/// the error message.
///
/// # Errors
///
/// Returns [`ScraperError::MalformedPrice`] if the text does not match or
/// the amount does not fit in a `u64`.
pub fn parse_price(field: &'static str, text: &str) -> Result<u64, ScraperError> {
    let malformed = || ScraperError::MalformedPrice {
        field,
        text: text.to_owned(),
    };

    let caps = PRICE_RE.captures(text).ok_or_else(malformed)?;
    let euros = caps[1].parse::<u64>().map_err(|_| malformed())?;
    let cents = caps[2].parse::<u64>().map_err(|_| malformed())?;

    euros
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(malformed)
}
