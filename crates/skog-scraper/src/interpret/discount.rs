use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::recorder::sanitize;

static PERCENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*% korting$").expect("valid percent regex"));
/// `"2 voor € 3"`, `"3 voor €5,-"`, `"2 voor 1,99"`.
static BUNDLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+) voor (?:€\s*)?(\d+)(?:,(\d+|-))?$").expect("valid bundle regex")
});
static FREE_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*\+\s*(\d+) gratis$").expect("valid free item regex"));

/// Badges that describe a price already reflected in the listing price.
const PRICED_IN: &[&str] = &["prijs verlaagd", "actieprijs", "nu voordelig", "nieuw"];

/// Effective price of a promotion: `price` cents buys `discount_amount`
/// items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deal {
    pub price: u64,
    pub discount_amount: u64,
}

impl Deal {
    fn single(price: u64) -> Self {
        Self {
            price,
            discount_amount: 1,
        }
    }
}

/// Applies promotional copy such as `"20% korting"` or `"1 + 1 gratis"` to
/// the regular `price` in cents.
///
/// All arithmetic is integer and truncating. Returns `None` when the copy
/// is not one of the known promotion shapes.
#[must_use]
pub fn interpret_discount(text: &str, price: u64) -> Option<Deal> {
    let lower = sanitize(text).to_lowercase();

    if PRICED_IN.contains(&lower.as_str()) {
        return Some(Deal::single(price));
    }

    if let Some(caps) = PERCENT_RE.captures(&lower) {
        let percent = caps[1].parse::<u64>().ok().filter(|&n| n <= 100)?;
        let discounted = price.checked_mul(100 - percent)? / 100;
        return Some(Deal::single(discounted));
    }

    if let Some(caps) = BUNDLE_RE.captures(&lower) {
        let discount_amount = caps[1].parse::<u64>().ok().filter(|&n| n >= 1)?;
        // The bundle price is a decimal amount: "1,5" is 150 cents.
        let amount = match caps.get(3).map(|m| m.as_str()) {
            None | Some("-") => caps[2].parse::<Decimal>().ok()?,
            Some(fraction) => format!("{}.{fraction}", &caps[2]).parse::<Decimal>().ok()?,
        };
        let price = amount.checked_mul(Decimal::ONE_HUNDRED)?.trunc().to_u64()?;
        return Some(Deal {
            price,
            discount_amount,
        });
    }

    if lower == "2e halve prijs" {
        return Some(Deal {
            price: price.checked_mul(3)? / 4,
            discount_amount: 2,
        });
    }

    if lower == "2 halen, 1 betalen" {
        return Some(Deal {
            price: price / 2,
            discount_amount: 2,
        });
    }

    let caps = FREE_ITEM_RE.captures(&lower)?;
    match (&caps[1], &caps[2]) {
        ("1", "1") => Some(Deal {
            price: price / 2,
            discount_amount: 2,
        }),
        ("2", "1") => Some(Deal {
            price: price.checked_mul(2)? / 3,
            discount_amount: 3,
        }),
        _ => None,
    }
}

#[cfg(test)]
#[path = "discount_test.rs"]
mod tests;
