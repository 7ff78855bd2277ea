use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use skog_core::Measure;

use crate::recorder::sanitize;

/// `"3x 100 g"`, `"6 x 33 cl"`: a repeat count in front of a package size.
static REPEAT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s*x\s*(\d.*)$").expect("valid repeat regex"));
/// Approximation prefixes in front of a weight: `"ca. 500 g"`.
static APPROX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:ca\.?|circa|ongeveer|±)\s*(\d.*)$").expect("valid approximation regex")
});
static QUANTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?)\s*([a-z]+)\.?$").expect("valid quantity regex")
});

/// Phrases for goods priced per item or with an unspecified portion.
const UNIT_PRICED: &[&str] = &[
    "los",
    "diverse",
    "div.",
    "diverse inhoud",
    "diverse soorten",
    "verschillende inhoud",
    "variabel gewicht",
    "op gewicht",
];

/// Countable item nouns: `"<n> <noun>"` means `n` units.
const COUNTABLE: &[&str] = &[
    "stuk", "stuks", "st", "rol", "rollen", "zakje", "zakjes", "blik", "blikken", "fles",
    "flessen", "pak", "pakken", "tabletten", "capsules", "doekjes", "wasbeurten", "paar", "set",
    "bos", "bossen", "eieren",
];

/// Portion nouns that cannot be converted into a quantity.
const PORTIONS: &[&str] = &[
    "portie", "porties", "persoon", "personen", "plakjes", "plakken", "bakje", "schaaltje", "tros",
];

/// Weight, volume and length tokens with their multiplier to the base unit.
const UNIT_TOKENS: &[(&str, u64, Measure)] = &[
    ("mg", 1, Measure::Milligrams),
    ("milligram", 1, Measure::Milligrams),
    ("g", 1_000, Measure::Milligrams),
    ("gr", 1_000, Measure::Milligrams),
    ("gram", 1_000, Measure::Milligrams),
    ("kg", 1_000_000, Measure::Milligrams),
    ("kilo", 1_000_000, Measure::Milligrams),
    ("kilogram", 1_000_000, Measure::Milligrams),
    ("ml", 1, Measure::Milliliters),
    ("milliliter", 1, Measure::Milliliters),
    ("cl", 100, Measure::Milliliters),
    ("centiliter", 100, Measure::Milliliters),
    ("l", 1_000, Measure::Milliliters),
    ("lt", 1_000, Measure::Milliliters),
    ("liter", 1_000, Measure::Milliliters),
    ("litre", 1_000, Measure::Milliliters),
    ("mm", 1, Measure::Millimeters),
    ("cm", 10, Measure::Millimeters),
    ("m", 1_000, Measure::Millimeters),
    ("meter", 1_000, Measure::Millimeters),
];

/// Package size of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    pub amount: u64,
    pub measure: Measure,
}

impl Default for Volume {
    /// One unit: the size of anything sold per piece or of unknown size.
    fn default() -> Self {
        Self {
            amount: 1,
            measure: Measure::Units,
        }
    }
}

/// Interprets package-size copy such as `"500 g"`, `"1,5 l"`, `"3x 100 g"`
/// or `"6 stuks"`.
///
/// Per-item and unspecified-portion phrases (`"per stuk"`, `"los"`,
/// `"4 porties"`) are recognized and yield [`Volume::default`]. Returns
/// `None` for anything not understood.
#[must_use]
pub fn interpret_unit(text: &str) -> Option<Volume> {
    let lower = sanitize(text).to_lowercase();

    if lower.starts_with("per ") || UNIT_PRICED.contains(&lower.as_str()) {
        return Some(Volume::default());
    }

    let (repeat, rest) = match REPEAT_RE.captures(&lower) {
        Some(caps) => {
            let repeat = caps[1].parse::<u64>().ok().filter(|&n| n > 0)?;
            (repeat, caps[2].to_owned())
        }
        None => (1, lower.clone()),
    };

    let rest = match APPROX_RE.captures(&rest) {
        Some(caps) => caps[1].to_owned(),
        None => rest,
    };
    let rest = rest.replace(',', ".");

    let caps = QUANTITY_RE.captures(&rest)?;
    let number = caps[1].parse::<Decimal>().ok()?;
    let word = &caps[2];

    if COUNTABLE.contains(&word) {
        if !number.fract().is_zero() {
            return None;
        }
        let amount = number.to_u64()?.checked_mul(repeat)?;
        return Some(Volume {
            amount,
            measure: Measure::Units,
        });
    }

    if PORTIONS.contains(&word) {
        return Some(Volume::default());
    }

    let &(_, multiplier, measure) = UNIT_TOKENS.iter().find(|(token, _, _)| *token == word)?;
    let amount = number
        .checked_mul(Decimal::from(multiplier))?
        .checked_mul(Decimal::from(repeat))?
        .trunc()
        .to_u64()?;

    Some(Volume { amount, measure })
}

#[cfg(test)]
#[path = "unit_test.rs"]
mod tests;
