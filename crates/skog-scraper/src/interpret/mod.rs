//! Interpretation of Dutch storefront copy into numbers.
//!
//! Every rule except price parsing is total: input it does not recognize
//! yields `None`, and the caller records that through an [`Assessment`]
//! instead of failing. Retailer copy changes all the time and a product
//! with a low-confidence field is more useful than an aborted scrape.
//!
//! Price text is different. A listing price is structurally required, so
//! [`parse_price`] returns a hard error for anything that is not
//! `<digits>,<digits>`.

mod discount;
mod price;
mod unit;
mod validity;

use skog_core::Confidence;

pub use discount::{interpret_discount, Deal};
pub use price::parse_price;
pub use unit::{interpret_unit, Volume};
pub use validity::interpret_validity;

/// Confidence and problem log of one product under construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assessment {
    pub confidence: Confidence,
    pub problems: Vec<String>,
}

impl Assessment {
    /// Records that `value` of `field` was not understood and downgrades
    /// confidence to [`Confidence::Low`].
    pub fn report_unclear(&mut self, field: &str, value: &str) {
        self.problems
            .push(format!("Unclear '{field}' with value '{value}'"));
        self.confidence = Confidence::Low;
    }

    /// Passes `result` through, reporting `field`/`value` as unclear when
    /// it is `None`.
    pub fn recognize<T>(&mut self, field: &str, value: &str, result: Option<T>) -> Option<T> {
        if result.is_none() {
            self.report_unclear(field, value);
        }
        result
    }
}
