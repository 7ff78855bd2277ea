use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit in which [`Product::volume`] is expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Measure {
    Units,
    Milligrams,
    Milliliters,
    Millimeters,
}

/// Coarse quality signal attached to every scraped product.
///
/// Starts at `Neutral` and is downgraded to `Low` the first time any text
/// interpretation rule fails to recognize its input. It never goes back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    #[default]
    Neutral,
    Low,
}

/// A product as offered by the retailer at the time of the scrape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Retailer-assigned SKU, unique within one scrape run.
    pub identifier: String,
    /// Sanitized display name, e.g. `"Spar halfvolle melk"`.
    pub name: String,
    /// Package size, expressed in `volume_measure`. `1` unit when unknown.
    pub volume: u64,
    pub volume_measure: Measure,
    /// Regular price in cents.
    pub orig_price: u64,
    /// Effective price in cents for `discount_amount` items.
    ///
    /// Usually `<= orig_price`, but this is not enforced: odd promotional
    /// copy can produce a higher value and consumers must tolerate it.
    pub price: u64,
    /// Number of items that must be bought to get `price` (1 = no bundle).
    pub discount_amount: u64,
    /// Moment from which `price` applies.
    pub valid_on: DateTime<Utc>,
}

impl Product {
    /// Returns `true` if the effective price is a promotion of some kind.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        self.discount_amount > 1 || self.price < self.orig_price
    }
}

/// Information travelling alongside a [`Product`] that is not part of the
/// product itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    /// Full-size product image, when the listing exposes one.
    pub image_uri: Option<String>,
    pub retrieved_on: DateTime<Utc>,
    pub confidence: Confidence,
    /// Human-readable, non-fatal interpretation problems in the order they
    /// were encountered.
    pub problems: Vec<String>,
}

/// One emitted record of a scrape run: the product plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedRecord {
    /// Listing URI whose markup fragment contained the product.
    pub source_uri: String,
    pub product: Product,
    pub metadata: ProductMetadata,
}
