use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Totals reported at the end of a scrape run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeSummary {
    pub run_id: Uuid,
    /// Every page requested: root, category pages and listing pages.
    pub pages: u64,
    /// Products handed to the record consumer.
    pub products: u64,
    /// Transient fetch failures and abandoned categories.
    pub errors: u64,
    /// Category page URIs abandoned after a fetch or listing failure.
    pub failed_categories: Vec<String>,
}

impl ScrapeSummary {
    #[must_use]
    pub fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            pages: 0,
            products: 0,
            errors: 0,
            failed_categories: Vec::new(),
        }
    }

    /// Returns `true` if no error of any kind was recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors == 0 && self.failed_categories.is_empty()
    }
}

impl std::fmt::Display for ScrapeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Pages: {}, products: {}, errors: {}",
            self.pages, self.products, self.errors
        )
    }
}
