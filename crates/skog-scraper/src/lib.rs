pub mod category;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod interpret;
pub mod layout;
pub mod listing;
pub mod markup;
pub mod product_parser;
pub mod recorder;
pub mod scope;

mod rate_limit;

pub use category::{CategoryIdParser, CategoryParser};
pub use crawl::{Scraper, MAX_OFFSET};
pub use error::ScraperError;
pub use fetch::{Fetcher, HttpFetcher, ResponseCache};
pub use layout::FeedLayout;
pub use product_parser::{parse_products, ProductParser};
