//! Crawl controller: root page, category pages, paginated listings.

use chrono::Utc;
use skog_core::{ScrapeSummary, ScrapedRecord};
use uuid::Uuid;

use crate::category::{category_ids, category_links};
use crate::error::ScraperError;
use crate::fetch::{origin_of, resolve, Fetcher};
use crate::layout::FeedLayout;
use crate::listing::{listing_uri, ListingResponse};
use crate::product_parser::ProductParser;

/// Highest listing offset the crawl will request for one category.
///
/// The largest category seen has a few thousand products; anything beyond
/// this means the endpoint is misbehaving.
pub const MAX_OFFSET: u64 = 100_000;

/// Walks a storefront and hands every product found to a consumer.
///
/// Categories are visited one at a time in the order they appear on the
/// root page, and the pages of one category in strictly increasing offset
/// order.
pub struct Scraper<F> {
    fetcher: F,
    layout: &'static FeedLayout,
}

impl<F: Fetcher> Scraper<F> {
    pub fn new(fetcher: F, layout: &'static FeedLayout) -> Self {
        Self { fetcher, layout }
    }

    /// Crawls the storefront at `root_uri`, calling `on_record` for every
    /// product in emission order.
    ///
    /// Fetch failures, unreadable discovery pages, undecodable listings and
    /// listings that report a non-success status abandon the affected
    /// category; they are counted in the returned summary and the crawl
    /// moves on.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUri`] if `root_uri` is not an absolute
    ///   http(s) URI.
    /// - Any error for which [`ScraperError::is_fatal`] holds: malformed
    ///   product markup, or a listing that does not advance or runs past
    ///   [`MAX_OFFSET`].
    pub async fn scrape<R>(
        &self,
        root_uri: &str,
        mut on_record: R,
    ) -> Result<ScrapeSummary, ScraperError>
    where
        R: FnMut(ScrapedRecord),
    {
        origin_of(root_uri)?;

        let mut summary = ScrapeSummary::new(Uuid::new_v4());
        tracing::info!(
            run_id = %summary.run_id,
            root_uri,
            layout = self.layout.name,
            "starting scrape"
        );

        match self.fetcher.fetch(root_uri).await {
            Ok(root_page) => {
                summary.pages += 1;
                match category_links(&root_page) {
                    Ok(links) => {
                        for href in links {
                            self.visit_category(root_uri, &href, &mut summary, &mut on_record)
                                .await?;
                        }
                    }
                    Err(e) => {
                        tracing::error!(uri = root_uri, error = %e, "failed to read storefront root");
                        summary.errors += 1;
                    }
                }
            }
            Err(e) => {
                tracing::error!(uri = root_uri, error = %e, "failed to fetch storefront root");
                summary.errors += 1;
            }
        }

        tracing::info!(
            run_id = %summary.run_id,
            pages = summary.pages,
            products = summary.products,
            errors = summary.errors,
            failed_categories = summary.failed_categories.len(),
            "scrape finished"
        );
        Ok(summary)
    }

    /// Downloads raw image bytes.
    ///
    /// # Errors
    ///
    /// Propagates the fetcher error.
    pub async fn download_image(&self, uri: &str) -> Result<Vec<u8>, ScraperError> {
        self.fetcher.fetch_bytes(uri).await
    }

    async fn visit_category<R>(
        &self,
        root_uri: &str,
        href: &str,
        summary: &mut ScrapeSummary,
        on_record: &mut R,
    ) -> Result<(), ScraperError>
    where
        R: FnMut(ScrapedRecord),
    {
        let category_uri = match resolve(root_uri, href) {
            Ok(uri) => uri,
            Err(e) => {
                tracing::warn!(href, error = %e, "skipping unresolvable category link");
                summary.errors += 1;
                return Ok(());
            }
        };
        tracing::debug!(uri = %category_uri, "category discovered");

        let ids = match self.discover_category_ids(&category_uri, summary).await {
            Ok(ids) => ids,
            Err(e) => {
                abandon_category(summary, category_uri, &e);
                return Ok(());
            }
        };

        for category_id in ids {
            match self
                .scrape_listing(root_uri, &category_id, summary, on_record)
                .await
            {
                Ok(()) => {}
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    abandon_category(summary, category_uri, &e);
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    /// Fetches a category page and reads its listing ids.
    async fn discover_category_ids(
        &self,
        category_uri: &str,
        summary: &mut ScrapeSummary,
    ) -> Result<Vec<String>, ScraperError> {
        let page = self.fetcher.fetch(category_uri).await?;
        summary.pages += 1;

        let ids = category_ids(&page)?;
        if ids.is_empty() {
            tracing::debug!(uri = category_uri, "category page has no category id");
        }
        Ok(ids)
    }

    async fn scrape_listing<R>(
        &self,
        root_uri: &str,
        category_id: &str,
        summary: &mut ScrapeSummary,
        on_record: &mut R,
    ) -> Result<(), ScraperError>
    where
        R: FnMut(ScrapedRecord),
    {
        let mut offset = 0u64;
        loop {
            if offset > MAX_OFFSET {
                return Err(ScraperError::OffsetLimit {
                    category_id: category_id.to_owned(),
                    offset,
                    max_offset: MAX_OFFSET,
                });
            }

            let uri = listing_uri(root_uri, category_id, offset)?;
            let body = self.fetcher.fetch(&uri).await?;
            summary.pages += 1;

            let data = ListingResponse::from_body(&uri, &body)?.into_data(&uri)?;
            tracing::debug!(category_id, offset, new_offset = data.new_offset, "listing page fetched");
            if data.no_products {
                return Ok(());
            }
            if data.new_offset <= offset {
                return Err(ScraperError::PaginationStalled {
                    category_id: category_id.to_owned(),
                    offset,
                    new_offset: data.new_offset,
                });
            }

            let mut products = 0u64;
            let mut parser = ProductParser::new(self.layout, Utc::now(), |product, metadata| {
                products += 1;
                on_record(ScrapedRecord {
                    source_uri: uri.clone(),
                    product,
                    metadata,
                });
            });
            let parsed = parser.parse(&data.html);
            drop(parser);
            // Products emitted before a fatal error still count.
            summary.products += products;
            parsed?;

            offset = data.new_offset;
        }
    }
}

fn abandon_category(summary: &mut ScrapeSummary, category_uri: String, error: &ScraperError) {
    tracing::error!(uri = %category_uri, error = %error, "abandoning category");
    summary.errors += 1;
    summary.failed_categories.push(category_uri);
}
