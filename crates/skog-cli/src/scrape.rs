//! Command handlers for the CLI.
//!
//! Called from `main` once configuration is loaded. Per-category failures
//! are logged and counted by the crawl itself; only fatal crawl errors and
//! output failures are propagated.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::Context;
use skog_core::{AppConfig, ScrapeSummary, ScrapedRecord};
use skog_scraper::{FeedLayout, HttpFetcher, Scraper};

fn layout_for(config: &AppConfig) -> anyhow::Result<&'static FeedLayout> {
    FeedLayout::by_name(&config.feed_layout).ok_or_else(|| {
        anyhow::anyhow!(
            "unknown feed layout '{}'; expected one of: {}",
            config.feed_layout,
            FeedLayout::NAMES.join(", ")
        )
    })
}

fn build_scraper(config: &AppConfig) -> anyhow::Result<Scraper<HttpFetcher>> {
    let layout = layout_for(config)?;
    let fetcher = HttpFetcher::from_config(config).context("failed to build HTTP client")?;
    Ok(Scraper::new(fetcher, layout))
}

/// Writes records as newline-delimited JSON.
///
/// The crawl callback cannot fail, so the first write error is kept and
/// reported by [`finish`](Self::finish); later records are discarded.
pub(crate) struct JsonLines<W: Write> {
    writer: W,
    written: u64,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonLines<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self {
            writer,
            written: 0,
            error: None,
        }
    }

    pub(crate) fn push(&mut self, record: &ScrapedRecord) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.write_line(record) {
            tracing::error!(error = %e, "failed to write record, discarding the rest");
            self.error = Some(e);
        }
    }

    fn write_line(&mut self, record: &ScrapedRecord) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flushes the output and returns the number of records written.
    pub(crate) fn finish(mut self) -> anyhow::Result<u64> {
        if let Some(e) = self.error {
            return Err(e);
        }
        self.writer.flush().context("failed to flush output")?;
        Ok(self.written)
    }
}

/// Crawls the configured storefront, writing every record to `out` (or
/// stdout).
///
/// # Errors
///
/// Returns an error if the layout is unknown, the output cannot be
/// written, or the crawl aborts on a fatal error.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    out: Option<&Path>,
) -> anyhow::Result<ScrapeSummary> {
    let scraper = build_scraper(config)?;

    let writer: Box<dyn Write> = match out {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    let mut sink = JsonLines::new(writer);

    let result = scraper
        .scrape(&config.root_uri, |record| sink.push(&record))
        .await;
    let written = sink.finish()?;
    let summary = result.context("scrape aborted")?;

    tracing::info!(run_id = %summary.run_id, written, "records written");
    if !summary.failed_categories.is_empty() {
        tracing::warn!(
            failed = ?summary.failed_categories,
            "some categories were abandoned"
        );
    }
    Ok(summary)
}

/// Downloads the image at `uri` into `out`.
///
/// # Errors
///
/// Returns an error if the download fails or the file cannot be written.
pub(crate) async fn run_image(config: &AppConfig, uri: &str, out: &Path) -> anyhow::Result<()> {
    let scraper = build_scraper(config)?;
    let bytes = scraper
        .download_image(uri)
        .await
        .with_context(|| format!("failed to download {uri}"))?;
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    tracing::info!(uri, bytes = bytes.len(), path = %out.display(), "image saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use skog_core::{Confidence, Measure, Product, ProductMetadata};

    use super::*;

    fn record(identifier: &str) -> ScrapedRecord {
        let at = Utc.with_ymd_and_hms(2024, 6, 20, 12, 0, 0).unwrap();
        ScrapedRecord {
            source_uri: "http://derks.spar.nl/xhr/getProducts?offset=0&limit=40&cat=12".to_owned(),
            product: Product {
                identifier: identifier.to_owned(),
                name: "Milk 1L".to_owned(),
                volume: 1000,
                volume_measure: Measure::Milliliters,
                orig_price: 109,
                price: 109,
                discount_amount: 1,
                valid_on: at,
            },
            metadata: ProductMetadata {
                image_uri: None,
                retrieved_on: at,
                confidence: Confidence::Neutral,
                problems: Vec::new(),
            },
        }
    }

    #[test]
    fn json_lines_writes_one_object_per_line() {
        let mut buf = Vec::new();
        let mut sink = JsonLines::new(&mut buf);
        sink.push(&record("A"));
        sink.push(&record("B"));
        assert_eq!(sink.finish().unwrap(), 2);

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: ScrapedRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.product.identifier, "A");
        assert!(lines[1].contains(r#""volume_measure":"milliliters""#));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn json_lines_reports_first_write_error() {
        let mut sink = JsonLines::new(BrokenPipe);
        sink.push(&record("A"));
        sink.push(&record("B"));
        assert!(sink.finish().is_err());
    }

    #[test]
    fn unknown_layout_is_rejected() {
        let mut config = test_config();
        config.feed_layout = "fancy".to_owned();
        let err = layout_for(&config).unwrap_err();
        assert!(err.to_string().contains("classic, badged"), "got: {err}");
    }

    #[test]
    fn configured_layout_is_resolved() {
        let mut config = test_config();
        config.feed_layout = "badged".to_owned();
        assert_eq!(layout_for(&config).unwrap().name, "badged");
    }

    fn test_config() -> AppConfig {
        AppConfig {
            env: skog_core::Environment::Test,
            log_level: "info".to_owned(),
            root_uri: "http://derks.spar.nl".to_owned(),
            feed_layout: "classic".to_owned(),
            cache_dir: None,
            scraper_request_timeout_secs: 30,
            scraper_user_agent: "skog-test/0.1".to_owned(),
            scraper_inter_request_delay_ms: 0,
            scraper_max_retries: 0,
            scraper_retry_backoff_base_ms: 0,
        }
    }
}
