//! Network access for the crawl.

mod cache;
mod origin;

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use skog_core::AppConfig;

use crate::error::ScraperError;
use crate::rate_limit::{retry_with_backoff, Pacer};

pub use cache::ResponseCache;
pub use origin::{origin_of, resolve};

/// Source of page bodies and image bytes.
///
/// Every failure is a recoverable fetch error from the crawl's point of
/// view: the affected page is skipped and counted.
pub trait Fetcher {
    fn fetch(&self, uri: &str) -> impl Future<Output = Result<String, ScraperError>> + Send;

    fn fetch_bytes(&self, uri: &str)
        -> impl Future<Output = Result<Vec<u8>, ScraperError>> + Send;
}

/// HTTP fetcher for the storefront.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx
/// responses as typed errors. Transient errors (429, network failures,
/// 5xx) are retried with exponential backoff up to `max_retries`
/// additional attempts. Consecutive requests are spaced by the configured
/// inter-request delay, and text responses can be served from and stored
/// in a [`ResponseCache`].
pub struct HttpFetcher {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay for exponential backoff: `backoff_base_ms * 2^attempt`.
    backoff_base_ms: u64,
    pacer: Pacer,
    cache: Option<ResponseCache>,
}

impl HttpFetcher {
    /// Creates an `HttpFetcher` with configured timeout, `User-Agent`, and
    /// retry policy. No pacing and no cache.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_ms,
            pacer: Pacer::new(Duration::ZERO),
            cache: None,
        })
    }

    /// Builds a fetcher from the scraper settings of `config`, including
    /// pacing and the optional cache directory.
    ///
    /// # Errors
    ///
    /// See [`HttpFetcher::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ScraperError> {
        let fetcher = Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_ms,
        )?
        .with_inter_request_delay(Duration::from_millis(config.scraper_inter_request_delay_ms));

        Ok(match &config.cache_dir {
            Some(dir) => fetcher.with_cache(ResponseCache::new(dir)),
            None => fetcher,
        })
    }

    #[must_use]
    pub fn with_inter_request_delay(mut self, delay: Duration) -> Self {
        self.pacer = Pacer::new(delay);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, cache: ResponseCache) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Sends one paced GET and maps non-success statuses to typed errors.
    async fn send(&self, uri: &str) -> Result<reqwest::Response, ScraperError> {
        self.pacer.wait().await;

        let response = self.client.get(uri).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(ScraperError::RateLimited {
                domain: origin::domain_of(uri),
                retry_after_secs,
            });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ScraperError::NotFound {
                url: uri.to_owned(),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: uri.to_owned(),
            });
        }

        Ok(response)
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<String, ScraperError> {
        if let Some(cache) = &self.cache {
            if let Some(body) = cache.get(uri).await? {
                tracing::debug!(uri, "served from cache");
                return Ok(body);
            }
        }

        let body = retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            Ok(self.send(uri).await?.text().await?)
        })
        .await?;

        if let Some(cache) = &self.cache {
            cache.put(uri, &body).await?;
        }
        Ok(body)
    }

    async fn fetch_bytes(&self, uri: &str) -> Result<Vec<u8>, ScraperError> {
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || async move {
            Ok(self.send(uri).await?.bytes().await?.to_vec())
        })
        .await
    }
}
