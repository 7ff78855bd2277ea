use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by {domain} (retry after {retry_after_secs}s)")]
    RateLimited {
        domain: String,
        retry_after_secs: u64,
    },

    #[error("endpoint not found: {url}")]
    NotFound { url: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("response cache error at {path}: {source}")]
    Cache {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid URI \"{uri}\": {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("malformed {field} '{text}'")]
    MalformedPrice { field: &'static str, text: String },

    #[error("malformed image uri '{uri}'")]
    MalformedImageUri { uri: String },

    #[error("listing {uri} reported status \"{status}\"")]
    UpstreamStatus { uri: String, status: String },

    #[error(
        "pagination for category {category_id} did not advance: offset {offset}, next offset {new_offset}"
    )]
    PaginationStalled {
        category_id: String,
        offset: u64,
        new_offset: u64,
    },

    #[error("pagination for category {category_id} exceeded offset {max_offset} (at {offset})")]
    OffsetLimit {
        category_id: String,
        offset: u64,
        max_offset: u64,
    },
}

impl ScraperError {
    /// Returns `true` for failures that must abort the whole scrape run:
    /// malformed product fragments and broken pagination progress.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ScraperError::MalformedPrice { .. }
                | ScraperError::MalformedImageUri { .. }
                | ScraperError::PaginationStalled { .. }
                | ScraperError::OffsetLimit { .. }
        )
    }
}
