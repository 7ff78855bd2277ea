//! Paginated product listing endpoint `GET /xhr/getProducts`.
//!
//! ## Observed response shape
//!
//! ```json
//! {"status": "success",
//!  "data": {"noProducts": false, "newOffset": 40, "html": "<li class=...>"}}
//! ```
//!
//! `status` is `"success"` on every good page. The last page of a category
//! has `noProducts: true` and usually omits `newOffset` and `html`, so both
//! default. `data` itself is absent on error responses.

use serde::Deserialize;

use crate::error::ScraperError;
use crate::fetch::origin_of;

/// Number of products requested per listing page.
pub const PAGE_SIZE: u32 = 40;

/// Top-level response from the listing endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListingResponse {
    pub status: String,
    #[serde(default)]
    pub data: Option<ListingData>,
}

/// Payload of a successful listing page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingData {
    #[serde(default)]
    pub no_products: bool,
    /// Offset of the next page. Must be greater than the requested offset.
    #[serde(default)]
    pub new_offset: u64,
    /// Product markup fragment for this page.
    #[serde(default)]
    pub html: String,
}

impl ListingResponse {
    /// Decodes a listing body.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Deserialize`] if `body` is not a listing
    /// response.
    pub fn from_body(uri: &str, body: &str) -> Result<Self, ScraperError> {
        serde_json::from_str(body).map_err(|e| ScraperError::Deserialize {
            context: format!("listing page {uri}"),
            source: e,
        })
    }

    /// Returns the page payload if the endpoint reported success.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UpstreamStatus`] for any status other than
    /// `"success"`.
    pub fn into_data(self, uri: &str) -> Result<ListingData, ScraperError> {
        if self.status != "success" {
            return Err(ScraperError::UpstreamStatus {
                uri: uri.to_owned(),
                status: self.status,
            });
        }
        Ok(self.data.unwrap_or_default())
    }
}

/// Builds the listing URI for `category_id` at `offset`, on the origin
/// (scheme and host) of `root_uri`.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUri`] if `root_uri` has no usable origin.
pub fn listing_uri(root_uri: &str, category_id: &str, offset: u64) -> Result<String, ScraperError> {
    let origin = origin_of(root_uri)?;
    let mut url = reqwest::Url::parse(&format!("{origin}/xhr/getProducts")).map_err(|e| {
        ScraperError::InvalidUri {
            uri: root_uri.to_owned(),
            reason: format!("origin \"{origin}\" is not a valid URL base: {e}"),
        }
    })?;

    url.query_pairs_mut()
        .append_pair("offset", &offset.to_string())
        .append_pair("limit", &PAGE_SIZE.to_string())
        .append_pair("cat", category_id);

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_with_products() {
        let body = r#"{"status":"success","data":{"noProducts":false,"newOffset":40,"html":"<li></li>"}}"#;
        let data = ListingResponse::from_body("u", body)
            .unwrap()
            .into_data("u")
            .unwrap();
        assert!(!data.no_products);
        assert_eq!(data.new_offset, 40);
        assert_eq!(data.html, "<li></li>");
    }

    #[test]
    fn last_page_may_omit_offset_and_html() {
        let body = r#"{"status":"success","data":{"noProducts":true}}"#;
        let data = ListingResponse::from_body("u", body)
            .unwrap()
            .into_data("u")
            .unwrap();
        assert!(data.no_products);
        assert_eq!(data.new_offset, 0);
        assert!(data.html.is_empty());
    }

    #[test]
    fn non_success_status_is_upstream_failure() {
        let body = r#"{"status":"error"}"#;
        let err = ListingResponse::from_body("http://shop.test/x", body)
            .unwrap()
            .into_data("http://shop.test/x")
            .unwrap_err();
        assert!(
            matches!(err, ScraperError::UpstreamStatus { ref status, .. } if status == "error"),
            "expected UpstreamStatus, got: {err:?}"
        );
    }

    #[test]
    fn invalid_json_is_deserialize_error() {
        let err = ListingResponse::from_body("u", "<html>").unwrap_err();
        assert!(matches!(err, ScraperError::Deserialize { .. }));
    }

    #[test]
    fn listing_uri_uses_origin_of_root() {
        assert_eq!(
            listing_uri("http://derks.spar.nl/home?x=1", "1234", 80).unwrap(),
            "http://derks.spar.nl/xhr/getProducts?offset=80&limit=40&cat=1234"
        );
    }

    #[test]
    fn listing_uri_encodes_category_id() {
        let uri = listing_uri("http://shop.test", "a b&c", 0).unwrap();
        assert!(uri.ends_with("cat=a+b%26c"), "unexpected uri: {uri}");
    }

    #[test]
    fn listing_uri_rejects_relative_root() {
        assert!(matches!(
            listing_uri("derks.spar.nl", "1", 0),
            Err(ScraperError::InvalidUri { .. })
        ));
    }
}
