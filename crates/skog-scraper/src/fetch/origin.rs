//! URI origin, domain and link resolution helpers.

use reqwest::Url;

use crate::error::ScraperError;

fn parse_absolute(uri: &str) -> Result<Url, ScraperError> {
    let url = Url::parse(uri).map_err(|e| ScraperError::InvalidUri {
        uri: uri.to_owned(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(ScraperError::InvalidUri {
            uri: uri.to_owned(),
            reason: "expected an http(s) URI with a host".to_owned(),
        });
    }
    Ok(url)
}

/// Extracts the scheme+host origin from a storefront URI.
///
/// Given `"http://derks.spar.nl/zuivel"`, returns `"http://derks.spar.nl"`.
/// Listing requests always go to the storefront root, whatever page the
/// configured URI points at.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUri`] if `uri` is not an absolute http(s)
/// URI.
pub fn origin_of(uri: &str) -> Result<String, ScraperError> {
    Ok(parse_absolute(uri)?.origin().ascii_serialization())
}

/// Resolves a link found on page `base` into an absolute URI.
///
/// # Errors
///
/// Returns [`ScraperError::InvalidUri`] if `base` is not an absolute http(s)
/// URI or `href` cannot be joined onto it.
pub fn resolve(base: &str, href: &str) -> Result<String, ScraperError> {
    let joined = parse_absolute(base)?
        .join(href)
        .map_err(|e| ScraperError::InvalidUri {
            uri: href.to_owned(),
            reason: e.to_string(),
        })?;
    Ok(joined.to_string())
}

/// Extracts the hostname from a URI for use in error messages.
///
/// Falls back to the full URI string if parsing fails.
pub(crate) fn domain_of(uri: &str) -> String {
    Url::parse(uri)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| uri.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_drops_path_and_query() {
        assert_eq!(
            origin_of("http://derks.spar.nl/zuivel?p=2").unwrap(),
            "http://derks.spar.nl"
        );
    }

    #[test]
    fn origin_keeps_non_default_port() {
        assert_eq!(
            origin_of("http://127.0.0.1:8080/").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn origin_rejects_non_http_uri() {
        assert!(origin_of("ftp://derks.spar.nl").is_err());
        assert!(origin_of("derks.spar.nl").is_err());
    }

    #[test]
    fn relative_links_resolve_against_page() {
        assert_eq!(
            resolve("http://derks.spar.nl/", "/brood").unwrap(),
            "http://derks.spar.nl/brood"
        );
        assert_eq!(
            resolve("http://derks.spar.nl/a/b", "c").unwrap(),
            "http://derks.spar.nl/a/c"
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        assert_eq!(
            resolve("http://derks.spar.nl/", "https://cdn.spar.nl/zuivel").unwrap(),
            "https://cdn.spar.nl/zuivel"
        );
    }

    #[test]
    fn domain_falls_back_to_input() {
        assert_eq!(domain_of("https://derks.spar.nl/x"), "derks.spar.nl");
        assert_eq!(domain_of("not a uri"), "not a uri");
    }
}
