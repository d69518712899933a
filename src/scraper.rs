use chrono::Local;
use log::{info, warn};
use scraper::Html;
use thiserror::Error;

use crate::extractor::Extractor;
use crate::fetcher::{FetchError, Fetcher};
use crate::record::ProfileRecord;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("could not parse response from {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Fetch + extract pipeline for one profile URL.
///
/// Holds no cross-call state beyond the reusable HTTP client, so callers
/// may run invocations back to back (or from parallel workers) freely.
pub struct ProfileScraper {
    fetcher: Fetcher,
    extractor: Extractor,
}

impl ProfileScraper {
    pub fn new() -> Self {
        ProfileScraper {
            fetcher: Fetcher::new(),
            extractor: Extractor::new(),
        }
    }

    /// Fetches the page and runs every field heuristic against it.
    ///
    /// Errors cover the fetch and parse boundaries only. An extraction that
    /// finds nothing is a valid `Ok` result; callers detect it through
    /// `record.name.is_none()`.
    pub fn scrape_profile(&self, url: &str) -> Result<ProfileRecord, ScrapeError> {
        info!("Fetching profile: {}", url);
        let page = self.fetcher.fetch(url)?;

        if page.hit_auth_wall() {
            warn!(
                "Redirected to an auth wall ({}); the profile is probably not public",
                page.final_url
            );
        }

        let html = decode_body(url, page.body)?;
        let document = Html::parse_document(&html);

        let retrieved_at = Local::now().to_rfc3339();
        let record = self.extractor.extract(&document, url, &retrieved_at);

        match &record.name {
            Some(name) => info!("Extracted profile for: {}", name),
            None => warn!("No profile name found at {}", url),
        }

        Ok(record)
    }
}

impl Default for ProfileScraper {
    fn default() -> Self {
        Self::new()
    }
}

/// The HTML parser itself is lenient, so the parse-failure class shows up
/// here: a body that is not UTF-8 text or carries no markup at all.
fn decode_body(url: &str, body: Vec<u8>) -> Result<String, ScrapeError> {
    let html = String::from_utf8(body).map_err(|e| ScrapeError::Parse {
        url: url.to_string(),
        reason: format!("body is not valid UTF-8: {}", e),
    })?;
    if !html.contains('<') {
        return Err(ScrapeError::Parse {
            url: url.to_string(),
            reason: "response contains no markup".to_string(),
        });
    }
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_utf8_body_is_a_parse_error() {
        let err = decode_body("https://www.linkedin.com/in/x", vec![0xff, 0xfe, 0x00, 0x41])
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse { .. }));
    }

    #[test]
    fn markup_free_body_is_a_parse_error() {
        let err = decode_body("https://www.linkedin.com/in/x", b"plain text only".to_vec())
            .unwrap_err();
        assert!(matches!(err, ScrapeError::Parse { .. }));
    }

    #[test]
    fn html_body_decodes() {
        let html = decode_body("u", b"<html><body></body></html>".to_vec()).unwrap();
        assert!(html.starts_with("<html>"));
    }
}
