use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONNECTION, DNT, UPGRADE_INSECURE_REQUESTS,
    USER_AGENT,
};
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

pub const PROFILE_URL_PREFIX: &str = "https://www.linkedin.com/in/";

/// Checks that the input parses as a URL and points at a profile page.
/// Every entry point runs this before the pipeline.
pub fn is_profile_url(url: &str) -> bool {
    let parsed = match Url::parse(url) {
        Ok(u) => u,
        Err(_) => return false,
    };
    parsed.scheme() == "https"
        && parsed.host_str() == Some("www.linkedin.com")
        && parsed.path().starts_with("/in/")
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("unexpected status {status} from {url}")]
    Status { status: StatusCode, url: String },
}

/// Raw result of one GET. The body is kept as bytes; decoding is the
/// pipeline's concern so a broken payload surfaces as a parse failure,
/// not a fetch failure.
pub struct FetchedPage {
    pub status: StatusCode,
    pub body: Vec<u8>,
    pub final_url: String,
}

impl FetchedPage {
    /// The profile redirected to a login/auth wall. Extraction still runs;
    /// it will just come back nearly empty.
    pub fn hit_auth_wall(&self) -> bool {
        let url = self.final_url.to_lowercase();
        url.contains("authwall") || url.contains("/login")
    }
}

pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
        headers.insert(DNT, HeaderValue::from_static("1"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .default_headers(headers)
            .cookie_store(true)
            .build()
            .expect("Failed to build HTTP client");

        Fetcher { client }
    }

    fn get_random_user_agent(&self) -> &str {
        let uas = [
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
            "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
        ];
        use rand::Rng;
        let mut rng = rand::thread_rng();
        uas[rng.gen_range(0..uas.len())]
    }

    /// One GET, no retry. Redirects are followed by the client; the final
    /// resolved URL is reported so callers can detect auth walls.
    pub fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let ua = self.get_random_user_agent();
        let resp = self.client.get(url).header(USER_AGENT, ua).send()?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        if !status.is_success() {
            return Err(FetchError::Status { status, url: final_url });
        }

        let body = resp.bytes()?.to_vec();
        Ok(FetchedPage { status, body, final_url })
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_url_prefix_check() {
        assert!(is_profile_url("https://www.linkedin.com/in/someone"));
        assert!(!is_profile_url("https://www.linkedin.com/company/acme"));
        assert!(!is_profile_url("http://www.linkedin.com/in/someone"));
        assert!(!is_profile_url("https://example.com/in/someone"));
    }

    #[test]
    fn profile_url_must_parse() {
        assert!(!is_profile_url("not a url at all"));
        assert!(!is_profile_url(""));
        assert!(!is_profile_url("https://"));
        // Query strings and fragments on a valid profile path are fine.
        assert!(is_profile_url("https://www.linkedin.com/in/someone?trk=public"));
    }

    #[test]
    fn auth_wall_detected_from_final_url() {
        let page = FetchedPage {
            status: StatusCode::OK,
            body: Vec::new(),
            final_url: "https://www.linkedin.com/authwall?trk=x".to_string(),
        };
        assert!(page.hit_auth_wall());

        let page = FetchedPage {
            status: StatusCode::OK,
            body: Vec::new(),
            final_url: "https://www.linkedin.com/in/someone".to_string(),
        };
        assert!(!page.hit_auth_wall());
    }
}
