//! Listing page retrieval.
//!
//! The crawl only needs `fetch(url) -> body`. [`HttpFetcher`] is the real
//! implementation; tests plug in an in-memory [`PageFetcher`].

use crate::error::FetchError;
use std::time::Duration;
use tracing::{debug, instrument};

/// Browser identification sent with every request.
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

/// Something that can download a page.
pub trait PageFetcher {
    /// Download `url` and return its body as text.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// `reqwest`-backed fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client that gives up on a single request after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip(self))]
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched listing page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_agent_looks_like_a_browser() {
        assert!(USER_AGENT.starts_with("Mozilla/5.0 ("));
        assert!(USER_AGENT.contains("Chrome/"));
        assert!(!USER_AGENT.contains("  "));
    }

    #[tokio::test]
    async fn test_builds_client() {
        assert!(HttpFetcher::new(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn test_status_error_message() {
        let err = FetchError::Status {
            url: "https://habr.com/all/page99/".to_string(),
            status: reqwest::StatusCode::NOT_FOUND,
        };
        assert_eq!(
            err.to_string(),
            "https://habr.com/all/page99/ answered with status 404 Not Found"
        );
    }
}
