//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent string
//! - Following redirects and reporting the final URL
//! - Mapping failures onto crawl errors

use crate::config::UserAgentConfig;
use crate::WikiError;
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use url::Url;

/// Maximum number of redirect hops followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL that was asked for
    pub requested_url: Url,

    /// URL after following redirects
    pub final_url: Url,

    /// HTTP status code (always a success code)
    pub status: u16,

    /// Page body
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the request was redirected elsewhere
    pub fn was_redirected(&self) -> bool {
        self.requested_url != self.final_url
    }
}

/// Retrieves raw pages for the crawler
pub trait Fetcher {
    /// Fetches one URL
    ///
    /// A non-success status maps to `WikiError::Transport`.
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, WikiError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use wiki_ripple::config::UserAgentConfig;
/// use wiki_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        config.crawler_name, config.crawler_version, config.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from the user agent config and timeout
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, WikiError> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, WikiError>> + Send {
        let client = self.client.clone();
        let url = url.clone();
        async move { fetch_url(&client, url).await }
    }
}

/// Fetches a URL, following redirects
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx | `FetchedPage` with the final URL |
/// | any other status | `WikiError::Transport` |
/// | timeout | `WikiError::Timeout` |
/// | connection, TLS, redirect loop, body read | `WikiError::Http` |
pub async fn fetch_url(client: &Client, url: Url) -> Result<FetchedPage, WikiError> {
    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| classify_error(&url, e))?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(WikiError::Transport {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .text()
        .await
        .map_err(|e| classify_error(&url, e))?;

    tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

    Ok(FetchedPage {
        requested_url: url,
        final_url,
        status: status.as_u16(),
        body,
    })
}

fn classify_error(url: &Url, error: reqwest::Error) -> WikiError {
    if error.is_timeout() {
        WikiError::Timeout {
            url: url.to_string(),
        }
    } else {
        WikiError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_test_config(), Duration::from_secs(5));
        assert!(client.is_ok());
    }

    #[test]
    fn test_was_redirected() {
        let requested = Url::parse("https://en.wiki.test/wiki/Old").unwrap();
        let page = FetchedPage {
            requested_url: requested.clone(),
            final_url: Url::parse("https://en.wiki.test/wiki/New").unwrap(),
            status: 200,
            body: String::new(),
        };
        assert!(page.was_redirected());

        let same = FetchedPage {
            final_url: requested,
            ..page
        };
        assert!(!same.was_redirected());
    }

    #[tokio::test]
    async fn test_connection_refused_is_http_error() {
        let fetcher =
            HttpFetcher::from_config(&create_test_config(), Duration::from_secs(2)).unwrap();
        // Port 9 on localhost is not expected to accept connections.
        let url = Url::parse("http://127.0.0.1:9/wiki/Nothing").unwrap();

        let err = fetcher.fetch(&url).await.unwrap_err();
        assert!(matches!(
            err,
            WikiError::Http { .. } | WikiError::Timeout { .. }
        ));
        assert!(err.is_fatal());
    }
}
