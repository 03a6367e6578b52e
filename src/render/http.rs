//! HTTP page loader
//!
//! Fetches pages with a single GET and serves the response body as the
//! document. Nothing on the page ever executes, so content rendered by
//! scripts is invisible and interactive reveals are unsupported.

use crate::config::RendererConfig;
use crate::render::traits::{PageLoader, PageSession};
use crate::FetchError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Builds an HTTP client with the configured user agent and timeouts
///
/// # Example
///
/// ```no_run
/// use rentscraper::config::RendererConfig;
/// use rentscraper::render::build_http_client;
///
/// let client = build_http_client(&RendererConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &RendererConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_millis(config.request_timeout_ms))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Loader that renders pages as their raw HTTP response body
pub struct HttpPageLoader {
    client: Client,
    timeout: Duration,
}

impl HttpPageLoader {
    pub fn new(config: &RendererConfig) -> Result<Self, FetchError> {
        let client = build_http_client(config).map_err(|source| FetchError::Transport {
            url: String::new(),
            source,
        })?;
        Ok(Self {
            client,
            timeout: Duration::from_millis(config.request_timeout_ms),
        })
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                what: url.to_string(),
                waited: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: e,
            }
        }
    }
}

#[async_trait]
impl PageLoader for HttpPageLoader {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.classify(url, e))?;
        tracing::trace!("Downloaded {} bytes from {}", body.len(), url);

        Ok(Box::new(HttpPageSession {
            url: url.to_string(),
            body,
        }))
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// A fetched response body
struct HttpPageSession {
    url: String,
    body: String,
}

#[async_trait]
impl PageSession for HttpPageSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn content(&mut self) -> Result<String, FetchError> {
        Ok(self.body.clone())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), FetchError> {
        Err(FetchError::Unsupported("click"))
    }

    async fn close(self: Box<Self>) {}
}
