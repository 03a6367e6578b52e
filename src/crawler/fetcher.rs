//! Rate-limited page access
//!
//! Every document the crawl opens goes through `PageFetcher::open`, which
//! takes a slot from the shared rate limiter first. Nothing else in the
//! crawler talks to the loader directly.

use crate::config::CrawlerConfig;
use crate::crawler::rate_limiter::RateLimiter;
use crate::crawler::wait::{wait_for_markup, WaitError};
use crate::render::{PageLoader, PageSession};
use crate::sources::SiteExtractor;
use crate::FetchError;
use std::time::Duration;

/// Paced access to a page loader
pub struct PageFetcher {
    loader: Box<dyn PageLoader>,
    limiter: RateLimiter,
    wait_timeout: Duration,
    poll_interval: Duration,
    pages_fetched: u32,
}

impl PageFetcher {
    pub fn new(loader: Box<dyn PageLoader>, config: &CrawlerConfig) -> Self {
        Self {
            loader,
            limiter: RateLimiter::new(config.page_query_interval()),
            wait_timeout: config.wait_timeout(),
            poll_interval: config.wait_poll_interval(),
            pages_fetched: 0,
        }
    }

    /// Waits for a rate-limiter slot, then opens `url`
    pub async fn open(&mut self, url: &str) -> Result<Box<dyn PageSession>, FetchError> {
        self.limiter.acquire().await;
        self.pages_fetched += 1;
        tracing::debug!("Opening {} via {}", url, self.loader.name());
        self.loader.open(url).await
    }

    /// Opens a listing page and returns its markup once it has rendered
    ///
    /// If the page never reports itself ready within the wait timeout, the
    /// markup at that point is returned anyway; header extraction then
    /// decides whether it is usable.
    pub async fn listing_markup(
        &mut self,
        extractor: &dyn SiteExtractor,
        url: &str,
    ) -> Result<String, FetchError> {
        let mut session = self.open(url).await?;

        let ready = wait_for_markup(
            session.as_mut(),
            self.wait_timeout,
            self.poll_interval,
            |markup| extractor.listing_ready(markup).then_some(()),
        )
        .await;

        let markup = match ready {
            Ok(((), markup)) => Ok(markup),
            Err(WaitError::Timeout { waited }) => {
                tracing::warn!("Listing page {} not ready after {:?}", url, waited);
                session.content().await
            }
            Err(WaitError::Fetch(e)) => Err(e),
        };

        session.close().await;
        markup
    }

    /// Bounded wait settings for detail-page conditions
    pub fn wait_settings(&self) -> (Duration, Duration) {
        (self.wait_timeout, self.poll_interval)
    }

    /// Number of documents opened so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }
}
