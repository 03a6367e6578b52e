//! Rendering traits
//!
//! A `PageSession` is one open document. Its markup may change over time
//! (scripts finishing, a reveal click landing), so callers re-read
//! `content()` instead of caching it.

use crate::FetchError;
use async_trait::async_trait;

/// Opens documents for URLs
#[async_trait]
pub trait PageLoader: Send + Sync {
    /// Navigates to `url` and returns the open document
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, FetchError>;

    /// Short name for log lines
    fn name(&self) -> &'static str;
}

/// One open, possibly still rendering, document
#[async_trait]
pub trait PageSession: Send {
    /// URL the document was opened with
    fn url(&self) -> &str;

    /// Current markup of the document
    async fn content(&mut self) -> Result<String, FetchError>;

    /// Clicks the first element matching `selector`
    async fn click(&mut self, selector: &str) -> Result<(), FetchError>;

    /// Releases the document
    async fn close(self: Box<Self>);
}
