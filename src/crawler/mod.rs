//! Crawler module for incremental listing crawls
//!
//! This module contains the core crawling logic, including:
//! - Global fetch pacing
//! - Bounded waits on rendering documents
//! - The quick-check probe
//! - Reconciling extractions with stored records
//! - Overall crawl coordination and progress notification
//! - Running a crawl to completion with a final store flush

mod coordinator;
mod fetcher;
mod lifecycle;
mod notifier;
mod probe;
mod rate_limiter;
mod reconciler;
mod wait;

#[cfg(test)]
mod fake;
#[cfg(test)]
mod test_support;

pub use coordinator::{Coordinator, CrawlReport, ListingOutcome};
pub use fetcher::PageFetcher;
pub use lifecycle::run_to_completion;
pub use notifier::{ChannelObserver, CrawlEvent, CrawlObserver, LogObserver};
pub use probe::source_has_new_listings;
pub use rate_limiter::RateLimiter;
pub use reconciler::{has_important_differences, merge, Reconciled};
pub use wait::{wait_for_markup, WaitError};
