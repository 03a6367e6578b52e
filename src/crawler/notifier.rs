//! Crawl progress notifications
//!
//! The coordinator reports page progress and every stored record through a
//! `CrawlObserver`. Observers are fire-and-forget: they cannot fail the
//! crawl and must not block it.

use crate::storage::RentalRecord;
use tokio::sync::mpsc;

/// Receives crawl progress
pub trait CrawlObserver: Send {
    /// A listing page is about to be processed
    fn on_page_progress(&mut self, current: u32, total: u32);

    /// A record was reconciled and written to the store
    fn on_record_processed(&mut self, identity: &str, record: &RentalRecord);
}

/// Observer that reports progress through `tracing`
#[derive(Debug, Default)]
pub struct LogObserver {
    processed: usize,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CrawlObserver for LogObserver {
    fn on_page_progress(&mut self, current: u32, total: u32) {
        tracing::info!("Scraping page {}/{}", current, total);
    }

    fn on_record_processed(&mut self, identity: &str, record: &RentalRecord) {
        self.processed += 1;
        tracing::info!(
            "Record {} stored ({} this run): {}",
            identity,
            self.processed,
            record.title
        );
    }
}

/// Event delivered by `ChannelObserver`
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlEvent {
    PageProgress { current: u32, total: u32 },
    RecordProcessed { identity: String, record: RentalRecord },
}

/// Observer that forwards events to a bounded channel
///
/// Events are dropped, not awaited, when the receiver falls behind or has
/// gone away.
#[derive(Debug)]
pub struct ChannelObserver {
    sender: mpsc::Sender<CrawlEvent>,
}

impl ChannelObserver {
    /// Creates an observer and the receiving end of its channel
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<CrawlEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender }, receiver)
    }

    fn send(&self, event: CrawlEvent) {
        if let Err(e) = self.sender.try_send(event) {
            tracing::debug!("Dropping crawl event: {}", e);
        }
    }
}

impl CrawlObserver for ChannelObserver {
    fn on_page_progress(&mut self, current: u32, total: u32) {
        self.send(CrawlEvent::PageProgress { current, total });
    }

    fn on_record_processed(&mut self, identity: &str, record: &RentalRecord) {
        self.send(CrawlEvent::RecordProcessed {
            identity: identity.to_string(),
            record: record.clone(),
        });
    }
}
