//! Crawl lifecycle with a guaranteed final flush
//!
//! The coordinator only checkpoints. Whatever ends the run (pages exhausted,
//! a fatal error, or the shutdown future firing) the store is saved exactly
//! once more on the way out.

use crate::crawler::coordinator::{Coordinator, CrawlReport};
use crate::storage::RecordStore;
use crate::Result;
use std::future::Future;

/// Runs `coordinator` until it finishes or `shutdown` completes, then saves
///
/// # Returns
///
/// * `Ok(Some(report))` - The crawl finished and the store was saved
/// * `Ok(None)` - Shutdown was requested and the store was saved
/// * `Err(ScraperError)` - The crawl or the final save failed. A crawl error
///   takes precedence; the save is still attempted first.
pub async fn run_to_completion<F>(
    coordinator: &mut Coordinator,
    store: &mut dyn RecordStore,
    shutdown: F,
) -> Result<Option<CrawlReport>>
where
    F: Future<Output = ()>,
{
    let outcome = tokio::select! {
        result = coordinator.run(&mut *store) => Some(result),
        () = shutdown => {
            tracing::info!("Shutdown requested, stopping crawl");
            None
        }
    };

    tracing::info!("Saving database ({} records)", store.len());
    let saved = store.save();

    match outcome {
        Some(Ok(report)) => {
            saved?;
            Ok(Some(report))
        }
        Some(Err(e)) => {
            if let Err(save_error) = saved {
                tracing::error!("Final save after failed crawl also failed: {}", save_error);
            }
            Err(e)
        }
        None => {
            saved?;
            Ok(None)
        }
    }
}
