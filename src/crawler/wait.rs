//! Bounded polling waits
//!
//! Rendered documents change under us (reveal buttons appear, masked values
//! fill in). `wait_for_markup` re-reads a document until a check over its
//! markup yields a value or the deadline passes. A timeout here is a
//! per-listing condition, never a crawl-level one.

use crate::render::PageSession;
use crate::FetchError;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failure of a bounded wait
#[derive(Debug, Error)]
pub enum WaitError {
    #[error("condition not met after {waited:?}")]
    Timeout { waited: Duration },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Re-reads `session` every `poll` until `check` returns `Some`, for at most `timeout`
///
/// The document is always read at least once, so a condition that already
/// holds succeeds even with a zero timeout. On success the markup the check
/// matched is returned alongside the value.
///
/// # Returns
///
/// * `Ok((T, String))` - The value and the markup it was found in
/// * `Err(WaitError::Timeout)` - The deadline passed first
/// * `Err(WaitError::Fetch)` - Reading the document failed; waiting stops
pub async fn wait_for_markup<T, F>(
    session: &mut dyn PageSession,
    timeout: Duration,
    poll: Duration,
    mut check: F,
) -> Result<(T, String), WaitError>
where
    F: FnMut(&str) -> Option<T>,
{
    let start = Instant::now();

    loop {
        let markup = session.content().await?;
        if let Some(value) = check(&markup) {
            return Ok((value, markup));
        }

        let waited = start.elapsed();
        if waited >= timeout {
            return Err(WaitError::Timeout { waited });
        }

        tokio::time::sleep(poll.min(timeout - waited)).await;
    }
}
