//! Global fetch pacing
//!
//! One limiter is shared by every fetch of a crawl (listing pages, detail
//! pages and the quick-check probe alike). At most one caller is admitted
//! per interval, in arrival order.

use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Spaces out fetch starts by a fixed minimum interval
#[derive(Debug)]
pub struct RateLimiter {
    interval: Duration,

    /// Start time of the most recently admitted fetch
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    /// Waits until a fetch may start, then claims the slot
    ///
    /// The first call returns immediately. Later calls return no earlier
    /// than `interval` after the previous admission. Waiters queue on a fair
    /// mutex, so admission is FIFO.
    pub async fn acquire(&self) {
        let mut last = self.last.lock().await;

        if let Some(previous) = *last {
            let ready_at = previous + self.interval;
            let now = Instant::now();
            if ready_at > now {
                let wait = ready_at - now;
                tracing::trace!("Rate limiter: waiting {:?}", wait);
                tokio::time::sleep(wait).await;
            }
        }

        *last = Some(Instant::now());
    }
}
