/// Pagination bookkeeping for one crawl run
///
/// `total_pages` starts at a large sentinel and is overwritten, never merged,
/// whenever a listing page reports its own last-page indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlState {
    /// 1-based index of the listing page being processed
    pub current_page: u32,

    /// Page count as last reported by the source
    pub total_pages: u32,

    /// Outcome of the quick-check probe, if it ran
    pub quick_check: Option<bool>,
}

impl CrawlState {
    /// Creates a state positioned on page 1 with an unknown page count
    pub fn new(initial_total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: initial_total_pages,
            quick_check: None,
        }
    }

    /// Adopts a freshly observed page count, replacing the previous belief
    ///
    /// Returns the previous value when it changed.
    pub fn observe_total(&mut self, total: u32) -> Option<u32> {
        let previous = self.total_pages;
        self.total_pages = total;
        (previous != total).then_some(previous)
    }

    /// Returns true while the current page is within the believed total
    pub fn has_more_pages(&self) -> bool {
        self.current_page <= self.total_pages
    }

    /// Moves to the next listing page
    pub fn advance(&mut self) {
        self.current_page += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = CrawlState::new(999);
        assert_eq!(state.current_page, 1);
        assert_eq!(state.total_pages, 999);
        assert!(state.quick_check.is_none());
        assert!(state.has_more_pages());
    }

    #[test]
    fn test_observed_total_overwrites() {
        let mut state = CrawlState::new(999);

        assert_eq!(state.observe_total(3), Some(999));
        assert_eq!(state.total_pages, 3);

        // a later, larger total still wins outright
        assert_eq!(state.observe_total(5), Some(3));
        assert_eq!(state.total_pages, 5);

        assert_eq!(state.observe_total(5), None);
    }

    #[test]
    fn test_pages_exhaust() {
        let mut state = CrawlState::new(999);
        state.observe_total(2);

        assert!(state.has_more_pages());
        state.advance();
        assert!(state.has_more_pages());
        state.advance();
        assert!(!state.has_more_pages());
    }

    #[test]
    fn test_shrinking_total_stops_early() {
        let mut state = CrawlState::new(999);
        state.observe_total(3);
        state.advance();
        state.observe_total(1);

        assert!(!state.has_more_pages());
    }
}
