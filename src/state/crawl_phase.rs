use std::fmt;

/// Phases of a single crawl run
///
/// The coordinator moves through these in a fixed shape:
/// `Init -> [QuickChecking ->] ListingPage <-> DetailFetch -> Done`, with
/// `Aborted` reachable from the listing and detail phases when a page breaks
/// the listing-header contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Nothing fetched yet
    Init,

    /// Probing the first listing page for unseen identities
    QuickChecking,

    /// Fetching and extracting a listing page
    ListingPage,

    /// Fetching the detail page of one listing
    DetailFetch,

    // ===== Terminal States =====
    /// Pages exhausted, or the quick-check found nothing new
    Done,

    /// A listing header violated the extraction contract
    Aborted,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Aborted)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (self, next),
            (Init, QuickChecking)
                | (Init, ListingPage)
                | (QuickChecking, ListingPage)
                | (QuickChecking, Done)
                | (QuickChecking, Aborted)
                | (ListingPage, DetailFetch)
                | (ListingPage, ListingPage)
                | (ListingPage, Done)
                | (ListingPage, Aborted)
                | (DetailFetch, DetailFetch)
                | (DetailFetch, ListingPage)
                | (DetailFetch, Done)
                | (DetailFetch, Aborted)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::QuickChecking => "quick_checking",
            Self::ListingPage => "listing_page",
            Self::DetailFetch => "detail_fetch",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
