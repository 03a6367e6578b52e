//! Crawl coordinator - main crawl orchestration logic
//!
//! This module drives one crawl of one source:
//! - Optional quick-check of listing page 1
//! - Walking listing pages while the believed page count allows
//! - Visiting detail pages for listings not already stored
//! - Reconciling each extraction into the store, with periodic checkpoints
//!
//! Failures are split by scope. A broken listing header aborts the crawl;
//! anything that goes wrong on one detail page abandons that listing only.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::notifier::CrawlObserver;
use crate::crawler::probe::source_has_new_listings;
use crate::crawler::reconciler::merge;
use crate::crawler::wait::{wait_for_markup, WaitError};
use crate::render::{PageLoader, PageSession};
use crate::sources::{Contact, ListingHeader, PropertyDetails, SiteExtractor};
use crate::state::{CrawlPhase, CrawlState};
use crate::storage::{RecordStore, RentalRecord};
use crate::{FetchError, Result};
use chrono::Utc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use url::Url;

/// Counters describing a finished crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Documents opened, including detail pages and the quick-check
    pub pages_fetched: u32,

    /// Listing pages processed
    pub listing_pages: u32,

    /// Records reconciled into the store
    pub records_written: u32,

    /// Listings skipped because their identity was already stored
    pub skipped_existing: u32,

    /// Listings dropped after a detail-page failure
    pub abandoned: u32,

    /// Intermediate store flushes
    pub checkpoints: u32,

    /// Quick-check result, if the probe ran
    pub quick_check: Option<bool>,
}

/// What happened to one listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    Stored,
    Abandoned { reason: String },
}

/// Fields read from a detail page
#[derive(Debug, Default)]
struct DetailFields {
    phone: Option<String>,
    description: Option<String>,
    properties: PropertyDetails,
}

/// First condition met on a detail page while waiting for the reveal control
enum RevealGate {
    Available,
    AuthRequired,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    extractor: Box<dyn SiteExtractor>,
    fetcher: PageFetcher,
    observer: Box<dyn CrawlObserver>,
    query: String,
    phase: CrawlPhase,
    state: CrawlState,
    report: CrawlReport,
    since_checkpoint: u32,
}

impl Coordinator {
    /// Creates a coordinator for one crawl of `extractor`'s source
    ///
    /// # Arguments
    ///
    /// * `config` - Crawl settings (pacing, waits, checkpoints, quick-check)
    /// * `extractor` - Site knowledge for the source being crawled
    /// * `loader` - Renderer that opens pages
    /// * `observer` - Receives progress and stored records
    /// * `query` - Search query, e.g. a city slug
    pub fn new(
        config: CrawlerConfig,
        extractor: Box<dyn SiteExtractor>,
        loader: Box<dyn PageLoader>,
        observer: Box<dyn CrawlObserver>,
        query: impl Into<String>,
    ) -> Self {
        let fetcher = PageFetcher::new(loader, &config);
        let state = CrawlState::new(config.initial_total_pages);

        Self {
            config,
            extractor,
            fetcher,
            observer,
            query: query.into(),
            phase: CrawlPhase::Init,
            state,
            report: CrawlReport::default(),
            since_checkpoint: 0,
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl to completion against `store`
    ///
    /// Records are written to `store` as they are reconciled and the store is
    /// saved every `checkpoint-every` records. The final save is left to the
    /// caller so it also happens when the crawl is interrupted.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Pages exhausted, or quick-check found nothing new
    /// * `Err(ScraperError)` - A listing page could not be fetched or broke
    ///   the header contract, or a checkpoint failed
    pub async fn run(&mut self, store: &mut dyn RecordStore) -> Result<CrawlReport> {
        let span = tracing::info_span!("crawl", source = self.extractor.source());
        let start_time = Instant::now();

        let outcome = self.crawl(store).instrument(span).await;
        self.report.pages_fetched = self.fetcher.pages_fetched();

        match outcome {
            Ok(()) => {
                tracing::info!(
                    "Crawl of {} completed in {:?}: {} written, {} skipped, {} abandoned, {} pages fetched",
                    self.extractor.source(),
                    start_time.elapsed(),
                    self.report.records_written,
                    self.report.skipped_existing,
                    self.report.abandoned,
                    self.report.pages_fetched
                );
                Ok(self.report.clone())
            }
            Err(e) => {
                self.transition(CrawlPhase::Aborted);
                tracing::error!(
                    "Crawl of {} aborted on page {}: {}",
                    self.extractor.source(),
                    self.state.current_page,
                    e
                );
                Err(e)
            }
        }
    }

    async fn crawl(&mut self, store: &mut dyn RecordStore) -> Result<()> {
        if self.config.quick_check {
            self.transition(CrawlPhase::QuickChecking);
            tracing::info!("Checking if source was updated");

            let has_new = source_has_new_listings(
                &mut self.fetcher,
                self.extractor.as_ref(),
                &*store,
                &self.query,
            )
            .await?;
            self.state.quick_check = Some(has_new);
            self.report.quick_check = Some(has_new);

            if !has_new {
                tracing::info!("No new data found");
                self.transition(CrawlPhase::Done);
                return Ok(());
            }
            tracing::info!("Found new data in source");
        }

        while self.state.has_more_pages() {
            self.transition(CrawlPhase::ListingPage);

            let headers = self.listing_page().await?;
            if headers.is_empty() {
                tracing::info!(
                    "No listings on page {}, treating the feed as exhausted",
                    self.state.current_page
                );
                break;
            }

            for header in &headers {
                self.handle_header(header, store).await?;
            }

            self.state.advance();
        }

        self.transition(CrawlPhase::Done);
        Ok(())
    }

    /// Fetches the current listing page and extracts its headers
    async fn listing_page(&mut self) -> Result<Vec<ListingHeader>> {
        let page = self.state.current_page;
        let url = self.extractor.listing_url(&self.query, page);
        let page_url = Url::parse(&url)?;
        tracing::info!("Processing {}", url);

        let markup = self
            .fetcher
            .listing_markup(self.extractor.as_ref(), &url)
            .await?;
        self.report.listing_pages += 1;

        if let Some(total) = self.extractor.total_page_count(&markup) {
            if let Some(previous) = self.state.observe_total(total) {
                tracing::debug!("Total pages changed from {} to {}", previous, total);
            }
        }
        self.observer.on_page_progress(page, self.state.total_pages);

        Ok(self.extractor.listing_headers(&markup, &page_url)?)
    }

    async fn handle_header(
        &mut self,
        header: &ListingHeader,
        store: &mut dyn RecordStore,
    ) -> Result<()> {
        if self.config.skip_existing_records && store.contains(&header.identity) {
            tracing::info!(
                "Found offer {} data in database, skipping to next offer",
                header.identity
            );
            self.report.skipped_existing += 1;
            return Ok(());
        }

        match self.process_listing(header, store).await {
            ListingOutcome::Stored => {
                self.report.records_written += 1;
                self.checkpoint_if_due(store)?;
            }
            ListingOutcome::Abandoned { reason } => {
                tracing::warn!("Skipping offer {}: {}", header.identity, reason);
                self.report.abandoned += 1;
            }
        }

        Ok(())
    }

    /// Completes, reconciles and stores one listing
    async fn process_listing(
        &mut self,
        header: &ListingHeader,
        store: &mut dyn RecordStore,
    ) -> ListingOutcome {
        let fields = if self.extractor.visits_detail_pages() {
            self.transition(CrawlPhase::DetailFetch);
            tracing::info!("Processing {}", header.url);
            match self.visit_detail(&header.url).await {
                Ok(fields) => fields,
                Err(reason) => return ListingOutcome::Abandoned { reason },
            }
        } else {
            DetailFields {
                properties: header.details.clone().unwrap_or_default(),
                ..DetailFields::default()
            }
        };

        let now = Utc::now();
        let incoming = RentalRecord {
            source: self.extractor.source().to_string(),
            url: header.url.clone(),
            title: header.title.clone(),
            price: header.price.clone(),
            kind: fields.properties.kind,
            room_count: fields.properties.room_count,
            floor_count: fields.properties.floor_count,
            guest_count: fields.properties.guest_count,
            bed_count: fields.properties.bed_count,
            bath_count: fields.properties.bath_count,
            phone: fields.phone,
            description: fields.description,
            posted_at: header.posted_at.clone(),
            first_scraped_at: now,
            last_scraped_at: now,
        };

        let prior = store.get(&header.identity);
        let reconciled = merge(prior, incoming, now);
        if reconciled.is_new {
            tracing::info!("Stored new record {}", header.identity);
        } else {
            tracing::info!("Previously scraped record {} was updated", header.identity);
            if let Some(old) = prior.filter(|_| reconciled.materially_changed) {
                tracing::info!("Old data: {:?}", old);
            }
        }
        tracing::debug!("New data: {:?}", reconciled.record);

        self.observer
            .on_record_processed(&header.identity, &reconciled.record);
        store.set(&header.identity, reconciled.record);

        ListingOutcome::Stored
    }

    /// Opens a detail page and reads its fields
    ///
    /// Any failure is returned as the reason for abandoning the listing.
    async fn visit_detail(&mut self, url: &str) -> std::result::Result<DetailFields, String> {
        let (timeout, poll) = self.fetcher.wait_settings();
        let mut session = self
            .fetcher
            .open(url)
            .await
            .map_err(|e| format!("failed to open detail page: {}", e))?;

        let fields = read_detail(self.extractor.as_ref(), session.as_mut(), timeout, poll).await;
        session.close().await;
        fields
    }

    fn checkpoint_if_due(&mut self, store: &mut dyn RecordStore) -> Result<()> {
        self.since_checkpoint += 1;
        if self.since_checkpoint < self.config.checkpoint_every {
            return Ok(());
        }

        store.save()?;
        self.since_checkpoint = 0;
        self.report.checkpoints += 1;
        tracing::debug!("Checkpoint: {} records in store", store.len());
        Ok(())
    }

    fn transition(&mut self, next: CrawlPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal crawl transition {} -> {}",
            self.phase,
            next
        );
        if self.phase != next {
            tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        }
        self.phase = next;
    }
}

/// Reads a detail page, performing the contact reveal when the source has one
async fn read_detail(
    extractor: &dyn SiteExtractor,
    session: &mut dyn PageSession,
    timeout: Duration,
    poll: Duration,
) -> std::result::Result<DetailFields, String> {
    let (phone, markup) = match extractor.reveal_selector() {
        Some(reveal) => reveal_contact(extractor, session, reveal, timeout, poll).await?,
        None => (
            None,
            session
                .content()
                .await
                .map_err(|e| format!("failed to read detail page: {}", e))?,
        ),
    };

    let boxes = extractor.property_detail_boxes(&markup);

    Ok(DetailFields {
        phone,
        description: extractor.description(&markup),
        properties: extractor.parse_property_boxes(&boxes),
    })
}

/// Waits for the reveal control, clicks it and waits for the unmasked value
///
/// Returns the contact (unset when the page asks for a login) and the markup
/// to read the remaining fields from.
async fn reveal_contact(
    extractor: &dyn SiteExtractor,
    session: &mut dyn PageSession,
    reveal: &str,
    timeout: Duration,
    poll: Duration,
) -> std::result::Result<(Option<String>, String), String> {
    let gate = wait_for_markup(session, timeout, poll, |markup| {
        if extractor.auth_required(markup) {
            Some(RevealGate::AuthRequired)
        } else if extractor.reveal_is_available(markup) {
            Some(RevealGate::Available)
        } else {
            None
        }
    })
    .await;

    let markup = match gate {
        Ok((RevealGate::AuthRequired, markup)) => {
            tracing::debug!("Contact requires login, leaving it unset");
            return Ok((None, markup));
        }
        Ok((RevealGate::Available, markup)) => markup,
        Err(WaitError::Timeout { waited }) => {
            return Err(format!("reveal control did not appear within {:?}", waited));
        }
        Err(WaitError::Fetch(e)) => return Err(format!("failed to read detail page: {}", e)),
    };

    match session.click(reveal).await {
        Ok(()) => {}
        Err(FetchError::Unsupported(what)) => {
            tracing::warn!(
                "Renderer cannot {} at {}, leaving contact unset",
                what,
                session.url()
            );
            return Ok((None, markup));
        }
        Err(e) => return Err(format!("reveal failed: {}", e)),
    }

    let revealed = wait_for_markup(session, timeout, poll, |markup| {
        match extractor.revealed_contact(markup) {
            Contact::Revealed(value) => Some(value),
            Contact::Pending | Contact::Absent => None,
        }
    })
    .await;

    match revealed {
        Ok((phone, markup)) => Ok((Some(phone), markup)),
        Err(WaitError::Timeout { waited }) => Err(format!(
            "contact still masked after {:?}",
            waited
        )),
        Err(WaitError::Fetch(e)) => Err(format!("failed to read detail page: {}", e)),
    }
}
