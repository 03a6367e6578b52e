//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: where the coordinator is in its state machine
//! - `CrawlState`: per-run pagination bookkeeping (current page, believed total)

mod crawl_phase;
mod crawl_state;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use crawl_state::CrawlState;
