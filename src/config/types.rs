use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Main configuration structure for Rentscraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
}

/// Crawl coordination settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Minimum spacing between two outbound page fetches (milliseconds)
    #[serde(rename = "page-query-interval-ms")]
    pub page_query_interval_ms: u64,

    /// Upper bound for waits on dynamically rendered content (milliseconds)
    #[serde(rename = "wait-selector-timeout-ms")]
    pub wait_selector_timeout_ms: u64,

    /// How often a bounded wait re-inspects the page (milliseconds)
    #[serde(rename = "wait-poll-interval-ms")]
    pub wait_poll_interval_ms: u64,

    /// Skip the detail fetch for identities already in the store
    #[serde(rename = "skip-existing-records")]
    pub skip_existing_records: bool,

    /// Flush the store after every N processed records
    #[serde(rename = "checkpoint-every")]
    pub checkpoint_every: u32,

    /// Page count assumed until a page reports its own
    #[serde(rename = "initial-total-pages")]
    pub initial_total_pages: u32,

    /// Probe the first listing page before committing to a full crawl
    #[serde(rename = "quick-check")]
    pub quick_check: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            page_query_interval_ms: 10_000,
            wait_selector_timeout_ms: 5_000,
            wait_poll_interval_ms: 250,
            skip_existing_records: true,
            checkpoint_every: 5,
            initial_total_pages: 999,
            quick_check: false,
        }
    }
}

impl CrawlerConfig {
    pub fn page_query_interval(&self) -> Duration {
        Duration::from_millis(self.page_query_interval_ms)
    }

    pub fn wait_timeout(&self) -> Duration {
        Duration::from_millis(self.wait_selector_timeout_ms)
    }

    pub fn wait_poll_interval(&self) -> Duration {
        Duration::from_millis(self.wait_poll_interval_ms)
    }
}

/// Page rendering settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Which rendering backend turns URLs into documents
    pub kind: RendererKind,

    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout for the HTTP renderer (milliseconds)
    #[serde(rename = "request-timeout-ms")]
    pub request_timeout_ms: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::Http,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:120.0) Gecko/20100101 Firefox/120.0"
                .to_string(),
            request_timeout_ms: 30_000,
        }
    }
}

/// Available rendering backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Plain HTTP fetch; static markup only, no interactions
    Http,
    /// Headless Chrome; supports the reveal click
    Chrome,
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Chrome => write!(f, "chrome"),
        }
    }
}

impl FromStr for RendererKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "chrome" => Ok(Self::Chrome),
            other => Err(format!("unknown renderer '{}', expected http or chrome", other)),
        }
    }
}
