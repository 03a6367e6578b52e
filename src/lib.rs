//! Rentscraper: an incremental rental listing scraper
//!
//! This crate crawls the paginated listing feed of a single rental site,
//! extracts structured records from the listing and detail pages, and
//! reconciles them against a persisted JSON store so repeated runs only pay
//! for new or changed listings.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod sources;
pub mod state;
pub mod storage;
pub mod url;

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for Rentscraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised by the record store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Store file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors raised while extracting fields from page markup
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Required field `{field}` missing ({context})")]
    MissingField {
        field: &'static str,
        context: String,
    },

    #[error("Field `{field}` is malformed: {value:?}")]
    Malformed { field: &'static str, value: String },

    #[error("Invalid selector: {0}")]
    Selector(String),
}

/// Errors raised by the page rendering layer
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Request to {url} failed: {source}")]
    Transport { url: String, source: reqwest::Error },

    #[error("Timed out after {waited:?} waiting for {what}")]
    Timeout { what: String, waited: Duration },

    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Renderer does not support {0}")]
    Unsupported(&'static str),
}

/// Result type alias for Rentscraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Coordinator, CrawlReport};
pub use state::{CrawlPhase, CrawlState};
pub use storage::{JsonStore, RecordStore, RentalKind, RentalRecord};
