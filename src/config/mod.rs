//! Configuration module for Rentscraper
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so a missing file simply
//! yields `Config::default()`.
//!
//! # Example
//!
//! ```no_run
//! use rentscraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("rentscraper.toml")).unwrap();
//! println!("Fetch interval: {}ms", config.crawler.page_query_interval_ms);
//! ```

mod parser;
mod types;
mod validation;

pub use parser::{config_fingerprint, load_config, load_config_with_hash, parse_config};
pub use types::{Config, CrawlerConfig, RendererConfig, RendererKind};
pub use validation::validate;
