//! Page rendering layer
//!
//! Turns a URL into a document the extractors can read. The crawler only
//! sees the `PageLoader`/`PageSession` traits; two adapters are provided:
//! - `HttpPageLoader`: plain GET, static markup, no interactions
//! - `ChromePageLoader`: headless Chrome, supports clicking reveal controls

mod chrome;
mod http;
mod traits;

pub use chrome::ChromePageLoader;
pub use http::{build_http_client, HttpPageLoader};
pub use traits::{PageLoader, PageSession};

use crate::config::{RendererConfig, RendererKind};
use crate::FetchError;

/// Builds the loader selected by the renderer configuration
pub fn build_loader(config: &RendererConfig) -> Result<Box<dyn PageLoader>, FetchError> {
    match config.kind {
        RendererKind::Http => Ok(Box::new(HttpPageLoader::new(config)?)),
        RendererKind::Chrome => Ok(Box::new(ChromePageLoader::launch(config)?)),
    }
}
