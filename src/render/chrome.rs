//! Headless Chrome page loader
//!
//! Needed for sources that only disclose fields after an interaction (the
//! phone reveal button). `headless_chrome` is a blocking API, so every call
//! is moved onto the blocking thread pool.

use crate::config::RendererConfig;
use crate::render::traits::{PageLoader, PageSession};
use crate::FetchError;
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;

const OUTER_HTML: &str = "document.documentElement.outerHTML";

/// Loader backed by a single headless Chrome instance
pub struct ChromePageLoader {
    browser: Arc<Browser>,
    user_agent: String,
}

impl ChromePageLoader {
    /// Launches headless Chrome
    pub fn launch(config: &RendererConfig) -> Result<Self, FetchError> {
        tracing::info!("Launching headless Chrome...");

        let options = LaunchOptions::default_builder()
            .headless(true)
            .build()
            .map_err(|e| FetchError::Browser(format!("invalid launch options: {}", e)))?;

        let browser = Browser::new(options)
            .map_err(|e| FetchError::Browser(format!("failed to launch Chrome: {}", e)))?;

        Ok(Self {
            browser: Arc::new(browser),
            user_agent: config.user_agent.clone(),
        })
    }
}

/// Runs a blocking browser call off the async executor
async fn blocking<T, F>(f: F) -> Result<T, FetchError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, FetchError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| FetchError::Browser(format!("browser task panicked: {}", e)))?
}

#[async_trait]
impl PageLoader for ChromePageLoader {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, FetchError> {
        let browser = Arc::clone(&self.browser);
        let target = url.to_string();
        let user_agent = self.user_agent.clone();

        let tab = blocking(move || {
            let tab = browser
                .new_tab()
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            tab.set_user_agent(&user_agent, None, None)
                .map_err(|e| FetchError::Browser(format!("set user agent: {}", e)))?;
            tab.navigate_to(&target)
                .map_err(|e| FetchError::Browser(format!("navigate to {}: {}", target, e)))?;
            tab.wait_until_navigated()
                .map_err(|e| FetchError::Browser(format!("navigate to {}: {}", target, e)))?;
            Ok(tab)
        })
        .await?;

        Ok(Box::new(ChromePageSession {
            url: url.to_string(),
            tab,
        }))
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}

/// One open browser tab
struct ChromePageSession {
    url: String,
    tab: Arc<Tab>,
}

#[async_trait]
impl PageSession for ChromePageSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn content(&mut self) -> Result<String, FetchError> {
        let tab = Arc::clone(&self.tab);
        blocking(move || {
            let result = tab
                .evaluate(OUTER_HTML, false)
                .map_err(|e| FetchError::Browser(e.to_string()))?;
            Ok(result
                .value
                .and_then(|value| value.as_str().map(str::to_string))
                .unwrap_or_default())
        })
        .await
    }

    async fn click(&mut self, selector: &str) -> Result<(), FetchError> {
        let tab = Arc::clone(&self.tab);
        let selector = selector.to_string();
        blocking(move || {
            let element = tab
                .find_element(&selector)
                .map_err(|e| FetchError::Browser(format!("find {}: {}", selector, e)))?;
            element
                .click()
                .map_err(|e| FetchError::Browser(format!("click {}: {}", selector, e)))?;
            Ok(())
        })
        .await
    }

    async fn close(self: Box<Self>) {
        let tab = self.tab;
        let url = self.url;
        let closed = blocking(move || {
            tab.close(true)
                .map_err(|e| FetchError::Browser(e.to_string()))
        })
        .await;
        if let Err(e) = closed {
            tracing::debug!("Failed to close tab for {}: {}", url, e);
        }
    }
}
