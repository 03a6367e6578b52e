//! Scripted in-memory renderer for crawler tests

use crate::render::{PageLoader, PageSession};
use crate::FetchError;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// How a fake document renders over time
///
/// Each `content()` call yields the next snapshot and the last one repeats
/// forever. A successful click swaps in the `after_click` snapshots.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub snapshots: Vec<String>,
    pub after_click: Vec<String>,
    pub crash_on_read: bool,
}

impl FakePage {
    pub fn fixed(markup: &str) -> Self {
        Self::rendering(&[markup])
    }

    pub fn rendering(snapshots: &[&str]) -> Self {
        Self {
            snapshots: snapshots.iter().map(|s| s.to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn crashing() -> Self {
        Self {
            crash_on_read: true,
            ..Self::default()
        }
    }

    pub fn on_click(mut self, snapshots: &[&str]) -> Self {
        self.after_click = snapshots.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// Loader serving scripted pages by exact URL
#[derive(Debug, Default)]
pub struct FakeLoader {
    pages: HashMap<String, FakePage>,
    opened: Arc<Mutex<Vec<String>>>,
    clicks: Arc<Mutex<Vec<String>>>,
}

impl FakeLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, url: &str, markup: &str) -> Self {
        self.with_script(url, FakePage::fixed(markup))
    }

    pub fn with_script(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    /// Handle on the list of opened URLs, in order
    pub fn opened(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.opened)
    }

    /// Handle on the list of clicked selectors, in order
    pub fn clicks(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.clicks)
    }
}

#[async_trait]
impl PageLoader for FakeLoader {
    async fn open(&self, url: &str) -> Result<Box<dyn PageSession>, FetchError> {
        self.opened.lock().unwrap().push(url.to_string());

        let page = self.pages.get(url).cloned().ok_or(FetchError::Status {
            url: url.to_string(),
            status: 404,
        })?;

        Ok(Box::new(FakeSession {
            url: url.to_string(),
            snapshots: page.snapshots.into_iter().collect(),
            after_click: page.after_click,
            crash_on_read: page.crash_on_read,
            clicks: Arc::clone(&self.clicks),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

struct FakeSession {
    url: String,
    snapshots: VecDeque<String>,
    after_click: Vec<String>,
    crash_on_read: bool,
    clicks: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl PageSession for FakeSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn content(&mut self) -> Result<String, FetchError> {
        if self.crash_on_read {
            return Err(FetchError::Browser("tab crashed".to_string()));
        }
        if self.snapshots.len() > 1 {
            Ok(self.snapshots.pop_front().unwrap_or_default())
        } else {
            Ok(self.snapshots.front().cloned().unwrap_or_default())
        }
    }

    async fn click(&mut self, selector: &str) -> Result<(), FetchError> {
        self.clicks.lock().unwrap().push(selector.to_string());
        if self.after_click.is_empty() {
            return Err(FetchError::Browser(format!("nothing to click at {}", selector)));
        }
        self.snapshots = std::mem::take(&mut self.after_click).into_iter().collect();
        Ok(())
    }

    async fn close(self: Box<Self>) {}
}
