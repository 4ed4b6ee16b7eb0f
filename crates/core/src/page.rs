//! Output targets the controller writes to.
//!
//! The search page has three regions the controller touches: the results
//! container, the status strip, and the submit button. Each is a small trait
//! so the controller can drive a real page, a terminal, or an in-memory fake.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// The results area. Every write replaces the whole content.
pub trait ResultsSink: Send + Sync {
    fn replace(&self, html: String);
}

/// The status strip summarizing the last completed search.
pub trait StatusSink: Send + Sync {
    fn show(&self, html: String);
    fn hide(&self);
}

/// The control that starts a search.
pub trait SubmitControl: Send + Sync {
    fn set_enabled(&self, enabled: bool);
}

/// Handles to the page regions, as found at wiring time.
///
/// `results` and `submit` are required for a search to run; `status` is optional.
#[derive(Clone, Default)]
pub struct PageHandles {
    pub results: Option<Arc<dyn ResultsSink>>,
    pub status: Option<Arc<dyn StatusSink>>,
    pub submit: Option<Arc<dyn SubmitControl>>,
}

impl PageHandles {
    /// Wire every region to the same in-memory page.
    pub fn memory(page: &Arc<MemoryPage>) -> Self {
        Self {
            results: Some(page.clone() as Arc<dyn ResultsSink>),
            status: Some(page.clone() as Arc<dyn StatusSink>),
            submit: Some(page.clone() as Arc<dyn SubmitControl>),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory page
// ---------------------------------------------------------------------------

/// Point-in-time copy of a [`MemoryPage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    pub results_html: String,
    /// `None` while the status strip is hidden.
    pub status_html: Option<String>,
    pub submit_enabled: bool,
    /// Number of `replace` calls on the results area so far.
    pub results_writes: usize,
}

impl Default for PageSnapshot {
    fn default() -> Self {
        Self { results_html: String::new(), status_html: None, submit_enabled: true, results_writes: 0 }
    }
}

/// A page held entirely in memory. Backs the CLI's HTML output, the HTTP
/// frontend, and tests.
#[derive(Debug, Default)]
pub struct MemoryPage {
    state: Mutex<PageSnapshot>,
}

impl MemoryPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PageSnapshot {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PageSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResultsSink for MemoryPage {
    fn replace(&self, html: String) {
        let mut state = self.lock();
        state.results_html = html;
        state.results_writes += 1;
    }
}

impl StatusSink for MemoryPage {
    fn show(&self, html: String) {
        self.lock().status_html = Some(html);
    }

    fn hide(&self) {
        self.lock().status_html = None;
    }
}

impl SubmitControl for MemoryPage {
    fn set_enabled(&self, enabled: bool) {
        self.lock().submit_enabled = enabled;
    }
}
