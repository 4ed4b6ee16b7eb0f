//! The search controller: runs one search cycle against a backend and keeps the
//! page consistent with it.
//!
//! A cycle moves the page through `Loading` into `Success` or `Error`. The
//! submit control is disabled for the duration and re-enabled on every exit
//! path, including a panic unwinding out of the backend.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use tracing::{debug, error, info, warn};

use crate::client::SearchBackend;
use crate::config::StalePolicy;
use crate::error::WiringError;
use crate::page::{PageHandles, ResultsSink, SubmitControl};
use crate::render;
use crate::types::SearchRequest;

/// Re-enables the submit control when dropped.
struct EnableOnDrop<'a>(&'a dyn SubmitControl);

impl Drop for EnableOnDrop<'_> {
    fn drop(&mut self) {
        self.0.set_enabled(true);
    }
}

pub struct SearchController<B> {
    backend: B,
    page: PageHandles,
    stale_policy: StalePolicy,
    /// Ticket of the most recently issued search.
    generation: AtomicU64,
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B, page: PageHandles) -> Self {
        Self::with_policy(backend, page, StalePolicy::default())
    }

    pub fn with_policy(backend: B, page: PageHandles, stale_policy: StalePolicy) -> Self {
        Self { backend, page, stale_policy, generation: AtomicU64::new(0) }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Run one search and render its outcome.
    ///
    /// The method is forwarded as given; the backend is responsible for
    /// rejecting unknown ones. If the results container or submit control was
    /// never wired, the call logs and returns without touching the page.
    pub async fn perform_search(&self, method: &str, query: &str) {
        let (results, submit) = match self.required_handles() {
            Ok(handles) => handles,
            Err(e) => {
                error!(error = %e, method, "Page elements not found, search skipped");
                return;
            }
        };
        let status = self.page.status.as_deref();

        results.replace(render::LOADING_HTML.to_string());
        if let Some(status) = status {
            status.hide();
        }
        submit.set_enabled(false);
        let _enable = EnableOnDrop(submit);

        let ticket = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let request = SearchRequest::new(method, query);

        let start = Instant::now();
        let outcome = self.backend.search(&request).await;
        let elapsed = start.elapsed();

        if self.stale_policy == StalePolicy::DiscardStale
            && self.generation.load(Ordering::SeqCst) != ticket
        {
            debug!(method, query, ticket, "Newer search issued, discarding response");
            return;
        }

        match outcome {
            Ok(response) => {
                if !response.is_consistent() {
                    warn!(
                        count = response.count,
                        results = response.records().len(),
                        "Backend count does not match returned results"
                    );
                }
                info!(
                    method,
                    query,
                    count = response.count,
                    elapsed_ms = %render::format_elapsed(elapsed),
                    "Search complete"
                );
                if let Some(status) = status {
                    status.show(render::status_html(response.count, elapsed, method));
                }
                render::render_results(results, response.results.as_deref());
            }
            Err(e) => {
                warn!(method, query, error = %e, status = ?e.status(), "Search failed");
                results.replace(render::error_html(&e.to_string()));
                if let Some(status) = status {
                    status.hide();
                }
            }
        }
    }

    fn required_handles(&self) -> Result<(&dyn ResultsSink, &dyn SubmitControl), WiringError> {
        let results = self.page.results.as_deref().ok_or(WiringError::MissingResultsContainer)?;
        let submit = self.page.submit.as_deref().ok_or(WiringError::MissingSubmitControl)?;
        Ok((results, submit))
    }
}
