//! carsearch — client for the used-cars search API.
//!
//! The API offers three search strategies (sequential, indexed, hash). This
//! crate issues a search, times it, and renders the returned listings as an
//! HTML card grid with a status strip.
//!
//! # Modules
//!
//! - [`types`] — Wire types: requests, responses, car records, catalog pages
//! - [`client`] — [`SearchBackend`] trait and the reqwest-based [`HttpBackend`]
//! - [`controller`] — [`SearchController`], one search cycle per call
//! - [`page`] — Output sinks the controller writes to, plus [`MemoryPage`]
//! - [`render`] — HTML fragments and the full page document
//! - [`format`] — BRL prices, HTML escaping, method labels
//! - [`config`] — `.carsearch.toml` loading
//! - [`error`] — Error taxonomy

pub mod client;
pub mod config;
pub mod controller;
pub mod error;
pub mod format;
pub mod page;
pub mod render;
pub mod types;

pub use client::{HttpBackend, SearchBackend};
pub use config::{load_client_config, load_client_config_with, ClientConfig, StalePolicy};
pub use controller::SearchController;
pub use error::{SearchError, WiringError};
pub use format::{algorithm_name, escape_html, format_price};
pub use page::{MemoryPage, PageHandles, PageSnapshot, ResultsSink, StatusSink, SubmitControl};
pub use render::render_results;
pub use types::{CarRecord, CatalogPage, SearchMethod, SearchRequest, SearchResponse};
