//! HTTP client for the used-cars search API.

use std::future::Future;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::SearchError;
use crate::types::{CatalogPage, SearchRequest, SearchResponse};

/// Characters left unescaped in a query component: ASCII alphanumerics plus
/// `- _ . ! ~ * ' ( )`, so a space is sent as `%20` rather than `+`.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Anything that can answer a [`SearchRequest`].
///
/// The controller is generic over this so tests can substitute an in-process
/// double for the real HTTP service.
pub trait SearchBackend: Send + Sync {
    /// Run one search, returning once the response body has been decoded.
    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl Future<Output = Result<SearchResponse, SearchError>> + Send;
}

/// [`SearchBackend`] over `GET /api/search/{method}?q=...`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpBackend {
    /// Build a backend for `base_url` with no client-side timeout.
    pub fn new(base_url: &str) -> Result<Self, SearchError> {
        Self::with_client(base_url, reqwest::Client::new())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, SearchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_client(&config.base_url, builder.build()?)
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, SearchError> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| SearchError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SearchError::InvalidUrl(base_url.to_string()));
        }
        // `Url::join` drops the last path segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// URL for a search: the method goes into the path verbatim, the query is
    /// percent-encoded into `q`.
    pub fn search_url(&self, request: &SearchRequest) -> Result<Url, SearchError> {
        let mut url = self.endpoint(&format!("api/search/{}", request.method))?;
        let q = utf8_percent_encode(&request.query, QUERY_COMPONENT);
        url.set_query(Some(&format!("q={q}")));
        Ok(url)
    }

    pub fn catalog_url(&self, page: u32, per_page: u32) -> Result<Url, SearchError> {
        let mut url = self.endpoint("api/catalog")?;
        url.query_pairs_mut()
            .append_pair("page", &page.to_string())
            .append_pair("per_page", &per_page.to_string());
        Ok(url)
    }

    /// Fetch one page of the full listing catalog.
    pub async fn catalog(&self, page: u32, per_page: u32) -> Result<CatalogPage, SearchError> {
        let url = self.catalog_url(page, per_page)?;
        let catalog: CatalogPage = self.get_json(url).await?;
        info!(
            page = catalog.page,
            total_pages = catalog.total_pages,
            records = catalog.results.len(),
            "Catalog page loaded"
        );
        Ok(catalog)
    }

    fn endpoint(&self, path: &str) -> Result<Url, SearchError> {
        self.base_url.join(path).map_err(|e| SearchError::InvalidUrl(format!("{path}: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SearchError> {
        debug!(url = %url, "GET");
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(SearchError::Status(status));
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl SearchBackend for HttpBackend {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, SearchError> {
        let url = self.search_url(request)?;
        self.get_json(url).await
    }
}
