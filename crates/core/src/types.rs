//! Wire types for the used-cars search API: requests, responses, car records,
//! catalog pages, and the closed set of search methods.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Search methods
// ---------------------------------------------------------------------------

/// The three search strategies the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    Sequential,
    Indexed,
    Hash,
}

impl SearchMethod {
    pub const ALL: [SearchMethod; 3] =
        [SearchMethod::Sequential, SearchMethod::Indexed, SearchMethod::Hash];

    /// Identifier used in the `/api/search/{method}` path.
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMethod::Sequential => "sequential",
            SearchMethod::Indexed => "indexed",
            SearchMethod::Hash => "hash",
        }
    }

    /// Human-readable label shown in the status strip.
    pub fn label(self) -> &'static str {
        match self {
            SearchMethod::Sequential => "Busca Sequencial",
            SearchMethod::Indexed => "Busca Indexada",
            SearchMethod::Hash => "Busca HashMap",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the known methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for SearchMethod {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sequential" => Ok(SearchMethod::Sequential),
            "indexed" => Ok(SearchMethod::Indexed),
            "hash" => Ok(SearchMethod::Hash),
            other => Err(UnknownMethod(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response
// ---------------------------------------------------------------------------

/// One search as issued by the controller. The method is kept as free text:
/// unrecognized values are forwarded and the backend reports its own error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub method: String,
    pub query: String,
}

impl SearchRequest {
    pub fn new(method: impl Into<String>, query: impl Into<String>) -> Self {
        Self { method: method.into(), query: query.into() }
    }
}

/// A single listing returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    pub year: i32,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Body of a successful `/api/search/{method}` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub count: u64,
    /// `None` when the backend omits the list or sends `null`.
    #[serde(default)]
    pub results: Option<Vec<CarRecord>>,
    /// Echo of the method the backend ran, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Echo of the (trimmed) query, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl SearchResponse {
    /// Returned records; an absent list reads as empty.
    pub fn records(&self) -> &[CarRecord] {
        self.results.as_deref().unwrap_or(&[])
    }

    /// Whether `count` agrees with the number of records actually returned.
    pub fn is_consistent(&self) -> bool {
        self.count == self.records().len() as u64
    }
}

/// Body of `/api/catalog`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogPage {
    #[serde(default)]
    pub results: Vec<CarRecord>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u32,
}
