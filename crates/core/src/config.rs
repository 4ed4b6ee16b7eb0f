//! Client configuration: defaults, `.carsearch.toml` overrides, and the
//! `CARSEARCH_BASE_URL` environment override.

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, warn};

pub const CONFIG_FILE: &str = ".carsearch.toml";
pub const BASE_URL_ENV: &str = "CARSEARCH_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_CATALOG_PER_PAGE: u32 = 20;

const KNOWN_CONFIG_KEYS: &[&str] = &["base_url", "stale_responses", "timeout_secs", "catalog_per_page"];

/// What to do with a response whose search is no longer the latest one issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StalePolicy {
    /// Only the most recently issued search may write to the page.
    #[default]
    DiscardStale,
    /// Every search writes when it finishes; whichever finishes last stays on screen.
    LastWriteWins,
}

impl FromStr for StalePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "discard" => Ok(StalePolicy::DiscardStale),
            "last-write-wins" => Ok(StalePolicy::LastWriteWins),
            other => Err(format!("unknown stale_responses value '{other}' (expected 'discard' or 'last-write-wins')")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub stale_policy: StalePolicy,
    /// Transport-level timeout for the HTTP client. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub catalog_per_page: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            stale_policy: StalePolicy::default(),
            timeout_secs: None,
            catalog_per_page: DEFAULT_CATALOG_PER_PAGE,
        }
    }
}

impl ClientConfig {
    /// Apply overrides from TOML text on top of the defaults.
    ///
    /// Parse failures and bad values are logged and leave the defaults in place.
    pub fn from_toml_str(content: &str) -> Self {
        let mut config = Self::default();

        let table = match content.parse::<toml::Table>() {
            Ok(t) => t,
            Err(e) => {
                warn!(error = %e, "Failed to parse {CONFIG_FILE}");
                return config;
            }
        };

        for key in table.keys() {
            if KNOWN_CONFIG_KEYS.contains(&key.as_str()) {
                continue;
            }
            let suggestion = KNOWN_CONFIG_KEYS.iter().min_by_key(|k| edit_distance(key, k));
            match suggestion {
                Some(s) if edit_distance(key, s) <= 3 => warn!(
                    key = key.as_str(),
                    suggestion = *s,
                    "Unknown key in {CONFIG_FILE}, did you mean '{s}'?"
                ),
                _ => warn!(
                    key = key.as_str(),
                    "Unknown key in {CONFIG_FILE} (known keys: {})",
                    KNOWN_CONFIG_KEYS.join(", ")
                ),
            }
        }

        if let Some(url) = table.get("base_url").and_then(|v| v.as_str()) {
            config.base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(policy) = table.get("stale_responses").and_then(|v| v.as_str()) {
            match policy.parse() {
                Ok(p) => config.stale_policy = p,
                Err(e) => warn!("{e}"),
            }
        }

        match table.get("timeout_secs").and_then(|v| v.as_integer()) {
            Some(secs) if secs > 0 => config.timeout_secs = Some(secs as u64),
            Some(secs) => warn!(timeout_secs = secs, "timeout_secs must be positive, ignoring"),
            None => {}
        }

        match table.get("catalog_per_page").and_then(|v| v.as_integer()) {
            Some(n) if n > 0 && n <= u32::MAX as i64 => config.catalog_per_page = n as u32,
            Some(n) => warn!(catalog_per_page = n, "catalog_per_page out of range, ignoring"),
            None => {}
        }

        config
    }

    /// Override the base URL when `value` is set and non-empty.
    pub fn apply_base_url_override(&mut self, value: Option<&str>) {
        if let Some(url) = value.map(str::trim).filter(|u| !u.is_empty()) {
            self.base_url = url.trim_end_matches('/').to_string();
        }
    }
}

/// Load configuration from `.carsearch.toml` in `dir`, then apply `CARSEARCH_BASE_URL`.
///
/// A missing or unreadable file yields the defaults.
pub fn load_client_config(dir: &Path) -> ClientConfig {
    load_client_config_with(dir, std::env::var(BASE_URL_ENV).ok().as_deref())
}

/// [`load_client_config`] with the environment's base URL passed in explicitly.
/// A non-blank `env_base_url` replaces the file's `base_url`.
pub fn load_client_config_with(dir: &Path, env_base_url: Option<&str>) -> ClientConfig {
    let config_path = dir.join(CONFIG_FILE);

    let mut config = if config_path.exists() {
        debug!(path = %config_path.display(), "Loading {CONFIG_FILE}");
        match std::fs::read_to_string(&config_path) {
            Ok(content) => ClientConfig::from_toml_str(&content),
            Err(e) => {
                warn!(error = %e, "Could not read {CONFIG_FILE}");
                ClientConfig::default()
            }
        }
    } else {
        ClientConfig::default()
    };

    config.apply_base_url_override(env_base_url);
    config
}

/// Levenshtein distance for typo suggestions.
fn edit_distance(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
