use crate::model::{Source, SourceKind};
use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Browser-like identity sent with every request unless overridden
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub identity: IdentityConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<Source>,
}

impl Default for Config {
    /// The demo setup: one source of each kind against public scraping sandboxes
    fn default() -> Self {
        Self {
            scraper: ScraperConfig::default(),
            identity: IdentityConfig::default(),
            output: OutputConfig::default(),
            sources: default_sources(),
        }
    }
}

/// Returns the built-in source list
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new("news", "https://httpbin.org/html", SourceKind::GenericDocument),
        Source::new("quotes", "http://quotes.toscrape.com/", SourceKind::QuoteList),
        Source::new("books", "http://books.toscrape.com/", SourceKind::Catalog),
        Source::new(
            "posts",
            "https://jsonplaceholder.typicode.com/posts",
            SourceKind::JsonApi,
        ),
    ]
}

/// How the batch runs its sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    /// One source at a time, in configuration order
    #[default]
    Sequential,

    /// Sources fetched concurrently, records stored in configuration order
    Parallel,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Lower bound of the random delay before each request (seconds)
    #[serde(rename = "min-delay")]
    pub min_delay: f64,

    /// Upper bound of the random delay before each request (seconds)
    #[serde(rename = "max-delay")]
    pub max_delay: f64,

    /// Per-request timeout (seconds)
    pub timeout: f64,

    pub mode: ExecutionMode,

    /// Maximum number of sources in flight in parallel mode
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: u32,

    /// Extra attempts for transient failures (0 disables retrying)
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            min_delay: 1.0,
            max_delay: 2.0,
            timeout: 10.0,
            mode: ExecutionMode::Sequential,
            max_concurrency: 4,
            max_retries: 0,
        }
    }
}

impl ScraperConfig {
    pub fn min_delay(&self) -> ConfigResult<Duration> {
        seconds("min-delay", self.min_delay)
    }

    pub fn max_delay(&self) -> ConfigResult<Duration> {
        seconds("max-delay", self.max_delay)
    }

    pub fn timeout(&self) -> ConfigResult<Duration> {
        seconds("timeout", self.timeout)
    }
}

/// Converts a seconds value, rejecting negative, non-finite and overflowing input
fn seconds(field: &str, value: f64) -> ConfigResult<Duration> {
    Duration::try_from_secs_f64(value).map_err(|e| {
        ConfigError::Validation(format!("{} is not a valid duration ({}): {}", field, value, e))
    })
}

/// HTTP identity shared by every request of a run
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Additional default headers
    pub headers: BTreeMap<String, String>,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            headers: BTreeMap::new(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the JSON export
    #[serde(rename = "json-path")]
    pub json_path: String,

    /// Path to the CSV summary
    #[serde(rename = "csv-path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_path: "scraped_data.json".to_string(),
            csv_path: "scraped_summary.csv".to_string(),
        }
    }
}
