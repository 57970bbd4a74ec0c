//! Harvest module for fetching and extracting configured sources
//!
//! This module contains the core scraping logic, including:
//! - Randomized rate limiting before every request
//! - HTTP fetching with timeout and error classification
//! - Per-kind extraction strategies behind a registry
//! - Batch orchestration with per-source failure isolation

pub mod extract;
mod fetcher;
mod orchestrator;
mod rate_limiter;

pub use crate::config::ExecutionMode;
pub use extract::{Extraction, Extractor, ExtractorRegistry, Page};
pub use fetcher::{build_http_client, BodyFormat, FetchResult, Fetcher, RawBody};
pub use orchestrator::{BatchOutcome, Orchestrator, SourceFailure};
pub use rate_limiter::RateLimiter;

use crate::config::Config;
use crate::output::ResultStore;
use crate::HarvestError;

/// Runs every configured source once
///
/// Builds an [`Orchestrator`] from the configuration and runs the batch. Only
/// configuration and client construction can fail; source failures are
/// logged and leave the store without that source's record.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::Config;
/// use site_harvest::harvest::harvest;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let store = harvest(&config).await?;
/// println!("{} records", store.len());
/// # Ok(())
/// # }
/// ```
pub async fn harvest(config: &Config) -> Result<ResultStore, HarvestError> {
    let orchestrator = Orchestrator::new(config)?;
    Ok(orchestrator.run_all(&config.sources).await)
}
