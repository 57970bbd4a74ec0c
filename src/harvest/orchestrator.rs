//! Scrape orchestration
//!
//! This module contains the batch loop that drives every configured source
//! through fetch and extraction, including:
//! - Dispatching each source to the extractor registered for its kind
//! - Retrying transient fetch failures when configured to
//! - Isolating per-source failures so the batch always completes
//! - Sequential or parallel execution with a reproducible record order

use crate::config::{validate, Config, ExecutionMode, ScraperConfig};
use crate::harvest::extract::{ExtractorRegistry, Page};
use crate::harvest::fetcher::{BodyFormat, Fetcher, RawBody};
use crate::harvest::rate_limiter::RateLimiter;
use crate::model::{Record, Source};
use crate::output::ResultStore;
use crate::{ConfigError, HarvestError, SourceError};
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use url::Url;

/// A source that could not be scraped during a batch
#[derive(Debug)]
pub struct SourceFailure {
    pub source_id: String,
    pub url: String,
    pub error: SourceError,
}

/// Everything a batch run produced
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records of the sources that succeeded
    pub store: ResultStore,

    /// One entry per source that failed, in configuration order
    pub failures: Vec<SourceFailure>,
}

/// Main scrape orchestrator
///
/// Owns the fetcher (and through it the HTTP identity and rate limiter) and
/// the extractor registry for the lifetime of one or more runs.
pub struct Orchestrator {
    fetcher: Fetcher,
    registry: ExtractorRegistry,
    timeout: Duration,
    mode: ExecutionMode,
    max_concurrency: usize,
    max_retries: u32,
}

impl Orchestrator {
    /// Creates an orchestrator from a configuration
    ///
    /// The configuration is validated first, so nothing is fetched for a
    /// configuration that [`validate`] rejects.
    ///
    /// # Returns
    ///
    /// * `Ok(Orchestrator)` - Ready to run
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client failure
    pub fn new(config: &Config) -> Result<Self, HarvestError> {
        validate(config)?;
        let limiter = RateLimiter::from_config(&config.scraper)?;
        let fetcher = Fetcher::new(&config.identity, limiter)?;
        Ok(Self::with_fetcher(fetcher, &config.scraper)?)
    }

    /// Creates an orchestrator around an existing fetcher
    ///
    /// Fails when the configured timeout is not a representable duration.
    pub fn with_fetcher(fetcher: Fetcher, settings: &ScraperConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            fetcher,
            registry: ExtractorRegistry::default(),
            timeout: settings.timeout()?,
            mode: settings.mode,
            max_concurrency: settings.max_concurrency.max(1) as usize,
            max_retries: settings.max_retries,
        })
    }

    /// Replaces the extractor registry
    pub fn with_registry(mut self, registry: ExtractorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Overrides the execution mode
    pub fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ExecutionMode {
        self.mode
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Scrapes every source and returns the records that succeeded
    ///
    /// Failures are logged and skipped; this never fails as a whole.
    pub async fn run_all(&self, sources: &[Source]) -> ResultStore {
        self.run_batch(sources).await.store
    }

    /// Scrapes every source, returning both records and failures
    ///
    /// Each failure is logged exactly once, here.
    pub async fn run_batch(&self, sources: &[Source]) -> BatchOutcome {
        tracing::info!(
            "Starting {:?} run over {} sources",
            self.mode,
            sources.len()
        );
        let start_time = Instant::now();

        let results = match self.mode {
            ExecutionMode::Sequential => self.run_sequential(sources).await,
            ExecutionMode::Parallel => self.run_parallel(sources).await,
        };

        let mut outcome = BatchOutcome::default();
        for (source, result) in sources.iter().zip(results) {
            match result {
                Ok(record) => {
                    if let Err(e) = outcome.store.append(record) {
                        tracing::warn!(source = %source.id(), "Dropping record: {}", e);
                    }
                }
                Err(error) => {
                    tracing::error!(
                        source = %source.id(),
                        url = %error.url(),
                        kind = %error.kind(),
                        "Failed to scrape source: {}",
                        error
                    );
                    outcome.failures.push(SourceFailure {
                        source_id: source.id().to_string(),
                        url: error.url().to_string(),
                        error,
                    });
                }
            }
        }

        tracing::info!(
            "Run completed: {} succeeded, {} failed in {:?}",
            outcome.store.len(),
            outcome.failures.len(),
            start_time.elapsed()
        );

        outcome
    }

    /// Scrapes a single source at its configured URL
    pub async fn run_one(&self, source: &Source) -> Result<Record, SourceError> {
        self.scrape(source, source.url()).await
    }

    /// Scrapes a single source at another URL, e.g. a later page of a listing
    pub async fn run_one_at(&self, source: &Source, url: &str) -> Result<Record, SourceError> {
        self.scrape(source, url).await
    }

    /// One source at a time, in configuration order
    async fn run_sequential(&self, sources: &[Source]) -> Vec<Result<Record, SourceError>> {
        let mut results = Vec::with_capacity(sources.len());
        for source in sources {
            results.push(self.run_one(source).await);
        }
        results
    }

    /// Sources in flight concurrently; results reordered to configuration order
    async fn run_parallel(&self, sources: &[Source]) -> Vec<Result<Record, SourceError>> {
        let mut completed: Vec<(usize, Result<Record, SourceError>)> =
            stream::iter(sources.iter().enumerate())
                .map(|(index, source)| async move { (index, self.run_one(source).await) })
                .buffer_unordered(self.max_concurrency)
                .collect()
                .await;

        completed.sort_by_key(|(index, _)| *index);
        completed.into_iter().map(|(_, result)| result).collect()
    }

    /// Fetch, extract and build a record for one source
    async fn scrape(&self, source: &Source, url: &str) -> Result<Record, SourceError> {
        tracing::info!(source = %source.id(), %url, "Scraping {}", source.kind());

        let extractor = self.registry.get(source.kind()).ok_or_else(|| {
            SourceError::parse(url, format!("no extractor registered for {}", source.kind()))
        })?;

        let body = self.fetch_with_retry(url, extractor.body_format()).await?;
        let page_url = Url::parse(url).map_err(|e| SourceError::parse(url, e.to_string()))?;
        let extraction = extractor.extract(&Page::new(page_url, body))?;

        let title = extraction
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| extractor.fallback_title().to_string());
        let record = Record::new(source.id(), url, title, extraction.payload);

        tracing::info!(
            source = %source.id(),
            %url,
            items = record.item_count(),
            "Successfully scraped {}",
            source.kind()
        );

        Ok(record)
    }

    /// Fetches a URL, retrying transient failures up to `max_retries` times
    async fn fetch_with_retry(
        &self,
        url: &str,
        format: BodyFormat,
    ) -> Result<RawBody, SourceError> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch(url, self.timeout, format).await.into_result() {
                Ok(body) => return Ok(body),
                Err(error) if error.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        "Retrying {} ({}/{}) after {}",
                        url,
                        attempt,
                        self.max_retries,
                        error.kind()
                    );
                }
                Err(error) => return Err(error),
            }
        }
    }
}
