//! Randomized request pacing
//!
//! Every outbound request is preceded by a sleep drawn uniformly from a closed
//! interval. The interval is fixed at construction, so a limiter can be shared
//! freely between concurrent fetches; each call draws its own delay.

use crate::config::{validate_delay_range, ScraperConfig};
use crate::ConfigError;
use rand::{rng, Rng};
use std::time::Duration;

/// Sleeps for a random duration in `[min, max]` before each request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    min: Duration,
    max: Duration,
}

impl RateLimiter {
    /// Creates a limiter for the closed interval `[min, max]`
    ///
    /// # Returns
    ///
    /// * `Ok(RateLimiter)` - The interval is well formed
    /// * `Err(ConfigError)` - `min` is greater than `max`
    pub fn new(min: Duration, max: Duration) -> Result<Self, ConfigError> {
        if min > max {
            return Err(ConfigError::Validation(format!(
                "min_delay ({:?}) must not exceed max_delay ({:?})",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Builds a limiter from the `[scraper]` section
    pub fn from_config(config: &ScraperConfig) -> Result<Self, ConfigError> {
        validate_delay_range(config.min_delay, config.max_delay)?;
        Self::new(config.min_delay()?, config.max_delay()?)
    }

    /// A limiter that never sleeps
    pub fn disabled() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn min_delay(&self) -> Duration {
        self.min
    }

    pub fn max_delay(&self) -> Duration {
        self.max
    }

    /// Draws the next delay from the configured interval
    pub fn next_delay(&self) -> Duration {
        if self.min == self.max {
            return self.min;
        }

        rng().random_range(self.min..=self.max)
    }

    /// Sleeps for one freshly drawn delay
    pub async fn wait(&self) {
        let delay = self.next_delay();
        if delay.is_zero() {
            return;
        }

        tracing::trace!("Rate limiting: sleeping {:?}", delay);
        tokio::time::sleep(delay).await;
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}
