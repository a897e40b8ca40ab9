//! Configuration types for the tag resolver.

use std::time::Duration;

/// Shortest sweep period, so a tiny TTL never produces a zero-period timer.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for the tag resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// How long a fetched tag list is served from the cache (default: 30 minutes).
    pub cache_ttl: Duration,

    /// Upper bound for a single registry fetch (default: 30 seconds).
    ///
    /// `None` leaves fetches unbounded unless the caller supplies a timeout.
    pub fetch_timeout: Option<Duration>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(30 * 60),
            fetch_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl ResolverConfig {
    /// Creates a new configuration with the given cache TTL.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::Duration;
    /// use tagwatch_registry::ResolverConfig;
    ///
    /// let config = ResolverConfig::new(Duration::from_secs(600));
    /// assert_eq!(config.cache_ttl, Duration::from_secs(600));
    /// assert_eq!(config.sweep_interval(), Duration::from_secs(300));
    /// ```
    #[must_use]
    pub fn new(cache_ttl: Duration) -> Self {
        Self {
            cache_ttl,
            ..Default::default()
        }
    }

    /// Sets the cache TTL.
    #[must_use]
    pub const fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Sets the per-fetch timeout.
    #[must_use]
    pub const fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Removes the per-fetch timeout.
    #[must_use]
    pub const fn without_fetch_timeout(mut self) -> Self {
        self.fetch_timeout = None;
        self
    }

    /// Returns the period of the background sweep: half the cache TTL.
    ///
    /// No entry outlives its TTL by more than this before it is evicted.
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        (self.cache_ttl / 2).max(MIN_SWEEP_INTERVAL)
    }
}
