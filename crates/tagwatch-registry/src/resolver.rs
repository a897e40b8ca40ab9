//! Latest-tag resolution.
//!
//! [`TagResolver`] ties the pieces together: it asks the
//! [`ClientDispatcher`] for the right registry client, serves tag lists from
//! the [`TagCache`] while they are fresh, and hands the list to the
//! [`VersionSelector`].

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tagwatch_core::{ImageTag, Options};

use crate::cache::{SweeperHandle, TagCache};
use crate::client::ClientDispatcher;
use crate::config::ResolverConfig;
use crate::error::{FetchError, ResolveError};
use crate::version::VersionSelector;

/// Resolves the latest tag of container images.
///
/// One resolver is meant to be shared (behind an `Arc`) by every task that
/// checks images. Concurrent resolutions of a cold image may each fetch; the
/// last one to finish owns the cache entry.
#[derive(Debug)]
pub struct TagResolver {
    config: ResolverConfig,
    dispatcher: ClientDispatcher,
    cache: Arc<TagCache>,
    selector: VersionSelector,
    sweeper: Mutex<Option<SweeperHandle>>,
}

impl TagResolver {
    /// Creates a resolver and starts the background cache sweep.
    ///
    /// The sweep runs every `config.cache_ttl / 2` until [`shutdown`] is
    /// called or the resolver is dropped. Must be called from within a tokio
    /// runtime.
    ///
    /// [`shutdown`]: Self::shutdown
    #[must_use]
    pub fn new(config: ResolverConfig, dispatcher: ClientDispatcher) -> Self {
        let cache = Arc::new(TagCache::new(config.cache_ttl));
        let sweeper = cache.spawn_sweeper(config.sweep_interval());

        Self {
            config,
            dispatcher,
            cache,
            selector: VersionSelector::new(),
            sweeper: Mutex::new(Some(sweeper)),
        }
    }

    /// Returns the resolver configuration.
    #[must_use]
    pub const fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Returns the shared tag cache.
    #[must_use]
    pub const fn cache(&self) -> &Arc<TagCache> {
        &self.cache
    }

    /// Returns the client dispatcher.
    #[must_use]
    pub const fn dispatcher(&self) -> &ClientDispatcher {
        &self.dispatcher
    }

    /// Resolves the latest tag of `image_url` according to `options`.
    ///
    /// The registry fetch, if one is needed, is bounded by
    /// [`ResolverConfig::fetch_timeout`].
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Fetch`] if the registry client fails or times out.
    /// - [`ResolveError::EmptyResult`] if the registry lists no tags.
    /// - [`ResolveError::NoMatch`] if no tag satisfies the options.
    pub async fn resolve_latest(
        &self,
        options: &Options,
        image_url: &str,
    ) -> Result<ImageTag, ResolveError> {
        let tags = self.fetch_tags(image_url, self.config.fetch_timeout).await?;
        self.select(options, &tags)
    }

    /// Like [`resolve_latest`](Self::resolve_latest), with a caller-supplied
    /// bound on the registry fetch instead of the configured one.
    ///
    /// # Errors
    ///
    /// See [`resolve_latest`](Self::resolve_latest).
    pub async fn resolve_latest_with_timeout(
        &self,
        options: &Options,
        image_url: &str,
        timeout: Duration,
    ) -> Result<ImageTag, ResolveError> {
        let tags = self.fetch_tags(image_url, Some(timeout)).await?;
        self.select(options, &tags)
    }

    /// Like [`resolve_latest`](Self::resolve_latest), abandoning the registry
    /// fetch as soon as `cancelled` completes.
    ///
    /// An abandoned fetch leaves the cache untouched. Any future works as the
    /// signal, e.g. `notify.notified()` or `async { let _ = rx.await; }`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Fetch`] with [`FetchError::Cancelled`] if the
    /// signal fires first; otherwise see
    /// [`resolve_latest`](Self::resolve_latest).
    pub async fn resolve_latest_with_cancel<F>(
        &self,
        options: &Options,
        image_url: &str,
        cancelled: F,
    ) -> Result<ImageTag, ResolveError>
    where
        F: Future<Output = ()> + Send,
    {
        let tags = tokio::select! {
            biased;
            () = cancelled => {
                tracing::debug!(image_url, "Tag fetch cancelled");
                Err(ResolveError::Fetch {
                    image_url: image_url.to_string(),
                    source: FetchError::Cancelled,
                })
            }
            result = self.fetch_tags(image_url, self.config.fetch_timeout) => result,
        }?;
        self.select(options, &tags)
    }

    /// Returns every tag of `image_url`, from the cache when fresh.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::Fetch`] if the registry client fails or times out.
    /// - [`ResolveError::EmptyResult`] if the registry lists no tags.
    pub async fn all_tags(&self, image_url: &str) -> Result<Arc<[ImageTag]>, ResolveError> {
        self.fetch_tags(image_url, self.config.fetch_timeout).await
    }

    /// Stops the background cache sweep and waits for it to exit.
    ///
    /// Resolution keeps working afterwards; stale entries are simply no
    /// longer evicted. Calling this more than once is a no-op.
    pub async fn shutdown(&self) {
        let sweeper = self.sweeper.lock().take();
        if let Some(sweeper) = sweeper {
            sweeper.shutdown().await;
        }
    }

    fn select(&self, options: &Options, tags: &[ImageTag]) -> Result<ImageTag, ResolveError> {
        self.selector.select(options, tags).cloned()
    }

    async fn fetch_tags(
        &self,
        image_url: &str,
        timeout: Option<Duration>,
    ) -> Result<Arc<[ImageTag]>, ResolveError> {
        if let Some(tags) = self.cache.get(image_url) {
            return Ok(tags);
        }

        let client = self.dispatcher.select(image_url);
        let fetched = match timeout {
            Some(after) => tokio::time::timeout(after, client.tags(image_url))
                .await
                .unwrap_or(Err(FetchError::Timeout { after })),
            None => client.tags(image_url).await,
        };

        let tags = fetched.map_err(|source| {
            tracing::warn!(image_url, client = client.name(), error = %source, "Failed to fetch tags");
            ResolveError::Fetch {
                image_url: image_url.to_string(),
                source,
            }
        })?;

        if tags.is_empty() {
            tracing::warn!(image_url, client = client.name(), "Registry returned no tags");
            return Err(ResolveError::EmptyResult {
                image_url: image_url.to_string(),
            });
        }

        Ok(self.cache.insert(image_url, tags))
    }
}
