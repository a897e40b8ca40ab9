//! Registry client capability and dispatch.
//!
//! Each registry backend (Docker Hub, Quay, GCR, ...) implements
//! [`ImageClient`]. The resolver never talks to a backend directly; it asks
//! the [`ClientDispatcher`] which client owns an image URL.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tagwatch_core::ImageTag;

use crate::error::FetchError;

/// Capability for listing the tags of images on one kind of registry.
#[async_trait]
pub trait ImageClient: Send + Sync {
    /// Short name used in logs (e.g. `"quay"`).
    fn name(&self) -> &str;

    /// Returns true if this client should serve the given image URL.
    ///
    /// Must be pure: no I/O.
    fn is_client(&self, image_url: &str) -> bool;

    /// Lists every tag visible for the image.
    ///
    /// Pagination is the client's responsibility. Dropping the returned
    /// future cancels the fetch.
    async fn tags(&self, image_url: &str) -> Result<Vec<ImageTag>, FetchError>;
}

/// Selects the registry client for an image URL.
///
/// Clients are tried in registration order; the first whose
/// [`ImageClient::is_client`] returns true wins. If none claims the URL the
/// default client is used, so selection never fails.
#[derive(Clone)]
pub struct ClientDispatcher {
    clients: Vec<Arc<dyn ImageClient>>,
    default: Arc<dyn ImageClient>,
}

impl ClientDispatcher {
    /// Creates a dispatcher that falls back to `default`.
    #[must_use]
    pub fn new(default: Arc<dyn ImageClient>) -> Self {
        Self {
            clients: Vec::new(),
            default,
        }
    }

    /// Registers a client with lower priority than those already registered.
    #[must_use]
    pub fn with_client(mut self, client: Arc<dyn ImageClient>) -> Self {
        self.clients.push(client);
        self
    }

    /// Returns the client that should serve `image_url`.
    #[must_use]
    pub fn select(&self, image_url: &str) -> &Arc<dyn ImageClient> {
        let client = self
            .clients
            .iter()
            .find(|client| client.is_client(image_url))
            .unwrap_or(&self.default);
        tracing::trace!(image_url, client = client.name(), "Selected registry client");
        client
    }

    /// Returns the fallback client.
    #[must_use]
    pub fn default_client(&self) -> &Arc<dyn ImageClient> {
        &self.default
    }

    /// Returns the number of registered (non-default) clients.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clients.len()
    }

    /// Returns true if only the default client is available.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}

impl fmt::Debug for ClientDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientDispatcher")
            .field(
                "clients",
                &self.clients.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .field("default", &self.default.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagwatch_core::HostMatcher;

    struct HostClient {
        name: &'static str,
        hosts: HostMatcher,
    }

    impl HostClient {
        fn new(name: &'static str, hosts: &[&str]) -> Arc<dyn ImageClient> {
            Arc::new(Self {
                name,
                hosts: HostMatcher::new(hosts.iter().copied()),
            })
        }
    }

    #[async_trait]
    impl ImageClient for HostClient {
        fn name(&self) -> &str {
            self.name
        }

        fn is_client(&self, image_url: &str) -> bool {
            self.hosts.matches(image_url)
        }

        async fn tags(&self, _image_url: &str) -> Result<Vec<ImageTag>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn dispatcher() -> ClientDispatcher {
        let docker = HostClient::new("docker", &["docker.io"]);
        ClientDispatcher::new(Arc::clone(&docker))
            .with_client(HostClient::new("quay", &["quay.io"]))
            .with_client(HostClient::new("gcr", &["gcr.io", "*.gcr.io"]))
            .with_client(docker)
    }

    #[test]
    fn test_select_by_host() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.select("quay.io/coreos/etcd").name(), "quay");
        assert_eq!(dispatcher.select("eu.gcr.io/project/app").name(), "gcr");
        assert_eq!(dispatcher.select("library/nginx").name(), "docker");
    }

    #[test]
    fn test_select_falls_back_to_default() {
        let dispatcher = dispatcher();
        assert_eq!(dispatcher.select("ghcr.io/org/app").name(), "docker");
        assert_eq!(dispatcher.select("registry.local:5000/app").name(), "docker");
    }

    #[test]
    fn test_first_registered_wins() {
        let dispatcher = ClientDispatcher::new(HostClient::new("fallback", &[]))
            .with_client(HostClient::new("first", &["quay.io"]))
            .with_client(HostClient::new("second", &["quay.io"]));
        assert_eq!(dispatcher.select("quay.io/a/b").name(), "first");
        assert_eq!(dispatcher.len(), 2);
    }

    #[test]
    fn test_only_default() {
        let dispatcher = ClientDispatcher::new(HostClient::new("fallback", &[]));
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.select("anything").name(), "fallback");
        assert_eq!(dispatcher.default_client().name(), "fallback");
    }

    #[test]
    fn test_debug_lists_clients() {
        let rendered = format!("{:?}", dispatcher());
        assert!(rendered.contains("quay"));
        assert!(rendered.contains("gcr"));
    }
}
