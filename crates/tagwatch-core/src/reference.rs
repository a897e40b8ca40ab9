//! Image reference helpers.
//!
//! Registry clients use these to implement their membership predicates
//! without each re-deriving which host an image URL points at.

/// Registry host assumed when an image URL names none.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Returns the registry host of an image URL.
///
/// The first path component is treated as a host when it contains a `.` or
/// a `:`, or is `localhost`. Otherwise the image lives on Docker Hub.
///
/// # Examples
///
/// ```
/// use tagwatch_core::reference::registry_host;
///
/// assert_eq!(registry_host("quay.io/jetstack/cert-manager"), "quay.io");
/// assert_eq!(registry_host("localhost:5000/app"), "localhost:5000");
/// assert_eq!(registry_host("library/nginx"), "docker.io");
/// assert_eq!(registry_host("nginx"), "docker.io");
/// ```
#[must_use]
pub fn registry_host(image_url: &str) -> &str {
    match image_url.split_once('/') {
        Some((first, _)) if is_host(first) => first,
        _ => DEFAULT_REGISTRY,
    }
}

/// Returns the repository path of an image URL, without the registry host.
///
/// # Examples
///
/// ```
/// use tagwatch_core::reference::repository_path;
///
/// assert_eq!(repository_path("quay.io/jetstack/cert-manager"), "jetstack/cert-manager");
/// assert_eq!(repository_path("library/nginx"), "library/nginx");
/// ```
#[must_use]
pub fn repository_path(image_url: &str) -> &str {
    match image_url.split_once('/') {
        Some((first, rest)) if is_host(first) => rest,
        _ => image_url,
    }
}

/// Strips a trailing `:tag` and/or `@digest` from an image reference.
///
/// A `:` that belongs to a registry port is left alone.
///
/// # Examples
///
/// ```
/// use tagwatch_core::reference::strip_tag;
///
/// assert_eq!(strip_tag("nginx:1.25"), "nginx");
/// assert_eq!(strip_tag("localhost:5000/app:v1@sha256:abc"), "localhost:5000/app");
/// assert_eq!(strip_tag("localhost:5000/app"), "localhost:5000/app");
/// ```
#[must_use]
pub fn strip_tag(image_ref: &str) -> &str {
    let without_digest = image_ref.split_once('@').map_or(image_ref, |(name, _)| name);
    let last_slash = without_digest.rfind('/').map_or(0, |i| i + 1);
    match without_digest[last_slash..].rfind(':') {
        Some(colon) => &without_digest[..last_slash + colon],
        None => without_digest,
    }
}

fn is_host(component: &str) -> bool {
    component.contains('.') || component.contains(':') || component == "localhost"
}

/// Membership predicate over a set of registry hosts.
///
/// Entries are either exact hosts (`quay.io`) or wildcard suffixes
/// (`*.gcr.io`, which matches `eu.gcr.io` but not `gcr.io` itself).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostMatcher {
    hosts: Vec<String>,
}

impl HostMatcher {
    /// Creates a matcher over the given hosts.
    #[must_use]
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| Into::<String>::into(h).to_ascii_lowercase())
                .collect(),
        }
    }

    /// Returns true if the image URL's registry host is in the set.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagwatch_core::HostMatcher;
    ///
    /// let gcr = HostMatcher::new(["gcr.io", "*.gcr.io"]);
    /// assert!(gcr.matches("gcr.io/distroless/static"));
    /// assert!(gcr.matches("eu.gcr.io/project/app"));
    /// assert!(!gcr.matches("quay.io/coreos/etcd"));
    /// ```
    #[must_use]
    pub fn matches(&self, image_url: &str) -> bool {
        let host = registry_host(image_url).to_ascii_lowercase();
        self.hosts.iter().any(|entry| match entry.strip_prefix("*.") {
            Some(suffix) => host
                .strip_suffix(suffix)
                .is_some_and(|head| head.ends_with('.') && head.len() > 1),
            None => host == *entry,
        })
    }
}
