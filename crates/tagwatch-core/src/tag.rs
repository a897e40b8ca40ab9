//! Image tag model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single tag observed in a remote image repository.
///
/// Tag lists returned by registry clients carry no ordering or uniqueness
/// guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTag {
    /// Tag label (e.g. `v1.2.3`, `latest`).
    pub tag: String,

    /// Content digest the tag points at. May be empty.
    #[serde(default)]
    pub sha: String,

    /// When the tag was last pushed, as reported by the registry.
    pub timestamp: DateTime<Utc>,
}

impl ImageTag {
    /// Creates a new image tag.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::Utc;
    /// use tagwatch_core::ImageTag;
    ///
    /// let tag = ImageTag::new("v1.2.3", "sha256:abc", Utc::now());
    /// assert_eq!(tag.tag, "v1.2.3");
    /// assert!(tag.has_sha());
    /// ```
    #[must_use]
    pub fn new(tag: impl Into<String>, sha: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            tag: tag.into(),
            sha: sha.into(),
            timestamp,
        }
    }

    /// Returns true if the registry reported a digest for this tag.
    #[must_use]
    pub fn has_sha(&self) -> bool {
        !self.sha.is_empty()
    }
}

impl std::fmt::Display for ImageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.sha.is_empty() {
            write!(f, "{}", self.tag)
        } else {
            write!(f, "{}@{}", self.tag, self.sha)
        }
    }
}
