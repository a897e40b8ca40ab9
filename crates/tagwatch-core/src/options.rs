//! Tag selection options.
//!
//! [`Options`] describes how a winning tag is picked from a repository's
//! tag list. Two disjoint policies exist:
//!
//! - **Semantic version** (default): the greatest semver tag that passes the
//!   pre-release, pin and pattern filters.
//! - **Digest recency** (`use_sha`): the most recently pushed tag. None of the
//!   semver fields are consulted.

use std::fmt;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Compiled pattern that a tag's literal text must match.
///
/// Equality, hashing and serialization go through the source pattern, so two
/// matchers built from the same text are interchangeable.
#[derive(Clone)]
pub struct TagMatcher(Regex);

impl TagMatcher {
    /// Compiles a new matcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern is not a valid regex.
    pub fn new(pattern: &str) -> Result<Self> {
        Regex::new(pattern)
            .map(Self)
            .map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    /// Returns true if the tag text matches.
    #[must_use]
    pub fn is_match(&self, tag: &str) -> bool {
        self.0.is_match(tag)
    }

    /// Returns the source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for TagMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TagMatcher").field(&self.as_str()).finish()
    }
}

impl PartialEq for TagMatcher {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for TagMatcher {}

impl std::hash::Hash for TagMatcher {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl Serialize for TagMatcher {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TagMatcher {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let pattern = String::deserialize(deserializer)?;
        Self::new(&pattern).map_err(serde::de::Error::custom)
    }
}

/// Selection policy for resolving the latest tag of an image.
///
/// Options are immutable once built. Use [`Options::builder`] to construct
/// anything other than the default policy.
///
/// Field order is part of the fingerprint format; do not reorder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Options {
    #[serde(default)]
    use_sha: bool,
    #[serde(default)]
    use_pre_release: bool,
    #[serde(default)]
    pin_major: Option<u64>,
    #[serde(default)]
    pin_minor: Option<u64>,
    #[serde(default)]
    pin_patch: Option<u64>,
    #[serde(default)]
    regex_matcher: Option<TagMatcher>,
}

impl Options {
    /// Creates an options builder.
    #[must_use]
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Whether the digest recency policy is used instead of semver.
    #[must_use]
    pub const fn use_sha(&self) -> bool {
        self.use_sha
    }

    /// Whether pre-release versions are eligible.
    #[must_use]
    pub const fn use_pre_release(&self) -> bool {
        self.use_pre_release
    }

    /// Required major version, if pinned.
    #[must_use]
    pub const fn pin_major(&self) -> Option<u64> {
        self.pin_major
    }

    /// Required minor version, if pinned.
    #[must_use]
    pub const fn pin_minor(&self) -> Option<u64> {
        self.pin_minor
    }

    /// Required patch version, if pinned.
    #[must_use]
    pub const fn pin_patch(&self) -> Option<u64> {
        self.pin_patch
    }

    /// Pattern the literal tag text must match, if any.
    #[must_use]
    pub const fn regex_matcher(&self) -> Option<&TagMatcher> {
        self.regex_matcher.as_ref()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn pin(value: Option<u64>) -> String {
            value.map_or_else(|| "-".to_string(), |v| v.to_string())
        }

        write!(
            f,
            "{{use_sha: {}, use_pre_release: {}, pin_major: {}, pin_minor: {}, pin_patch: {}, regex: ",
            self.use_sha,
            self.use_pre_release,
            pin(self.pin_major),
            pin(self.pin_minor),
            pin(self.pin_patch),
        )?;
        match &self.regex_matcher {
            Some(matcher) => write!(f, "{:?}}}", matcher.as_str()),
            None => write!(f, "-}}"),
        }
    }
}

/// Builder for [`Options`].
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    use_sha: bool,
    use_pre_release: bool,
    pin_major: Option<u64>,
    pin_minor: Option<u64>,
    pin_patch: Option<u64>,
    regex_matcher: Option<String>,
}

impl OptionsBuilder {
    /// Selects the most recently pushed tag instead of the greatest semver.
    #[must_use]
    pub const fn use_sha(mut self, enabled: bool) -> Self {
        self.use_sha = enabled;
        self
    }

    /// Makes pre-release versions eligible.
    #[must_use]
    pub const fn use_pre_release(mut self, enabled: bool) -> Self {
        self.use_pre_release = enabled;
        self
    }

    /// Pins the major version.
    #[must_use]
    pub const fn pin_major(mut self, major: u64) -> Self {
        self.pin_major = Some(major);
        self
    }

    /// Pins the minor version.
    #[must_use]
    pub const fn pin_minor(mut self, minor: u64) -> Self {
        self.pin_minor = Some(minor);
        self
    }

    /// Pins the patch version.
    #[must_use]
    pub const fn pin_patch(mut self, patch: u64) -> Self {
        self.pin_patch = Some(patch);
        self
    }

    /// Requires the literal tag text to match `pattern`.
    #[must_use]
    pub fn regex_matcher(mut self, pattern: impl Into<String>) -> Self {
        self.regex_matcher = Some(pattern.into());
        self
    }

    /// Builds the options, compiling the tag pattern if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if the pattern does not compile.
    ///
    /// # Examples
    ///
    /// ```
    /// use tagwatch_core::Options;
    ///
    /// let options = Options::builder().pin_major(2).use_pre_release(true).build()?;
    /// assert_eq!(options.pin_major(), Some(2));
    /// assert!(options.use_pre_release());
    ///
    /// assert!(Options::builder().regex_matcher("(").build().is_err());
    /// # Ok::<(), tagwatch_core::Error>(())
    /// ```
    pub fn build(self) -> Result<Options> {
        let regex_matcher = self
            .regex_matcher
            .as_deref()
            .map(TagMatcher::new)
            .transpose()?;

        Ok(Options {
            use_sha: self.use_sha,
            use_pre_release: self.use_pre_release,
            pin_major: self.pin_major,
            pin_minor: self.pin_minor,
            pin_patch: self.pin_patch,
            regex_matcher,
        })
    }
}
