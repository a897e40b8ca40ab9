//! Error types for tag resolution.

use std::time::Duration;

use tagwatch_core::Options;
use thiserror::Error;

/// Errors returned by [`crate::ImageClient`] implementations.
///
/// These are surfaced to the caller verbatim inside
/// [`ResolveError::Fetch`]; the resolver never retries.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its response could not be read.
    #[error("Request failed: {message}")]
    Request {
        /// Error message.
        message: String,
    },

    /// The registry answered with a non-success status.
    #[error("HTTP error from registry: {status} - {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Error message.
        message: String,
    },

    /// The fetch did not finish before its deadline.
    #[error("Timed out after {after:?}")]
    Timeout {
        /// Deadline that was exceeded.
        after: Duration,
    },

    /// The fetch was cancelled by the caller.
    #[error("Fetch cancelled")]
    Cancelled,

    /// Any other client failure.
    #[error(transparent)]
    Other {
        /// Underlying error.
        #[from]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl FetchError {
    /// Creates a request error.
    #[must_use]
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Returns true if the fetch hit its deadline.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns true if the fetch was cancelled.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Errors that can occur while resolving the latest tag of an image.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The registry client failed to list tags.
    #[error("Failed to get tags from remote registry for {image_url:?}: {source}")]
    Fetch {
        /// Image URL that was being resolved.
        image_url: String,
        /// Underlying client error.
        #[source]
        source: FetchError,
    },

    /// The registry listed no tags at all.
    #[error("No tags found for image {image_url:?}")]
    EmptyResult {
        /// Image URL that was being resolved.
        image_url: String,
    },

    /// Tags were available but none satisfied the options.
    #[error("No tag found with those option constraints: {options}")]
    NoMatch {
        /// Effective options at selection time.
        options: Box<Options>,
    },
}

impl ResolveError {
    /// Creates a constraint mismatch error for the given options.
    #[must_use]
    pub fn no_match(options: &Options) -> Self {
        Self::NoMatch {
            options: Box::new(options.clone()),
        }
    }

    /// Returns the fetch error if this is a fetch failure.
    #[must_use]
    pub const fn as_fetch_error(&self) -> Option<&FetchError> {
        match self {
            Self::Fetch { source, .. } => Some(source),
            _ => None,
        }
    }
}
