//! Error types for tagwatch core operations.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building options or computing fingerprints.
#[derive(Error, Debug)]
pub enum Error {
    /// Tag matcher pattern failed to compile.
    #[error("Invalid tag pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Options could not be serialized for fingerprinting.
    #[error("Failed to serialize options: {0}")]
    Serialization(#[from] serde_json::Error),
}
