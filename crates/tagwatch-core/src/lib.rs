//! # Tagwatch Core
//!
//! Core types for resolving the latest tag of a container image.
//!
//! This crate provides the data structures shared by the resolver and by
//! the registry clients that feed it:
//!
//! - [`ImageTag`] - One tag observed in a remote repository
//! - [`Options`] - The selection policy used to pick a winning tag
//! - [`fingerprint`] - Stable cache key for an `(image, options)` pair
//! - [`reference`] - Helpers for picking apart image references
//!
//! ## Example
//!
//! ```rust
//! use tagwatch_core::{fingerprint, Options};
//!
//! let options = Options::builder()
//!     .pin_major(1)
//!     .regex_matcher(r"^v\d")
//!     .build()?;
//!
//! let key = fingerprint("quay.io/jetstack/cert-manager-controller", &options)?;
//! assert!(!key.is_empty());
//! # Ok::<(), tagwatch_core::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod fingerprint;
pub mod options;
pub mod reference;
pub mod tag;


pub use error::{Error, Result};
pub use fingerprint::fingerprint;
pub use options::{Options, OptionsBuilder, TagMatcher};
pub use reference::HostMatcher;
pub use tag::ImageTag;
