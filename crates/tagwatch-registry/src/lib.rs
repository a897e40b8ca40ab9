//! # Tagwatch Registry
//!
//! Resolves the latest tag of a container image from its remote registry.
//!
//! Registry backends plug in through the [`ImageClient`] capability; this
//! crate decides which client serves an image, shields registries from
//! repeated queries with a TTL cache, and picks the winning tag.
//!
//! ## Features
//!
//! - **Client Dispatch**: ordered membership predicates with a default client
//! - **Tag Cache**: in-memory, TTL-bounded, swept in the background every TTL/2
//! - **Version Selection**: greatest semver under pins/pattern, or most recent push
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tagwatch_core::Options;
//! use tagwatch_registry::{ClientDispatcher, ImageClient, ResolverConfig, TagResolver};
//!
//! # async fn run(docker: Arc<dyn ImageClient>, quay: Arc<dyn ImageClient>) -> Result<(), Box<dyn std::error::Error>> {
//! let dispatcher = ClientDispatcher::new(Arc::clone(&docker))
//!     .with_client(quay)
//!     .with_client(docker);
//!
//! let resolver = TagResolver::new(ResolverConfig::default(), dispatcher);
//!
//! let options = Options::builder().pin_major(1).build()?;
//! let latest = resolver
//!     .resolve_latest(&options, "quay.io/jetstack/cert-manager-controller")
//!     .await?;
//! println!("latest: {latest}");
//!
//! resolver.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       TagResolver                           │
//! │  ┌──────────────────┐  ┌─────────────┐  ┌────────────────┐  │
//! │  │ ClientDispatcher │  │  TagCache   │  │ VersionSelector│  │
//! │  │ (ImageClient[])  │  │ (TTL+sweep) │  │ (SemVer / SHA) │  │
//! │  └──────────────────┘  └─────────────┘  └────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Container Registries                       │
//! │          (Docker Hub, Quay, GCR, ...)                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod cache;
mod client;
mod config;
mod error;
mod resolver;
mod version;

pub use cache::{SweeperHandle, TagCache};
pub use client::{ClientDispatcher, ImageClient};
pub use config::ResolverConfig;
pub use error::{FetchError, ResolveError};
pub use resolver::TagResolver;
pub use version::VersionSelector;
