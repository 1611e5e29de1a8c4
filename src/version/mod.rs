//! Version management layer
//!
//! Fetches the published versions of the tracked package and resolves
//! semver ranges against them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Registry   │────▶│   Catalog   │────▶│    Range    │
//! │  (fetch)    │     │(filter/sort)│     │(max_satisfy)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        ▲
//!        │ optional
//! ┌─────────────┐
//! │    Cache    │
//! │ (ttl, mem)  │
//! └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cache`]: In-memory, time-bounded registry decorator
//! - [`catalog`]: Filtered, sorted catalog of published versions
//! - [`error`]: Error types for registry operations
//! - [`range`]: npm semver range grammar and `max_satisfying`
//! - [`registry`]: Registry trait for fetching versions from remote sources
//! - [`registries`]: Concrete registry implementations (npm)
//! - [`semver`]: Version coercion and ordering helpers
//! - [`types`]: Common types like `PackageVersions` and `Channel`

pub mod cache;
pub mod catalog;
pub mod error;
pub mod range;
pub mod registries;
pub mod registry;
pub mod semver;
pub mod types;
