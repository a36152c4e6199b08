//! Almanac Core: record model, text normalization, projection, and caching.
//!
//! This crate has no I/O of its own; the HTTP client and the web front end
//! build on it.
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`normalize`]: Flatten rich-text cell encodings into display strings
//! - [`article`]: Raw records, display articles, and the projector
//! - [`cache`]: TTL cache abstraction with an injectable clock

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod article;
pub mod cache;
pub mod error;
pub mod normalize;

// Re-export key types at crate root for convenience
pub use article::{Article, FieldNames, Projector, RawRecord};
pub use cache::{Cache, Clock, ManualClock, MemoryCache, SystemClock};
pub use error::{Error, Result};
pub use normalize::{normalize, normalize_value};
