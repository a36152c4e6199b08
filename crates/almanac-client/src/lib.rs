//! # almanac-client
//!
//! Feishu Open API client for Almanac.
//!
//! This crate provides:
//! - [`FeishuClient`]: tenant credential exchange and a bounded Bitable
//!   records read
//! - [`RecordSource`]: the seam the web front end reads records through
//! - [`CachedSource`]: a record source served from a single TTL cache slot

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod client;
pub mod error;
pub mod source;

pub use client::{ClientConfig, FeishuClient};
pub use error::{Error, Result};
pub use source::{CachedSource, RECORDS_CACHE_KEY, RECORDS_TTL, RecordSource};
