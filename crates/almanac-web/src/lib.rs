//! # almanac-web
//!
//! Web front end for Almanac.
//!
//! This crate provides the site around the core and client crates:
//! - Configuration from TOML and the environment
//! - HTML views for the article list, article detail, and not-found pages
//! - The axum router and the server that binds it
//! - Handlers for the `almanac config` subcommands

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod commands;
pub mod config;
pub mod error;
pub mod routes;
pub mod server;
pub mod views;

pub use config::SiteConfig;
pub use error::{Error, Result};
pub use routes::{AppState, router};
pub use server::Server;
