//! locale-sync core
//!
//! Pulls translation bundles from an i18n backend into the frontend's
//! source tree and normalizes the resources type generated from them.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

pub mod client;
pub mod config;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod normalize;
pub mod pull;

pub use client::BackendClient;
pub use config::{ConfigOverrides, SyncConfig, TypesConfig};
pub use error::{ConfigError, NormalizeError, SyncError};
pub use manifest::Manifest;
pub use normalize::{Normalized, normalize_file, normalize_source};
pub use pull::{PullEvent, PullReport, pull_translations};
