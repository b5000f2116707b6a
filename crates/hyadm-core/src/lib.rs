//! Core types and constants shared across hyadm crates.
//!
//! This crate provides:
//! - Default configuration values
//! - The `User` identity and its validation rules
//! - Connection parameters and the `hy2://` share URL
//! - Traffic snapshot and per-user statistics types

pub mod connection;
pub mod defaults;
pub mod traffic;
pub mod user;

pub use connection::{ConnectionParams, ShareUrlError};
pub use defaults::*;
pub use traffic::{TrafficSnapshot, UserStats, UserTraffic};
pub use user::{User, UserError};

/// Project name.
pub const PROJECT_NAME: &str = "hyadm";
/// Project version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
