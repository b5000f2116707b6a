//! # hyadm
//!
//! User and connection administration for Hysteria proxy servers.
//!
//! ## Crates
//!
//! - [`hyadm_core`] - Users, connection parameters and traffic types
//! - [`hyadm_store`] - YAML document model and the config repository
//! - [`hyadm_stats`] - Traffic stats client and payload normalisation
//! - [`hyadm_config`] - Tool configuration loading and validation
//! - [`hyadm_admin`] - User lifecycle and command handlers

pub use hyadm_admin as admin;
pub use hyadm_config as config;
pub use hyadm_core as core;
pub use hyadm_stats as stats;
pub use hyadm_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use hyadm_admin::{AdminError, UserAdmin};
    pub use hyadm_config::{Config, load_tool_config, validate_config};
    pub use hyadm_core::{ConnectionParams, User, UserStats};
    pub use hyadm_stats::StatsSource;
    pub use hyadm_store::{ConfigRepository, UserRepository};
}
