//! Configuration loading and CLI definitions.
//!
//! Precedence, lowest first: serde defaults, the config file, `HYSTERIA_*`
//! environment variables, command-line overrides.

mod cli;
mod defaults;
pub mod env;
mod loader;
mod types;
mod validate;

pub use cli::{CliOverrides, apply_overrides};
pub use env::apply_env_overrides;
pub use loader::{
    ConfigError, LoadedConfig, ensure_default_config, load_config, load_tool_config,
    render_config, resolve_config_path,
};
pub use types::*;
pub use validate::validate_config;
