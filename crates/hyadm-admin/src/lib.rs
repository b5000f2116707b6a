//! User lifecycle administration for Hysteria servers.
//!
//! [`UserAdmin`] composes the config repository, a service restarter, a
//! password generator and a stats source. The [`cli`] module turns its
//! operations into commands.
//!
//! # Example
//!
//! ```no_run
//! use hyadm_admin::UserAdmin;
//! use hyadm_config::Config;
//!
//! # async fn example() -> Result<(), hyadm_admin::AdminError> {
//! let admin = UserAdmin::from_config(&Config::default())?;
//! let password = admin.add_user("alice").await?;
//! let url = admin.connection_url("alice").await?;
//! # Ok(())
//! # }
//! ```

mod admin;
pub mod cli;
mod error;
mod password;
mod restart;

pub use admin::UserAdmin;
pub use cli::{AdminCommand, CliError, Console, OutputFormat};
pub use error::{AdminError, PasswordError, RestartError};
pub use password::{PasswordGenerator, RandomPasswordGenerator};
pub use restart::{CommandRunner, ProcessRunner, ServiceRestarter, SystemRestarter};
