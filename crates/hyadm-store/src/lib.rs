//! Structured document engine and config repository for the Hysteria
//! server document.
//!
//! The repository owns one YAML file. Each operation loads it into a
//! [`Document`], edits only the region it needs (`auth.userpass` for
//! writes) and writes the whole document back atomically.
//!
//! # Example
//!
//! ```no_run
//! use hyadm_core::User;
//! use hyadm_store::{ConfigRepository, UserRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let repo = ConfigRepository::new("/etc/hysteria/config.yaml");
//! repo.add_user(&User::new("alice", "s3cret")?).await?;
//! let users = repo.list_users().await?;
//! # Ok(())
//! # }
//! ```

pub mod document;
mod error;
mod repository;
mod sections;
mod traits;

pub use document::{Document, Mapping, Node, Scalar, ScalarKind};
pub use error::StoreError;
pub use repository::ConfigRepository;
pub use traits::UserRepository;
