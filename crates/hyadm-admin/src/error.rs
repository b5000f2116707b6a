//! Admin error types.

use hyadm_core::{ShareUrlError, UserError};
use hyadm_stats::StatsError;
use hyadm_store::StoreError;

/// Password generation failed.
#[derive(Debug, thiserror::Error)]
#[error("generate password: {0}")]
pub struct PasswordError(#[from] pub rand::Error);

/// Restarting the Hysteria service failed.
#[derive(Debug, thiserror::Error)]
pub enum RestartError {
    #[error("spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command}: {status} ({output})")]
    Failed {
        command: String,
        status: String,
        output: String,
    },

    #[error("no supported service manager found for restarting {0:?}")]
    NoServiceManager(String),
}

/// Error returned by [`UserAdmin`](crate::UserAdmin) operations.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("restart service: {0}")]
    Restart(#[from] RestartError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error("build connection url: {0}")]
    ShareUrl(#[from] ShareUrlError),

    #[error("traffic stats: {0}")]
    Stats(#[from] StatsError),
}

impl AdminError {
    /// The requested user does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_not_found())
    }

    /// The requested user already exists.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Store(e) if e.is_conflict())
    }
}
