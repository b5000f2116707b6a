//! Repository error types.

use std::path::PathBuf;

/// Error returned by document and repository operations.
///
/// Identity conflicts, document-shape violations and I/O failures are
/// separate variants so callers can pick their own messaging.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Username already present under `auth.userpass`.
    #[error("user {0:?} already exists")]
    UserAlreadyExists(String),

    /// Username absent from `auth.userpass`.
    #[error("user {0:?} not found")]
    UserNotFound(String),

    /// `auth.type` is not `userpass`.
    #[error("auth.type must be userpass (found {})", .found.as_deref().unwrap_or("nothing"))]
    InvalidAuthMode { found: Option<String> },

    /// No `auth` section in the document.
    #[error("auth section not found")]
    MissingAuthSection,

    /// The document does not have the expected structure.
    #[error("malformed config: {0}")]
    MalformedDocument(String),

    /// `acme.domains[0]` is absent or blank.
    #[error("missing host: {0}")]
    MissingHost(&'static str),

    /// `listen` holds something that is not a port.
    #[error("invalid listen value: {0:?}")]
    InvalidPort(String),

    #[error("read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("write config {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[source] serde_yaml::Error),

    #[error("serialize config: {0}")]
    Serialize(#[source] serde_yaml::Error),
}

impl StoreError {
    #[inline]
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument(reason.into())
    }

    /// The requested user does not exist.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_))
    }

    /// The requested user already exists.
    #[inline]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UserAlreadyExists(_))
    }

    /// The document is readable but not shaped the way user management needs.
    pub fn is_document_shape(&self) -> bool {
        matches!(
            self,
            Self::InvalidAuthMode { .. }
                | Self::MissingAuthSection
                | Self::MalformedDocument(_)
                | Self::MissingHost(_)
                | Self::InvalidPort(_)
                | Self::Parse(_)
        )
    }
}
