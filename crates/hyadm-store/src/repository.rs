//! File-backed repository over the Hysteria server document.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use hyadm_core::{ConnectionParams, User};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::document::{Document, Node};
use crate::error::StoreError;
use crate::sections::{self, AuthMode};
use crate::traits::UserRepository;

/// Repository bound to one server document on disk.
///
/// Mutations within one instance are serialized; the lock is held across
/// the whole load, edit and store cycle. Share it through an `Arc` to get
/// that guarantee across tasks.
#[derive(Debug)]
pub struct ConfigRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl ConfigRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the server document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, StoreError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| StoreError::Read {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = text.len(), "loaded server config");
        Document::parse(&text)
    }

    async fn store(&self, doc: &Document) -> Result<(), StoreError> {
        let text = doc.to_yaml_string()?;
        write_atomic(&self.path, text.as_bytes())
            .await
            .map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        debug!(path = %self.path.display(), bytes = text.len(), "stored server config");
        Ok(())
    }
}

#[async_trait]
impl UserRepository for ConfigRepository {
    async fn add_user(&self, user: &User) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        // A document without `auth` is not in userpass mode.
        if !doc.root().contains_key("auth") {
            return Err(StoreError::InvalidAuthMode { found: None });
        }
        let auth = sections::auth_mut(doc.root_mut(), AuthMode::RequireUserpass)?;
        let users = sections::userpass_or_insert(auth)?;
        if users.contains_key(user.username()) {
            return Err(StoreError::UserAlreadyExists(user.username().to_owned()));
        }
        users.push(user.username(), Node::string(user.password()));

        self.store(&doc).await?;
        info!(username = user.username(), "user added");
        Ok(())
    }

    async fn rotate_password(&self, user: &User) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        let auth = sections::auth_mut(doc.root_mut(), AuthMode::RequireUserpass)?;
        let users = sections::userpass_mut(auth)?;
        let slot = users
            .get_mut(user.username())
            .ok_or_else(|| StoreError::UserNotFound(user.username().to_owned()))?;
        *slot = Node::string(user.password());

        self.store(&doc).await?;
        info!(username = user.username(), "password rotated");
        Ok(())
    }

    async fn remove_user(&self, username: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().await;
        let mut doc = self.load().await?;

        let auth = sections::auth_mut(doc.root_mut(), AuthMode::Any)?;
        let users = sections::userpass_mut(auth)?;
        users
            .remove(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))?;

        self.store(&doc).await?;
        info!(username, "user removed");
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<String>, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;

        let auth = sections::auth(doc.root(), AuthMode::Any)?;
        let users = sections::userpass(auth)?;
        let mut names: Vec<String> = users.keys().map(str::to_owned).collect();
        names.sort();
        Ok(names)
    }

    async fn connection_params(&self, username: &str) -> Result<ConnectionParams, StoreError> {
        let _guard = self.lock.lock().await;
        let doc = self.load().await?;
        let root = doc.root();

        let auth = sections::auth(root, AuthMode::Any)?;
        let password = sections::userpass(auth)?
            .get(username)
            .ok_or_else(|| StoreError::UserNotFound(username.to_owned()))?
            .as_str()
            .unwrap_or_default()
            .to_owned();

        let host = sections::read_host(root)?;
        let port = sections::read_port(root)?;
        let (obfs_type, obfs_password) = sections::read_obfs(root);

        Ok(ConnectionParams {
            username: username.to_owned(),
            password,
            sni: host.clone(),
            host,
            port,
            obfs_type,
            obfs_password,
        })
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "config".to_owned());
    path.with_file_name(format!(".{name}.hyadm.tmp"))
}

/// Deletes the temporary file on drop unless it was renamed into place.
struct TempFile {
    path: PathBuf,
    armed: bool,
}

impl TempFile {
    fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        if self.armed {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Replace `path` with `contents` through a synced sibling file and a rename.
///
/// Symlinks are followed so the link stays and its target is replaced.
/// Mode, owner and group of the file being replaced carry over; a new file
/// is owner-only. A canceled or failed write removes the temporary file.
async fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let target = match tokio::fs::canonicalize(path).await {
        Ok(resolved) => resolved,
        Err(e) if e.kind() == io::ErrorKind::NotFound => path.to_path_buf(),
        Err(e) => return Err(e),
    };
    let existing = match tokio::fs::metadata(&target).await {
        Ok(meta) => Some(meta),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(e) => return Err(e),
    };

    let tmp = TempFile::new(temp_path(&target));
    let mut file = tokio::fs::File::create(tmp.path()).await?;
    file.write_all(contents).await?;
    file.sync_all().await?;
    drop(file);

    match &existing {
        Some(meta) => {
            tokio::fs::set_permissions(tmp.path(), meta.permissions()).await?;
            copy_owner(tmp.path(), meta).await?;
        }
        None => set_owner_only(tmp.path()).await?,
    }
    tokio::fs::rename(tmp.path(), &target).await?;
    tmp.keep();
    Ok(())
}

#[cfg(unix)]
async fn copy_owner(path: &Path, original: &std::fs::Metadata) -> io::Result<()> {
    use std::os::unix::fs::MetadataExt;

    let current = tokio::fs::metadata(path).await?;
    if current.uid() == original.uid() && current.gid() == original.gid() {
        return Ok(());
    }
    std::os::unix::fs::chown(path, Some(original.uid()), Some(original.gid()))
}

#[cfg(not(unix))]
async fn copy_owner(_path: &Path, _original: &std::fs::Metadata) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
async fn set_owner_only(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn set_owner_only(_path: &Path) -> io::Result<()> {
    Ok(())
}
