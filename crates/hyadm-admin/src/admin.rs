//! User lifecycle use cases.

use std::collections::BTreeMap;
use std::sync::Arc;

use hyadm_config::Config;
use hyadm_core::{ConnectionParams, User, UserError, UserStats};
use hyadm_stats::{StatsSettings, StatsSource, collect_user_stats, stats_source};
use hyadm_store::{ConfigRepository, UserRepository};
use tokio_util::sync::CancellationToken;
use tracing::info;
use url::Url;

use crate::error::AdminError;
use crate::password::{PasswordGenerator, RandomPasswordGenerator};
use crate::restart::{ServiceRestarter, SystemRestarter};

/// Entry point for every user-management operation.
///
/// Mutations restart the service only after the document was written; a
/// restart failure is returned even though the change is already on disk.
#[derive(Clone)]
pub struct UserAdmin {
    repo: Arc<dyn UserRepository>,
    restarter: Arc<dyn ServiceRestarter>,
    passwords: Arc<dyn PasswordGenerator>,
    stats: Arc<dyn StatsSource>,
}

impl UserAdmin {
    pub fn new(
        repo: Arc<dyn UserRepository>,
        restarter: Arc<dyn ServiceRestarter>,
        passwords: Arc<dyn PasswordGenerator>,
        stats: Arc<dyn StatsSource>,
    ) -> Self {
        Self {
            repo,
            restarter,
            passwords,
            stats,
        }
    }

    /// Wire the production collaborators from the tool configuration.
    pub fn from_config(config: &Config) -> Result<Self, AdminError> {
        let hysteria = &config.hysteria;
        let repo = ConfigRepository::new(&hysteria.config_path);
        let restarter = SystemRestarter::new(
            hysteria.restart_enabled,
            &hysteria.service_name,
            &hysteria.restart_command,
        );
        let stats = stats_source(&StatsSettings {
            enabled: config.traffic_stats.enabled,
            url: config.traffic_stats.url.clone(),
            secret: config.traffic_stats.secret.clone(),
            timeout: config.traffic_stats.timeout(),
        })?;
        Ok(Self::new(
            Arc::new(repo),
            Arc::new(restarter),
            Arc::new(RandomPasswordGenerator::new()),
            stats,
        ))
    }

    /// Create a user with a generated password and return the password.
    pub async fn add_user(&self, username: &str) -> Result<String, AdminError> {
        let user = self.new_credentials(username)?;
        self.repo.add_user(&user).await?;
        self.restarter.restart().await?;
        info!(username, "user created");
        Ok(user.password().to_owned())
    }

    /// Replace a user's password with a generated one and return it.
    pub async fn rotate_password(&self, username: &str) -> Result<String, AdminError> {
        let user = self.new_credentials(username)?;
        self.repo.rotate_password(&user).await?;
        self.restarter.restart().await?;
        info!(username, "user password rotated");
        Ok(user.password().to_owned())
    }

    pub async fn remove_user(&self, username: &str) -> Result<(), AdminError> {
        if username.is_empty() {
            return Err(UserError::EmptyUsername.into());
        }
        self.repo.remove_user(username).await?;
        self.restarter.restart().await?;
        info!(username, "user deleted");
        Ok(())
    }

    /// Usernames, sorted ascending.
    pub async fn list_users(&self) -> Result<Vec<String>, AdminError> {
        Ok(self.repo.list_users().await?)
    }

    pub async fn connection_params(&self, username: &str) -> Result<ConnectionParams, AdminError> {
        Ok(self.repo.connection_params(username).await?)
    }

    /// The `hy2://` share URL for one user.
    pub async fn connection_url(&self, username: &str) -> Result<Url, AdminError> {
        Ok(self.connection_params(username).await?.share_url()?)
    }

    /// Traffic and online state for every user in the document.
    ///
    /// Only reading the user list can fail; telemetry problems yield
    /// zeroed entries.
    pub async fn user_stats(
        &self,
        cancel: &CancellationToken,
    ) -> Result<BTreeMap<String, UserStats>, AdminError> {
        let users = self.list_users().await?;
        Ok(collect_user_stats(self.stats.as_ref(), &users, cancel).await)
    }

    /// Whether a stats endpoint is configured.
    pub fn stats_enabled(&self) -> bool {
        self.stats.is_enabled()
    }

    fn new_credentials(&self, username: &str) -> Result<User, AdminError> {
        if username.is_empty() {
            return Err(UserError::EmptyUsername.into());
        }
        let password = self.passwords.generate()?;
        Ok(User::new(username, password)?)
    }
}

impl std::fmt::Debug for UserAdmin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAdmin")
            .field("stats_enabled", &self.stats.is_enabled())
            .finish_non_exhaustive()
    }
}
