//! Hysteria service restarts.

use std::process::Stdio;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::RestartError;

/// Applies configuration changes by restarting the proxy service.
#[async_trait]
pub trait ServiceRestarter: Send + Sync {
    async fn restart(&self) -> Result<(), RestartError>;
}

/// Runs one external command to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String]) -> Result<(), RestartError>;
}

/// [`CommandRunner`] backed by real child processes.
///
/// The child is killed if the returned future is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<(), RestartError> {
        debug!(program, ?args, "running command");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| RestartError::Spawn {
                program: program.to_owned(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(RestartError::Failed {
            command: std::iter::once(program)
                .chain(args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" "),
            status: output.status.to_string(),
            output: combined.trim().to_owned(),
        })
    }
}

/// Restarts through an override shell command or the host's service manager.
///
/// Manager preference: `systemctl`, then `service`, then `brew services`
/// on macOS.
pub struct SystemRestarter {
    enabled: bool,
    service_name: String,
    override_cmd: String,
    runner: Arc<dyn CommandRunner>,
    locate: fn(&str) -> bool,
    macos: bool,
}

impl SystemRestarter {
    pub fn new(enabled: bool, service_name: impl Into<String>, override_cmd: impl AsRef<str>) -> Self {
        Self {
            enabled,
            service_name: service_name.into(),
            override_cmd: override_cmd.as_ref().trim().to_owned(),
            runner: Arc::new(ProcessRunner),
            locate: on_path,
            macos: cfg!(target_os = "macos"),
        }
    }

    /// Replace the process runner.
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }

    /// Replace executable discovery and the macOS check.
    pub fn with_host(mut self, locate: fn(&str) -> bool, macos: bool) -> Self {
        self.locate = locate;
        self.macos = macos;
        self
    }

    /// The command a restart would run, or `None` when restarts are disabled.
    pub fn restart_command(&self) -> Result<Option<(String, Vec<String>)>, RestartError> {
        if !self.enabled {
            return Ok(None);
        }
        let svc = self.service_name.clone();
        let command = if !self.override_cmd.is_empty() {
            ("sh", vec!["-lc".to_owned(), self.override_cmd.clone()])
        } else if (self.locate)("systemctl") {
            ("systemctl", vec!["restart".to_owned(), svc])
        } else if (self.locate)("service") {
            ("service", vec![svc, "restart".to_owned()])
        } else if self.macos && (self.locate)("brew") {
            ("brew", vec!["services".to_owned(), "restart".to_owned(), svc])
        } else {
            return Err(RestartError::NoServiceManager(svc));
        };
        Ok(Some((command.0.to_owned(), command.1)))
    }
}

impl std::fmt::Debug for SystemRestarter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemRestarter")
            .field("enabled", &self.enabled)
            .field("service_name", &self.service_name)
            .field("override_cmd", &self.override_cmd)
            .field("macos", &self.macos)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ServiceRestarter for SystemRestarter {
    async fn restart(&self) -> Result<(), RestartError> {
        let Some((program, args)) = self.restart_command()? else {
            debug!("service restart disabled");
            return Ok(());
        };
        self.runner.run(&program, &args).await?;
        info!(service = %self.service_name, program = %program, "service restarted");
        Ok(())
    }
}

fn on_path(program: &str) -> bool {
    which::which(program).is_ok()
}
