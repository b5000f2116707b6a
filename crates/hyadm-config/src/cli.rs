//! CLI override definitions and application logic.

use std::path::PathBuf;

use clap::Args;

use crate::Config;

#[derive(Debug, Clone, Args, Default)]
pub struct CliOverrides {
    /// Override the Hysteria server config path
    #[arg(long, global = true)]
    pub hysteria_config: Option<PathBuf>,
    /// Override the Hysteria service name
    #[arg(long, global = true)]
    pub service_name: Option<String>,
    /// Shell command used instead of the service manager to restart Hysteria
    #[arg(long, global = true)]
    pub restart_command: Option<String>,
    /// Do not restart Hysteria after changing users
    #[arg(long, global = true)]
    pub no_restart: bool,
    /// Traffic stats base URL (enables stats)
    #[arg(long, global = true)]
    pub stats_url: Option<String>,
    /// Traffic stats secret, sent as the Authorization header
    #[arg(long, global = true)]
    pub stats_secret: Option<String>,
    /// Traffic stats request timeout (seconds, 0 = default)
    #[arg(long, global = true)]
    pub stats_timeout_secs: Option<u64>,
    /// Override log level (trace/debug/info/warn/error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

pub fn apply_overrides(config: &mut Config, overrides: &CliOverrides) {
    if let Some(v) = &overrides.hysteria_config {
        config.hysteria.config_path = v.clone();
    }
    if let Some(v) = &overrides.service_name {
        config.hysteria.service_name = v.clone();
    }
    if let Some(v) = &overrides.restart_command {
        config.hysteria.restart_command = v.clone();
    }
    if overrides.no_restart {
        config.hysteria.restart_enabled = false;
    }
    if let Some(v) = &overrides.stats_url {
        config.traffic_stats.url = v.clone();
        config.traffic_stats.enabled = !v.trim().is_empty();
    }
    if let Some(v) = &overrides.stats_secret {
        config.traffic_stats.secret = v.clone();
    }
    if let Some(v) = overrides.stats_timeout_secs {
        config.traffic_stats.timeout_secs = v;
    }
    if let Some(v) = &overrides.log_level {
        config.logging.level = v.clone();
    }
}
