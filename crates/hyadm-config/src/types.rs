//! Configuration type definitions.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::defaults::*;

/// Tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hysteria: HysteriaConfig,
    #[serde(default)]
    pub traffic_stats: TrafficStatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the Hysteria server document lives and how to restart the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HysteriaConfig {
    /// Server document owned by the config repository.
    #[serde(default = "default_hysteria_config_path")]
    pub config_path: PathBuf,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_restart_enabled")]
    pub restart_enabled: bool,
    /// Shell command replacing the service-manager restart when non-empty.
    #[serde(default)]
    pub restart_command: String,
}

impl Default for HysteriaConfig {
    fn default() -> Self {
        Self {
            config_path: default_hysteria_config_path().into(),
            service_name: default_service_name(),
            restart_enabled: default_restart_enabled(),
            restart_command: String::new(),
        }
    }
}

/// Optional stats endpoint of the Hysteria server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficStatsConfig {
    #[serde(default = "default_stats_enabled")]
    pub enabled: bool,
    /// Base URL; `/traffic` and `/online` are appended.
    #[serde(default)]
    pub url: String,
    /// Sent verbatim in the `Authorization` header.
    #[serde(default)]
    pub secret: String,
    #[serde(default = "default_stats_timeout_secs")]
    pub timeout_secs: u64,
}

impl TrafficStatsConfig {
    /// Per-request timeout; zero falls back to the default.
    pub fn timeout(&self) -> Duration {
        if self.timeout_secs == 0 {
            Duration::from_secs(default_stats_timeout_secs())
        } else {
            Duration::from_secs(self.timeout_secs)
        }
    }
}

impl Default for TrafficStatsConfig {
    fn default() -> Self {
        Self {
            enabled: default_stats_enabled(),
            url: String::new(),
            secret: String::new(),
            timeout_secs: default_stats_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `hyadm_store=debug`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
