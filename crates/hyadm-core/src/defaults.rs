//! Default configuration values.
//!
//! Centralized default constants for use across all crates.

// ============================================================================
// Hysteria Document Defaults
// ============================================================================

/// Path of the Hysteria server configuration document.
pub const DEFAULT_HYSTERIA_CONFIG_PATH: &str = "/etc/hysteria/config.yaml";
/// Name of the Hysteria system service.
pub const DEFAULT_SERVICE_NAME: &str = "hysteria-server";
/// Whether the service is restarted after a successful mutation.
pub const DEFAULT_RESTART_ENABLED: bool = true;
/// Port used when the document has no `listen` value.
pub const DEFAULT_LISTEN_PORT: u16 = 443;
/// The only `auth.type` user management applies to.
pub const AUTH_MODE_USERPASS: &str = "userpass";

// ============================================================================
// Traffic Stats Defaults
// ============================================================================

/// Traffic stats endpoint disabled unless configured.
pub const DEFAULT_STATS_ENABLED: bool = false;
/// Per-request timeout for the traffic stats endpoint in seconds.
pub const DEFAULT_STATS_TIMEOUT_SECS: u64 = 2;

// ============================================================================
// Tool Defaults
// ============================================================================

/// Length of generated passwords.
pub const GENERATED_PASSWORD_LENGTH: usize = 32;
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Environment variable pointing at the tool configuration file.
pub const CONFIG_PATH_ENV: &str = "HYADM_CONFIG_PATH";
/// System-wide tool configuration file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hyadm/config.yaml";
