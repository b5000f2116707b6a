//! Environment variable overrides.

use crate::Config;
use crate::loader::ConfigError;

pub const ENV_HYSTERIA_CONFIG_PATH: &str = "HYSTERIA_CONFIG_PATH";
pub const ENV_SERVICE_NAME: &str = "HYSTERIA_SERVICE_NAME";
pub const ENV_RESTART_COMMAND: &str = "HYSTERIA_RESTART_COMMAND";
pub const ENV_RESTART_ENABLED: &str = "HYSTERIA_RESTART_ENABLED";
pub const ENV_STATS_ENABLED: &str = "HYSTERIA_TRAFFIC_STATS_ENABLED";
pub const ENV_STATS_URL: &str = "HYSTERIA_TRAFFIC_STATS_URL";
pub const ENV_STATS_SECRET: &str = "HYSTERIA_TRAFFIC_STATS_SECRET";
pub const ENV_STATS_TIMEOUT: &str = "HYSTERIA_TRAFFIC_STATS_TIMEOUT_SECONDS";

/// Apply overrides from the process environment.
pub fn apply_env_overrides(config: &mut Config) -> Result<(), ConfigError> {
    apply_env_overrides_from(config, |name| std::env::var(name).ok())
}

/// Apply overrides from `lookup`. A set variable wins even when empty,
/// except for the boolean and numeric ones, which must parse.
pub fn apply_env_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(ENV_HYSTERIA_CONFIG_PATH) {
        config.hysteria.config_path = v.into();
    }
    if let Some(v) = lookup(ENV_SERVICE_NAME) {
        config.hysteria.service_name = v;
    }
    if let Some(v) = lookup(ENV_RESTART_COMMAND) {
        config.hysteria.restart_command = v;
    }
    if let Some(v) = lookup(ENV_RESTART_ENABLED) {
        config.hysteria.restart_enabled = parse_bool(ENV_RESTART_ENABLED, &v)?;
    }
    if let Some(v) = lookup(ENV_STATS_ENABLED) {
        config.traffic_stats.enabled = parse_bool(ENV_STATS_ENABLED, &v)?;
    }
    if let Some(v) = lookup(ENV_STATS_URL) {
        config.traffic_stats.url = v;
    }
    if let Some(v) = lookup(ENV_STATS_SECRET) {
        config.traffic_stats.secret = v;
    }
    if let Some(v) = lookup(ENV_STATS_TIMEOUT) {
        let secs: i64 = v.trim().parse().map_err(|_| ConfigError::Env {
            name: ENV_STATS_TIMEOUT,
            value: v.clone(),
        })?;
        // Non-positive values select the default timeout.
        config.traffic_stats.timeout_secs = u64::try_from(secs).unwrap_or(0);
    }
    Ok(())
}

/// Boolean spellings accepted by the Hysteria tooling.
pub fn parse_bool(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(ConfigError::Env {
            name,
            value: value.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    fn apply(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let mut config = Config::default();
        apply_env_overrides_from(&mut config, |name| vars.get(name).cloned())?;
        Ok(config)
    }

    #[test]
    fn test_no_vars_keeps_defaults() {
        assert_eq!(apply(&[]).unwrap(), Config::default());
    }

    #[test]
    fn test_all_overrides() {
        let config = apply(&[
            ("HYSTERIA_CONFIG_PATH", "/srv/hy/config.yaml"),
            ("HYSTERIA_SERVICE_NAME", "hy2"),
            ("HYSTERIA_RESTART_COMMAND", "true"),
            ("HYSTERIA_RESTART_ENABLED", "0"),
            ("HYSTERIA_TRAFFIC_STATS_ENABLED", "T"),
            ("HYSTERIA_TRAFFIC_STATS_URL", "http://127.0.0.1:25413"),
            ("HYSTERIA_TRAFFIC_STATS_SECRET", "s3cret"),
            ("HYSTERIA_TRAFFIC_STATS_TIMEOUT_SECONDS", "9"),
        ])
        .unwrap();
        assert_eq!(config.hysteria.config_path, PathBuf::from("/srv/hy/config.yaml"));
        assert_eq!(config.hysteria.service_name, "hy2");
        assert_eq!(config.hysteria.restart_command, "true");
        assert!(!config.hysteria.restart_enabled);
        assert!(config.traffic_stats.enabled);
        assert_eq!(config.traffic_stats.url, "http://127.0.0.1:25413");
        assert_eq!(config.traffic_stats.secret, "s3cret");
        assert_eq!(config.traffic_stats.timeout_secs, 9);
    }

    #[test]
    fn test_empty_string_overrides() {
        let config = apply(&[("HYSTERIA_SERVICE_NAME", "")]).unwrap();
        assert_eq!(config.hysteria.service_name, "");
    }

    #[test]
    fn test_invalid_bool() {
        let err = apply(&[("HYSTERIA_RESTART_ENABLED", "yes")]).unwrap_err();
        assert!(
            matches!(err, ConfigError::Env { name: "HYSTERIA_RESTART_ENABLED", .. }),
            "{err}"
        );
    }

    #[test]
    fn test_timeout_values() {
        let config = apply(&[("HYSTERIA_TRAFFIC_STATS_TIMEOUT_SECONDS", "-3")]).unwrap();
        assert_eq!(config.traffic_stats.timeout_secs, 0);
        assert_eq!(config.traffic_stats.timeout().as_secs(), 2);
        assert!(apply(&[("HYSTERIA_TRAFFIC_STATS_TIMEOUT_SECONDS", "soon")]).is_err());
    }
}
