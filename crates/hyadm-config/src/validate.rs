//! Configuration validation logic.

use url::Url;

use crate::Config;
use crate::loader::ConfigError;

pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.hysteria.config_path.as_os_str().is_empty() {
        return Err(ConfigError::Validation("hysteria.config_path is empty".into()));
    }
    if config.hysteria.restart_enabled
        && config.hysteria.restart_command.trim().is_empty()
        && config.hysteria.service_name.trim().is_empty()
    {
        return Err(ConfigError::Validation(
            "hysteria.service_name is required when restarts are enabled without restart_command"
                .into(),
        ));
    }
    if config.traffic_stats.enabled {
        let raw = config.traffic_stats.url.trim();
        if raw.is_empty() {
            return Err(ConfigError::Validation(
                "traffic_stats.url is required when traffic_stats.enabled".into(),
            ));
        }
        let url = Url::parse(raw)
            .map_err(|e| ConfigError::Validation(format!("traffic_stats.url: {e}")))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Validation(format!(
                "traffic_stats.url must be http or https, got {}",
                url.scheme()
            )));
        }
    }
    if config.logging.level.trim().is_empty() {
        return Err(ConfigError::Validation("logging.level is empty".into()));
    }
    Ok(())
}
