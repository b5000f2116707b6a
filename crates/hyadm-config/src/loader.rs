//! Configuration file loading and error types.

use std::fs;
use std::path::{Path, PathBuf};

use hyadm_core::{CONFIG_PATH_ENV, PROJECT_NAME, SYSTEM_CONFIG_PATH};
use tracing::{debug, info};

use crate::Config;
use crate::env::apply_env_overrides;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("toml: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("toml: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("unsupported config format")]
    UnsupportedFormat,
    #[error("invalid {name}: {value:?}")]
    Env { name: &'static str, value: String },
    #[error("no user configuration directory")]
    NoConfigDir,
    #[error("validation: {0}")]
    Validation(String),
}

/// A loaded tool configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
    /// A default file was written because none existed.
    pub created: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|s| s.to_str()).unwrap_or("") {
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let format = Format::of(path)?;
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(Config::default());
    }
    match format {
        Format::Yaml => Ok(serde_yaml::from_str(&data)?),
        Format::Toml => Ok(toml::from_str(&data)?),
        Format::Json => Ok(serde_json::from_str(&data)?),
    }
}

/// Render `config` in the format implied by `path`.
pub fn render_config(config: &Config, path: impl AsRef<Path>) -> Result<String, ConfigError> {
    match Format::of(path.as_ref())? {
        Format::Yaml => Ok(serde_yaml::to_string(config)?),
        Format::Toml => Ok(toml::to_string_pretty(config)?),
        Format::Json => Ok(serde_json::to_string_pretty(config)? + "\n"),
    }
}

/// Location of the tool configuration.
///
/// `$HYADM_CONFIG_PATH` wins; otherwise the system path is used when it
/// exists or its directory can be created, and the per-user config
/// directory otherwise.
pub fn resolve_config_path() -> Result<PathBuf, ConfigError> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|v| !v.is_empty()) {
        return Ok(path.into());
    }

    let system = Path::new(SYSTEM_CONFIG_PATH);
    if system.exists() || system.parent().is_some_and(|dir| fs::create_dir_all(dir).is_ok()) {
        return Ok(system.to_path_buf());
    }

    dirs::config_dir()
        .map(|dir| dir.join(PROJECT_NAME).join("config.yaml"))
        .ok_or(ConfigError::NoConfigDir)
}

/// Write a default configuration to `path` unless something is already there.
///
/// Returns whether a file was created.
pub fn ensure_default_config(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let rendered = render_config(&Config::default(), path)?;
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    fs::write(path, rendered)?;
    info!(path = %path.display(), "wrote default configuration");
    Ok(true)
}

/// Resolve, create if missing, read, then apply environment overrides.
pub fn load_tool_config(explicit: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => resolve_config_path()?,
    };
    let created = ensure_default_config(&path)?;
    let mut config = load_config(&path)?;
    apply_env_overrides(&mut config)?;
    debug!(path = %path.display(), created, "loaded configuration");
    Ok(LoadedConfig {
        config,
        path,
        created,
    })
}
