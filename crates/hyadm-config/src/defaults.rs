//! Default value functions for serde deserialization.
//!
//! These functions forward to constants defined in `hyadm_core::defaults`.

use hyadm_core::defaults;

/// Generate default value functions that forward to hyadm_core::defaults constants.
macro_rules! default_fns {
    ($($fn_name:ident => $const_name:ident : $ty:ty),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> $ty {
                defaults::$const_name
            }
        )*
    };
}

/// Generate default value functions that return String from &str constants.
macro_rules! default_string_fns {
    ($($fn_name:ident => $const_name:ident),* $(,)?) => {
        $(
            pub(crate) fn $fn_name() -> String {
                defaults::$const_name.to_string()
            }
        )*
    };
}

default_fns! {
    default_restart_enabled    => DEFAULT_RESTART_ENABLED: bool,
    default_stats_enabled      => DEFAULT_STATS_ENABLED: bool,
    default_stats_timeout_secs => DEFAULT_STATS_TIMEOUT_SECS: u64,
}

default_string_fns! {
    default_service_name         => DEFAULT_SERVICE_NAME,
    default_log_level            => DEFAULT_LOG_LEVEL,
}

pub(crate) fn default_hysteria_config_path() -> std::path::PathBuf {
    defaults::DEFAULT_HYSTERIA_CONFIG_PATH.into()
}
