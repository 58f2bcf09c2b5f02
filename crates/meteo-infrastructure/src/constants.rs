//! Infrastructure constants

/// Prefix of configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "METEO";

/// Configuration file looked up in the working directory by default.
pub const DEFAULT_CONFIG_FILENAME: &str = "meteo.toml";

/// Environment variable consulted for the log filter before the config
/// value.
pub const LOG_ENV_VAR: &str = "METEO_LOG";
