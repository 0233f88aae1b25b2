//! Configuration module for dsc.
//!
//! Layers, lowest precedence first:
//! - built-in defaults
//! - a YAML config file (`.dsc.yaml` and friends, see [`discover_config_file`])
//! - `DSC_*` environment variables ([`AppConfig::apply_env`])
//! - CLI flags
//!
//! ```
//! use deepsecurity::config::{AppConfig, Validatable};
//!
//! let config: AppConfig = serde_yaml::from_str("connection:\n  manager: dsm\n").unwrap();
//! assert_eq!(config.connection.port, 4119);
//! assert!(config.is_valid());
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

pub use defaults::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TIME_FORMAT, DEFAULT_USERNAME,
};
pub use types::{AppConfig, CacheConfig, ConnectionConfig, OutputConfig};
pub use validation::{ConfigError, Validatable};

pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_or_default,
    ConfigFileError,
};

/// Generate a JSON Schema for the `AppConfig` configuration format.
///
/// Editors can use it to validate and complete `.dsc.yaml` files.
pub fn generate_json_schema() -> crate::error::Result<String> {
    let schema = schemars::schema_for!(AppConfig);
    serde_json::to_string_pretty(&schema)
        .map_err(|e| crate::error::DeepSecurityError::config(format!("schema serialization: {e}")))
}
