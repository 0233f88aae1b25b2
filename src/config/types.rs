//! Configuration types for dsc.

use super::defaults::{
    DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS,
    DEFAULT_TIME_FORMAT, DEFAULT_USERNAME,
};
use crate::soap::DEFAULT_PORT;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Unified Application Configuration
// ============================================================================

/// Application configuration loaded from config files, the environment and
/// CLI flags (in increasing precedence).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppConfig {
    /// How to reach and authenticate with the manager
    pub connection: ConnectionConfig,
    /// Result cache sizing
    pub cache: CacheConfig,
    /// Rendering of command output
    pub output: OutputConfig,
}

impl AppConfig {
    /// Create a new `AppConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlay `DSC_MANAGER`, `DSC_USERNAME`, `DSC_PASSWORD` and `DSC_TENANT`.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|name| std::env::var(name).ok());
    }

    /// Overlay environment values looked up through `lookup`.
    ///
    /// Empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());
        if let Some(manager) = lookup("DSC_MANAGER") {
            self.connection.manager = Some(manager);
        }
        if let Some(username) = lookup("DSC_USERNAME") {
            self.connection.username = username;
        }
        if let Some(password) = lookup("DSC_PASSWORD") {
            self.connection.password = Some(password);
        }
        if let Some(tenant) = lookup("DSC_TENANT") {
            self.connection.tenant = tenant;
        }
    }
}

// ============================================================================
// Section Configurations
// ============================================================================

/// Manager connection settings.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Manager host name
    pub manager: Option<String>,
    /// Web service port
    pub port: u16,
    /// Tenant name, empty for the primary tenant
    pub tenant: String,
    /// Account name
    pub username: String,
    /// Account password
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Total tries when the connection is reset
    pub max_retries: u8,
    /// Accept the self-signed certificate the manager ships with
    pub accept_invalid_certs: bool,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            manager: None,
            port: DEFAULT_PORT,
            tenant: String::new(),
            username: DEFAULT_USERNAME.to_string(),
            password: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            accept_invalid_certs: true,
        }
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("manager", &self.manager)
            .field("port", &self.port)
            .field("tenant", &self.tenant)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

/// Result cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CacheConfig {
    /// Seconds a cached result stays valid
    pub ttl_secs: u64,
    /// Maximum number of cached entries
    pub capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_CACHE_TTL_SECS,
            capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// strftime pattern for date/time cells
    pub time_format: String,
    /// Show a progress bar on stderr
    pub progress_bar: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            progress_bar: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.connection.port, 4119);
        assert_eq!(config.connection.username, "MasterAdmin");
        assert_eq!(config.connection.max_retries, 5);
        assert!(config.connection.accept_invalid_certs);
        assert_eq!(config.cache.ttl_secs, 600);
        assert_eq!(config.output.time_format, "%Y-%m-%d %H:%M:%S %z");
    }

    #[test]
    fn test_env_overlay() {
        let env: HashMap<&str, &str> = [
            ("DSC_MANAGER", "dsm.example.com"),
            ("DSC_PASSWORD", "secret"),
            ("DSC_TENANT", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.connection.tenant = "Acme".to_string();
        config.apply_env_from(|name| env.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.connection.manager.as_deref(), Some("dsm.example.com"));
        assert_eq!(config.connection.password.as_deref(), Some("secret"));
        assert_eq!(config.connection.username, "MasterAdmin");
        assert_eq!(config.connection.tenant, "Acme");
    }

    #[test]
    fn test_debug_masks_password() {
        let connection = ConnectionConfig {
            password: Some("hunter2".to_string()),
            ..ConnectionConfig::default()
        };
        assert!(!format!("{connection:?}").contains("hunter2"));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: AppConfig =
            serde_yaml::from_str("connection:\n  manager: dsm\ncache:\n  ttl_secs: 30\n").unwrap();
        assert_eq!(config.connection.manager.as_deref(), Some("dsm"));
        assert_eq!(config.connection.port, 4119);
        assert_eq!(config.cache.ttl_secs, 30);
        assert_eq!(config.cache.capacity, 10_000);
    }
}
