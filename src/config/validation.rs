//! Configuration validation for dsc.

use super::types::{AppConfig, CacheConfig, ConnectionConfig, OutputConfig};
use chrono::format::{Item, StrftimeItems};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AppConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.connection.validate());
        errors.extend(self.cache.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ConnectionConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.port == 0 {
            errors.push(ConfigError::new("connection.port", "Port must be non-zero"));
        }
        if self.timeout_secs == 0 {
            errors.push(ConfigError::new(
                "connection.timeout_secs",
                "Timeout must be at least one second",
            ));
        }
        if self.username.trim().is_empty() {
            errors.push(ConfigError::new("connection.username", "Username must not be empty"));
        }
        errors
    }
}

impl ConnectionConfig {
    /// Validation for commands that talk to the manager.
    pub fn validate_for_connection(&self) -> Vec<ConfigError> {
        let mut errors = self.validate();
        if self.manager.as_deref().map_or(true, |m| m.trim().is_empty()) {
            errors.push(ConfigError::new(
                "connection.manager",
                "No manager host given (use --manager, DSC_MANAGER or the config file)",
            ));
        }
        errors
    }
}

impl Validatable for CacheConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.ttl_secs == 0 {
            errors.push(ConfigError::new("cache.ttl_secs", "TTL must be non-zero"));
        }
        if self.capacity == 0 {
            errors.push(ConfigError::new("cache.capacity", "Capacity must be non-zero"));
        }
        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error)) {
            errors.push(ConfigError::new(
                "output.time_format",
                format!("Invalid strftime pattern '{}'", self.time_format),
            ));
        }
        errors
    }
}
