//! CLI command handlers.
//!
//! Handlers are invoked by `main.rs` and return the text to write to the
//! output target, so they can be tested against a scripted manager.

pub mod fields;
mod list;
pub mod progress;
mod schema;

pub use fields::parse_fields;
pub use list::{
    fetch_records, parse_detail_level, parse_time_filter, run_list, Entity, ListOptions, ListQuery,
};
pub use schema::run_schema;

use crate::config::{AppConfig, ConnectionConfig, Validatable};
use crate::error::DeepSecurityError;
use crate::manager::Manager;
use crate::reports::format_time;
use anyhow::Result;

/// Build the HTTPS manager for the configured connection.
pub fn connect(config: &AppConfig) -> Result<Manager> {
    let errors = config.connection.validate_for_connection();
    if let Some(error) = errors.first() {
        anyhow::bail!("Invalid configuration: {error}");
    }
    Ok(Manager::server(&config.connection, &config.cache)?)
}

/// Run `f` inside an authenticated session of a new HTTPS manager.
///
/// See [`run_session`].
pub fn with_session<T>(
    config: &AppConfig,
    f: impl FnOnce(&Manager) -> Result<T>,
) -> Result<Option<T>> {
    run_session(connect(config)?, &config.connection, f)
}

/// Authenticate `manager`, run `f` and always end the session.
///
/// Rejected credentials print `Authentication failed! <message>` and yield
/// `Ok(None)`; every other error propagates after teardown.
pub fn run_session<T>(
    mut manager: Manager,
    connection: &ConnectionConfig,
    f: impl FnOnce(&Manager) -> Result<T>,
) -> Result<Option<T>> {
    let password = connection.password.as_deref().unwrap_or_default();
    let result = match manager.connect(&connection.tenant, &connection.username, password) {
        Ok(()) => f(&manager).map(Some),
        Err(DeepSecurityError::AuthenticationFailed(message)) => {
            println!("Authentication failed! {message}");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    };

    if let Err(err) = manager.disconnect() {
        tracing::warn!("Failed to end session: {}", err);
    }
    result
}

/// `api_version`: the web service API version.
pub fn run_api_version(manager: &Manager) -> Result<String> {
    Ok(format!("{}\n", manager.api_version()?))
}

/// `manager_time`: the manager clock, formatted with `time_format`.
pub fn run_manager_time(manager: &Manager, time_format: &str) -> Result<String> {
    Ok(format!("{}\n", format_time(&manager.manager_time()?, time_format)))
}

/// `config show`: the effective configuration as YAML, password masked.
pub fn run_config_show(config: &AppConfig) -> Result<String> {
    let mut shown = config.clone();
    if shown.connection.password.is_some() {
        shown.connection.password = Some("***".to_string());
    }
    let mut yaml = serde_yaml::to_string(&shown)?;
    for error in config.validate() {
        yaml.push_str(&format!("# invalid: {error}\n"));
    }
    Ok(yaml)
}
