//! The manager facade.
//!
//! [`Manager`] owns the session with one Deep Security Manager, issues
//! remote calls through a [`SoapTransport`], decodes the payloads with the
//! schema registry and memoizes cacheable results in a [`ResultCache`].
//!
//! ```
//! use deepsecurity::manager::Manager;
//! use deepsecurity::soap::ScriptedTransport;
//!
//! let transport = ScriptedTransport::new().reply("get_api_version", "5".into());
//! let manager = Manager::new(Box::new(transport), Default::default());
//! assert_eq!(manager.api_version().unwrap(), 5);
//! ```

mod accessors;
mod hints;
mod scraping;

use crate::cache::ResultCache;
use crate::config::{CacheConfig, ConnectionConfig};
use crate::error::{DeepSecurityError, Result};
use crate::mapping::{parse_datetime, SchemaRegistry, TypeMapping, Value, WireValue};
use crate::soap::{SoapClient, SoapClientConfig, SoapTransport};
use crate::transport::TransportObject;
use chrono::{DateTime, FixedOffset};
use std::time::Duration;

/// Ordered SOAP call parameters.
pub type Params = Vec<(&'static str, WireValue)>;

/// Client facade of one manager.
pub struct Manager {
    transport: Box<dyn SoapTransport>,
    cache: ResultCache,
    registry: &'static SchemaRegistry,
    session_id: Option<String>,
    /// Connection settings when talking HTTP, used by screen scraping
    endpoint: Option<SoapClientConfig>,
}

impl Manager {
    /// Create a manager over any transport.
    pub fn new(transport: Box<dyn SoapTransport>, cache: ResultCache) -> Self {
        Self {
            transport,
            cache,
            registry: SchemaRegistry::global(),
            session_id: None,
            endpoint: None,
        }
    }

    /// Create a manager talking HTTPS to the configured host.
    pub fn server(connection: &ConnectionConfig, cache: &CacheConfig) -> Result<Self> {
        let host = connection
            .manager
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| DeepSecurityError::config("no manager host configured"))?;

        let config = SoapClientConfig {
            host: host.to_string(),
            port: connection.port,
            timeout: Duration::from_secs(connection.timeout_secs),
            max_retries: connection.max_retries,
            accept_invalid_certs: connection.accept_invalid_certs,
        };
        let client = SoapClient::new(config.clone())?;
        let cache = ResultCache::new(cache.capacity, Duration::from_secs(cache.ttl_secs));

        let mut manager = Self::new(Box::new(client), cache);
        manager.endpoint = Some(config);
        Ok(manager)
    }

    pub fn registry(&self) -> &'static SchemaRegistry {
        self.registry
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Authenticate and remember the session id.
    ///
    /// A blank tenant authenticates against the primary tenant.
    pub fn connect(&mut self, tenant: &str, username: &str, password: &str) -> Result<()> {
        let payload = if tenant.trim().is_empty() {
            self.transport.call(
                "authenticate",
                &[("username", username.into()), ("password", password.into())],
            )
        } else {
            self.transport.call(
                "authenticate_tenant",
                &[
                    ("tenantName", tenant.into()),
                    ("username", username.into()),
                    ("password", password.into()),
                ],
            )
        };

        let payload = payload.map_err(|err| match err.as_fault() {
            Some((_, message)) => DeepSecurityError::AuthenticationFailed(message.to_string()),
            None => err,
        })?;
        let session_id = payload
            .as_text()
            .filter(|sid| !sid.trim().is_empty())
            .ok_or_else(|| {
                DeepSecurityError::AuthenticationFailed("no session id returned".to_string())
            })?;

        self.session_id = Some(session_id.to_string());
        if tenant.trim().is_empty() {
            tracing::info!("Connected as {}", username);
        } else {
            tracing::info!("Connected to tenant {} as {}", tenant, username);
        }
        Ok(())
    }

    /// End the session, if any. Calling it twice is harmless.
    pub fn disconnect(&mut self) -> Result<()> {
        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };
        let stats = self.cache.stats();
        tracing::debug!(
            "Cache stats: {} hits, {} misses, {} entries",
            stats.hits,
            stats.misses,
            stats.entries
        );
        self.transport
            .call("end_session", &[("sID", session_id.into())])?;
        tracing::info!("Session closed");
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_id.is_some()
    }

    /// The current session id.
    pub fn session_id(&self) -> Result<&str> {
        self.session_id
            .as_deref()
            .ok_or(DeepSecurityError::AuthenticationRequired)
    }

    /// Append the session id to `params`.
    fn authenticated(&self, mut params: Params) -> Result<Params> {
        params.push(("sID", self.session_id()?.into()));
        Ok(params)
    }

    // ========================================================================
    // Unauthenticated operations
    // ========================================================================

    /// Version of the web service API.
    pub fn api_version(&self) -> Result<i64> {
        let payload = self.transport.call("get_api_version", &[])?;
        let value = TypeMapping::Integer.decode(self.registry, &payload)?;
        value
            .as_integer()
            .ok_or_else(|| DeepSecurityError::validation("api version is not an integer"))
    }

    /// Current time on the manager.
    pub fn manager_time(&self) -> Result<DateTime<FixedOffset>> {
        let payload = self.transport.call("get_manager_time", &[])?;
        let text = payload
            .as_text()
            .ok_or_else(|| DeepSecurityError::validation("manager time is empty"))?;
        parse_datetime(text)
    }

    // ========================================================================
    // Generic request core
    // ========================================================================

    /// Call `method` and decode the payload as one `T`.
    ///
    /// Cacheable results are stored under every aspect of their class.
    pub fn request_object<T: TransportObject>(&self, method: &str, params: &[(&str, WireValue)]) -> Result<T> {
        let payload = self.transport.call(method, params)?;
        let object = T::decode(self.registry, &payload)?;
        self.cache.store_under_all_aspects(self.registry, &object)?;
        Ok(object)
    }

    /// Call `method` and decode the payload as a sequence of `T`.
    ///
    /// `collection` names the element of the return value holding the list,
    /// when the list is not the return value itself.
    pub fn request_collection<T: TransportObject>(
        &self,
        method: &str,
        collection: Option<&str>,
        params: &[(&str, WireValue)],
    ) -> Result<Vec<T>> {
        let mut payload = self.transport.call(method, params)?;
        if let Some(collection) = collection {
            payload = payload.take(collection).unwrap_or_default();
        }

        let mapping = TypeMapping::array(TypeMapping::Object(T::CLASS));
        let Value::Array(items) = mapping.decode(self.registry, &payload)? else {
            return Ok(Vec::new());
        };

        let mut objects = Vec::with_capacity(items.len());
        for item in items {
            let Value::Object(record) = item else {
                continue;
            };
            let object = T::from_record(record);
            self.cache.store_under_all_aspects(self.registry, &object)?;
            objects.push(object);
        }
        tracing::debug!("Decoded {} {} objects from {}", objects.len(), T::CLASS, method);
        Ok(objects)
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("authenticated", &self.is_authenticated())
            .field("endpoint", &self.endpoint.as_ref().map(SoapClientConfig::base_url))
            .field("cache", &self.cache)
            .finish()
    }
}
