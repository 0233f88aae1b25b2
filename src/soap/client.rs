//! HTTP transport for the manager's SOAP web service.

use super::envelope::{build_request, is_fault, parse_response};
use super::SoapTransport;
use crate::error::{DeepSecurityError, Result, SoapErrorKind};
use crate::mapping::WireValue;
use reqwest::blocking::Client;
use std::time::Duration;

/// Default web service port of the manager.
pub const DEFAULT_PORT: u16 = 4119;

/// SOAP client configuration.
#[derive(Debug, Clone)]
pub struct SoapClientConfig {
    /// Manager host name
    pub host: String,
    pub port: u16,
    /// Request timeout
    pub timeout: Duration,
    /// Total tries on connection reset
    pub max_retries: u8,
    /// Accept the self-signed certificate the manager ships with
    pub accept_invalid_certs: bool,
}

impl Default for SoapClientConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            timeout: Duration::from_secs(60),
            max_retries: 5,
            accept_invalid_certs: true,
        }
    }
}

impl SoapClientConfig {
    /// Base URL of the manager, e.g. `https://dsm.example.com:4119`.
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.host, self.port)
    }

    /// Endpoint of the SOAP web service.
    pub fn endpoint(&self) -> String {
        format!("{}/webservice/Manager", self.base_url())
    }
}

/// Blocking SOAP client speaking to one manager.
pub struct SoapClient {
    client: Client,
    config: SoapClientConfig,
}

/// Helper to convert reqwest errors to SOAP errors
fn network_error(msg: &str, err: &reqwest::Error) -> DeepSecurityError {
    DeepSecurityError::soap(msg, SoapErrorKind::Network(err.to_string()))
}

/// Whether a failure is a dropped connection worth retrying.
fn is_connection_reset(err: &reqwest::Error) -> bool {
    if err.is_connect() {
        return true;
    }
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        if let Some(io) = cause.downcast_ref::<std::io::Error>() {
            return matches!(
                io.kind(),
                std::io::ErrorKind::ConnectionReset
                    | std::io::ErrorKind::ConnectionAborted
                    | std::io::ErrorKind::BrokenPipe
            );
        }
        source = cause.source();
    }
    false
}

/// Build the blocking HTTP client shared by SOAP and screen scraping.
pub(crate) fn http_client(timeout: Duration, accept_invalid_certs: bool) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(accept_invalid_certs)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .map_err(|e| network_error("Failed to create HTTP client", &e))
}

impl SoapClient {
    /// Create a new SOAP client.
    pub fn new(config: SoapClientConfig) -> Result<Self> {
        let client = http_client(config.timeout, config.accept_invalid_certs)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &SoapClientConfig {
        &self.config
    }

    /// Post an envelope, retrying on connection reset.
    fn post(&self, method: &str, body: &str) -> Result<String> {
        let url = self.config.endpoint();
        let tries = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=tries {
            if attempt > 1 {
                tracing::debug!("Retry attempt {} of {} for {}", attempt, tries, method);
            }

            let sent = self
                .client
                .post(&url)
                .header("Content-Type", "text/xml; charset=utf-8")
                .header("SOAPAction", "\"\"")
                .body(body.to_string())
                .send();

            match sent {
                Ok(response) => return Self::read(method, response),
                Err(e) if is_connection_reset(&e) => {
                    tracing::debug!("Request {} attempt {} failed: {}", method, attempt, e);
                    last_error = Some(network_error(&format!("calling {method}"), &e));
                }
                Err(e) => return Err(network_error(&format!("calling {method}"), &e)),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DeepSecurityError::soap(
                format!("calling {method}"),
                SoapErrorKind::Network("no attempt made".to_string()),
            )
        }))
    }

    fn read(method: &str, response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        let text = response
            .text()
            .map_err(|e| network_error(&format!("reading {method} response"), &e))?;

        // Faults arrive with status 500 and are decoded from the body.
        if status.is_success() || (status.as_u16() == 500 && is_fault(&text)) {
            return Ok(text);
        }
        Err(DeepSecurityError::soap(
            format!("calling {method}"),
            SoapErrorKind::HttpStatus {
                status: status.as_u16(),
                body: text,
            },
        ))
    }
}

impl SoapTransport for SoapClient {
    fn call(&self, method: &str, params: &[(&str, WireValue)]) -> Result<WireValue> {
        let names: Vec<&str> = params.iter().map(|(name, _)| *name).collect();
        tracing::debug!("SOAP call {}({})", method, names.join(", "));

        let body = build_request(method, params)?;
        let text = self.post(method, &body)?;
        parse_response(method, &text)
    }
}
