//! Unified error types for deepsecurity.
//!
//! This module provides the error hierarchy for the library. Transport
//! specifics (HTTP, XML, HTML) never leak through it: callers match on
//! [`DeepSecurityError`] and its kind enums only.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deepsecurity operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DeepSecurityError {
    /// Errors converting between wire payloads and native values
    #[error("Mapping failed: {context}")]
    Mapping {
        context: String,
        #[source]
        source: MappingErrorKind,
    },

    /// Errors talking to the SOAP web service
    #[error("SOAP request failed: {context}")]
    Soap {
        context: String,
        #[source]
        source: SoapErrorKind,
    },

    /// Errors scraping the web console
    #[error("Screen scraping failed: {context}")]
    Scrape {
        context: String,
        #[source]
        source: ScrapeErrorKind,
    },

    /// The manager rejected the credentials
    #[error("Authentication failed ({0})")]
    AuthenticationFailed(String),

    /// An operation needed a session before `connect` was called
    #[error("Authentication required: connect to the manager first")]
    AuthenticationRequired,

    /// Result cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// IO errors with context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Specific mapping error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MappingErrorKind {
    #[error("No type mapping for {class}.{field}")]
    MissingTypeMapping { class: String, field: String },

    #[error("Unknown {table} value '{value}' (valid: {valid})")]
    UnknownEnumValue {
        table: String,
        value: String,
        valid: String,
    },

    #[error("Unknown {table} symbol '{symbol}' (valid: {valid})")]
    UnknownEnumSymbol {
        table: String,
        symbol: String,
        valid: String,
    },

    #[error("Invalid integer: '{0}'")]
    InvalidInteger(String),

    #[error("Invalid float: '{0}'")]
    InvalidFloat(String),

    #[error("Invalid datetime: '{0}'")]
    InvalidDateTime(String),

    #[error("Expected {expected}, found {found}")]
    UnexpectedShape { expected: String, found: String },

    #[error("Unknown transport class: {0}")]
    UnknownClass(String),

    #[error("Value for '{field}' is not a {expected}")]
    TypeMismatch { field: String, expected: String },
}

/// Specific SOAP error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SoapErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("SOAP fault {code}: {message}")]
    Fault { code: String, message: String },

    #[error("Invalid SOAP envelope: {0}")]
    InvalidEnvelope(String),

    #[error("No {method}_response element in SOAP body")]
    MissingResponse { method: String },
}

/// Specific screen scraping error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ScrapeErrorKind {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid CSS selector: {0}")]
    InvalidSelector(String),

    #[error("Form not found: {0}")]
    MissingForm(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for deepsecurity operations
pub type Result<T> = std::result::Result<T, DeepSecurityError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl DeepSecurityError {
    /// Create a mapping error with context
    pub fn mapping(context: impl Into<String>, source: MappingErrorKind) -> Self {
        Self::Mapping {
            context: context.into(),
            source,
        }
    }

    /// Create a mapping error for a field without a registered converter
    pub fn missing_type_mapping(class: impl Into<String>, field: impl Into<String>) -> Self {
        let class = class.into();
        Self::mapping(
            format!("decoding {class}"),
            MappingErrorKind::MissingTypeMapping {
                class,
                field: field.into(),
            },
        )
    }

    /// Create a SOAP error with context
    pub fn soap(context: impl Into<String>, source: SoapErrorKind) -> Self {
        Self::Soap {
            context: context.into(),
            source,
        }
    }

    /// Create a screen scraping error with context
    pub fn scrape(context: impl Into<String>, source: ScrapeErrorKind) -> Self {
        Self::Scrape {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Returns the remote fault if this error wraps one.
    pub fn as_fault(&self) -> Option<(&str, &str)> {
        match self {
            Self::Soap {
                source: SoapErrorKind::Fault { code, message },
                ..
            } => Some((code, message)),
            _ => None,
        }
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for DeepSecurityError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<quick_xml::Error> for DeepSecurityError {
    fn from(err: quick_xml::Error) -> Self {
        Self::soap(
            "XML parsing",
            SoapErrorKind::InvalidEnvelope(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// Context strings chain from the outside in, so an error raised while
/// decoding a nested object reads `"HostDetail.host_interfaces: decoding HostInterface"`.
///
/// # Example
///
/// ```ignore
/// use deepsecurity::error::ErrorContext;
///
/// let record = Record::decode(registry, "Host", &payload)
///     .with_context(|| format!("host_retrieve({id})"))?;
/// ```
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<DeepSecurityError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
///
/// Authentication errors are left untouched; their message is shown to
/// users verbatim.
fn add_context_to_error(err: DeepSecurityError, new_ctx: &str) -> DeepSecurityError {
    match err {
        DeepSecurityError::Mapping {
            context: existing,
            source,
        } => DeepSecurityError::Mapping {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeepSecurityError::Soap {
            context: existing,
            source,
        } => DeepSecurityError::Soap {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeepSecurityError::Scrape {
            context: existing,
            source,
        } => DeepSecurityError::Scrape {
            context: chain_context(new_ctx, &existing),
            source,
        },
        DeepSecurityError::Io {
            path,
            message,
            source,
        } => DeepSecurityError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        DeepSecurityError::Cache(msg) => DeepSecurityError::Cache(chain_context(new_ctx, &msg)),
        DeepSecurityError::Config(msg) => DeepSecurityError::Config(chain_context(new_ctx, &msg)),
        DeepSecurityError::Validation(msg) => {
            DeepSecurityError::Validation(chain_context(new_ctx, &msg))
        }
        other @ (DeepSecurityError::AuthenticationFailed(_)
        | DeepSecurityError::AuthenticationRequired) => other,
    }
}

/// Chain two context strings together.
///
/// If the existing context is empty, returns just the new context.
/// Otherwise, returns "`new_context`: `existing_context`".
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| DeepSecurityError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| DeepSecurityError::Validation(f().into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_type_mapping_names_class_and_field() {
        let err = DeepSecurityError::missing_type_mapping("Host", "bogus");
        match &err {
            DeepSecurityError::Mapping {
                source: MappingErrorKind::MissingTypeMapping { class, field },
                ..
            } => {
                assert_eq!(class, "Host");
                assert_eq!(field, "bogus");
            }
            other => panic!("Expected MissingTypeMapping, got {other:?}"),
        }
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("No type mapping for Host.bogus"));
    }

    #[test]
    fn test_error_chain() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = DeepSecurityError::io("/path/to/fields.txt", io_err);

        assert!(err.to_string().contains("/path/to/fields.txt"));
    }

    #[test]
    fn test_context_chaining_multiple_levels() {
        fn inner() -> Result<()> {
            Err(DeepSecurityError::mapping(
                "base",
                MappingErrorKind::InvalidInteger("x".to_string()),
            ))
        }

        fn middle() -> Result<()> {
            inner().context("middle layer")
        }

        fn outer() -> Result<()> {
            middle().context("outer layer")
        }

        match outer() {
            Err(DeepSecurityError::Mapping { context, .. }) => {
                assert_eq!(context, "outer layer: middle layer: base");
            }
            other => panic!("Expected Mapping error, got {other:?}"),
        }
    }

    #[test]
    fn test_authentication_errors_keep_their_message() {
        let err: Result<()> = Err(DeepSecurityError::AuthenticationFailed(
            "Bad credentials".to_string(),
        ));
        match err.context("connect") {
            Err(DeepSecurityError::AuthenticationFailed(msg)) => {
                assert_eq!(msg, "Bad credentials");
            }
            other => panic!("Expected AuthenticationFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(DeepSecurityError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_as_fault() {
        let err = DeepSecurityError::soap(
            "authenticate",
            SoapErrorKind::Fault {
                code: "soapenv:Server".to_string(),
                message: "Invalid username or password".to_string(),
            },
        );
        assert_eq!(
            err.as_fault(),
            Some(("soapenv:Server", "Invalid username or password"))
        );
        assert!(DeepSecurityError::AuthenticationRequired.as_fault().is_none());
    }

    #[test]
    fn test_option_context() {
        let none_value: Option<i32> = None;
        match none_value.context_none("missing value") {
            Err(DeepSecurityError::Validation(msg)) => assert_eq!(msg, "missing value"),
            other => panic!("Expected Validation error, got {other:?}"),
        }
        assert_eq!(Some(7).context_none("unused").ok(), Some(7));
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
    }
}
