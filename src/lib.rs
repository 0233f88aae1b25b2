//! **Client library for the Deep Security Manager SOAP web service.**
//!
//! `deepsecurity` talks to a Trend Micro Deep Security Manager over its SOAP
//! API, decodes the returned transport objects into typed Rust values and
//! caches lookups for the lifetime of a session. It powers the `dsc` command
//! line tool, which exports hosts, DPI rules, system events and friends as CSV.
//!
//! ## Core Concepts & Modules
//!
//! - **[`manager`]**: The [`Manager`] session. Authenticates, issues calls and
//!   exposes per-entity accessors (`hosts()`, `dpi_rules()`, `system_events()`, ...).
//! - **[`transport`]**: The transport objects ([`Host`], [`HostDetail`], [`DpiRule`], ...)
//!   and request filters ([`HostFilter`], [`TimeFilter`]).
//! - **[`mapping`]**: Declarative field schemas turning wire values into typed
//!   [`Value`]s, and [`Record`]s for reflective field access.
//! - **[`soap`]**: Envelope encoding/decoding and the HTTP transport.
//! - **[`scraping`]**: Data only the web console shows, such as the DPI rules
//!   assigned to a host. Requires the `screenscraping` feature for HTTP access.
//! - **[`reports`]**: CSV and JSON rendering of listings.
//!
//! ## Getting Started
//!
//! ```no_run
//! use deepsecurity::{CacheConfig, ConnectionConfig, Manager};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let connection = ConnectionConfig {
//!         manager: Some("dsm.example.com".to_string()),
//!         ..ConnectionConfig::default()
//!     };
//!     let mut manager = Manager::server(&connection, &CacheConfig::default())?;
//!     manager.connect("", "MasterAdmin", "secret")?;
//!
//!     for host in manager.hosts()? {
//!         println!("{} ({})", host.name().unwrap_or_default(), host.platform().unwrap_or_default());
//!     }
//!
//!     manager.disconnect()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Following links between objects
//!
//! Field chains of a [`Record`] walk nested objects and hints such as
//! `host_group` on a host, which resolve lazily through the manager's cache:
//!
//! ```no_run
//! # use deepsecurity::{CacheConfig, ConnectionConfig, Manager, TransportObject};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let manager = Manager::server(&ConnectionConfig::default(), &CacheConfig::default())?;
//! for host in manager.hosts()? {
//!     let record = host.into_record();
//!     let group = record.resolve(manager.registry(), "host_group.name", &manager)?;
//!     println!("{:?}", group);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `screenscraping` (default): HTTP access to the web console for data the
//!   SOAP API does not expose. Adds the `scraper` dependency.

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
#![allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::similar_names
)]

pub mod cache;
pub mod cli;
pub mod config;
pub mod enums;
pub mod error;
pub mod manager;
pub mod mapping;
pub mod output;
pub mod reports;
pub mod scraping;
pub mod soap;
pub mod transport;

// Re-export main types for convenience
pub use cache::ResultCache;
pub use config::{AppConfig, CacheConfig, ConfigError, ConnectionConfig, OutputConfig, Validatable};
pub use error::{DeepSecurityError, ErrorContext, OptionContext, Result};
pub use manager::Manager;
pub use mapping::{HintResolver, Record, SchemaRegistry, Value, WireValue};
pub use reports::{create_reporter, ReportFormat, ReportGenerator, Table};
pub use scraping::DpiRuleAssignment;
pub use soap::{SoapClient, SoapClientConfig, SoapTransport};
pub use transport::{
    ApplicationType, DpiRule, Host, HostDetail, HostFilter, HostGroup, SecurityProfile,
    SystemEvent, TimeFilter, TransportObject,
};
