//! Rendering of entity listings.
//!
//! A listing is a [`Table`]: the requested field chains as columns and one
//! row of resolved [`Cell`]s per entity. Two formats are provided:
//! - CSV: header row plus display strings, quoted per RFC 4180
//! - JSON: an array of objects keyed by field, values kept typed

mod csv;
mod display;
mod json;
mod table;

pub use self::csv::{escape_csv, CsvReporter};
pub use display::{display_value, format_time};
pub use json::JsonReporter;
pub use table::{Cell, Table};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

/// Output format of a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum ReportFormat {
    /// Comma separated values with a header row
    #[default]
    Csv,
    /// Array of JSON objects
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Csv => write!(f, "csv"),
            ReportFormat::Json => write!(f, "json"),
        }
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render a listing. `time_format` is the strftime pattern for date/time cells.
    fn generate(&self, table: &Table, time_format: &str) -> Result<String, ReportError>;

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
pub fn create_reporter(format: ReportFormat) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Csv => Box::new(CsvReporter::new()),
        ReportFormat::Json => Box::new(JsonReporter::new()),
    }
}
