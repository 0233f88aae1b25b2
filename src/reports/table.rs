//! Listing table: resolved field chains per entity.

use super::display::display_value;
use crate::mapping::{HintResolver, Record, SchemaRegistry, Value};

/// One resolved field of one entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// The resolved value, `None` when unset
    Value(Option<Value>),
    /// Resolution failed
    Error(String),
}

impl Cell {
    /// Display string, `ERROR (<message>)` for failed resolutions.
    pub fn display(&self, time_format: &str) -> String {
        match self {
            Self::Value(Some(value)) => display_value(value, time_format),
            Self::Value(None) => String::new(),
            Self::Error(message) => format!("ERROR ({message})"),
        }
    }
}

/// Columns of field chains and one row of cells per entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub fields: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            rows: Vec::new(),
        }
    }

    /// Resolve every field chain of `record` and append the row.
    ///
    /// A chain that fails to resolve becomes an error cell; the other cells
    /// of the row are unaffected.
    pub fn push_record(
        &mut self,
        registry: &SchemaRegistry,
        record: &Record,
        hints: &dyn HintResolver,
    ) {
        let row = self
            .fields
            .iter()
            .map(|field| match record.resolve(registry, field, hints) {
                Ok(value) => Cell::Value(value),
                Err(err) => {
                    tracing::debug!("Resolving {} of {} failed: {}", field, record.class(), err);
                    Cell::Error(error_message(&err))
                }
            })
            .collect();
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// `err` followed by its causes, `: ` separated.
fn error_message(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
