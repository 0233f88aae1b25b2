//! Loosely typed wire payloads.
//!
//! A [`WireValue`] is what the SOAP envelope decoder produces and what the
//! encoder consumes: nested maps of snake_case keys, lists for repeated
//! elements and plain text for every scalar.

use crate::error::Result;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use indexmap::IndexMap;

/// A node of a wire payload.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum WireValue {
    /// Absent, empty or `xsi:nil` element
    #[default]
    Nil,
    /// Scalar text content
    Text(String),
    /// Repeated sibling elements
    List(Vec<WireValue>),
    /// Element with child elements, in document order
    Map(IndexMap<String, WireValue>),
}

impl WireValue {
    /// Create a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Build a map node from `(key, value)` pairs, keeping their order.
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, WireValue)>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Nil, whitespace-only text, or an empty list or map.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, WireValue>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Child of a map node.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.as_map().and_then(|entries| entries.get(key))
    }

    /// Remove and return a child of a map node.
    pub fn take(&mut self, key: &str) -> Option<WireValue> {
        match self {
            Self::Map(entries) => entries.shift_remove(key),
            _ => None,
        }
    }

    /// Short shape name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Text(_) => "text",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

impl From<&str> for WireValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for WireValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// ============================================================================
// Encodable
// ============================================================================

/// Values that can be sent as SOAP call parameters.
///
/// Plain scalars encode to their text form; records go through their schema.
pub trait Encodable {
    /// Encode into a wire payload.
    fn to_wire(&self) -> Result<WireValue>;
}

impl Encodable for WireValue {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(self.clone())
    }
}

impl Encodable for str {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self))
    }
}

impl Encodable for String {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self.as_str()))
    }
}

impl Encodable for bool {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(if *self { "true" } else { "false" }))
    }
}

impl Encodable for i64 {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self.to_string()))
    }
}

impl Encodable for i32 {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self.to_string()))
    }
}

impl Encodable for f64 {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self.to_string()))
    }
}

impl Encodable for DateTime<FixedOffset> {
    fn to_wire(&self) -> Result<WireValue> {
        Ok(WireValue::text(self.to_rfc3339_opts(SecondsFormat::AutoSi, true)))
    }
}

impl Encodable for DateTime<Utc> {
    fn to_wire(&self) -> Result<WireValue> {
        self.fixed_offset().to_wire()
    }
}

impl<T: Encodable + ?Sized> Encodable for &T {
    fn to_wire(&self) -> Result<WireValue> {
        (**self).to_wire()
    }
}

impl<T: Encodable> Encodable for Option<T> {
    fn to_wire(&self) -> Result<WireValue> {
        match self {
            Some(value) => value.to_wire(),
            None => Ok(WireValue::Nil),
        }
    }
}
