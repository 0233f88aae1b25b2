//! Bidirectional converters between wire payloads and native values.

use super::record::Record;
use super::schema::SchemaRegistry;
use super::value::Value;
use super::wire::{Encodable, WireValue};
use crate::enums::EnumTable;
use crate::error::{DeepSecurityError, MappingErrorKind, Result};
use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// Converter attached to a field.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeMapping {
    /// `"true"` is true, anything else is false
    Boolean,
    Integer,
    Float,
    String,
    DateTime,
    IpAddress,
    Enum(&'static EnumTable),
    /// Nested object of the named class
    Object(&'static str),
    Array(Box<TypeMapping>),
    /// Navigation accessor resolved through the manager, never on the wire
    Hint(&'static str),
}

impl TypeMapping {
    /// Array of `element`.
    pub fn array(element: TypeMapping) -> Self {
        Self::Array(Box::new(element))
    }

    /// Human readable type, as shown by `schema`.
    pub fn type_string(&self) -> String {
        match self {
            Self::Boolean => "bool".to_string(),
            Self::Integer => "int".to_string(),
            Self::Float => "float".to_string(),
            Self::String => "String".to_string(),
            Self::DateTime => "datetime".to_string(),
            Self::IpAddress => "IPAddress".to_string(),
            Self::Enum(table) => format!("enum<{}>", table.symbols().collect::<Vec<_>>().join(", ")),
            Self::Object(class) | Self::Hint(class) => (*class).to_string(),
            Self::Array(element) => format!("Array<{}>", element.type_string()),
        }
    }

    /// Class reached by navigating through this mapping, if any.
    pub fn object_class(&self) -> Option<&'static str> {
        match self {
            Self::Object(class) | Self::Hint(class) => Some(class),
            Self::Array(element) => element.object_class(),
            _ => None,
        }
    }

    pub fn is_hint(&self) -> bool {
        matches!(self, Self::Hint(_))
    }

    /// Convert a wire payload into a native value.
    pub fn decode(&self, registry: &SchemaRegistry, data: &WireValue) -> Result<Value> {
        match self {
            Self::Boolean => Ok(Value::Boolean(data.as_text() == Some("true"))),
            Self::Integer => {
                let text = scalar_text(data, "int")?;
                text.trim().parse::<i64>().map(Value::Integer).map_err(|_| {
                    DeepSecurityError::mapping(
                        "decoding int",
                        MappingErrorKind::InvalidInteger(text.to_string()),
                    )
                })
            }
            Self::Float => {
                let text = scalar_text(data, "float")?;
                text.trim().parse::<f64>().map(Value::Float).map_err(|_| {
                    DeepSecurityError::mapping(
                        "decoding float",
                        MappingErrorKind::InvalidFloat(text.to_string()),
                    )
                })
            }
            Self::String => Ok(Value::String(scalar_text(data, "String")?.to_string())),
            Self::DateTime => parse_datetime(scalar_text(data, "datetime")?).map(Value::DateTime),
            Self::IpAddress => Ok(Value::IpAddress(scalar_text(data, "IPAddress")?.to_string())),
            Self::Enum(table) => table.decode(scalar_text(data, table.name())?).map(Value::Enum),
            Self::Object(class) => match data {
                WireValue::Map(_) => Record::decode(registry, class, data).map(Value::Object),
                other => Err(unexpected_shape(class, other)),
            },
            Self::Array(element) => decode_array(registry, element, data).map(Value::Array),
            Self::Hint(class) => Err(DeepSecurityError::mapping(
                format!("decoding hint {class}"),
                MappingErrorKind::UnexpectedShape {
                    expected: "no payload".to_string(),
                    found: data.kind().to_string(),
                },
            )),
        }
    }

    /// Convert a native value into a wire payload.
    pub fn encode(&self, registry: &SchemaRegistry, value: &Value) -> Result<WireValue> {
        match (self, value) {
            (Self::Boolean, Value::Boolean(b)) => b.to_wire(),
            (Self::Integer, Value::Integer(i)) => i.to_wire(),
            (Self::Float, Value::Float(f)) => f.to_wire(),
            (Self::String, Value::String(s)) => s.to_wire(),
            (Self::DateTime, Value::DateTime(dt)) => dt.to_wire(),
            (Self::IpAddress, Value::IpAddress(s)) => s.to_wire(),
            (Self::Enum(table), Value::Enum(symbol)) => table.encode(symbol).map(WireValue::text),
            (Self::Object(class), Value::Object(record)) if record.class() == *class => {
                record.encode(registry)
            }
            (Self::Array(element), Value::Array(items)) => {
                let encoded = items
                    .iter()
                    .map(|item| element.encode(registry, item))
                    .collect::<Result<Vec<_>>>()?;
                Ok(WireValue::map([("item", WireValue::List(encoded))]))
            }
            (mapping, value) => Err(DeepSecurityError::mapping(
                "encoding",
                MappingErrorKind::TypeMismatch {
                    field: value.kind().to_string(),
                    expected: mapping.type_string(),
                },
            )),
        }
    }

    /// Whether `value` can be stored under this mapping.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Boolean, Value::Boolean(_))
            | (Self::Integer, Value::Integer(_))
            | (Self::Float, Value::Float(_))
            | (Self::String, Value::String(_))
            | (Self::DateTime, Value::DateTime(_))
            | (Self::IpAddress, Value::IpAddress(_)) => true,
            (Self::Enum(table), Value::Enum(symbol)) => table.symbol(symbol).is_some(),
            (Self::Object(class), Value::Object(record)) => record.class() == *class,
            (Self::Array(element), Value::Array(items)) => items.iter().all(|i| element.accepts(i)),
            _ => false,
        }
    }
}

/// Decode a wire collection.
///
/// Blank data is an empty list, a list maps element-wise, an `item` wrapper
/// is unwrapped, and any other single value becomes a one-element list.
fn decode_array(
    registry: &SchemaRegistry,
    element: &TypeMapping,
    data: &WireValue,
) -> Result<Vec<Value>> {
    if data.is_blank() {
        return Ok(Vec::new());
    }
    match data {
        WireValue::List(items) => items
            .iter()
            .map(|item| element.decode(registry, item))
            .collect(),
        WireValue::Map(entries) => match entries.get("item") {
            Some(item) => decode_array(registry, element, item),
            None => Ok(vec![element.decode(registry, data)?]),
        },
        _ => Ok(vec![element.decode(registry, data)?]),
    }
}

fn scalar_text<'a>(data: &'a WireValue, expected: &str) -> Result<&'a str> {
    data.as_text().ok_or_else(|| unexpected_shape(expected, data))
}

fn unexpected_shape(expected: &str, found: &WireValue) -> DeepSecurityError {
    DeepSecurityError::mapping(
        format!("decoding {expected}"),
        MappingErrorKind::UnexpectedShape {
            expected: expected.to_string(),
            found: found.kind().to_string(),
        },
    )
}

/// Parse an `xsd:dateTime`; timestamps without an offset are UTC.
pub fn parse_datetime(text: &str) -> Result<DateTime<FixedOffset>> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }
    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc().fixed_offset())
        .map_err(|_| {
            DeepSecurityError::mapping(
                "decoding datetime",
                MappingErrorKind::InvalidDateTime(text.to_string()),
            )
        })
}
