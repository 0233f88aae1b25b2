//! Display strings of decoded values.

use crate::mapping::Value;
use chrono::{DateTime, FixedOffset, SecondsFormat};
use std::fmt::Write;

/// Format a timestamp with a strftime pattern.
///
/// An invalid pattern falls back to RFC 3339.
pub fn format_time(time: &DateTime<FixedOffset>, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", time.format(pattern)) {
        Ok(()) => out,
        Err(_) => time.to_rfc3339_opts(SecondsFormat::Secs, true),
    }
}

/// Display string of a value for a report cell.
///
/// Enums show their symbol, arrays join their elements with `, ` and
/// objects render as JSON.
pub fn display_value(value: &Value, time_format: &str) -> String {
    match value {
        Value::Boolean(b) => b.to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::String(s) | Value::IpAddress(s) => s.clone(),
        Value::DateTime(dt) => format_time(dt, time_format),
        Value::Enum(symbol) => (*symbol).to_string(),
        Value::Object(record) => serde_json::to_string(record).unwrap_or_default(),
        Value::Array(items) => items
            .iter()
            .map(|item| display_value(item, time_format))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{parse_datetime, Record};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

    #[test]
    fn test_scalars() {
        assert_eq!(display_value(&Value::Boolean(true), FORMAT), "true");
        assert_eq!(display_value(&Value::Integer(-3), FORMAT), "-3");
        assert_eq!(display_value(&Value::Float(7.5), FORMAT), "7.5");
        assert_eq!(display_value(&Value::Enum("windows"), FORMAT), "windows");
        assert_eq!(
            display_value(&Value::IpAddress("10.0.0.1".into()), FORMAT),
            "10.0.0.1"
        );
    }

    #[test]
    fn test_datetime_uses_pattern() {
        let dt = parse_datetime("2013-05-01T12:30:00.000Z").unwrap();
        assert_eq!(
            display_value(&Value::DateTime(dt), FORMAT),
            "2013-05-01 12:30:00 +0000"
        );
        assert_eq!(display_value(&Value::DateTime(dt), "%d/%m/%Y"), "01/05/2013");
    }

    #[test]
    fn test_invalid_pattern_falls_back() {
        let dt = parse_datetime("2013-05-01T12:30:00Z").unwrap();
        assert_eq!(format_time(&dt, "%Q"), "2013-05-01T12:30:00Z");
    }

    #[test]
    fn test_array_joined() {
        let value = Value::Array(vec![Value::Integer(1), Value::Integer(2), Value::Integer(3)]);
        assert_eq!(display_value(&value, FORMAT), "1, 2, 3");
        assert_eq!(display_value(&Value::Array(Vec::new()), FORMAT), "");
    }

    #[test]
    fn test_object_as_json() {
        let record = Record::new("HostGroup")
            .with("id", Value::Integer(3))
            .with("name", Value::from("Servers"));
        assert_eq!(
            display_value(&Value::Object(record), FORMAT),
            r#"{"id":3,"name":"Servers"}"#
        );
    }
}
