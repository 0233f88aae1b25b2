//! JSON report generator.

use super::{Cell, ReportError, ReportFormat, ReportGenerator, Table};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// JSON report generator: an array of objects keyed by field chain.
///
/// Values keep their JSON types, date/times use the configured pattern,
/// unset fields are `null` and failed resolutions are `{"error": ...}`.
pub struct JsonReporter {
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: true }
    }

    #[must_use]
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

struct Rows<'a> {
    table: &'a Table,
    time_format: &'a str,
}

struct Row<'a> {
    fields: &'a [String],
    cells: &'a [Cell],
    time_format: &'a str,
}

struct JsonCell<'a> {
    cell: &'a Cell,
    time_format: &'a str,
}

impl Serialize for Rows<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.table.rows.len()))?;
        for cells in &self.table.rows {
            seq.serialize_element(&Row {
                fields: &self.table.fields,
                cells,
                time_format: self.time_format,
            })?;
        }
        seq.end()
    }
}

impl Serialize for Row<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, cell) in self.fields.iter().zip(self.cells) {
            map.serialize_entry(
                field,
                &JsonCell {
                    cell,
                    time_format: self.time_format,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for JsonCell<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.cell {
            Cell::Value(Some(crate::mapping::Value::DateTime(dt))) => {
                serializer.serialize_str(&super::format_time(dt, self.time_format))
            }
            Cell::Value(Some(value)) => value.serialize(serializer),
            Cell::Value(None) => serializer.serialize_none(),
            Cell::Error(message) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, table: &Table, time_format: &str) -> Result<String, ReportError> {
        let rows = Rows { table, time_format };
        let mut json = if self.pretty {
            serde_json::to_string_pretty(&rows)
        } else {
            serde_json::to_string(&rows)
        }
        .map_err(|e| ReportError::SerializationError(e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{parse_datetime, Value};

    #[test]
    fn test_generate_keeps_field_order_and_types() {
        let mut table = Table::new(vec![
            "name".to_string(),
            "id".to_string(),
            "last_seen".to_string(),
            "host_group.name".to_string(),
        ]);
        table.rows.push(vec![
            Cell::Value(Some(Value::from("web01"))),
            Cell::Value(Some(Value::Integer(7))),
            Cell::Value(Some(Value::DateTime(
                parse_datetime("2013-05-01T12:30:00Z").unwrap(),
            ))),
            Cell::Error("boom".to_string()),
        ]);
        table.rows.push(vec![
            Cell::Value(None),
            Cell::Value(Some(Value::Integer(8))),
            Cell::Value(None),
            Cell::Value(None),
        ]);

        let json = JsonReporter::new()
            .pretty(false)
            .generate(&table, "%Y-%m-%d")
            .unwrap();
        assert_eq!(
            json,
            concat!(
                r#"[{"name":"web01","id":7,"last_seen":"2013-05-01","host_group.name":{"error":"boom"}},"#,
                r#"{"name":null,"id":8,"last_seen":null,"host_group.name":null}]"#,
                "\n"
            )
        );
    }
}
