//! CSV report generator.
//!
//! Header row of field names, then one row per entity, suitable for
//! spreadsheet import.

use super::{ReportError, ReportFormat, ReportGenerator, Table};

/// CSV report generator.
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for CsvReporter {
    fn generate(&self, table: &Table, time_format: &str) -> Result<String, ReportError> {
        let mut content = String::new();
        push_line(&mut content, table.fields.iter().map(String::as_str));
        for row in &table.rows {
            let cells: Vec<String> = row.iter().map(|cell| cell.display(time_format)).collect();
            push_line(&mut content, cells.iter().map(String::as_str));
        }
        Ok(content)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Csv
    }
}

fn push_line<'a>(content: &mut String, cells: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = cells.map(escape_csv).collect();
    content.push_str(&line.join(","));
    content.push('\n');
}

/// Escape a field per RFC 4180: quote when it contains a comma, a double
/// quote, CR or LF, doubling embedded quotes.
pub fn escape_csv(s: &str) -> String {
    if s.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Value;
    use crate::reports::Cell;

    #[test]
    fn test_escape_csv() {
        assert_eq!(escape_csv("plain"), "plain");
        assert_eq!(escape_csv(""), "");
        assert_eq!(escape_csv("a,b"), "\"a,b\"");
        assert_eq!(escape_csv("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(escape_csv("two\nlines"), "\"two\nlines\"");
        assert_eq!(escape_csv("cr\r"), "\"cr\r\"");
    }

    #[test]
    fn test_generate() {
        let mut table = Table::new(vec!["name".to_string(), "ids".to_string()]);
        table.rows.push(vec![
            Cell::Value(Some(Value::from("web01"))),
            Cell::Value(Some(Value::Array(vec![Value::Integer(1), Value::Integer(2)]))),
        ]);
        table.rows.push(vec![
            Cell::Value(None),
            Cell::Error("Mapping failed: x".to_string()),
        ]);

        let csv = CsvReporter::new().generate(&table, "%Y").unwrap();
        insta::assert_snapshot!(csv, @r###"
        name,ids
        web01,"1, 2"
        ,ERROR (Mapping failed: x)
        "###);
    }
}
