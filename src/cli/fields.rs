//! `--fields` parsing.

use crate::mapping::SchemaRegistry;
use anyhow::Result;
use std::path::Path;

/// Parse a comma separated field list, or the content of the file it names.
///
/// Every entry must be an attribute chain of `class`.
pub fn parse_fields(
    registry: &SchemaRegistry,
    class: &str,
    fields_or_filename: &str,
) -> Result<Vec<String>> {
    let path = Path::new(fields_or_filename.trim());
    let text = if !fields_or_filename.trim().is_empty() && path.is_file() {
        std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read fields file {}: {e}", path.display()))?
    } else {
        fields_or_filename.to_string()
    };

    let fields: Vec<String> = text
        .split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_string)
        .collect();

    let unknown: Vec<&str> = fields
        .iter()
        .filter(|field| !registry.has_attribute_chain(class, field))
        .map(String::as_str)
        .collect();
    if !unknown.is_empty() {
        let known = registry.schema(class)?.defined_attributes();
        anyhow::bail!(
            "Unknown filename or field found ({}) - known fields are: {}",
            unknown.join(", "),
            known.join(", ")
        );
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static SchemaRegistry {
        SchemaRegistry::global()
    }

    #[test]
    fn test_split_and_trim() {
        let fields = parse_fields(registry(), "Host", " name , ,display_name,").unwrap();
        assert_eq!(fields, vec!["name", "display_name"]);
    }

    #[test]
    fn test_chains_and_aliases() {
        let fields =
            parse_fields(registry(), "SecurityProfile", "dpi_rule_ids,name").unwrap();
        assert_eq!(fields, vec!["dpi_rule_ids", "name"]);
        assert!(parse_fields(registry(), "Host", "host_group.name").is_ok());
        assert!(parse_fields(registry(), "HostDetail", "host_interfaces.mac").is_ok());
    }

    #[test]
    fn test_unknown_field_lists_known_fields() {
        let err = parse_fields(registry(), "HostGroup", "name,colour").unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Unknown filename or field found (colour) - known fields are: "));
        assert!(message.contains("description, external, external_id, id, name"));
    }

    #[test]
    fn test_fields_from_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("fields.txt");
        std::fs::write(&path, "name,\nplatform\n").unwrap();
        let fields = parse_fields(registry(), "Host", path.to_str().unwrap()).unwrap();
        assert_eq!(fields, vec!["name", "platform"]);
    }
}
