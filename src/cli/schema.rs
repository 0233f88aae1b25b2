//! `<entity> schema` command handler.

use crate::mapping::SchemaRegistry;
use anyhow::Result;

/// One line per field, sorted by name: `<name> (<type>): <description>`.
pub fn run_schema(registry: &SchemaRegistry, class: &str) -> Result<String> {
    let schema = registry.schema(class)?;
    let mut fields: Vec<_> = schema.fields().collect();
    fields.sort_by_key(|field| field.name());

    let mut out = String::new();
    for field in fields {
        out.push_str(&format!(
            "{} ({}): {}\n",
            field.name(),
            field.type_string(),
            field.description()
        ));
    }
    Ok(out)
}
