//! Per-class mapping tables and the registry holding them.
//!
//! Schemas are plain values built by explicit functions; a subtype composes
//! its table by passing a builder through the base type's field function
//! before adding its own fields.

use super::converters::TypeMapping;
use crate::enums::EnumTable;
use crate::error::{DeepSecurityError, MappingErrorKind, Result};
use indexmap::IndexMap;
use std::sync::OnceLock;

/// One registered field: name, converter and help text.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    name: &'static str,
    mapping: TypeMapping,
    description: &'static str,
}

impl FieldMapping {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn mapping(&self) -> &TypeMapping {
        &self.mapping
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    pub fn type_string(&self) -> String {
        self.mapping.type_string()
    }
}

/// Mapping table of one transport class.
#[derive(Debug, Clone)]
pub struct Schema {
    class: &'static str,
    fields: IndexMap<&'static str, FieldMapping>,
    aliases: IndexMap<&'static str, &'static str>,
    cache_aspects: Vec<&'static str>,
}

impl Schema {
    /// Start a schema for `class`.
    pub fn builder(class: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            schema: Schema {
                class,
                fields: IndexMap::new(),
                aliases: IndexMap::new(),
                cache_aspects: Vec::new(),
            },
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Look up a field by canonical name or alias.
    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        let canonical = self.canonical_name(name)?;
        self.fields.get(canonical)
    }

    /// Canonical field name for a name or alias.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        if let Some((key, _)) = self.fields.get_key_value(name) {
            return Some(*key);
        }
        self.aliases.get(name).copied()
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldMapping> {
        self.fields.values()
    }

    /// Field names, sorted.
    pub fn defined_attributes(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.fields.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// `(alias, canonical)` pairs.
    pub fn aliases(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.aliases.iter().map(|(alias, canonical)| (*alias, *canonical))
    }

    pub fn cache_aspects(&self) -> &[&'static str] {
        &self.cache_aspects
    }

    pub fn is_cacheable(&self) -> bool {
        !self.cache_aspects.is_empty()
    }
}

/// Fluent builder for [`Schema`].
#[derive(Debug)]
#[must_use]
pub struct SchemaBuilder {
    schema: Schema,
}

impl SchemaBuilder {
    /// Register a field with an arbitrary converter.
    pub fn field(mut self, name: &'static str, mapping: TypeMapping, description: &'static str) -> Self {
        self.schema.fields.insert(
            name,
            FieldMapping {
                name,
                mapping,
                description,
            },
        );
        self
    }

    pub fn boolean(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::Boolean, description)
    }

    pub fn integer(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::Integer, description)
    }

    pub fn float(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::Float, description)
    }

    pub fn string(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::String, description)
    }

    pub fn datetime(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::DateTime, description)
    }

    pub fn ip_address(self, name: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::IpAddress, description)
    }

    pub fn enumeration(
        self,
        name: &'static str,
        table: &'static EnumTable,
        description: &'static str,
    ) -> Self {
        self.field(name, TypeMapping::Enum(table), description)
    }

    pub fn object(self, name: &'static str, class: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::Object(class), description)
    }

    pub fn array(self, name: &'static str, element: TypeMapping, description: &'static str) -> Self {
        self.field(name, TypeMapping::array(element), description)
    }

    /// Navigation accessor documented in the schema but resolved through the manager.
    pub fn hint(self, name: &'static str, class: &'static str, description: &'static str) -> Self {
        self.field(name, TypeMapping::Hint(class), description)
    }

    /// Expose `canonical` under a second name.
    pub fn alias(mut self, alias: &'static str, canonical: &'static str) -> Self {
        self.schema.aliases.insert(alias, canonical);
        self
    }

    /// Cache decoded instances under these aspects.
    pub fn cache_by(mut self, aspects: &[&'static str]) -> Self {
        self.schema.cache_aspects.extend_from_slice(aspects);
        self
    }

    pub fn build(self) -> Schema {
        self.schema
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Immutable lookup from class name to [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: IndexMap<&'static str, Schema>,
}

impl SchemaRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every transport class of the manager contract.
    pub fn with_transport_objects() -> Self {
        let mut registry = Self::new();
        for schema in crate::transport::schemas() {
            registry.register(schema);
        }
        registry
    }

    /// Process-wide registry, built on first use.
    pub fn global() -> &'static SchemaRegistry {
        static REGISTRY: OnceLock<SchemaRegistry> = OnceLock::new();
        REGISTRY.get_or_init(Self::with_transport_objects)
    }

    /// Add or replace a schema.
    pub fn register(&mut self, schema: Schema) {
        self.schemas.insert(schema.class(), schema);
    }

    pub fn get(&self, class: &str) -> Option<&Schema> {
        self.schemas.get(class)
    }

    /// Look up a schema, failing for unknown classes.
    pub fn schema(&self, class: &str) -> Result<&Schema> {
        self.get(class).ok_or_else(|| {
            DeepSecurityError::mapping(
                "schema lookup",
                MappingErrorKind::UnknownClass(class.to_string()),
            )
        })
    }

    /// Registered class names in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    /// Whether the dot-separated `chain` names a reachable attribute of `class`.
    ///
    /// Each segment but the last must lead to another class through an
    /// object, hint or object-array mapping.
    pub fn has_attribute_chain(&self, class: &str, chain: &str) -> bool {
        let mut current = Some(class);
        for segment in chain.split('.') {
            let Some(class) = current else {
                return false;
            };
            let Some(field) = self.get(class).and_then(|schema| schema.field(segment.trim())) else {
                return false;
            };
            current = field.mapping().object_class();
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::HOST_TYPE;

    fn sample() -> Schema {
        Schema::builder("Sample")
            .integer("id", "Identifier")
            .string("name", "Name")
            .enumeration("host_type", &HOST_TYPE, "Type")
            .array("rule_i_ds", TypeMapping::Integer, "Rules")
            .alias("rule_ids", "rule_i_ds")
            .cache_by(&["id", "name"])
            .build()
    }

    #[test]
    fn test_alias_resolves_to_canonical_field() {
        let schema = sample();
        assert_eq!(schema.canonical_name("rule_ids"), Some("rule_i_ds"));
        assert_eq!(schema.field("rule_ids").unwrap().name(), "rule_i_ds");
        assert!(schema.field("rules").is_none());
    }

    #[test]
    fn test_defined_attributes_sorted_without_aliases() {
        assert_eq!(
            sample().defined_attributes(),
            vec!["host_type", "id", "name", "rule_i_ds"]
        );
    }

    #[test]
    fn test_cache_aspects() {
        let schema = sample();
        assert!(schema.is_cacheable());
        assert_eq!(schema.cache_aspects(), &["id", "name"]);
        assert!(!Schema::builder("Plain").build().is_cacheable());
    }

    #[test]
    fn test_attribute_chains_walk_nested_classes() {
        let registry = SchemaRegistry::global();
        assert!(registry.has_attribute_chain("HostDetail", "name"));
        assert!(registry.has_attribute_chain("HostDetail", "host_interfaces.mac"));
        assert!(registry.has_attribute_chain("ApplicationType", "protocol_port_based.ports"));
        assert!(registry.has_attribute_chain("Host", "host_group.name"));
        assert!(!registry.has_attribute_chain("HostDetail", "name.length"));
        assert!(!registry.has_attribute_chain("HostDetail", "bogus"));
        assert!(!registry.has_attribute_chain("Nope", "name"));
    }

    #[test]
    fn test_unknown_class_is_an_error() {
        assert!(SchemaRegistry::new().schema("Host").is_err());
    }
}
