//! Schema-driven records: the field storage behind every transport object.

use super::schema::SchemaRegistry;
use super::value::Value;
use super::wire::{Encodable, WireValue};
use crate::error::{DeepSecurityError, ErrorContext, MappingErrorKind, Result};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Field values of one instance of a transport class.
///
/// Unset fields are absent, never defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    class: &'static str,
    values: IndexMap<&'static str, Value>,
}

impl Record {
    /// An empty record of `class`.
    pub fn new(class: &'static str) -> Self {
        Self {
            class,
            values: IndexMap::new(),
        }
    }

    pub fn class(&self) -> &'static str {
        self.class
    }

    /// Decode a wire map into a record of `class`.
    ///
    /// Every key of the payload must have a registered converter; `Nil`
    /// values leave the field unset.
    pub fn decode(registry: &SchemaRegistry, class: &str, payload: &WireValue) -> Result<Self> {
        let schema = registry.schema(class)?;
        let entries = payload.as_map().ok_or_else(|| {
            DeepSecurityError::mapping(
                format!("decoding {class}"),
                MappingErrorKind::UnexpectedShape {
                    expected: "map".to_string(),
                    found: payload.kind().to_string(),
                },
            )
        })?;

        let mut record = Self::new(schema.class());
        for (key, data) in entries {
            let field = schema
                .field(key)
                .filter(|field| !field.mapping().is_hint())
                .ok_or_else(|| DeepSecurityError::missing_type_mapping(schema.class(), key))?;
            if data.is_nil() {
                continue;
            }
            let value = field
                .mapping()
                .decode(registry, data)
                .with_context(|| format!("{}.{}", schema.class(), key))?;
            record.values.insert(field.name(), value);
        }
        Ok(record)
    }

    /// Encode every set field through its converter.
    pub fn encode(&self, registry: &SchemaRegistry) -> Result<WireValue> {
        let schema = registry.schema(self.class)?;
        let mut entries = IndexMap::with_capacity(self.values.len());
        for (name, value) in &self.values {
            let field = schema
                .field(name)
                .filter(|field| !field.mapping().is_hint())
                .ok_or_else(|| DeepSecurityError::missing_type_mapping(self.class, *name))?;
            let wire = field
                .mapping()
                .encode(registry, value)
                .with_context(|| format!("{}.{}", self.class, name))?;
            entries.insert((*name).to_string(), wire);
        }
        Ok(WireValue::Map(entries))
    }

    /// Set a field after checking it against the schema.
    pub fn set(
        &mut self,
        registry: &SchemaRegistry,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<()> {
        let schema = registry.schema(self.class)?;
        let field = schema
            .field(name)
            .filter(|field| !field.mapping().is_hint())
            .ok_or_else(|| DeepSecurityError::missing_type_mapping(self.class, name))?;
        let value = value.into();
        if !field.mapping().accepts(&value) {
            return Err(DeepSecurityError::mapping(
                format!("setting {}.{}", self.class, name),
                MappingErrorKind::TypeMismatch {
                    field: name.to_string(),
                    expected: field.type_string(),
                },
            ));
        }
        self.values.insert(field.name(), value);
        Ok(())
    }

    /// Set a field known to exist, skipping schema checks.
    pub(crate) fn insert(&mut self, name: &'static str, value: impl Into<Value>) {
        self.values.insert(name, value.into());
    }

    /// Builder form of [`Record::insert`].
    pub(crate) fn with(mut self, name: &'static str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.shift_remove(name)
    }

    /// Value of a field by canonical name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_integer)
    }

    pub fn float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_float)
    }

    pub fn boolean(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Text of a `String` or `IPAddress` field.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn datetime(&self, name: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
        self.get(name).and_then(Value::as_datetime)
    }

    pub fn symbol(&self, name: &str) -> Option<&'static str> {
        self.get(name).and_then(Value::as_symbol)
    }

    pub fn object(&self, name: &str) -> Option<&Record> {
        self.get(name).and_then(Value::as_record)
    }

    pub fn array(&self, name: &str) -> Option<&[Value]> {
        self.get(name).and_then(Value::as_array)
    }

    /// Integers of an `Array<int>` field.
    pub fn integers(&self, name: &str) -> Vec<i64> {
        self.array(name)
            .map(|items| items.iter().filter_map(Value::as_integer).collect())
            .unwrap_or_default()
    }

    /// Resolve a dot-separated attribute chain.
    ///
    /// Object fields are walked directly, arrays of objects map the rest of
    /// the chain over their elements, and hint fields are resolved through
    /// `hints`. Returns `None` when a field along the way is unset.
    pub fn resolve(
        &self,
        registry: &SchemaRegistry,
        chain: &str,
        hints: &dyn HintResolver,
    ) -> Result<Option<Value>> {
        let segments: Vec<&str> = chain.split('.').map(str::trim).collect();
        resolve_segments(self, registry, &segments, hints)
    }
}

fn resolve_segments(
    record: &Record,
    registry: &SchemaRegistry,
    segments: &[&str],
    hints: &dyn HintResolver,
) -> Result<Option<Value>> {
    let Some((segment, rest)) = segments.split_first() else {
        return Ok(Some(Value::Object(record.clone())));
    };
    let schema = registry.schema(record.class)?;
    let field = schema
        .field(segment)
        .ok_or_else(|| DeepSecurityError::missing_type_mapping(record.class, *segment))?;

    if field.mapping().is_hint() {
        return match hints.resolve_hint(record, field.name())? {
            Some(target) => resolve_segments(&target, registry, rest, hints),
            None => Ok(None),
        };
    }

    let Some(value) = record.get(field.name()) else {
        return Ok(None);
    };
    if rest.is_empty() {
        return Ok(Some(value.clone()));
    }
    match value {
        Value::Object(nested) => resolve_segments(nested, registry, rest, hints),
        Value::Array(items) => {
            let mut resolved = Vec::with_capacity(items.len());
            for item in items {
                let nested = item.as_record().ok_or_else(|| not_navigable(record, segment))?;
                if let Some(value) = resolve_segments(nested, registry, rest, hints)? {
                    resolved.push(value);
                }
            }
            Ok(Some(Value::Array(resolved)))
        }
        _ => Err(not_navigable(record, segment)),
    }
}

fn not_navigable(record: &Record, segment: &str) -> DeepSecurityError {
    DeepSecurityError::mapping(
        format!("resolving {}.{}", record.class, segment),
        MappingErrorKind::TypeMismatch {
            field: segment.to_string(),
            expected: "object".to_string(),
        },
    )
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl Encodable for Record {
    fn to_wire(&self) -> Result<WireValue> {
        self.encode(SchemaRegistry::global())
    }
}

// ============================================================================
// Hint resolution
// ============================================================================

/// Resolves hint fields (navigation accessors) to the records they name.
pub trait HintResolver {
    /// Fetch the record a hint field of `record` points to.
    fn resolve_hint(&self, record: &Record, field: &str) -> Result<Option<Record>>;
}

/// A resolver for contexts without a manager connection.
///
/// Any hint lookup fails with a validation error naming the field.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHints;

impl HintResolver for NoHints {
    fn resolve_hint(&self, record: &Record, field: &str) -> Result<Option<Record>> {
        Err(DeepSecurityError::validation(format!(
            "{}.{} needs a manager connection",
            record.class(),
            field
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> &'static SchemaRegistry {
        SchemaRegistry::global()
    }

    fn host_payload() -> WireValue {
        WireValue::map([
            ("id", "7".into()),
            ("name", "web01".into()),
            ("external", "false".into()),
            ("host_type", "STANDARD".into()),
            ("description", WireValue::Nil),
        ])
    }

    #[test]
    fn test_decode_sets_present_fields_only() {
        let host = Record::decode(registry(), "Host", &host_payload()).unwrap();
        assert_eq!(host.class(), "Host");
        assert_eq!(host.integer("id"), Some(7));
        assert_eq!(host.string("name"), Some("web01"));
        assert_eq!(host.boolean("external"), Some(false));
        assert_eq!(host.symbol("host_type"), Some("standard"));
        assert!(!host.is_set("description"));
        assert!(!host.is_set("platform"));
    }

    #[test]
    fn test_decode_unknown_key_is_missing_type_mapping() {
        let mut payload = host_payload();
        if let WireValue::Map(entries) = &mut payload {
            entries.insert("favourite_colour".to_string(), "blue".into());
        }
        let err = Record::decode(registry(), "Host", &payload).unwrap_err();
        match err {
            DeepSecurityError::Mapping {
                source: MappingErrorKind::MissingTypeMapping { class, field },
                ..
            } => {
                assert_eq!(class, "Host");
                assert_eq!(field, "favourite_colour");
            }
            other => panic!("Expected MissingTypeMapping, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_rejects_hint_payload() {
        let payload = WireValue::map([("host_group", WireValue::map([("id", "1".into())]))]);
        assert!(Record::decode(registry(), "Host", &payload).is_err());
    }

    #[test]
    fn test_nil_nested_object_stays_unset() {
        let payload = WireValue::map([("id", "3".into()), ("protocol_icmp", WireValue::Nil)]);
        let app = Record::decode(registry(), "ApplicationType", &payload).unwrap();
        assert!(app.object("protocol_icmp").is_none());
        assert!(!app.is_set("protocol_icmp"));
    }

    #[test]
    fn test_decode_encode_round_trip() {
        let host = Record::decode(registry(), "Host", &host_payload()).unwrap();
        let wire = host.encode(registry()).unwrap();
        assert_eq!(wire.get("host_type"), Some(&WireValue::text("STANDARD")));
        assert_eq!(Record::decode(registry(), "Host", &wire).unwrap(), host);
    }

    #[test]
    fn test_set_checks_schema() {
        let mut host = Record::new("Host");
        host.set(registry(), "id", 5_i64).unwrap();
        assert!(host.set(registry(), "id", "five").is_err());
        assert!(host.set(registry(), "nope", 1_i64).is_err());
        assert!(host.set(registry(), "host_type", Value::Enum("mainframe")).is_err());
        assert_eq!(host.integer("id"), Some(5));
    }

    #[test]
    fn test_set_through_alias() {
        let mut profile = Record::new("SecurityProfile");
        profile
            .set(registry(), "dpi_rule_ids", Value::Array(vec![Value::Integer(4)]))
            .unwrap();
        assert_eq!(profile.integers("dpi_rule_i_ds"), vec![4]);
    }

    #[test]
    fn test_resolve_chain_through_arrays() {
        let payload = WireValue::map([
            ("name", "db01".into()),
            (
                "host_interfaces",
                WireValue::map([(
                    "item",
                    WireValue::List(vec![
                        WireValue::map([("mac", "00:11".into())]),
                        WireValue::map([("mac", "00:22".into())]),
                    ]),
                )]),
            ),
        ]);
        let detail = Record::decode(registry(), "HostDetail", &payload).unwrap();
        let macs = detail
            .resolve(registry(), "host_interfaces.mac", &NoHints)
            .unwrap()
            .unwrap();
        assert_eq!(macs, Value::Array(vec!["00:11".into(), "00:22".into()]));
        assert_eq!(detail.resolve(registry(), "platform", &NoHints).unwrap(), None);
    }

    #[test]
    fn test_resolve_hint_without_manager_fails() {
        let host = Record::decode(registry(), "Host", &host_payload()).unwrap();
        assert!(host.resolve(registry(), "host_group.name", &NoHints).is_err());
    }

    #[test]
    fn test_serialize_uses_symbols() {
        let host = Record::decode(registry(), "Host", &host_payload()).unwrap();
        let json = serde_json::to_value(&host).unwrap();
        assert_eq!(json["host_type"], "standard");
        assert_eq!(json["id"], 7);
    }
}
