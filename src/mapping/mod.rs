//! Typed attribute mapping between wire payloads and transport objects.
//!
//! Each transport class declares its fields once, as a [`Schema`] of
//! [`FieldMapping`]s. From that table the module derives decoding
//! ([`Record::decode`]), encoding ([`Record::encode`]) and the introspection
//! used by `dsc <entity> schema` and `--fields` validation.
//!
//! ```
//! use deepsecurity::mapping::{Record, SchemaRegistry, WireValue};
//!
//! let registry = SchemaRegistry::global();
//! let payload = WireValue::map([("type", WireValue::text("LAST_HOUR"))]);
//! let filter = Record::decode(registry, "TimeFilter", &payload).unwrap();
//! assert_eq!(filter.symbol("type"), Some("last_hour"));
//! ```

mod converters;
mod naming;
mod record;
mod schema;
mod value;
mod wire;

pub use converters::{parse_datetime, TypeMapping};
pub use naming::{lower_camel_case, snake_case};
pub use record::{HintResolver, NoHints, Record};
pub use schema::{FieldMapping, Schema, SchemaBuilder, SchemaRegistry};
pub use value::Value;
pub use wire::{Encodable, WireValue};
