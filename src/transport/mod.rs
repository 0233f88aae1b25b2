//! Transport objects of the manager's web service contract.
//!
//! Each entity is a thin typed wrapper around a [`Record`] whose fields are
//! declared by a schema function in this module tree. Filters are local value
//! objects with named constructors; they never come back from the manager.

mod application_type;
mod dpi_rule;
mod filters;
mod host;
mod host_detail;
mod host_group;
mod host_interface;
mod security_profile;
mod system_event;

pub use application_type::{ApplicationType, ProtocolIcmp, ProtocolPortBased};
pub use dpi_rule::DpiRule;
pub use filters::{HostFilter, IdFilter, TimeFilter};
pub use host::Host;
pub use host_detail::HostDetail;
pub use host_group::HostGroup;
pub use host_interface::HostInterface;
pub use security_profile::SecurityProfile;
pub use system_event::SystemEvent;

use crate::error::Result;
use crate::mapping::{Record, Schema, SchemaRegistry, WireValue};

/// A typed view over a [`Record`] of one transport class.
pub trait TransportObject: Clone + Send + Sync + 'static {
    /// Contract class name, the key into the [`SchemaRegistry`].
    const CLASS: &'static str;

    /// Wrap a record already known to be of [`Self::CLASS`].
    fn from_record(record: Record) -> Self;

    fn record(&self) -> &Record;

    fn into_record(self) -> Record;

    /// Decode a wire payload into this type.
    fn decode(registry: &SchemaRegistry, payload: &WireValue) -> Result<Self> {
        Record::decode(registry, Self::CLASS, payload).map(Self::from_record)
    }
}

/// Declare a record-backed transport type.
macro_rules! transport_object {
    ($(#[$meta:meta])* $ty:ident = $class:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, serde::Serialize)]
        #[serde(transparent)]
        pub struct $ty(crate::mapping::Record);

        impl $ty {
            /// An instance with no fields set.
            pub fn new() -> Self {
                Self(crate::mapping::Record::new($class))
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl crate::transport::TransportObject for $ty {
            const CLASS: &'static str = $class;

            fn from_record(record: crate::mapping::Record) -> Self {
                Self(record)
            }

            fn record(&self) -> &crate::mapping::Record {
                &self.0
            }

            fn into_record(self) -> crate::mapping::Record {
                self.0
            }
        }

        impl crate::mapping::Encodable for $ty {
            fn to_wire(&self) -> crate::error::Result<crate::mapping::WireValue> {
                crate::mapping::Encodable::to_wire(&self.0)
            }
        }
    };
}

pub(crate) use transport_object;

/// Schemas of every transport class, nested classes first.
pub fn schemas() -> Vec<Schema> {
    vec![
        host_interface::schema(),
        host::schema(),
        host_detail::schema(),
        host_group::schema(),
        security_profile::schema(),
        dpi_rule::schema(),
        application_type::protocol_icmp_schema(),
        application_type::protocol_port_based_schema(),
        application_type::schema(),
        system_event::schema(),
        filters::time_filter_schema(),
        filters::host_filter_schema(),
        filters::id_filter_schema(),
    ]
}
