use super::{transport_object, HostGroup, SecurityProfile};
use crate::enums::HOST_TYPE;
use crate::error::Result;
use crate::manager::Manager;
use crate::mapping::{Schema, SchemaBuilder};

transport_object!(
    /// A computer known to the manager: physical machine, virtual machine,
    /// ESX server or virtual appliance.
    Host = "Host"
);

/// Fields shared by every host-like class.
pub(crate) fn host_fields(builder: SchemaBuilder) -> SchemaBuilder {
    builder
        .integer("id", "")
        .string("name", "")
        .string("description", "")
        .string("display_name", "Computer display name")
        .boolean(
            "external",
            "Administrative external boolean for integration purposes.",
        )
        .string(
            "external_id",
            "Administrative external ID for integration purposes.",
        )
        .integer("host_group_id", "Assigned HostGroupTransport ID")
        .enumeration("host_type", &HOST_TYPE, "Assigned host type")
        .string("platform", "Computer platform")
        .integer("security_profile_id", "Assigned SecurityProfileTransport ID")
}

/// The group hint of host classes.
pub(crate) fn host_group_hint(builder: SchemaBuilder) -> SchemaBuilder {
    builder.hint("host_group", "HostGroup", "The host group this host belongs to")
}

pub(crate) fn schema() -> Schema {
    host_group_hint(host_fields(Schema::builder("Host")))
        .cache_by(&["id", "name"])
        .build()
}

impl Host {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.0.string("display_name")
    }

    pub fn host_group_id(&self) -> Option<i64> {
        self.0.integer("host_group_id")
    }

    /// Symbol of the assigned `EnumHostType`.
    pub fn host_type(&self) -> Option<&'static str> {
        self.0.symbol("host_type")
    }

    pub fn platform(&self) -> Option<&str> {
        self.0.string("platform")
    }

    pub fn security_profile_id(&self) -> Option<i64> {
        self.0.integer("security_profile_id")
    }

    /// The group this host belongs to, fetched through the manager.
    pub fn host_group(&self, manager: &Manager) -> Result<Option<HostGroup>> {
        self.host_group_id()
            .map(|id| manager.host_group(id))
            .transpose()
    }

    /// The assigned security profile, fetched through the manager.
    pub fn security_profile(&self, manager: &Manager) -> Result<Option<SecurityProfile>> {
        self.security_profile_id()
            .map(|id| manager.security_profile(id))
            .transpose()
    }
}
