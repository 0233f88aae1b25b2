use super::transport_object;
use crate::error::Result;
use crate::manager::Manager;
use crate::mapping::Schema;

transport_object!(
    /// A computer group folder that hosts can be assigned to.
    HostGroup = "HostGroup"
);

pub(crate) fn schema() -> Schema {
    Schema::builder("HostGroup")
        .integer("id", "ID")
        .string("name", "Name")
        .string("description", "Description")
        .boolean(
            "external",
            "Administrative external boolean for integration purposes",
        )
        .string(
            "external_id",
            "Administrative external ID for integration purposes",
        )
        .integer(
            "parent_group_id",
            "If the group belongs to a parent group, then this ID will be set and used to retrieve the parent group",
        )
        .hint("parent_group", "HostGroup", "The parent group if existent")
        .cache_by(&["id", "name"])
        .build()
}

impl HostGroup {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn parent_group_id(&self) -> Option<i64> {
        self.0.integer("parent_group_id")
    }

    /// The enclosing group, if this group is nested.
    pub fn parent_group(&self, manager: &Manager) -> Result<Option<HostGroup>> {
        self.parent_group_id()
            .map(|id| manager.host_group(id))
            .transpose()
    }
}
