use super::host::host_fields;
use super::transport_object;
use crate::mapping::Schema;

transport_object!(
    /// A network interface of a host.
    HostInterface = "HostInterface"
);

pub(crate) fn schema() -> Schema {
    host_fields(Schema::builder("HostInterface"))
        .boolean("dhcp", "DHCP On or Off")
        .integer("host_bridge_id", "The ID of the Host Bridge")
        .integer("interface_type_id", "The ID of the Interface Type")
        .string("mac", "Mac Address")
        .boolean("not_available", "True is the HostInterface isn't available")
        .integer("virtual_device_key", "The Virtual Device Key")
        .build()
}

impl HostInterface {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn mac(&self) -> Option<&str> {
        self.0.string("mac")
    }

    pub fn dhcp(&self) -> Option<bool> {
        self.0.boolean("dhcp")
    }

    pub fn not_available(&self) -> Option<bool> {
        self.0.boolean("not_available")
    }
}
