use super::{transport_object, TransportObject};
use crate::enums::{APPLICATION_TYPE_PROTOCOL_TYPE, DIRECTION, PORT_TYPE, PROTOCOL_ICMP_TYPE};
use crate::mapping::Schema;

transport_object!(
    /// Network attributes a DPI rule is assigned to. The DPI engine applies a
    /// rule to a connection when these attributes match.
    ApplicationType = "ApplicationType"
);

transport_object!(
    /// ICMP protocol settings of an application type.
    ProtocolIcmp = "ProtocolICMP"
);

transport_object!(
    /// Port settings of a TCP or UDP application type.
    ProtocolPortBased = "ProtocolPortBased"
);

pub(crate) fn schema() -> Schema {
    Schema::builder("ApplicationType")
        .integer("id", "ApplicationTypeTransport ID")
        .string("description", "ApplicationTypeTransport description")
        .string("name", "ApplicationTypeTransport name")
        .string(
            "tbuid",
            "Internal TBUID of a Trend Micro issued Application Type",
        )
        .enumeration(
            "direction",
            &DIRECTION,
            "The initial direction of the connection which this ApplicationTypeTransport would apply, e.g., INCOMING, OUTGOING. Depending on whether the application type is a server or client, the initial direction of the connection to inspect would either be INCOMING for a server, or OUTGOING for a client. E.g. Inspection of \"Web Server Common\" Application Type for a connection stream on TCP port 80 would be initially an INCOMING direction because incoming Web Server connections should be inspected",
        )
        .boolean(
            "ignore_recommendations",
            "Whether the Recommendation Engine should ignore this rule",
        )
        .object(
            "protocol_icmp",
            "ProtocolICMP",
            "ApplicationTypeTransport protocol ICMP type",
        )
        .object(
            "protocol_port_based",
            "ProtocolPortBased",
            "ApplicationTypeTransport protocol Port type",
        )
        .enumeration(
            "protocol_type",
            &APPLICATION_TYPE_PROTOCOL_TYPE,
            "ApplicationTypeTransport protocol Application type, e.g., ICMP, TCP, UDP, TCP_UDP",
        )
        .boolean(
            "authoritative",
            "Whether the rule is an internal read only Trend Micro rule",
        )
        .cache_by(&["id", "name"])
        .build()
}

pub(crate) fn protocol_icmp_schema() -> Schema {
    Schema::builder("ProtocolICMP")
        .enumeration("type", &PROTOCOL_ICMP_TYPE, "ICMP type")
        .build()
}

pub(crate) fn protocol_port_based_schema() -> Schema {
    Schema::builder("ProtocolPortBased")
        .integer("port_list_id", "Assigned port list ID")
        .enumeration("port_type", &PORT_TYPE, "Port type")
        .string("ports", "Ports")
        .build()
}

impl ApplicationType {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn direction(&self) -> Option<&'static str> {
        self.0.symbol("direction")
    }

    pub fn protocol_type(&self) -> Option<&'static str> {
        self.0.symbol("protocol_type")
    }

    pub fn protocol_icmp(&self) -> Option<ProtocolIcmp> {
        self.0
            .object("protocol_icmp")
            .cloned()
            .map(ProtocolIcmp::from_record)
    }

    pub fn protocol_port_based(&self) -> Option<ProtocolPortBased> {
        self.0
            .object("protocol_port_based")
            .cloned()
            .map(ProtocolPortBased::from_record)
    }
}

impl ProtocolIcmp {
    pub fn icmp_type(&self) -> Option<&'static str> {
        self.0.symbol("type")
    }
}

impl ProtocolPortBased {
    pub fn port_list_id(&self) -> Option<i64> {
        self.0.integer("port_list_id")
    }

    pub fn port_type(&self) -> Option<&'static str> {
        self.0.symbol("port_type")
    }

    pub fn ports(&self) -> Option<&str> {
        self.0.string("ports")
    }
}
