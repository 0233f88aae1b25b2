use super::host::{host_fields, host_group_hint};
use super::{transport_object, HostInterface, TransportObject};
use crate::enums::{CLOUD_OBJECT_TYPE, HOST_LIGHT};
use crate::mapping::{Schema, TypeMapping, Value};
use chrono::{DateTime, FixedOffset};

transport_object!(
    /// Detailed information about one computer. The `overall_*` fields merge
    /// the states of every protecting endpoint (agent and appliance).
    HostDetail = "HostDetail"
);

pub(crate) fn schema() -> Schema {
    // Field names follow the contract, including its misspelled
    // `last_anit_malware_scheduled_scan`.
    host_group_hint(host_fields(Schema::builder("HostDetail")))
        .string(
            "anti_malware_classic_pattern_version",
            "Current version of the classic Anti-Malware pattern",
        )
        .string(
            "anti_malware_engine_version",
            "Current version of the Anti-Malware engine",
        )
        .string(
            "anti_malware_intelli_trap_exception_version",
            "Current version of the IntelliTrap exception pattern",
        )
        .string(
            "anti_malware_intelli_trap_version",
            "Current version of the IntelliTrap pattern",
        )
        .string(
            "anti_malware_smart_scan_pattern_version",
            "Current version of the Smart Scan pattern",
        )
        .string(
            "anti_malware_spyware_pattern_version",
            "Current version of the Spyware pattern",
        )
        .string("host_group_name", "Name of Group this computer belongs to")
        .string("cloud_object_image_id", "Cloud Object Image Id")
        .string("cloud_object_instance_id", "Cloud Object Instance Id")
        .string(
            "cloud_object_internal_unique_id",
            "Cloud Object Internal Unique Id",
        )
        .string(
            "cloud_object_security_group_ids",
            "Cloud Object Security Group Ids",
        )
        .enumeration("cloud_object_type", &CLOUD_OBJECT_TYPE, "Cloud Object Type")
        .enumeration(
            "host_light",
            &HOST_LIGHT,
            "Current color that represents the computers status",
        )
        .datetime(
            "last_anit_malware_scheduled_scan",
            "Last time an Anti-Malware scheduled scan was performed",
        )
        .datetime(
            "last_anti_malware_event",
            "The time of the most recent Anti-Malware event for this computer",
        )
        .datetime(
            "last_anti_malware_manual_scan",
            "Last time an Anti-Malware manual scan was performed",
        )
        .datetime(
            "last_dpi_event",
            "The time of the most recent DPI Event for this computer",
        )
        .datetime(
            "last_firewall_event",
            "The time of the most recent Firewall Event for this computer",
        )
        .ip_address(
            "last_ip_used",
            "The last IP that was used for this computer during communication with the manager",
        )
        .datetime(
            "last_integrity_monitoring_event",
            "The time of the most recent Integrity Monitoring Event for this computer",
        )
        .datetime(
            "last_log_inspection_event",
            "The time of the most recent Log Inspection Event for this computer",
        )
        .integer("light", "An integer representing the computers status light")
        .boolean("locked", "The locked state of the computer")
        .string(
            "overall_anti_malware_status",
            "Overall Anti-Malware status of the computer",
        )
        .string("overall_dpi_status", "Overall DPI status of the computer")
        .string(
            "overall_firewall_status",
            "Overall Firewall status of the computer",
        )
        .string(
            "overall_integrity_monitoring_status",
            "Overall Integrity Monitoring status of the computer",
        )
        .datetime(
            "overall_last_recommendation_scan",
            "The time of the last recommendation scan",
        )
        .datetime(
            "overall_last_successful_communication",
            "The time of the last communication with the Manager",
        )
        .datetime(
            "overall_last_successful_update",
            "The time of the last successful Configuration Update",
        )
        .datetime(
            "overall_last_update_required",
            "The time the last configuration update was required at the manager",
        )
        .string(
            "overall_log_inspection_status",
            "Overall Log Inspection status of the computer",
        )
        .string("overall_status", "Overall status of the computer")
        .string("overall_version", "Overall version of the computer")
        .string(
            "security_profile_name",
            "Name of the security profile assigned to the computer",
        )
        .string(
            "virtual_name",
            "Internal virtual name (only populated if this is a computer provisioned through vCenter)",
        )
        .string(
            "virtual_uuid",
            "Internal virtual UUID (only populated if this is a computer provisioned through vCenter)",
        )
        .array(
            "component_klasses",
            TypeMapping::Integer,
            "Array of class ids for components",
        )
        .array(
            "component_names",
            TypeMapping::String,
            "Array of component names",
        )
        .array(
            "component_types",
            TypeMapping::Integer,
            "Array of component types",
        )
        .array(
            "component_versions",
            TypeMapping::String,
            "Array of component versions",
        )
        .string(
            "overall_web_reputation_status",
            "Overall Web Reputation status of the computer",
        )
        .datetime(
            "last_web_reputation_event",
            "The time of the most recent Web Reputation event for this computer",
        )
        .array(
            "host_interfaces",
            TypeMapping::Object("HostInterface"),
            "Network interfaces of the computer",
        )
        .build()
}

impl HostDetail {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn display_name(&self) -> Option<&str> {
        self.0.string("display_name")
    }

    pub fn platform(&self) -> Option<&str> {
        self.0.string("platform")
    }

    pub fn host_group_name(&self) -> Option<&str> {
        self.0.string("host_group_name")
    }

    pub fn host_light(&self) -> Option<&'static str> {
        self.0.symbol("host_light")
    }

    pub fn last_ip_used(&self) -> Option<&str> {
        self.0.string("last_ip_used")
    }

    pub fn overall_status(&self) -> Option<&str> {
        self.0.string("overall_status")
    }

    pub fn overall_last_successful_communication(&self) -> Option<DateTime<FixedOffset>> {
        self.0.datetime("overall_last_successful_communication")
    }

    /// Decoded network interfaces, empty when none were reported.
    pub fn host_interfaces(&self) -> Vec<HostInterface> {
        self.0
            .array("host_interfaces")
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_record)
                    .cloned()
                    .map(HostInterface::from_record)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{SchemaRegistry, WireValue};

    #[test]
    fn test_decode_detail_with_interfaces() {
        let payload = WireValue::map([
            ("id", "4".into()),
            ("name", "db01".into()),
            ("host_light", "GREEN".into()),
            ("last_ip_used", "10.0.0.4".into()),
            ("overall_last_successful_communication", "2013-04-30T09:15:00.000Z".into()),
            (
                "component_names",
                WireValue::map([("item", WireValue::List(vec!["Agent".into(), "Appliance".into()]))]),
            ),
            (
                "host_interfaces",
                WireValue::map([(
                    "item",
                    WireValue::map([("mac", "00:50:56:aa:bb:cc".into()), ("dhcp", "true".into())]),
                )]),
            ),
        ]);
        let detail = HostDetail::decode(SchemaRegistry::global(), &payload).unwrap();

        assert_eq!(detail.host_light(), Some("green"));
        assert_eq!(detail.last_ip_used(), Some("10.0.0.4"));
        assert!(detail.overall_last_successful_communication().is_some());
        assert_eq!(detail.record().array("component_names").map(<[_]>::len), Some(2));

        let interfaces = detail.host_interfaces();
        assert_eq!(interfaces.len(), 1);
        assert_eq!(interfaces[0].mac(), Some("00:50:56:aa:bb:cc"));
        assert_eq!(interfaces[0].dhcp(), Some(true));
    }

    #[test]
    fn test_detail_extends_host_fields() {
        let schema = schema();
        for field in ["id", "name", "host_type", "security_profile_id", "host_group"] {
            assert!(schema.field(field).is_some(), "missing {field}");
        }
        assert!(!schema.is_cacheable());
    }
}
