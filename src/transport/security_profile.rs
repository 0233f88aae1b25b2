use super::transport_object;
use crate::enums::{
    SECURITY_PROFILE_ANTI_MALWARE_STATE, SECURITY_PROFILE_DPI_STATE,
    SECURITY_PROFILE_FIREWALL_STATE, SECURITY_PROFILE_INTEGRITY_STATE,
    SECURITY_PROFILE_LOG_INSPECTION_STATE, SECURITY_PROFILE_RECOMMENDATION_STATE,
};
use crate::mapping::{Schema, TypeMapping};

transport_object!(
    /// A security profile container assigned to hosts by id.
    SecurityProfile = "SecurityProfile"
);

pub(crate) fn schema() -> Schema {
    Schema::builder("SecurityProfile")
        .integer("id", "SecurityProfileTransport ID")
        .string("description", "SecurityProfileTransport description")
        .string("name", "SecurityProfileTransport name")
        .array(
            "dpi_rule_i_ds",
            TypeMapping::Integer,
            "Array of assigned DPIRuleTransport IDs",
        )
        .alias("dpi_rule_ids", "dpi_rule_i_ds")
        .enumeration(
            "dpi_state",
            &SECURITY_PROFILE_DPI_STATE,
            "Assigned EnumSecurityProfileDPIState, e.g., :on, :off, :passive, :inherited",
        )
        .integer("anti_malware_manual_id", "Anti Malware Manual ID")
        .boolean("anti_malware_manual_inherit", "Anti Malware Manual Inherit")
        .integer("anti_malware_real_time_id", "Anti Malware Real Time ID")
        .boolean(
            "anti_malware_real_time_inherit",
            "Anti Malware Real Time Inherit",
        )
        .integer(
            "anti_malware_real_time_schedule_id",
            "Anti Malware Real Time Schedule ID",
        )
        .integer("anti_malware_scheduled_id", "Anti Malware Scheduled ID")
        .boolean(
            "anti_malware_scheduled_inherit",
            "Anti Malware Scheduled Inherit",
        )
        .enumeration(
            "anti_malware_state",
            &SECURITY_PROFILE_ANTI_MALWARE_STATE,
            "Assigned EnumSecurityProfileAntiMalwareState, e.g., :on, :off, :inherited",
        )
        .array(
            "application_type_i_ds",
            TypeMapping::Integer,
            "Array of assigned ApplicationTypeTransport IDs",
        )
        .alias("application_type_ids", "application_type_i_ds")
        .array(
            "firewall_rule_i_ds",
            TypeMapping::Integer,
            "Array of assigned FirewallRuleTransport IDs",
        )
        .alias("firewall_rule_ids", "firewall_rule_i_ds")
        .enumeration(
            "firewall_state",
            &SECURITY_PROFILE_FIREWALL_STATE,
            "Assigned EnumSecurityProfileFirewallState, e.g., :on, :off, :inherited",
        )
        .array(
            "integrity_rule_i_ds",
            TypeMapping::Integer,
            "Array of assigned IntegrityMonitoringRuleTransport IDs",
        )
        .alias("integrity_rule_ids", "integrity_rule_i_ds")
        .enumeration(
            "integrity_state",
            &SECURITY_PROFILE_INTEGRITY_STATE,
            "Assigned EnumSecurityProfileIntegrityState, e.g., :on, :off, :inherited",
        )
        .array(
            "log_inspection_rule_i_ds",
            TypeMapping::Integer,
            "Array of assigned LogInspectionRuleTransport IDs",
        )
        .alias("log_inspection_rule_ids", "log_inspection_rule_i_ds")
        .enumeration(
            "log_inspection_state",
            &SECURITY_PROFILE_LOG_INSPECTION_STATE,
            "Assigned EnumSecurityProfileLogInspectionState, e.g., :on, :off, :inherited",
        )
        .enumeration(
            "recommendation_state",
            &SECURITY_PROFILE_RECOMMENDATION_STATE,
            "Assigned EnumSecurityProfileRecommendationState, e.g., :on, :off, :inherited",
        )
        .integer("schedule_id", "Assigned ScheduleTransport ID")
        .integer(
            "stateful_configuration_id",
            "Assigned StatefulConfigurationTransport ID",
        )
        .cache_by(&["id", "name"])
        .build()
}

impl SecurityProfile {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    pub fn description(&self) -> Option<&str> {
        self.0.string("description")
    }

    pub fn dpi_state(&self) -> Option<&'static str> {
        self.0.symbol("dpi_state")
    }

    pub fn dpi_rule_ids(&self) -> Vec<i64> {
        self.0.integers("dpi_rule_i_ds")
    }

    pub fn application_type_ids(&self) -> Vec<i64> {
        self.0.integers("application_type_i_ds")
    }

    pub fn firewall_rule_ids(&self) -> Vec<i64> {
        self.0.integers("firewall_rule_i_ds")
    }

    pub fn integrity_rule_ids(&self) -> Vec<i64> {
        self.0.integers("integrity_rule_i_ds")
    }

    pub fn log_inspection_rule_ids(&self) -> Vec<i64> {
        self.0.integers("log_inspection_rule_i_ds")
    }
}
