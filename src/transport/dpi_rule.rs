use super::{transport_object, ApplicationType};
use crate::enums::{
    DPI_RULE_ACTION, DPI_RULE_IF, DPI_RULE_PRIORITY, DPI_RULE_SEVERITY, DPI_RULE_TEMPLATE_TYPE,
};
use crate::error::Result;
use crate::manager::Manager;
use crate::mapping::Schema;

transport_object!(
    /// A deep packet inspection rule.
    DpiRule = "DPIRule"
);

pub(crate) fn schema() -> Schema {
    Schema::builder("DPIRule")
        .integer("id", "ID")
        .string("name", "Name")
        .string("description", "Description")
        .string("tbuid", "Internal TBUID of a Trend Micro issued DPI Rule")
        .integer(
            "application_type_id",
            "ApplicationTypeTransport ID this rule is assigned to",
        )
        .boolean(
            "authoritative",
            "Whether the rule is an internal read only Trend Micro rule",
        )
        .float(
            "cvss_score",
            "Final calculated CVSS score of the vulnerability information. A rule may resolve multiple vulnerabilities, so this will always be the highest CVSS score.",
        )
        .boolean("detect_only", "Whether the rule is detect only")
        .boolean("disable_event", "Whether the rule is disabled")
        .boolean(
            "event_on_packet_drop",
            "Whether the rule should trigger an event when the connection is dropped",
        )
        .boolean(
            "event_on_packet_modify",
            "Whether the rule should trigger an event when a packet is modified by a rule (uncommon)",
        )
        .string(
            "identifier",
            "Public identifier of the filter used by Trend Micro to track filters",
        )
        .boolean(
            "ignore_recommendations",
            "Whether the Recommendation Engine should ignore this rule",
        )
        .boolean(
            "include_packet_data",
            "Whether this rule events should include packet data",
        )
        .datetime("issued", "Date this rule was issued")
        .enumeration(
            "pattern_action",
            &DPI_RULE_ACTION,
            "Action for START_END_PATTERNS type rule, e.g., DROP_CLOSE, LOG_ONLY",
        )
        .boolean(
            "pattern_case_sensitive",
            "Whether a START_END_PATTERNS type rule should consider case sensitivity",
        )
        .string("pattern_end", "End pattern")
        .enumeration(
            "pattern_if",
            &DPI_RULE_IF,
            "Trigger if a START_END_PATTERNS type rule meets the criteria, e.g., ALL_PATTERNS_FOUND, ANY_PATTERNS_FOUND, NO_PATTERNS_FOUND",
        )
        .string(
            "pattern_patterns",
            "A newline separated list of strings which will be used by a START_END_PATTERNS type rule",
        )
        .string("pattern_start", "Start pattern")
        .enumeration(
            "priority",
            &DPI_RULE_PRIORITY,
            "Rule priority, e.g., HIGHEST, NORMAL, LOWEST",
        )
        .boolean(
            "raise_alert",
            "Whether an alert should be raised when the rule triggers",
        )
        .string(
            "rule_xml",
            "Rule XML of a CUSTOM_XML type rule. This may not be available for rules that have thirdBrigade set to TRUE",
        )
        .integer("schedule_id", "ScheduleTransport ID assigned to this rule")
        .enumeration("severity", &DPI_RULE_SEVERITY, "Severity, e.g., CRITICAL, LOW")
        .enumeration(
            "signature_action",
            &DPI_RULE_ACTION,
            "Action for SIGNATURE type rule, e.g., DROP_CLOSE, LOG_ONLY",
        )
        .boolean(
            "signature_case_sensitive",
            "Whether a SIGNATURE type rule should consider case sensitivity",
        )
        .string(
            "signature_signature",
            "Signature string which will be used by a SIGNATURE type rule",
        )
        .enumeration(
            "template_type",
            &DPI_RULE_TEMPLATE_TYPE,
            "Rule Type, e.g., CUSTOM_XML, SIGNATURE, START_END PATTERNS",
        )
        .cache_by(&["id", "name"])
        .build()
}

impl DpiRule {
    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn name(&self) -> Option<&str> {
        self.0.string("name")
    }

    /// Public identifier, the key the web console lists rules by.
    pub fn identifier(&self) -> Option<&str> {
        self.0.string("identifier")
    }

    pub fn application_type_id(&self) -> Option<i64> {
        self.0.integer("application_type_id")
    }

    pub fn cvss_score(&self) -> Option<f64> {
        self.0.float("cvss_score")
    }

    pub fn severity(&self) -> Option<&'static str> {
        self.0.symbol("severity")
    }

    pub fn priority(&self) -> Option<&'static str> {
        self.0.symbol("priority")
    }

    pub fn template_type(&self) -> Option<&'static str> {
        self.0.symbol("template_type")
    }

    /// The application type this rule inspects, fetched through the manager.
    pub fn application_type(&self, manager: &Manager) -> Result<Option<ApplicationType>> {
        self.application_type_id()
            .map(|id| manager.application_type(id))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{SchemaRegistry, WireValue};
    use crate::transport::TransportObject;

    #[test]
    fn test_decode_rule() {
        let payload = WireValue::map([
            ("id", "1001".into()),
            ("name", "1000552 - Generic Cross Site Scripting".into()),
            ("identifier", "1000552".into()),
            ("cvss_score", "4.3".into()),
            ("severity", "MEDIUM".into()),
            ("pattern_if", "NO_PATTERNS_FOUND".into()),
            ("issued", "2011-02-15T00:00:00Z".into()),
        ]);
        let rule = DpiRule::decode(SchemaRegistry::global(), &payload).unwrap();
        assert_eq!(rule.identifier(), Some("1000552"));
        assert_eq!(rule.cvss_score(), Some(4.3));
        assert_eq!(rule.severity(), Some("medium"));
        assert_eq!(rule.record().symbol("pattern_if"), Some("no_patterns_found"));
    }

    #[test]
    fn test_unknown_severity_fails() {
        let payload = WireValue::map([("severity", "APOCALYPTIC".into())]);
        let err = DpiRule::decode(SchemaRegistry::global(), &payload).unwrap_err();
        let message = format!("{:?}", err);
        assert!(message.contains("APOCALYPTIC"));
        assert!(message.contains("CRITICAL"));
    }
}
