//! Enum tables of the manager's web service contract.
//!
//! Every table is a bidirectional, total mapping between the wire string the
//! manager sends (`"LAST_HOUR"`) and the symbol used in native values
//! (`"last_hour"`). Symbols are the lowercased wire strings.

use crate::error::{DeepSecurityError, MappingErrorKind, Result};

/// A named table of `(wire, symbol)` pairs.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumTable {
    name: &'static str,
    entries: &'static [(&'static str, &'static str)],
}

impl EnumTable {
    /// Create a table from `(wire, symbol)` pairs.
    pub const fn new(name: &'static str, entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { name, entries }
    }

    /// Contract name of the table, e.g. `EnumTimeFilterType`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Decode a wire string into its symbol.
    pub fn decode(&self, wire: &str) -> Result<&'static str> {
        self.entries
            .iter()
            .find(|(w, _)| *w == wire)
            .map(|(_, symbol)| *symbol)
            .ok_or_else(|| {
                DeepSecurityError::mapping(
                    format!("decoding {}", self.name),
                    MappingErrorKind::UnknownEnumValue {
                        table: self.name.to_string(),
                        value: wire.to_string(),
                        valid: self.wire_values().collect::<Vec<_>>().join(", "),
                    },
                )
            })
    }

    /// Encode a symbol into its wire string.
    pub fn encode(&self, symbol: &str) -> Result<&'static str> {
        self.entries
            .iter()
            .find(|(_, s)| *s == symbol)
            .map(|(wire, _)| *wire)
            .ok_or_else(|| {
                DeepSecurityError::mapping(
                    format!("encoding {}", self.name),
                    MappingErrorKind::UnknownEnumSymbol {
                        table: self.name.to_string(),
                        symbol: symbol.to_string(),
                        valid: self.symbols().collect::<Vec<_>>().join(", "),
                    },
                )
            })
    }

    /// Look up the interned symbol, if it belongs to this table.
    pub fn symbol(&self, symbol: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, s)| *s == symbol)
            .map(|(_, s)| *s)
    }

    /// Symbols in declaration order.
    pub fn symbols(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, symbol)| *symbol)
    }

    /// Wire strings in declaration order.
    pub fn wire_values(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(wire, _)| *wire)
    }
}

macro_rules! enum_table {
    ($(#[$meta:meta])* $ident:ident = $name:literal { $($wire:ident => $symbol:ident),+ $(,)? }) => {
        $(#[$meta])*
        pub static $ident: EnumTable =
            EnumTable::new($name, &[$((stringify!($wire), stringify!($symbol))),+]);
    };
}

enum_table!(APPLICATION_TYPE_PROTOCOL_TYPE = "EnumApplicationTypeProtocolType" {
    ICMP => icmp,
    TCP => tcp,
    UDP => udp,
    TCP_UDP => tcp_udp,
});

enum_table!(DIRECTION = "EnumDirection" {
    INCOMING => incoming,
    OUTGOING => outgoing,
});

enum_table!(HOST_TYPE = "EnumHostType" {
    STANDARD => standard,
    ESX => esx,
    APPLIANCE => appliance,
    VM => vm,
});

enum_table!(DPI_RULE_ACTION = "EnumDPIRuleAction" {
    DROP_CLOSE => drop_close,
    LOG_ONLY => log_only,
});

enum_table!(DPI_RULE_IF = "EnumDPIRuleIf" {
    ALL_PATTERNS_FOUND => all_patterns_found,
    ANY_PATTERNS_FOUND => any_patterns_found,
    NO_PATTERNS_FOUND => no_patterns_found,
});

enum_table!(DPI_RULE_PRIORITY = "EnumDPIRulePriority" {
    HIGHEST => highest,
    HIGH => high,
    NORMAL => normal,
    LOW => low,
    LOWEST => lowest,
});

enum_table!(DPI_RULE_SEVERITY = "EnumDPIRuleSeverity" {
    CRITICAL => critical,
    HIGH => high,
    MEDIUM => medium,
    LOW => low,
});

enum_table!(DPI_RULE_TEMPLATE_TYPE = "EnumDPIRuleTemplateType" {
    CUSTOM_XML => custom_xml,
    SIGNATURE => signature,
    START_END_PATTERNS => start_end_patterns,
});

enum_table!(HOST_FILTER_TYPE = "EnumHostFilterType" {
    ALL_HOSTS => all_hosts,
    HOSTS_IN_GROUP => hosts_in_group,
    HOSTS_USING_SECURITY_PROFILE => hosts_using_security_profile,
    HOSTS_IN_GROUP_AND_ALL_SUBGROUPS => hosts_in_group_and_all_subgroups,
    SPECIFIC_HOST => specific_host,
    MY_HOSTS => my_hosts,
});

enum_table!(HOST_DETAIL_LEVEL = "EnumHostDetailLevel" {
    LOW => low,
    MEDIUM => medium,
    HIGH => high,
});

enum_table!(PROTOCOL_ICMP_TYPE = "EnumProtocolIcmpType" {
    ICMP_ECHO => icmp_echo,
    ICMP_TIMESTAMP => icmp_timestamp,
    ICMP_INFORMATION => icmp_information,
    ICMP_ADDRESS_MASK => icmp_address_mask,
    ICMP_MOBILE_REGISTRATION => icmp_mobile_registration,
});

enum_table!(PORT_TYPE = "EnumPortType" {
    ANY => any,
    MAC => mac,
    PORTS => ports,
    DEFINED_LIST => defined_list,
});

enum_table!(HOST_LIGHT = "EnumHostLight" {
    GREEN => green,
    YELLOW => yellow,
    RED => red,
    GREY => grey,
    BLUE => blue,
});

enum_table!(SECURITY_PROFILE_DPI_STATE = "EnumSecurityProfileDPIState" {
    ON => on,
    OFF => off,
    PASSIVE => passive,
    INHERITED => inherited,
});

enum_table!(SECURITY_PROFILE_ANTI_MALWARE_STATE = "EnumSecurityProfileAntiMalwareState" {
    ON => on,
    OFF => off,
    INHERITED => inherited,
});

enum_table!(SECURITY_PROFILE_FIREWALL_STATE = "EnumSecurityProfileFirewallState" {
    ON => on,
    OFF => off,
    INHERITED => inherited,
});

enum_table!(SECURITY_PROFILE_INTEGRITY_STATE = "EnumSecurityProfileIntegrityState" {
    ON => on,
    OFF => off,
    INHERITED => inherited,
});

enum_table!(SECURITY_PROFILE_LOG_INSPECTION_STATE = "EnumSecurityProfileLogInspectionState" {
    ON => on,
    OFF => off,
    INHERITED => inherited,
});

enum_table!(SECURITY_PROFILE_RECOMMENDATION_STATE = "EnumSecurityProfileRecommendationState" {
    OFF => off,
    ONGOING => ongoing,
});

enum_table!(TIME_FILTER_TYPE = "EnumTimeFilterType" {
    LAST_HOUR => last_hour,
    LAST_24_HOURS => last_24_hours,
    LAST_7_DAYS => last_7_days,
    CUSTOM_RANGE => custom_range,
    SPECIFIC_TIME => specific_time,
});

enum_table!(OPERATOR = "EnumOperator" {
    GREATER_THAN => greater_than,
    LESS_THAN => less_than,
    EQUAL => equal,
});

enum_table!(EVENT_ORIGIN = "EnumEventOrigin" {
    UNKNOWN => unknown,
    AGENT => agent,
    GUESTAGENT => guestagent,
    APPLIANCEAGENT => applianceagent,
    MANAGER => manager,
});

enum_table!(CLOUD_OBJECT_TYPE = "EnumCloudObjectType" {
    AMAZON_VM => amazon_vm,
    VCLOUD_VM => vcloud_vm,
});

/// All tables, for introspection and tests.
pub static ALL_TABLES: &[&EnumTable] = &[
    &APPLICATION_TYPE_PROTOCOL_TYPE,
    &DIRECTION,
    &HOST_TYPE,
    &DPI_RULE_ACTION,
    &DPI_RULE_IF,
    &DPI_RULE_PRIORITY,
    &DPI_RULE_SEVERITY,
    &DPI_RULE_TEMPLATE_TYPE,
    &HOST_FILTER_TYPE,
    &HOST_DETAIL_LEVEL,
    &PROTOCOL_ICMP_TYPE,
    &PORT_TYPE,
    &HOST_LIGHT,
    &SECURITY_PROFILE_DPI_STATE,
    &SECURITY_PROFILE_ANTI_MALWARE_STATE,
    &SECURITY_PROFILE_FIREWALL_STATE,
    &SECURITY_PROFILE_INTEGRITY_STATE,
    &SECURITY_PROFILE_LOG_INSPECTION_STATE,
    &SECURITY_PROFILE_RECOMMENDATION_STATE,
    &TIME_FILTER_TYPE,
    &OPERATOR,
    &EVENT_ORIGIN,
    &CLOUD_OBJECT_TYPE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_table_round_trips() {
        for table in ALL_TABLES {
            for symbol in table.symbols() {
                let wire = table.encode(symbol).unwrap();
                assert_eq!(table.decode(wire).unwrap(), symbol, "{}", table.name());
            }
        }
    }

    #[test]
    fn test_tables_are_bijective() {
        for table in ALL_TABLES {
            let wires: HashSet<_> = table.wire_values().collect();
            let symbols: HashSet<_> = table.symbols().collect();
            assert_eq!(wires.len(), table.entries.len(), "{}", table.name());
            assert_eq!(symbols.len(), table.entries.len(), "{}", table.name());
        }
    }

    #[test]
    fn test_time_filter_scenario() {
        assert_eq!(TIME_FILTER_TYPE.decode("LAST_HOUR").unwrap(), "last_hour");
        assert_eq!(TIME_FILTER_TYPE.encode("last_hour").unwrap(), "LAST_HOUR");
    }

    #[test]
    fn test_unknown_wire_value_lists_valid_set() {
        let err = HOST_LIGHT.decode("PURPLE").unwrap_err();
        let message = std::error::Error::source(&err).unwrap().to_string();
        assert!(message.contains("PURPLE"), "{message}");
        assert!(message.contains("GREEN, YELLOW, RED, GREY, BLUE"), "{message}");
    }

    #[test]
    fn test_unknown_symbol_is_rejected() {
        let err = OPERATOR.encode("equals").unwrap_err();
        let message = std::error::Error::source(&err).unwrap().to_string();
        assert!(message.contains("greater_than, less_than, equal"), "{message}");
    }

    #[test]
    fn test_decode_is_case_sensitive() {
        assert!(DIRECTION.decode("incoming").is_err());
    }
}
