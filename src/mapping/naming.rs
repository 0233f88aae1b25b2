//! Name conversions between the manager's camelCase contract and snake_case keys.

/// Convert a remote element or header name into a snake_case key.
///
/// An underscore goes between a lowercase letter or digit and a following
/// uppercase letter, and before the last capital of an uppercase run that is
/// followed by a lowercase letter. Whitespace runs, `-` and `.` become a single
/// underscore.
///
/// ```
/// use deepsecurity::mapping::snake_case;
///
/// assert_eq!(snake_case("securityProfileID"), "security_profile_id");
/// assert_eq!(snake_case("DPIRuleIDs"), "dpi_rule_i_ds");
/// assert_eq!(snake_case("Last Updated"), "last_updated");
/// ```
pub fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.trim().chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    let mut pending_separator = false;

    for (i, &c) in chars.iter().enumerate() {
        if c.is_whitespace() || c == '-' || c == '.' {
            pending_separator = true;
            continue;
        }
        if pending_separator {
            if !out.is_empty() && !out.ends_with('_') {
                out.push('_');
            }
            pending_separator = false;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}

/// Convert a snake_case operation name into the lowerCamelCase element name.
///
/// ```
/// use deepsecurity::mapping::lower_camel_case;
///
/// assert_eq!(lower_camel_case("host_retrieve_all"), "hostRetrieveAll");
/// ```
pub fn lower_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for c in name.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_contract_names() {
        assert_eq!(snake_case("hostRetrieveAllResponse"), "host_retrieve_all_response");
        assert_eq!(snake_case("hostGroupID"), "host_group_id");
        assert_eq!(snake_case("DPIRuleIDs"), "dpi_rule_i_ds");
        assert_eq!(snake_case("applicationTypeIDs"), "application_type_i_ds");
        assert_eq!(snake_case("antiMalwareClassicPatternVersion"), "anti_malware_classic_pattern_version");
        assert_eq!(snake_case("lastIPUsed"), "last_ip_used");
        assert_eq!(snake_case("CVSSScore"), "cvss_score");
        assert_eq!(snake_case("TBUID"), "tbuid");
        assert_eq!(snake_case("sID"), "s_id");
    }

    #[test]
    fn test_snake_case_headers() {
        assert_eq!(snake_case("Name"), "name");
        assert_eq!(snake_case("CVSS Score"), "cvss_score");
        assert_eq!(snake_case("Connection  Type"), "connection_type");
        assert_eq!(snake_case("Bugtraq-ID"), "bugtraq_id");
    }

    #[test]
    fn test_lower_camel_case() {
        assert_eq!(lower_camel_case("get_api_version"), "getApiVersion");
        assert_eq!(lower_camel_case("authenticate"), "authenticate");
        assert_eq!(lower_camel_case("dpi_rule_retrieve_by_name"), "dpiRuleRetrieveByName");
    }
}
