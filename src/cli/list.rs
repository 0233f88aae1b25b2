//! `<entity> list` command handler.

use super::progress::ProgressBar;
use crate::enums::HOST_DETAIL_LEVEL;
use crate::manager::Manager;
use crate::mapping::Record;
use crate::reports::{create_reporter, ReportFormat, Table};
use crate::scraping::DpiRuleAssignment;
use crate::transport::{HostFilter, TimeFilter, TransportObject};
use anyhow::{Context, Result};
use clap::ValueEnum;

/// Entities the CLI can list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Entity {
    HostDetail,
    Host,
    HostGroup,
    SecurityProfile,
    DpiRule,
    ApplicationType,
    SystemEvent,
}

impl Entity {
    pub const ALL: [Entity; 7] = [
        Self::HostDetail,
        Self::Host,
        Self::HostGroup,
        Self::SecurityProfile,
        Self::DpiRule,
        Self::ApplicationType,
        Self::SystemEvent,
    ];

    /// Transport class listed by this entity.
    pub fn class(self) -> &'static str {
        match self {
            Self::HostDetail => crate::transport::HostDetail::CLASS,
            Self::Host => crate::transport::Host::CLASS,
            Self::HostGroup => crate::transport::HostGroup::CLASS,
            Self::SecurityProfile => crate::transport::SecurityProfile::CLASS,
            Self::DpiRule => crate::transport::DpiRule::CLASS,
            Self::ApplicationType => crate::transport::ApplicationType::CLASS,
            Self::SystemEvent => crate::transport::SystemEvent::CLASS,
        }
    }

    /// Command name, e.g. `host_detail`.
    pub fn command_name(self) -> &'static str {
        match self {
            Self::HostDetail => "host_detail",
            Self::Host => "host",
            Self::HostGroup => "host_group",
            Self::SecurityProfile => "security_profile",
            Self::DpiRule => "dpi_rule",
            Self::ApplicationType => "application_type",
            Self::SystemEvent => "system_event",
        }
    }

    /// Fields listed when `--fields` is not given.
    pub fn default_fields(self) -> &'static [&'static str] {
        match self {
            Self::HostDetail => &[
                "name",
                "display_name",
                "anti_malware_classic_pattern_version",
                "anti_malware_engine_version",
                "anti_malware_intelli_trap_exception_version",
                "anti_malware_intelli_trap_version",
                "anti_malware_smart_scan_pattern_version",
                "anti_malware_spyware_pattern_version",
                "overall_last_successful_communication",
                "platform",
                "host_type",
                "host_group_name",
            ],
            Self::Host => &["id", "name", "display_name", "platform", "host_type"],
            Self::HostGroup => &["id", "name", "description", "parent_group_id"],
            Self::SecurityProfile => &["id", "name", "description"],
            Self::DpiRule => &["identifier", "name", "severity", "cvss_score", "issued"],
            Self::ApplicationType => &["id", "name", "description"],
            Self::SystemEvent => &[
                "time",
                "event_id",
                "event",
                "target",
                "action_performed_by",
                "manager_hostname",
            ],
        }
    }

    /// Default fields as a `--fields` argument.
    pub fn default_fields_string(self) -> String {
        self.default_fields().join(",")
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command_name())
    }
}

/// What to retrieve for a listing.
#[derive(Debug, Clone)]
pub enum ListQuery {
    /// Every entity of the kind
    All,
    /// Host details of all hosts at a detail level symbol
    HostDetails { detail_level: String },
    /// System events in a time window
    SystemEvents {
        time_filter: TimeFilter,
        include_non_host_events: bool,
    },
    /// DPI rules of one host by assignment state, scraped from the console
    DpiRulesForHost {
        host_id: i64,
        assignment: DpiRuleAssignment,
    },
}

/// Rendering options of a listing.
#[derive(Debug, Clone)]
pub struct ListOptions {
    pub fields: Vec<String>,
    pub format: ReportFormat,
    pub time_format: String,
    pub progress_bar: bool,
}

/// Parse a `--time_filter` name.
pub fn parse_time_filter(name: &str) -> Result<TimeFilter> {
    match name.trim() {
        "last_hour" => Ok(TimeFilter::last_hour()),
        "last_24_hours" => Ok(TimeFilter::last_24_hours()),
        "last_7_days" => Ok(TimeFilter::last_7_days()),
        "last_day" => Ok(TimeFilter::last_day()),
        other => anyhow::bail!(
            "Unknown time filter '{other}' (one of last_hour, last_24_hours, last_7_days, last_day)"
        ),
    }
}

/// Parse a `--detail_level` name into its symbol.
pub fn parse_detail_level(name: &str) -> Result<String> {
    let name = name.trim().to_lowercase();
    match HOST_DETAIL_LEVEL.symbol(&name) {
        Some(symbol) => Ok(symbol.to_string()),
        None => anyhow::bail!(
            "Unknown detail level filter '{name}' (one of {})",
            HOST_DETAIL_LEVEL.symbols().collect::<Vec<_>>().join(", ")
        ),
    }
}

fn records<T: TransportObject>(objects: Vec<T>) -> Vec<Record> {
    objects.into_iter().map(TransportObject::into_record).collect()
}

/// Retrieve the records of a listing.
pub fn fetch_records(manager: &Manager, entity: Entity, query: &ListQuery) -> Result<Vec<Record>> {
    let fetched = match (entity, query) {
        (Entity::HostDetail, ListQuery::HostDetails { detail_level }) => {
            records(manager.host_details(&HostFilter::all_hosts(), detail_level)?)
        }
        (Entity::HostDetail, ListQuery::All) => {
            records(manager.host_details(&HostFilter::all_hosts(), "low")?)
        }
        (
            Entity::SystemEvent,
            ListQuery::SystemEvents {
                time_filter,
                include_non_host_events,
            },
        ) => records(manager.system_events(
            time_filter,
            &HostFilter::all_hosts(),
            None,
            *include_non_host_events,
        )?),
        (Entity::SystemEvent, ListQuery::All) => records(manager.system_events(
            &TimeFilter::last_day(),
            &HostFilter::all_hosts(),
            None,
            false,
        )?),
        (Entity::DpiRule, ListQuery::DpiRulesForHost { host_id, assignment }) => {
            records(dpi_rules_for_host(manager, *host_id, *assignment)?)
        }
        (Entity::Host, ListQuery::All) => records(manager.hosts()?),
        (Entity::HostGroup, ListQuery::All) => records(manager.host_groups()?),
        (Entity::SecurityProfile, ListQuery::All) => records(manager.security_profiles()?),
        (Entity::DpiRule, ListQuery::All) => records(manager.dpi_rules()?),
        (Entity::ApplicationType, ListQuery::All) => records(manager.application_types()?),
        (entity, query) => anyhow::bail!("{entity} list does not support {query:?}"),
    };
    Ok(fetched)
}

#[cfg(feature = "screenscraping")]
fn dpi_rules_for_host(
    manager: &Manager,
    host_id: i64,
    assignment: DpiRuleAssignment,
) -> Result<Vec<crate::transport::DpiRule>> {
    Ok(manager.dpi_rules_for_host(host_id, assignment)?)
}

#[cfg(not(feature = "screenscraping"))]
fn dpi_rules_for_host(
    _manager: &Manager,
    _host_id: i64,
    _assignment: DpiRuleAssignment,
) -> Result<Vec<crate::transport::DpiRule>> {
    anyhow::bail!("dsc was built without the screenscraping feature")
}

/// Run a listing and render it.
///
/// The progress bar reaches 25% after retrieval and advances per row.
pub fn run_list(
    manager: &Manager,
    entity: Entity,
    query: &ListQuery,
    options: &ListOptions,
) -> Result<String> {
    let mut progress = ProgressBar::new(entity.command_name(), options.progress_bar);
    let records = fetch_records(manager, entity, query)
        .with_context(|| format!("Failed to retrieve {entity} list"))?;
    progress.set(25.0);

    let step = if records.is_empty() {
        0.0
    } else {
        75.0 / records.len() as f64
    };
    let mut table = Table::new(options.fields.clone());
    for record in &records {
        table.push_record(manager.registry(), record, manager);
        progress.inc(step);
    }
    progress.finish();

    tracing::debug!("Rendering {} {} rows as {}", table.len(), entity, options.format);
    let reporter = create_reporter(options.format);
    Ok(reporter.generate(&table, &options.time_format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::fields::parse_fields;
    use crate::mapping::SchemaRegistry;

    #[test]
    fn test_default_fields_are_valid_chains() {
        let registry = SchemaRegistry::global();
        for entity in Entity::ALL {
            let fields = parse_fields(registry, entity.class(), &entity.default_fields_string());
            assert!(fields.is_ok(), "{entity}: {fields:?}");
        }
    }

    #[test]
    fn test_parse_time_filter() {
        assert_eq!(
            parse_time_filter("last_7_days").unwrap().filter_type(),
            Some("last_7_days")
        );
        assert!(parse_time_filter("last_year").is_err());
    }

    #[test]
    fn test_parse_detail_level() {
        assert_eq!(parse_detail_level("HIGH").unwrap(), "high");
        assert!(parse_detail_level("extreme")
            .unwrap_err()
            .to_string()
            .contains("low, medium, high"));
    }
}
