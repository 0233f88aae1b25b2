//! Search criteria passed to retrieval operations.
//!
//! Field names here are the contract's request names (`rangeFrom`,
//! `hostGroupID`), since filters only ever travel towards the manager.

use super::transport_object;
use crate::enums::{HOST_FILTER_TYPE, OPERATOR, TIME_FILTER_TYPE};
use crate::mapping::{Record, Schema, Value};
use chrono::{DateTime, Duration, FixedOffset, Utc};

transport_object!(
    /// Limits retrieval by time: a relative window, a custom range or one
    /// specific time.
    TimeFilter = "TimeFilter"
);

transport_object!(
    /// Limits retrieval to hosts by group, security profile or host id.
    HostFilter = "HostFilter"
);

transport_object!(
    /// Limits event retrieval by event id.
    IdFilter = "IDFilter"
);

pub(crate) fn time_filter_schema() -> Schema {
    Schema::builder("TimeFilter")
        .datetime("rangeFrom", "Start of a CUSTOM_RANGE filter")
        .datetime("rangeTo", "End of a CUSTOM_RANGE filter")
        .datetime("specificTime", "Time of a SPECIFIC_TIME filter")
        .enumeration("type", &TIME_FILTER_TYPE, "EnumTimeFilterType of the filter")
        .build()
}

pub(crate) fn host_filter_schema() -> Schema {
    Schema::builder("HostFilter")
        .integer("hostGroupID", "HostGroupTransport ID to filter computers by")
        .integer("hostID", "HostTransport ID to filter computers by")
        .integer(
            "securityProfileID",
            "SecurityProfileTransport ID to filter computers by",
        )
        .enumeration(
            "type",
            &HOST_FILTER_TYPE,
            "EnumHostFilterType to filter computers by",
        )
        .build()
}

pub(crate) fn id_filter_schema() -> Schema {
    Schema::builder("IDFilter")
        .integer("id", "Event ID to compare against")
        .enumeration("operator", &OPERATOR, "Comparison applied to the event ID")
        .build()
}

impl TimeFilter {
    fn of_type(symbol: &'static str) -> Self {
        Self(Record::new("TimeFilter").with("type", Value::Enum(symbol)))
    }

    pub fn last_hour() -> Self {
        Self::of_type("last_hour")
    }

    pub fn last_24_hours() -> Self {
        Self::of_type("last_24_hours")
    }

    pub fn last_7_days() -> Self {
        Self::of_type("last_7_days")
    }

    /// The previous day, expressed as the last 24 hours.
    pub fn last_day() -> Self {
        Self::last_24_hours()
    }

    /// Everything between `from` and `to`.
    pub fn custom_range(from: DateTime<FixedOffset>, to: DateTime<FixedOffset>) -> Self {
        Self(
            Record::new("TimeFilter")
                .with("type", Value::Enum("custom_range"))
                .with("rangeFrom", from)
                .with("rangeTo", to),
        )
    }

    /// A custom range ending now.
    pub fn since(duration: Duration) -> Self {
        let now = Utc::now().fixed_offset();
        Self::custom_range(now - duration, now)
    }

    pub fn specific_time(at: DateTime<FixedOffset>) -> Self {
        Self(
            Record::new("TimeFilter")
                .with("type", Value::Enum("specific_time"))
                .with("specificTime", at),
        )
    }

    /// Symbol of the filter type.
    pub fn filter_type(&self) -> Option<&'static str> {
        self.0.symbol("type")
    }

    pub fn range_from(&self) -> Option<DateTime<FixedOffset>> {
        self.0.datetime("rangeFrom")
    }

    pub fn range_to(&self) -> Option<DateTime<FixedOffset>> {
        self.0.datetime("rangeTo")
    }

    pub fn specific(&self) -> Option<DateTime<FixedOffset>> {
        self.0.datetime("specificTime")
    }
}

impl HostFilter {
    fn of_type(symbol: &'static str) -> Record {
        Record::new("HostFilter").with("type", Value::Enum(symbol))
    }

    pub fn all_hosts() -> Self {
        Self(Self::of_type("all_hosts"))
    }

    pub fn hosts_in_group(host_group_id: i64) -> Self {
        Self(Self::of_type("hosts_in_group").with("hostGroupID", host_group_id))
    }

    pub fn hosts_using_security_profile(security_profile_id: i64) -> Self {
        Self(
            Self::of_type("hosts_using_security_profile")
                .with("securityProfileID", security_profile_id),
        )
    }

    pub fn hosts_in_group_and_all_subgroups(host_group_id: i64) -> Self {
        Self(Self::of_type("hosts_in_group_and_all_subgroups").with("hostGroupID", host_group_id))
    }

    pub fn specific_host(host_id: i64) -> Self {
        Self(Self::of_type("specific_host").with("hostID", host_id))
    }

    /// Hosts owned by the authenticated user.
    pub fn my_hosts() -> Self {
        Self(Self::of_type("my_hosts"))
    }

    pub fn filter_type(&self) -> Option<&'static str> {
        self.0.symbol("type")
    }
}

impl IdFilter {
    fn compare(operator: &'static str, id: i64) -> Self {
        Self(
            Record::new("IDFilter")
                .with("id", id)
                .with("operator", Value::Enum(operator)),
        )
    }

    pub fn equals(id: i64) -> Self {
        Self::compare("equal", id)
    }

    pub fn less_than(id: i64) -> Self {
        Self::compare("less_than", id)
    }

    pub fn greater_than(id: i64) -> Self {
        Self::compare("greater_than", id)
    }

    pub fn id(&self) -> Option<i64> {
        self.0.integer("id")
    }

    pub fn operator(&self) -> Option<&'static str> {
        self.0.symbol("operator")
    }
}
