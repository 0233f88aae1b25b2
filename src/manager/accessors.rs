//! One accessor per remote retrieval operation.
//!
//! Retrieval of single entities and whole collections is memoized under
//! `"<Class>-<aspect>-<value>"` keys; filtered retrievals are not.

use super::{Manager, Params};
use crate::cache::cache_key;
use crate::enums::HOST_DETAIL_LEVEL;
use crate::error::Result;
use crate::mapping::{Encodable, WireValue};
use crate::transport::{
    ApplicationType, DpiRule, Host, HostDetail, HostFilter, HostGroup, IdFilter, SecurityProfile,
    SystemEvent, TimeFilter, TransportObject,
};

impl Manager {
    fn cached_collection<T: TransportObject>(&self, method: &str) -> Result<Vec<T>> {
        self.cache.fetch(&cache_key(T::CLASS, "all", "all"), || {
            let params = self.authenticated(Params::new())?;
            self.request_collection(method, None, &params)
        })
    }

    fn cached_by_id<T: TransportObject>(&self, method: &str, id: i64) -> Result<T> {
        self.cache.fetch(&cache_key(T::CLASS, "id", id), || {
            let params = self.authenticated(vec![("id", id.to_wire()?)])?;
            self.request_object(method, &params)
        })
    }

    fn cached_by_name<T: TransportObject>(
        &self,
        method: &str,
        param: &'static str,
        name: &str,
    ) -> Result<T> {
        self.cache.fetch(&cache_key(T::CLASS, "name", name), || {
            let params = self.authenticated(vec![(param, name.into())])?;
            self.request_object(method, &params)
        })
    }

    // ========================================================================
    // Hosts
    // ========================================================================

    /// All hosts.
    pub fn hosts(&self) -> Result<Vec<Host>> {
        self.cached_collection("host_retrieve_all")
    }

    pub fn host(&self, id: i64) -> Result<Host> {
        self.cached_by_id("host_retrieve", id)
    }

    pub fn host_by_name(&self, hostname: &str) -> Result<Host> {
        self.cached_by_name("host_retrieve_by_name", "hostname", hostname)
    }

    /// Detail records of every host matching `filter`.
    ///
    /// `detail_level` is a symbol of `EnumHostDetailLevel` (`low`, `medium`, `high`).
    pub fn host_details(&self, filter: &HostFilter, detail_level: &str) -> Result<Vec<HostDetail>> {
        let params = self.authenticated(vec![
            ("hostFilter", filter.to_wire()?),
            ("hostDetailLevel", HOST_DETAIL_LEVEL.encode(detail_level)?.into()),
        ])?;
        self.request_collection("host_detail_retrieve", None, &params)
    }

    // ========================================================================
    // Host groups
    // ========================================================================

    pub fn host_groups(&self) -> Result<Vec<HostGroup>> {
        self.cached_collection("host_group_retrieve_all")
    }

    pub fn host_group(&self, id: i64) -> Result<HostGroup> {
        self.cached_by_id("host_group_retrieve", id)
    }

    pub fn host_group_by_name(&self, name: &str) -> Result<HostGroup> {
        self.cached_by_name("host_group_retrieve_by_name", "name", name)
    }

    // ========================================================================
    // Security profiles
    // ========================================================================

    pub fn security_profiles(&self) -> Result<Vec<SecurityProfile>> {
        self.cached_collection("security_profile_retrieve_all")
    }

    pub fn security_profile(&self, id: i64) -> Result<SecurityProfile> {
        self.cached_by_id("security_profile_retrieve", id)
    }

    pub fn security_profile_by_name(&self, name: &str) -> Result<SecurityProfile> {
        self.cached_by_name("security_profile_retrieve_by_name", "name", name)
    }

    // ========================================================================
    // DPI rules and application types
    // ========================================================================

    pub fn dpi_rules(&self) -> Result<Vec<DpiRule>> {
        self.cached_collection("dpi_rule_retrieve_all")
    }

    pub fn dpi_rule(&self, id: i64) -> Result<DpiRule> {
        self.cached_by_id("dpi_rule_retrieve", id)
    }

    pub fn dpi_rule_by_name(&self, name: &str) -> Result<DpiRule> {
        self.cached_by_name("dpi_rule_retrieve_by_name", "name", name)
    }

    pub fn application_types(&self) -> Result<Vec<ApplicationType>> {
        self.cached_collection("application_type_retrieve_all")
    }

    pub fn application_type(&self, id: i64) -> Result<ApplicationType> {
        self.cached_by_id("application_type_retrieve", id)
    }

    pub fn application_type_by_name(&self, name: &str) -> Result<ApplicationType> {
        self.cached_by_name("application_type_retrieve_by_name", "name", name)
    }

    // ========================================================================
    // Events
    // ========================================================================

    /// System events matching the time, host and event id filters.
    ///
    /// Without an id filter every event id matches.
    pub fn system_events(
        &self,
        time_filter: &TimeFilter,
        host_filter: &HostFilter,
        id_filter: Option<&IdFilter>,
        include_non_host_events: bool,
    ) -> Result<Vec<SystemEvent>> {
        let id_filter = match id_filter {
            Some(filter) => filter.to_wire()?,
            None => WireValue::Nil,
        };
        let params = self.authenticated(vec![
            ("timeFilter", time_filter.to_wire()?),
            ("hostFilter", host_filter.to_wire()?),
            ("eventIdFilter", id_filter),
            ("includeNonHostEvents", include_non_host_events.to_wire()?),
        ])?;
        self.request_collection("system_event_retrieve", Some("system_events"), &params)
    }
}
