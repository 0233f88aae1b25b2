//! DPI rule listings only the web console exposes.

use super::Manager;
use crate::error::Result;
use crate::scraping::{dpi_rule_identifiers_for_host, DpiRuleAssignment, RowSource};
use crate::transport::DpiRule;
use std::collections::HashMap;

impl Manager {
    /// Scraper for the console of this manager, sharing the SOAP session.
    #[cfg(feature = "screenscraping")]
    pub fn screen_scraper(&self) -> Result<crate::scraping::ScreenScraper> {
        let endpoint = self.endpoint.as_ref().ok_or_else(|| {
            crate::error::DeepSecurityError::config(
                "screen scraping needs an HTTPS connection to the manager",
            )
        })?;
        crate::scraping::ScreenScraper::new(endpoint, self.session_id()?)
    }

    /// DPI rules of a host in the given assignment state.
    #[cfg(feature = "screenscraping")]
    pub fn dpi_rules_for_host(
        &self,
        host_id: i64,
        assignment: DpiRuleAssignment,
    ) -> Result<Vec<DpiRule>> {
        let scraper = self.screen_scraper()?;
        self.dpi_rules_for_host_from(&scraper, host_id, assignment)
    }

    /// Resolve the rule identifiers listed by `source` against [`Manager::dpi_rules`].
    ///
    /// Identifiers without a matching rule are skipped; listing order is kept.
    pub fn dpi_rules_for_host_from(
        &self,
        source: &dyn RowSource,
        host_id: i64,
        assignment: DpiRuleAssignment,
    ) -> Result<Vec<DpiRule>> {
        let identifiers = dpi_rule_identifiers_for_host(source, host_id, assignment)?;
        let rules = self.dpi_rules()?;
        let by_identifier: HashMap<&str, &DpiRule> = rules
            .iter()
            .filter_map(|rule| rule.identifier().map(|id| (id, rule)))
            .collect();

        let mut resolved = Vec::with_capacity(identifiers.len());
        for identifier in &identifiers {
            match by_identifier.get(identifier.as_str()) {
                Some(rule) => resolved.push((*rule).clone()),
                None => tracing::warn!("DPI rule {} listed for host {} is unknown", identifier, host_id),
            }
        }
        Ok(resolved)
    }
}
