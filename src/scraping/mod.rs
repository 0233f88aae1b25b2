//! Screen-scraping shim for data the SOAP contract does not expose.
//!
//! The web console renders some information (which DPI rules are assigned
//! to a host, recommended for it, and so on) only as HTML tables. This module
//! reads those tables through the narrow [`RowSource`] interface; the HTTP
//! implementation, [`ScreenScraper`], is behind the `screenscraping` feature.
//!
//! Everything here depends on incidental page markup and is expected to
//! break with console upgrades.

#[cfg(feature = "screenscraping")]
mod page;
#[cfg(feature = "screenscraping")]
mod screen;

#[cfg(feature = "screenscraping")]
pub use page::{collect_rows, parse_form, parse_page, ScrapedForm, ScrapedPage};
#[cfg(feature = "screenscraping")]
pub use screen::ScreenScraper;

use crate::error::Result;
use indexmap::IndexMap;

/// One scraped table row: snake_case column name to cell text.
pub type Row = IndexMap<String, String>;

/// Screen listing the DPI rules of a host.
pub const DPI_RULE_SCREEN: &str = "PayloadFilter2s.screen";

/// A request for the rows of a console screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowQuery {
    /// Screen path, e.g. `PayloadFilter2s.screen`
    pub screen: String,
    /// Query parameters added to every page request
    pub params: Vec<(String, String)>,
}

impl RowQuery {
    pub fn new(screen: impl Into<String>) -> Self {
        Self {
            screen: screen.into(),
            params: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.params.push((name.into(), value.to_string()));
        self
    }
}

/// Source of scraped console rows.
pub trait RowSource {
    /// Every row of the screen, following pagination.
    fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Row>>;

    /// Load the form at `action`, overlay `settings` and submit it.
    ///
    /// Console screens keep filter state in the session, so this is how a
    /// listing is switched before [`RowSource::fetch_rows`].
    fn post_setting(
        &self,
        action: &str,
        params: &[(&str, String)],
        settings: &[(&str, String)],
    ) -> Result<()>;
}

/// Assignment filter of the DPI rule screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpiRuleAssignment {
    All,
    Assigned,
    Unassigned,
    Recommended,
    Unrecommended,
}

impl DpiRuleAssignment {
    /// Every assignment filter.
    pub const ALL: [DpiRuleAssignment; 5] = [
        Self::All,
        Self::Assigned,
        Self::Unassigned,
        Self::Recommended,
        Self::Unrecommended,
    ];

    /// Filter code the console expects in `arguments`.
    pub fn code(self) -> u8 {
        match self {
            Self::All => 0,
            Self::Assigned => 16,
            Self::Unassigned => 32,
            Self::Recommended => 33,
            Self::Unrecommended => 18,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Assigned => "assigned",
            Self::Unassigned => "unassigned",
            Self::Recommended => "recommended",
            Self::Unrecommended => "unrecommended",
        }
    }

    /// Parse a lowercase filter name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl std::fmt::Display for DpiRuleAssignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Public identifiers of the DPI rules matching `assignment` for a host.
pub fn dpi_rule_identifiers_for_host(
    source: &dyn RowSource,
    host_id: i64,
    assignment: DpiRuleAssignment,
) -> Result<Vec<String>> {
    let code = assignment.code().to_string();
    source.post_setting(
        DPI_RULE_SCREEN,
        &[
            ("hostID", host_id.to_string()),
            ("noSearch", "true".to_string()),
            ("hideStandardHeader", "true".to_string()),
        ],
        &[
            ("command", "CHANGEASSIGNFILTER".to_string()),
            ("arguments", code.clone()),
        ],
    )?;

    let query = RowQuery::new(DPI_RULE_SCREEN)
        .param("hostID", host_id)
        .param("arguments", code);
    let rows = source.fetch_rows(&query)?;
    tracing::debug!(
        "Scraped {} {} DPI rules for host {}",
        rows.len(),
        assignment,
        host_id
    );

    // The name column reads "<identifier> - <title>".
    Ok(rows
        .iter()
        .filter_map(|row| row.get("name"))
        .filter_map(|name| name.split_whitespace().next())
        .map(str::to_string)
        .collect())
}

/// Show the CVE, Secunia, Bugtraq and Microsoft columns on the DPI rule screen.
pub fn enable_vulnerability_columns(source: &dyn RowSource) -> Result<()> {
    let params = [
        ("screenSettingKey", "payloadFilter2s.".to_string()),
        (
            "columnDisplayNames",
            [
                "payloadFilter2s.column.cve",
                "payloadFilter2s.column.secunia",
                "payloadFilter2s.column.bugtraq",
                "payloadFilter2s.column.ms",
            ]
            .join(","),
        ),
        (
            "columnAdminSettingNames",
            ["summaryCVE", "summarySECUNIA", "summaryBUGTRAQ", "summaryMS"].join(","),
        ),
    ];
    let settings = [
        ("summaryCVE", "true".to_string()),
        ("summarySECUNIA", "true".to_string()),
        ("summaryBUGTRAQ", "true".to_string()),
        ("summaryMS", "true".to_string()),
    ];
    source.post_setting("AddRemoveColumns.screen", &params, &settings)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Row source replaying fixed rows and recording posted settings.
    #[derive(Default)]
    pub(crate) struct FixedRows {
        pub rows: Vec<Row>,
        pub posted: RefCell<Vec<(String, Vec<(String, String)>)>>,
        pub queries: RefCell<Vec<RowQuery>>,
    }

    impl FixedRows {
        pub fn named(names: &[&str]) -> Self {
            let rows = names
                .iter()
                .map(|name| {
                    let mut row = Row::new();
                    row.insert("name".to_string(), (*name).to_string());
                    row
                })
                .collect();
            Self {
                rows,
                ..Self::default()
            }
        }
    }

    impl RowSource for FixedRows {
        fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Row>> {
            self.queries.borrow_mut().push(query.clone());
            Ok(self.rows.clone())
        }

        fn post_setting(
            &self,
            action: &str,
            _params: &[(&str, String)],
            settings: &[(&str, String)],
        ) -> Result<()> {
            self.posted.borrow_mut().push((
                action.to_string(),
                settings
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), v.clone()))
                    .collect(),
            ));
            Ok(())
        }
    }

    #[test]
    fn test_assignment_codes() {
        let codes: Vec<u8> = DpiRuleAssignment::ALL.iter().map(|a| a.code()).collect();
        assert_eq!(codes, vec![0, 16, 32, 33, 18]);
        assert_eq!(
            DpiRuleAssignment::from_name("recommended"),
            Some(DpiRuleAssignment::Recommended)
        );
        assert_eq!(DpiRuleAssignment::from_name("Recommended"), None);
    }

    #[test]
    fn test_identifiers_take_first_word_of_name() {
        let source = FixedRows::named(&["1000552 - Generic Cross Site Scripting", "1001126  Oracle"]);
        let ids =
            dpi_rule_identifiers_for_host(&source, 42, DpiRuleAssignment::Assigned).unwrap();
        assert_eq!(ids, vec!["1000552", "1001126"]);

        let posted = source.posted.borrow();
        assert_eq!(posted[0].0, DPI_RULE_SCREEN);
        assert!(posted[0].1.contains(&("arguments".to_string(), "16".to_string())));
        assert!(posted[0]
            .1
            .contains(&("command".to_string(), "CHANGEASSIGNFILTER".to_string())));

        let queries = source.queries.borrow();
        assert_eq!(
            queries[0].params,
            vec![
                ("hostID".to_string(), "42".to_string()),
                ("arguments".to_string(), "16".to_string())
            ]
        );
    }

    #[test]
    fn test_enable_vulnerability_columns() {
        let source = FixedRows::default();
        enable_vulnerability_columns(&source).unwrap();
        let posted = source.posted.borrow();
        assert_eq!(posted[0].0, "AddRemoveColumns.screen");
        assert_eq!(posted[0].1.len(), 4);
    }
}
