//! Parsing of console list screens and settings forms.

use super::Row;
use crate::error::{DeepSecurityError, Result, ScrapeErrorKind};
use crate::mapping::snake_case;
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Selector};

/// One page of a console list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPage {
    /// Total row count announced in the paging bar
    pub total: usize,
    /// Header text to cell index
    pub columns: IndexMap<String, usize>,
    /// Cleaned cell texts of each row
    pub rows: Vec<Vec<String>>,
}

/// The `mainForm` of a settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedForm {
    /// Path the form posts to
    pub action: String,
    /// Named, non-button inputs with their current values
    pub values: IndexMap<String, String>,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| {
        DeepSecurityError::scrape(
            format!("parsing selector {css}"),
            ScrapeErrorKind::InvalidSelector(e.to_string()),
        )
    })
}

/// Text of an element with whitespace runs collapsed.
fn clean_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse the paging bar, column headers and rows of a list screen.
pub fn parse_page(html: &str) -> Result<ScrapedPage> {
    let document = Html::parse_document(html);
    let paging = selector("td.paging_text")?;
    let headers = selector("#mainTable_header_table td:not(.datatable_resizer)")?;
    let rows = selector("#mainTable_rows_table tr")?;
    let cells = selector("td")?;

    // "Items 1 - 25 of 312": the count is the last word.
    let total = document
        .select(&paging)
        .next()
        .map(clean_text)
        .and_then(|text| {
            text.split_whitespace().last().map(|word| {
                word.chars()
                    .filter(char::is_ascii_digit)
                    .collect::<String>()
            })
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0);

    let mut columns = IndexMap::new();
    for (index, header) in document.select(&headers).enumerate() {
        let mut text = clean_text(header);
        // Headers end in a sort marker.
        text.pop();
        let text = text.trim();
        if !text.is_empty() {
            columns.insert(text.to_string(), index);
        }
    }

    let rows = document
        .select(&rows)
        .map(|row| row.select(&cells).map(clean_text).collect::<Vec<_>>())
        .filter(|cells| !cells.is_empty())
        .collect();

    Ok(ScrapedPage {
        total,
        columns,
        rows,
    })
}

impl ScrapedPage {
    /// Rows keyed by snake_case column name.
    pub fn keyed_rows(&self, columns: &IndexMap<String, usize>) -> Vec<Row> {
        self.rows
            .iter()
            .map(|cells| {
                columns
                    .iter()
                    .filter_map(|(name, index)| {
                        cells
                            .get(*index)
                            .map(|cell| (snake_case(name), cell.clone()))
                    })
                    .collect()
            })
            .collect()
    }
}

/// Parse the `mainForm` of a settings screen.
pub fn parse_form(html: &str) -> Result<ScrapedForm> {
    let document = Html::parse_document(html);
    let form = selector("form#mainForm")?;
    let inputs = selector("input")?;

    let action = document
        .select(&form)
        .next()
        .and_then(|form| form.value().attr("action"))
        .ok_or_else(|| {
            DeepSecurityError::scrape(
                "parsing settings screen",
                ScrapeErrorKind::MissingForm("mainForm".to_string()),
            )
        })?;

    let mut values = IndexMap::new();
    for input in document.select(&inputs) {
        let element = input.value();
        let kind = element.attr("type").unwrap_or("text");
        if kind.eq_ignore_ascii_case("button") || kind.eq_ignore_ascii_case("submit") {
            continue;
        }
        let Some(name) = element.attr("name").filter(|n| !n.trim().is_empty()) else {
            continue;
        };
        values.insert(
            name.to_string(),
            element.attr("value").unwrap_or_default().to_string(),
        );
    }

    Ok(ScrapedForm {
        action: action.to_string(),
        values,
    })
}

/// Page through a list screen until the announced total is reached.
///
/// `fetch` receives the paging offset and returns the page HTML. Paging also
/// stops at the first page without rows.
pub fn collect_rows(mut fetch: impl FnMut(usize) -> Result<String>) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    let mut total = None;
    let mut columns = IndexMap::new();

    loop {
        let page = parse_page(&fetch(rows.len())?)?;
        let total = *total.get_or_insert(page.total);
        if columns.is_empty() {
            columns = page.columns.clone();
        }

        let keyed = page.keyed_rows(&columns);
        if keyed.is_empty() {
            break;
        }
        rows.extend(keyed);
        tracing::debug!("Scraped {} of {} rows", rows.len(), total);
        if rows.len() >= total {
            break;
        }
    }
    Ok(rows)
}
