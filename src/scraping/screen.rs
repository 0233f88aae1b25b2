//! HTTP access to the web console with the SOAP session id.

use super::page::{collect_rows, parse_form};
use super::{Row, RowQuery, RowSource};
use crate::error::{DeepSecurityError, Result, ScrapeErrorKind};
use crate::soap::{http_client, SoapClientConfig};
use reqwest::blocking::Client;
use reqwest::Url;

/// Console pages fetched with the session cookie of an authenticated manager.
pub struct ScreenScraper {
    client: Client,
    base_url: String,
    session_id: String,
}

fn http_error(context: String, message: impl ToString) -> DeepSecurityError {
    DeepSecurityError::scrape(context, ScrapeErrorKind::Http(message.to_string()))
}

impl ScreenScraper {
    /// Create a scraper for the manager at `config` using an existing session.
    pub fn new(config: &SoapClientConfig, session_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: http_client(config.timeout, config.accept_invalid_certs)?,
            base_url: config.base_url(),
            session_id: session_id.into(),
        })
    }

    fn url<'a>(&self, path: &str, params: impl IntoIterator<Item = (&'a str, &'a str)>) -> Result<Url> {
        let raw = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let mut url = Url::parse(&raw).map_err(|e| http_error(format!("building URL {raw}"), e))?;
        let mut params = params.into_iter().peekable();
        if params.peek().is_some() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url)
    }

    fn read(url: &Url, sent: reqwest::Result<reqwest::blocking::Response>) -> Result<String> {
        let response = sent.map_err(|e| http_error(format!("requesting {}", url.path()), e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(http_error(
                format!("requesting {}", url.path()),
                format!("HTTP status {}", status.as_u16()),
            ));
        }
        response
            .text()
            .map_err(|e| http_error(format!("reading {}", url.path()), e))
    }

    fn get(&self, url: Url) -> Result<String> {
        tracing::debug!("GET {}", url.path());
        let sent = self
            .client
            .get(url.clone())
            .header("Cookie", format!("sID={}", self.session_id))
            .send();
        Self::read(&url, sent)
    }

    fn post_form(&self, url: Url, fields: &[(String, String)]) -> Result<String> {
        tracing::debug!("POST {} ({} fields)", url.path(), fields.len());
        // Url does the form encoding.
        let mut encoder = Url::parse("http://form.invalid/")
            .map_err(|e| http_error("encoding form".to_string(), e))?;
        encoder
            .query_pairs_mut()
            .extend_pairs(fields.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let body = encoder.query().unwrap_or_default().to_string();

        let sent = self
            .client
            .post(url.clone())
            .header("Cookie", format!("sID={}", self.session_id))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(body)
            .send();
        Self::read(&url, sent)
    }
}

impl RowSource for ScreenScraper {
    fn fetch_rows(&self, query: &RowQuery) -> Result<Vec<Row>> {
        collect_rows(|offset| {
            let offset = offset.to_string();
            let params = std::iter::once(("paging_offset", offset.as_str())).chain(
                query
                    .params
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str())),
            );
            self.get(self.url(&query.screen, params)?)
        })
    }

    fn post_setting(
        &self,
        action: &str,
        params: &[(&str, String)],
        settings: &[(&str, String)],
    ) -> Result<()> {
        let url = self.url(action, params.iter().map(|(k, v)| (*k, v.as_str())))?;
        let mut form = parse_form(&self.get(url)?)?;
        for (name, value) in settings {
            form.values.insert((*name).to_string(), value.clone());
        }

        let fields: Vec<(String, String)> = form.values.into_iter().collect();
        let target = self.url(&form.action, std::iter::empty())?;
        self.post_form(target, &fields)?;
        Ok(())
    }
}

impl std::fmt::Debug for ScreenScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScreenScraper")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> ScreenScraper {
        let config = SoapClientConfig {
            host: "dsm.example.com".to_string(),
            ..SoapClientConfig::default()
        };
        ScreenScraper::new(&config, "SID").unwrap()
    }

    #[test]
    fn test_url_encodes_params() {
        let url = scraper()
            .url("PayloadFilter2s.screen", [("hostID", "42"), ("q", "a b&c")])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dsm.example.com:4119/PayloadFilter2s.screen?hostID=42&q=a+b%26c"
        );
    }

    #[test]
    fn test_form_action_with_leading_slash() {
        let url = scraper().url("/Settings.screen", std::iter::empty()).unwrap();
        assert_eq!(url.as_str(), "https://dsm.example.com:4119/Settings.screen");
    }

    #[test]
    fn test_debug_hides_session() {
        let debug = format!("{:?}", scraper());
        assert!(!debug.contains("SID"));
    }
}
