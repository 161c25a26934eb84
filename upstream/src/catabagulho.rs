use async_trait::async_trait;
use logoali::domain::ScheduleEntry;
use logoali::ports::ScheduleFetcher;
use scraper::{ElementRef, Html, Selector};
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The LOCAT site serves a server-rendered page and rejects obvious bots,
/// so this client identifies as a plain desktop browser.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const MISSING_DETAIL: &str = "Não informado";

/// Client for the LOCAT São Paulo Cata-Bagulho results page.
///
/// This is the most fragile upstream in the system: the data only exists
/// as Bootstrap-era markup, and any layout change must surface as
/// [`Error::ParseError`] here rather than leak a malformed result into
/// the cache.
pub struct LocatClient {
    client: reqwest::Client,
    base_url: String,
    selectors: Selectors,
}

/// Pre-parsed CSS selectors for the results markup.
struct Selectors {
    panel: Selector,
    logradouro: Selector,
    street: Selector,
    detail_row: Selector,
    detail_col: Selector,
}

impl Selectors {
    fn new() -> Result<Self> {
        let parse = |css: &str| {
            Selector::parse(css)
                .map_err(|e| Error::Internal(format!("Invalid selector {:?}: {}", css, e)))
        };
        Ok(Self {
            panel: parse(".panel.panel-default")?,
            logradouro: parse(".logradouro")?,
            street: parse(".logradouro strong")?,
            detail_row: parse(".detalhes .row")?,
            detail_col: parse("div")?,
        })
    }
}

impl LocatClient {
    /// `base_url` is the results endpoint, e.g.
    /// `https://locatsp.saclimpeza2.com.br/mapa/resultados/`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            selectors: Selectors::new()?,
        })
    }

    /// Parse the results page into schedule entries.
    ///
    /// Zero result panels is a legitimate "no data for these coordinates"
    /// answer and yields an empty vec. A panel that exists but is missing
    /// its street name means the markup changed shape, which is an error:
    /// skipping it would quietly produce an empty or partial result.
    fn parse_results(&self, html: &str) -> Result<Vec<ScheduleEntry>> {
        let document = Html::parse_document(html);
        let mut entries = Vec::new();

        for panel in document.select(&self.selectors.panel) {
            let logradouro = panel.select(&self.selectors.logradouro).next().ok_or_else(|| {
                Error::ParseError(
                    "result block without a street section, page layout may have changed"
                        .to_string(),
                )
            })?;

            let street = panel
                .select(&self.selectors.street)
                .next()
                .map(|el| collect_text(el))
                .filter(|s| !s.is_empty())
                .ok_or_else(|| {
                    Error::ParseError(
                        "result block without a street name, page layout may have changed"
                            .to_string(),
                    )
                })?;

            let start_stretch = stretch_line(logradouro, "Início:");
            let end_stretch = stretch_line(logradouro, "Fim:");

            let dates = self
                .detail(panel, "Dias:")
                .split(';')
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from)
                .collect();

            entries.push(ScheduleEntry {
                street,
                start_stretch,
                end_stretch,
                dates,
                frequency: self.detail(panel, "Freq.:"),
                shift: self.detail(panel, "Turno:"),
                schedule: self.detail(panel, "Horário:"),
            });
        }

        Ok(entries)
    }

    /// Look up one labeled row (`Dias:`, `Freq.:`, ...) in a panel's
    /// details table.
    fn detail(&self, panel: ElementRef<'_>, label: &str) -> String {
        for row in panel.select(&self.selectors.detail_row) {
            let mut cols = row.select(&self.selectors.detail_col);
            let row_label = cols.next().map(collect_text);
            if row_label.as_deref() == Some(label) {
                if let Some(value) = cols.next().map(collect_text) {
                    if !value.is_empty() {
                        return value;
                    }
                }
            }
        }
        MISSING_DETAIL.to_string()
    }
}

fn collect_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The street section lists the covered stretch as `Início: ...<br>Fim: ...`
/// lines next to the street name.
fn stretch_line(logradouro: ElementRef<'_>, prefix: &str) -> String {
    logradouro
        .text()
        .map(str::trim)
        .find_map(|line| line.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| MISSING_DETAIL.to_string())
}

#[async_trait]
impl ScheduleFetcher for LocatClient {
    async fn fetch(&self, lat: f64, lng: f64) -> Result<Vec<ScheduleEntry>> {
        debug!(lat, lng, "fetching schedules from LOCAT");

        let lat = lat.to_string();
        let lng = lng.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("servico", "grandes-objetos"),
                ("lat", lat.as_str()),
                ("lng", lng.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("LOCAT request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "LOCAT returned HTTP {}",
                status
            )));
        }

        let html = response.text().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("Failed to read LOCAT response body: {}", e))
        })?;

        self.parse_results(&html)
    }
}
