use crate::USER_AGENT;
use async_trait::async_trait;
use logoali::domain::GeocodeCandidate;
use logoali::ports::GeocodeFetcher;
use serde::Deserialize;
use shared::{Error, Result};
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const RESULT_LIMIT: &str = "5";

/// Client for the Nominatim geocoding service.
pub struct NominatimClient {
    client: reqwest::Client,
    base_url: String,
}

/// Raw Nominatim search result. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    place_id: u64,
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimClient {
    /// `base_url` is the search endpoint, e.g.
    /// `https://nominatim.openstreetmap.org/search`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn decode(places: Vec<NominatimPlace>, query: &str) -> Result<Vec<GeocodeCandidate>> {
        if places.is_empty() {
            return Err(Error::NotFound(format!(
                "no coordinates found for {:?}",
                query
            )));
        }

        places
            .into_iter()
            .map(|place| {
                let lat = place.lat.parse::<f64>().map_err(|_| {
                    Error::UpstreamUnavailable(format!(
                        "geocoder returned a non-numeric latitude: {:?}",
                        place.lat
                    ))
                })?;
                let lon = place.lon.parse::<f64>().map_err(|_| {
                    Error::UpstreamUnavailable(format!(
                        "geocoder returned a non-numeric longitude: {:?}",
                        place.lon
                    ))
                })?;
                Ok(GeocodeCandidate {
                    place_id: place.place_id,
                    lat,
                    lon,
                    display_name: place.display_name,
                })
            })
            .collect()
    }
}

#[async_trait]
impl GeocodeFetcher for NominatimClient {
    async fn fetch(&self, query: &str) -> Result<Vec<GeocodeCandidate>> {
        debug!(%query, "fetching coordinates from Nominatim");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("limit", RESULT_LIMIT),
                ("addressdetails", "1"),
                ("accept-language", "pt-BR"),
            ])
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("Nominatim request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::UpstreamUnavailable(format!(
                "Nominatim returned HTTP {}",
                status
            )));
        }

        let places: Vec<NominatimPlace> = response.json().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("Nominatim response was not valid JSON: {}", e))
        })?;

        Self::decode(places, query)
    }
}
