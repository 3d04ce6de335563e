use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::common::Coordinates;
use crate::config::GeocoderConfig;
use crate::kernel::BaseGeocoder;

/// Nominatim API response for geocoding
#[derive(Debug, Deserialize)]
struct NominatimResponse {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Build the provider query from whatever location parts are present.
///
/// Parts are trimmed and joined with `", "` in city, state, country order.
/// Returns `None` when every part is absent or blank.
///
/// # Example
/// ```
/// use credimap_core::domains::geocoding::build_location_query;
///
/// let q = build_location_query(Some("Toronto"), None, Some("Canada"));
/// assert_eq!(q.as_deref(), Some("Toronto, Canada"));
/// assert_eq!(build_location_query(None, Some(" "), None), None);
/// ```
pub fn build_location_query(
    city: Option<&str>,
    state: Option<&str>,
    country: Option<&str>,
) -> Option<String> {
    let parts: Vec<&str> = [city, state, country]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

/// Geocoder backed by the Nominatim (OpenStreetMap) search API
pub struct NominatimGeocoder {
    client: Client,
    search_url: String,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .context("Failed to build geocoding HTTP client")?;

        Ok(Self {
            client,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
        })
    }

    /// One provider round trip. Returns `Ok(None)` when the provider answers
    /// without a match.
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Option<Coordinates>> {
        let candidates: Vec<NominatimResponse> = self
            .client
            .get(&self.search_url)
            .query(&[
                ("format", "json"),
                ("q", query),
                ("limit", "1"),
                ("addressdetails", "1"),
            ])
            .send()
            .await
            .context("Geocoding API request failed")?
            .error_for_status()
            .context("Geocoding API returned an error status")?
            .json()
            .await
            .context("Failed to parse geocoding response")?;

        match candidates.first() {
            Some(candidate) => {
                debug!(display_name = ?candidate.display_name, "Provider match");
                parse_candidate(candidate).map(Some)
            }
            None => Ok(None),
        }
    }
}

fn parse_candidate(candidate: &NominatimResponse) -> Result<Coordinates> {
    let lon: f64 = candidate
        .lon
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid longitude in response: {}", e))?;
    let lat: f64 = candidate
        .lat
        .trim()
        .parse()
        .map_err(|e| anyhow!("Invalid latitude in response: {}", e))?;

    Coordinates::new(lon, lat).context("Provider returned coordinates out of range")
}

#[async_trait]
impl BaseGeocoder for NominatimGeocoder {
    async fn geocode(
        &self,
        city: Option<&str>,
        state: Option<&str>,
        country: Option<&str>,
    ) -> Option<Coordinates> {
        // Nothing to look up: don't spend a provider request
        let query = build_location_query(city, state, country)?;

        match self.search(&query).await {
            Ok(Some(coordinates)) => {
                info!(
                    query = %query,
                    lon = coordinates.longitude(),
                    lat = coordinates.latitude(),
                    "Geocoded location"
                );
                Some(coordinates)
            }
            Ok(None) => {
                warn!(query = %query, "Location not found by geocoding API");
                None
            }
            Err(e) => {
                error!(query = %query, error = ?e, "Geocoding failed");
                None
            }
        }
    }
}
