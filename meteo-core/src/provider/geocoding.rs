use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::model::{Coordinate, Place, place_name};

use super::Geocoder;

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";

#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The search returned zero matches.
    #[error("City not found")]
    NotFound,

    #[error("Geocoding failed (HTTP {status})")]
    Transport { status: u16 },

    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Could not read geocoding response: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoder {
    http: Client,
    url: String,
}

impl OpenMeteoGeocoder {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), url)
    }

    pub fn with_client(http: Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }
}

impl Default for OpenMeteoGeocoder {
    fn default() -> Self {
        Self::new(DEFAULT_GEOCODING_URL)
    }
}

#[derive(Debug, Deserialize)]
struct GeoResponse {
    results: Option<Vec<GeoResult>>,
}

#[derive(Debug, Deserialize)]
struct GeoResult {
    name: Option<String>,
    admin1: Option<String>,
    country: Option<String>,
    latitude: f64,
    longitude: f64,
}

impl From<GeoResult> for Place {
    fn from(r: GeoResult) -> Self {
        let name = place_name([r.name.as_deref(), r.admin1.as_deref(), r.country.as_deref()]);

        Place {
            coordinate: Coordinate {
                latitude: r.latitude,
                longitude: r.longitude,
            },
            name,
        }
    }
}

#[async_trait]
impl Geocoder for OpenMeteoGeocoder {
    #[instrument(skip(self))]
    async fn resolve(&self, query: &str) -> Result<Place, GeocodeError> {
        debug!(url = %self.url, "Searching for city");

        let res = self
            .http
            .get(&self.url)
            .query(&[("name", query), ("count", "1")])
            .send()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(GeocodeError::Transport {
                status: status.as_u16(),
            });
        }

        let body = res
            .text()
            .await
            .map_err(|e| GeocodeError::Request(e.to_string()))?;

        let parsed: GeoResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Parse(e.to_string()))?;

        let place: Place = parsed
            .results
            .and_then(|results| results.into_iter().next())
            .ok_or(GeocodeError::NotFound)?
            .into();

        info!(
            place = %place.name,
            lat = place.coordinate.latitude,
            lon = place.coordinate.longitude,
            "Resolved city"
        );
        Ok(place)
    }
}
