use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::{Coordinate, ForecastSample};

use super::{ForecastClient, PanelKind};

pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("forecast request failed (HTTP {status})")]
    Transport { status: u16 },

    #[error("forecast request failed: {0}")]
    Request(String),

    #[error("could not read forecast response: {0}")]
    Parse(String),
}

/// Metric parameters requested for each panel, on top of the coordinate and
/// `timezone=auto`.
pub fn metric_params(kind: PanelKind) -> &'static [(&'static str, &'static str)] {
    match kind {
        PanelKind::Temperature => &[
            ("current_weather", "true"),
            ("hourly", "temperature_2m"),
            ("daily", "temperature_2m_max,temperature_2m_min"),
        ],
        PanelKind::Rain => &[
            ("hourly", "precipitation,precipitation_probability"),
            ("daily", "precipitation_sum"),
        ],
        PanelKind::Humidity => &[("hourly", "relative_humidity_2m")],
        PanelKind::Air => &[("hourly", "pm10,pm2_5,ozone,carbon_monoxide")],
    }
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    forecast_url: String,
    air_quality_url: String,
}

impl OpenMeteoForecast {
    pub fn new(forecast_url: impl Into<String>, air_quality_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), forecast_url, air_quality_url)
    }

    pub fn with_client(
        http: Client,
        forecast_url: impl Into<String>,
        air_quality_url: impl Into<String>,
    ) -> Self {
        Self {
            http,
            forecast_url: forecast_url.into(),
            air_quality_url: air_quality_url.into(),
        }
    }

    fn endpoint(&self, kind: PanelKind) -> &str {
        match kind {
            PanelKind::Air => &self.air_quality_url,
            _ => &self.forecast_url,
        }
    }
}

impl Default for OpenMeteoForecast {
    fn default() -> Self {
        Self::new(DEFAULT_FORECAST_URL, DEFAULT_AIR_QUALITY_URL)
    }
}

#[async_trait]
impl ForecastClient for OpenMeteoForecast {
    #[instrument(skip(self), fields(panel = %kind))]
    async fn fetch(
        &self,
        kind: PanelKind,
        coordinate: Coordinate,
    ) -> Result<ForecastSample, ForecastError> {
        let url = self.endpoint(kind);
        debug!(url = %url, "Fetching forecast");

        let res = self
            .http
            .get(url)
            .query(&[
                ("latitude", coordinate.latitude.to_string()),
                ("longitude", coordinate.longitude.to_string()),
            ])
            .query(metric_params(kind))
            .query(&[("timezone", "auto")])
            .send()
            .await
            .map_err(|e| ForecastError::Request(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            return Err(ForecastError::Transport {
                status: status.as_u16(),
            });
        }

        let body = res
            .text()
            .await
            .map_err(|e| ForecastError::Request(e.to_string()))?;

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| ForecastError::Parse(e.to_string()))?;

        Ok(ForecastSample::new(payload))
    }
}
