use crate::{
    Config, Coordinate, ForecastSample, Place,
    provider::{forecast::OpenMeteoForecast, geocoding::OpenMeteoGeocoder},
};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::{fmt::Debug, time::Duration};

pub mod forecast;
pub mod geocoding;

pub use forecast::ForecastError;
pub use geocoding::GeocodeError;

/// One of the four mutually exclusive forecast panels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PanelKind {
    #[default]
    Temperature,
    Rain,
    Humidity,
    Air,
}

impl PanelKind {
    /// Stable tab id.
    pub fn as_str(&self) -> &'static str {
        match self {
            PanelKind::Temperature => "temp",
            PanelKind::Rain => "rain",
            PanelKind::Humidity => "humidity",
            PanelKind::Air => "air",
        }
    }

    pub const fn all() -> &'static [PanelKind] {
        &[
            PanelKind::Temperature,
            PanelKind::Rain,
            PanelKind::Humidity,
            PanelKind::Air,
        ]
    }

    /// Position in [`PanelKind::all`].
    pub fn index(&self) -> usize {
        match self {
            PanelKind::Temperature => 0,
            PanelKind::Rain => 1,
            PanelKind::Humidity => 2,
            PanelKind::Air => 3,
        }
    }

    /// Tab caption.
    pub fn title(&self) -> &'static str {
        match self {
            PanelKind::Temperature => "Temperature",
            PanelKind::Rain => "Rain",
            PanelKind::Humidity => "Humidity",
            PanelKind::Air => "Air quality",
        }
    }

    /// Lower-case noun used in status messages ("Loading rain…").
    pub fn noun(&self) -> &'static str {
        match self {
            PanelKind::Temperature => "temperature",
            PanelKind::Rain => "rain",
            PanelKind::Humidity => "humidity",
            PanelKind::Air => "air quality",
        }
    }

    /// Element id of the panel region in the rendered document.
    pub fn panel_id(&self) -> &'static str {
        match self {
            PanelKind::Air => "air-quality",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for PanelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for PanelKind {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "temp" => Ok(PanelKind::Temperature),
            "rain" => Ok(PanelKind::Rain),
            "humidity" => Ok(PanelKind::Humidity),
            "air" => Ok(PanelKind::Air),
            _ => Err(anyhow::anyhow!(
                "Unknown tab '{value}'. Supported tabs: temp, rain, humidity, air."
            )),
        }
    }
}

/// Resolves free-text place names to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    async fn resolve(&self, query: &str) -> Result<Place, GeocodeError>;
}

/// Fetches the fixed metric set of one panel for a coordinate.
#[async_trait]
pub trait ForecastClient: Send + Sync + Debug {
    async fn fetch(
        &self,
        kind: PanelKind,
        coordinate: Coordinate,
    ) -> Result<ForecastSample, ForecastError>;
}

/// Shared HTTP client honouring the configured timeout.
pub fn http_client(config: &Config) -> anyhow::Result<Client> {
    let mut builder = Client::builder();
    if let Some(secs) = config.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder.build().context("Failed to build HTTP client")
}

/// Construct the Open-Meteo geocoder and forecast client from config.
pub fn clients_from_config(
    config: &Config,
) -> anyhow::Result<(Box<dyn Geocoder>, Box<dyn ForecastClient>)> {
    let http = http_client(config)?;

    let geocoder: Box<dyn Geocoder> = Box::new(OpenMeteoGeocoder::with_client(
        http.clone(),
        config.endpoints.geocoding.clone(),
    ));
    let forecasts: Box<dyn ForecastClient> = Box::new(OpenMeteoForecast::with_client(
        http,
        config.endpoints.forecast.clone(),
        config.endpoints.air_quality.clone(),
    ));

    Ok((geocoder, forecasts))
}
