use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Separator between the locality, region and country parts of a place name.
pub const PLACE_NAME_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A successfully geocoded place. Replaced wholesale on every new lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub coordinate: Coordinate,
    pub name: String,
}

/// Join the present, non-empty parts of a place name in the given order.
pub fn place_name<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(PLACE_NAME_SEPARATOR)
}

/// Raw forecast payload.
///
/// Lookups never fail: a missing section, a missing metric, an index past the
/// end of an array, `null` and non-numeric leaves all read as `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSample(Value);

impl ForecastSample {
    pub fn new(payload: Value) -> Self {
        Self(payload)
    }

    pub fn payload(&self) -> &Value {
        &self.0
    }

    /// Field of the `current_weather` object.
    pub fn current(&self, field: &str) -> Option<f64> {
        self.0.get("current_weather")?.get(field)?.as_f64()
    }

    /// Entry `index` (hour offset) of an hourly metric.
    pub fn hourly(&self, metric: &str, index: usize) -> Option<f64> {
        self.series("hourly", metric, index)
    }

    /// Entry `index` (day offset) of a daily metric.
    pub fn daily(&self, metric: &str, index: usize) -> Option<f64> {
        self.series("daily", metric, index)
    }

    fn series(&self, section: &str, metric: &str, index: usize) -> Option<f64> {
        self.0.get(section)?.get(metric)?.get(index)?.as_f64()
    }
}

impl From<Value> for ForecastSample {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}
