//! Formatting of forecast payloads into cards and HTML fragments.
//!
//! Every function here is total: whatever shape the payload has, a card comes
//! out, with [`PLACEHOLDER`] standing in for anything that is missing.

use std::fmt;

use crate::{model::ForecastSample, provider::PanelKind};

/// Shown instead of a value that the payload does not carry.
pub const PLACEHOLDER: &str = "—";

/// Hour offsets sampled from hourly series.
pub const HOURLY_CHECKPOINTS: [usize; 4] = [0, 6, 12, 18];

const CELSIUS: &str = "°C";
const MILLIMETRES: &str = "mm";
const PERCENT: &str = "%";

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub title: String,
    /// Large single value shown under the heading.
    pub headline: Option<String>,
    pub rows: Vec<(String, String)>,
}

impl Card {
    pub fn new(title: impl Into<String>, rows: Vec<(String, String)>) -> Self {
        Self {
            title: title.into(),
            headline: None,
            rows,
        }
    }

    pub fn headline(title: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            headline: Some(value.into()),
            rows: Vec::new(),
        }
    }

    pub fn to_html(&self) -> String {
        match &self.headline {
            Some(value) => format!(
                r#"<div class="card"><h3>{}</h3><div class="big">{}</div></div>"#,
                escape_html(&self.title),
                escape_html(value),
            ),
            None => render_card(&self.title, &self.rows),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title)?;
        if let Some(value) = &self.headline {
            writeln!(f, "  {value}")?;
        }

        let width = self.rows.iter().map(|(label, _)| label.chars().count()).max().unwrap_or(0);
        for (label, value) in &self.rows {
            let pad = width - label.chars().count();
            writeln!(f, "  {label}{:pad$}  {value}", "")?;
        }
        Ok(())
    }
}

/// Heading plus one row per `(label, value)` pair.
pub fn render_card(title: &str, rows: &[(String, String)]) -> String {
    let mut html = format!(r#"<div class="card"><h3>{}</h3>"#, escape_html(title));
    for (label, value) in rows {
        html.push_str(&format!(
            r#"<div class="row"><span>{}</span><span>{}</span></div>"#,
            escape_html(label),
            escape_html(value),
        ));
    }
    html.push_str("</div>");
    html
}

pub fn render_cards(cards: &[Card]) -> String {
    cards.iter().map(Card::to_html).collect()
}

/// `value` followed by its unit, or the placeholder when absent.
pub fn format_value(value: Option<f64>, unit: Option<&str>) -> String {
    match (value, unit) {
        (Some(v), Some(unit)) => format!("{v} {unit}"),
        (Some(v), None) => v.to_string(),
        (None, _) => PLACEHOLDER.to_string(),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn cards_for(kind: PanelKind, sample: &ForecastSample) -> Vec<Card> {
    match kind {
        PanelKind::Temperature => temperature_cards(sample),
        PanelKind::Rain => rain_cards(sample),
        PanelKind::Humidity => humidity_cards(sample),
        PanelKind::Air => air_cards(sample),
    }
}

pub fn temperature_cards(sample: &ForecastSample) -> Vec<Card> {
    vec![
        Card::headline(
            "Now",
            format_value(sample.current("temperature"), Some(CELSIUS)),
        ),
        Card::new(
            "Daily",
            vec![
                row("Max (today)", sample.daily("temperature_2m_max", 0), Some(CELSIUS)),
                row("Min (today)", sample.daily("temperature_2m_min", 0), Some(CELSIUS)),
            ],
        ),
        Card::new(
            "Hourly snapshots",
            checkpoint_rows(sample, "temperature_2m", CELSIUS),
        ),
    ]
}

pub fn rain_cards(sample: &ForecastSample) -> Vec<Card> {
    vec![
        Card::new(
            "Hourly",
            vec![
                row("Precipitation", sample.hourly("precipitation", 0), Some(MILLIMETRES)),
                row("Probability", sample.hourly("precipitation_probability", 0), Some(PERCENT)),
            ],
        ),
        Card::new(
            "Daily",
            vec![row("Total (today)", sample.daily("precipitation_sum", 0), Some(MILLIMETRES))],
        ),
    ]
}

pub fn humidity_cards(sample: &ForecastSample) -> Vec<Card> {
    vec![Card::new(
        "Samples",
        checkpoint_rows(sample, "relative_humidity_2m", PERCENT),
    )]
}

/// Pollutant concentrations are shown without units.
pub fn air_cards(sample: &ForecastSample) -> Vec<Card> {
    vec![
        Card::new(
            "Particulates",
            vec![
                row("PM2.5", sample.hourly("pm2_5", 0), None),
                row("PM10", sample.hourly("pm10", 0), None),
            ],
        ),
        Card::new(
            "Gases",
            vec![
                row("Ozone (O₃)", sample.hourly("ozone", 0), None),
                row("CO", sample.hourly("carbon_monoxide", 0), None),
            ],
        ),
    ]
}

fn row(label: &str, value: Option<f64>, unit: Option<&str>) -> (String, String) {
    (label.to_string(), format_value(value, unit))
}

/// One row per checkpoint hour that has a value; absent hours are skipped.
fn checkpoint_rows(sample: &ForecastSample, metric: &str, unit: &str) -> Vec<(String, String)> {
    HOURLY_CHECKPOINTS
        .iter()
        .filter_map(|&hour| {
            sample
                .hourly(metric, hour)
                .map(|v| (format!("Hour +{hour}"), format_value(Some(v), Some(unit))))
        })
        .collect()
}
