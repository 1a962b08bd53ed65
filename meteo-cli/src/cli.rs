use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Select, Text};
use meteo_core::{
    Config, Dashboard, HtmlPage, Page, PanelKind, ViewState, provider::clients_from_config,
};
use tracing::{debug, info};

use crate::session::{self, TabChoice};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "meteo", version, about = "City weather dashboard")]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Choose the default city and tab.
    Configure,

    /// Show one forecast panel for a city.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,

        /// Tab to show: temp, rain, humidity or air.
        #[arg(long)]
        tab: Option<String>,

        /// Also write the page as an HTML document to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Browse interactively: change city and switch tabs.
    Browse {
        /// Rewrite the page as an HTML document to this file after every action.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city, tab, output } => {
                let tab = match tab {
                    Some(id) => PanelKind::try_from(id.as_str())?,
                    None => config.default_tab_kind()?,
                };
                let city = city.unwrap_or_else(|| config.default_city.clone());
                let dashboard = dashboard(&config)?;
                show(&dashboard, &city, tab, output).await
            }
            Command::Browse { output } => {
                let dashboard = dashboard(&config)?;
                session::browse(&dashboard, &config, output.as_deref()).await
            }
        }
    }
}

fn dashboard(config: &Config) -> anyhow::Result<Dashboard> {
    debug!(
        geocoding = %config.endpoints.geocoding,
        forecast = %config.endpoints.forecast,
        air_quality = %config.endpoints.air_quality,
        "Using endpoints"
    );
    let (geocoder, forecasts) = clients_from_config(config)?;
    Ok(Dashboard::new(geocoder, forecasts))
}

async fn show(
    dashboard: &Dashboard,
    city: &str,
    tab: PanelKind,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let page = HtmlPage::new();
    let state = ViewState::with_tab(tab);
    page.activate(tab);

    let state = dashboard.locate(&page, &state, city).await?;
    dashboard
        .refresh(&page, &state)
        .await
        .with_context(|| format!("Failed to load {} for {city}", tab.noun()))?;

    println!("{}", page.to_text());

    if let Some(path) = output {
        session::write_document(&page, &path)?;
        println!("Page written to {}", path.display());
    }

    Ok(())
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    let current = config.default_tab_kind().unwrap_or_default();
    let tabs: Vec<TabChoice> = PanelKind::all().iter().copied().map(TabChoice).collect();
    let TabChoice(tab) = Select::new("Default tab:", tabs)
        .with_starting_cursor(current.index())
        .prompt()?;

    config.default_city = city.trim().to_string();
    config.set_default_tab(tab);
    config.save()?;
    info!(city = %config.default_city, tab = %tab, "Saved configuration");

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}
