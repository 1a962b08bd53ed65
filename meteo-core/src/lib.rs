//! Core library for the `meteo` weather dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - Open-Meteo geocoding and forecast clients behind small traits
//! - Rendering of forecast payloads into cards and HTML
//! - The page surface and the controllers that drive it
//!
//! It is used by `meteo-cli`, but can also be reused by other binaries or services.

pub mod app;
pub mod config;
pub mod model;
pub mod provider;
pub mod render;
pub mod view;

pub use app::{Dashboard, LoadOutcome, SubmitError, ViewState};
pub use config::{Config, Endpoints};
pub use model::{Coordinate, ForecastSample, Place};
pub use provider::{ForecastClient, ForecastError, GeocodeError, Geocoder, PanelKind};
pub use render::Card;
pub use view::{HtmlPage, Page};
