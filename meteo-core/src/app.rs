//! Input and tab controllers.
//!
//! State is explicit: every action takes the current [`ViewState`] and, where
//! it can change it, returns the next one. The only shared mutable data are the
//! per-panel request generations, which let overlapping loads drop responses
//! that were superseded while in flight.

use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    model::Place,
    provider::{ForecastClient, ForecastError, GeocodeError, Geocoder, PanelKind},
    render::cards_for,
    view::Page,
};

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter a city name.";
pub const FINDING_CITY_MESSAGE: &str = "Finding city…";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    /// `None` until a city has been resolved; no forecast is fetched before that.
    pub place: Option<Place>,
    pub active: PanelKind,
}

impl ViewState {
    pub fn with_tab(active: PanelKind) -> Self {
        Self {
            place: None,
            active,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("Please enter a city name.")]
    EmptyInput,

    #[error(transparent)]
    Geocode(#[from] GeocodeError),
}

/// What happened to a panel load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Rendered,
    /// No place resolved yet; nothing was fetched.
    Skipped,
    /// A newer load for the same panel started while this one was in flight.
    Stale,
}

#[derive(Debug, Default)]
struct PanelGenerations([AtomicU64; 4]);

impl PanelGenerations {
    fn begin(&self, kind: PanelKind) -> u64 {
        self.0[kind.index()].fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, kind: PanelKind, generation: u64) -> bool {
        self.0[kind.index()].load(Ordering::SeqCst) == generation
    }
}

#[derive(Debug)]
pub struct Dashboard {
    geocoder: Box<dyn Geocoder>,
    forecasts: Box<dyn ForecastClient>,
    generations: PanelGenerations,
}

impl Dashboard {
    pub fn new(geocoder: Box<dyn Geocoder>, forecasts: Box<dyn ForecastClient>) -> Self {
        Self {
            geocoder,
            forecasts,
            generations: PanelGenerations::default(),
        }
    }

    /// Resolve the default city and render the active panel. Failures are
    /// dropped and leave an empty status line.
    pub async fn bootstrap(&self, page: &dyn Page, state: &ViewState, city: &str) -> ViewState {
        page.activate(state.active);

        match self.locate(page, state, city).await {
            Ok(next) => {
                if let Err(e) = self.refresh(page, &next).await {
                    debug!(error = %e, "Initial forecast failed");
                    page.set_status("");
                }
                next
            }
            Err(e) => {
                debug!(error = %e, city, "Initial city lookup failed");
                page.set_status("");
                state.clone()
            }
        }
    }

    /// Handle a city submitted from the input field.
    ///
    /// Errors have already been shown on the status line when returned; the
    /// caller keeps its previous state.
    pub async fn submit(
        &self,
        page: &dyn Page,
        state: &ViewState,
        input: &str,
    ) -> Result<ViewState, SubmitError> {
        let next = self.locate(page, state, input).await?;

        if let Err(e) = self.refresh(page, &next).await {
            warn!(error = %e, panel = %next.active, "Forecast failed after city change");
        }

        Ok(next)
    }

    /// Geocode `input` and show the resolved place, without loading a panel.
    pub async fn locate(
        &self,
        page: &dyn Page,
        state: &ViewState,
        input: &str,
    ) -> Result<ViewState, SubmitError> {
        let city = input.trim();
        if city.is_empty() {
            page.set_status(EMPTY_INPUT_MESSAGE);
            return Err(SubmitError::EmptyInput);
        }

        page.set_status(FINDING_CITY_MESSAGE);
        let place = match self.geocoder.resolve(city).await {
            Ok(place) => place,
            Err(e) => {
                page.set_status(&e.to_string());
                return Err(e.into());
            }
        };

        page.set_place(&place.name);
        page.set_status("");

        Ok(ViewState {
            place: Some(place),
            active: state.active,
        })
    }

    /// Switch to `tab` and load it. A failed load is reported on the status
    /// line; the tab stays selected either way.
    pub async fn select_tab(
        &self,
        page: &dyn Page,
        state: &ViewState,
        tab: PanelKind,
    ) -> ViewState {
        let next = ViewState {
            place: state.place.clone(),
            active: tab,
        };

        page.activate(tab);
        if let Err(e) = self.refresh(page, &next).await {
            warn!(error = %e, panel = %tab, "Forecast failed after tab switch");
        }

        next
    }

    /// Reload the active panel.
    pub async fn refresh(
        &self,
        page: &dyn Page,
        state: &ViewState,
    ) -> Result<LoadOutcome, ForecastError> {
        match &state.place {
            Some(place) => self.load_panel(page, place, state.active).await,
            None => Ok(LoadOutcome::Skipped),
        }
    }

    /// Fetch and render one panel for `place`.
    ///
    /// A failure replaces the loading message with the error unless a newer
    /// load for the same panel has started in the meantime.
    pub async fn load_panel(
        &self,
        page: &dyn Page,
        place: &Place,
        kind: PanelKind,
    ) -> Result<LoadOutcome, ForecastError> {
        let generation = self.generations.begin(kind);
        page.set_status(&format!("Loading {}…", kind.noun()));

        let result = self.forecasts.fetch(kind, place.coordinate).await;

        if !self.generations.is_current(kind, generation) {
            debug!(panel = %kind, generation, "Dropping stale forecast response");
            return Ok(LoadOutcome::Stale);
        }

        match result {
            Ok(sample) => {
                page.set_status("");
                page.fill_panel(kind, cards_for(kind, &sample));
                Ok(LoadOutcome::Rendered)
            }
            Err(e) => {
                page.set_status(&format!("Could not load {}: {e}", kind.noun()));
                Err(e)
            }
        }
    }
}
