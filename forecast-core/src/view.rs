use tracing::{info, warn};

use crate::{
    model::{FetchState, ForecastRequest, ForecastResult, UnitPreference},
    present::{DayView, assemble},
    provider::{ForecastError, ForecastProvider},
};

/// Coarse UI phase derived from the state cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready(UnitPreference),
    Errored,
}

/// State of one forecast component: the fetch outcome plus the unit toggle.
///
/// The fetch resolves at most once. Toggling the unit never touches the
/// fetch state and never asks for data again.
#[derive(Debug, Clone)]
pub struct ForecastView {
    state: FetchState,
    unit: UnitPreference,
}

impl ForecastView {
    pub fn new(unit: UnitPreference) -> Self {
        Self { state: FetchState::Loading, unit }
    }

    pub fn state(&self) -> &FetchState {
        &self.state
    }

    pub fn unit(&self) -> UnitPreference {
        self.unit
    }

    pub fn phase(&self) -> Phase {
        match self.state {
            FetchState::Loading => Phase::Loading,
            FetchState::Success(_) => Phase::Ready(self.unit),
            FetchState::Failure { .. } => Phase::Errored,
        }
    }

    /// Record the fetch outcome. Returns `false` if the view was already resolved.
    pub fn resolve(&mut self, outcome: Result<ForecastResult, ForecastError>) -> bool {
        if self.state.is_resolved() {
            warn!("Ignoring second forecast resolution");
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                info!(days = result.len(), "Forecast ready");
                FetchState::Success(result)
            }
            Err(err) => {
                warn!(error = %err, "Forecast failed");
                FetchState::Failure { reason: err.reason() }
            }
        };
        true
    }

    /// Run the single fetch for this component and resolve with its outcome.
    pub async fn load(&mut self, provider: &dyn ForecastProvider, request: &ForecastRequest) {
        if self.state.is_resolved() {
            return;
        }
        let outcome = provider.fetch(request).await;
        self.resolve(outcome);
    }

    pub fn toggle_unit(&mut self) -> UnitPreference {
        self.unit = self.unit.toggled();
        self.unit
    }

    /// Display records for the current unit, once the fetch succeeded.
    pub fn days(&self) -> Option<Vec<DayView>> {
        match &self.state {
            FetchState::Success(result) => Some(assemble(result, self.unit)),
            _ => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.state {
            FetchState::Failure { reason } => Some(reason),
            _ => None,
        }
    }
}
