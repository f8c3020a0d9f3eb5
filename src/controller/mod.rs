//! Controller that owns the UI state and drives the engine and gateway.
//!
//! Handlers run synchronously; remote calls go to background threads and
//! their answers are applied in [`HabitatController::poll_jobs`].

mod background;
mod jobs;
mod state;

#[cfg(test)]
mod tests;

use std::time::{Duration, Instant};

use crate::engine::{self, ChartBinder, ChartPoint, Classification};
use crate::gateway::{ModelKind, RemoteGateway};
use crate::parameters::{Mode, Observations, ParameterCatalog};

use jobs::ControllerJobs;

pub use state::{
    ChartSource, ModeInfluence, Notice, NoticeTone, RequestPhase, RequestPhases, UiState,
};

pub struct HabitatController {
    gateway: RemoteGateway,
    catalog: ParameterCatalog,
    state: UiState,
    jobs: ControllerJobs,
    binder: ChartBinder,
}

impl HabitatController {
    /// Build an idle controller; nothing is requested until [`Self::activate_mode`].
    pub fn new(gateway: RemoteGateway) -> Self {
        let catalog = ParameterCatalog::standard();
        let mut controller = Self {
            gateway,
            catalog,
            state: UiState::new(),
            jobs: ControllerJobs::new(),
            binder: ChartBinder::new(catalog),
        };
        controller.rebind();
        controller
    }

    /// Build a controller and activate the default mode.
    pub fn start(gateway: RemoteGateway) -> Self {
        let mut controller = Self::new(gateway);
        controller.activate_mode();
        controller
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn catalog(&self) -> &ParameterCatalog {
        &self.catalog
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Request model status for the active mode; its influence follows if the model allows.
    pub fn activate_mode(&mut self) {
        let mode = self.state.mode;
        tracing::debug!("Activating {mode} mode");
        self.jobs.begin_status(&self.gateway, Some(mode));
        self.state.phases.status = RequestPhase::Requesting;
        self.state.phases.influence = RequestPhase::Idle;
    }

    /// Switch the active parameter set.
    ///
    /// Both forms keep their values. The prediction and the loaded tables are
    /// dropped and any in-flight request for the old mode becomes stale.
    pub fn switch_mode(&mut self, mode: Mode) {
        if mode == self.state.mode {
            return;
        }
        self.state.mode = mode;
        self.state.prediction = None;
        self.state.live_edit = true;
        self.state.influence = None;
        self.state.phases.prediction = RequestPhase::Idle;
        self.jobs.invalidate_mode_scoped();
        self.activate_mode();
        self.rebind();
    }

    /// Store an edited value for the active mode; `false` if the mode has no such field.
    pub fn edit_field(&mut self, key: &str, value: f64) -> bool {
        if !self.state.forms.set(self.state.mode, key, value) {
            return false;
        }
        self.state.form_revision = self.state.form_revision.wrapping_add(1);
        self.state.live_edit = true;
        self.rebind();
        true
    }

    /// Send the active mode's form values for prediction.
    pub fn submit_prediction(&mut self) {
        let readings = self.state.forms.readings(self.state.mode);
        self.jobs
            .begin_prediction(&self.gateway, readings, self.state.form_revision);
        self.state.phases.prediction = RequestPhase::Requesting;
    }

    /// Start training `kind`; ignored while another model is training.
    pub fn train_model(&mut self, kind: ModelKind) -> bool {
        if !self.jobs.begin_training(&self.gateway, kind) {
            tracing::debug!("Training already running; ignoring request for {}", kind.as_str());
            return false;
        }
        self.state.training_model = Some(kind);
        self.state.phases.training = RequestPhase::Requesting;
        true
    }

    /// Apply every job message received so far; returns `true` if the chart changed.
    pub fn poll_jobs(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.jobs.try_recv_message() {
            changed |= self.handle_message(message);
        }
        changed
    }

    /// Block until no job is in flight or `timeout` elapses; `true` when drained.
    pub fn wait_for_jobs(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.jobs.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.jobs.recv_message_timeout(remaining) {
                Ok(message) => {
                    self.handle_message(message);
                }
                Err(_) => return false,
            }
        }
        true
    }

    pub fn dismiss_notice(&mut self) {
        self.state.notice = None;
    }

    pub fn chart(&self) -> &[ChartPoint] {
        self.binder.points()
    }

    pub fn chart_source(&self) -> ChartSource {
        self.state.chart_source()
    }

    /// Whether any current (non-stale) request is outstanding.
    pub fn loading(&self) -> bool {
        self.jobs.status_pending()
            || self.jobs.influence_pending()
            || self.jobs.prediction_pending()
            || self.jobs.training_in_progress()
    }

    pub fn observations(&self) -> Observations {
        let live = self
            .state
            .live_edit
            .then(|| self.state.forms.readings(self.state.mode));
        engine::aggregate(self.state.mode, live.as_ref(), self.state.prediction.as_ref())
    }

    /// Classification of the current observations, empty while no ranges are loaded.
    pub fn classification(&self) -> Classification {
        match self.state.active_influence() {
            Some(influence) => engine::classify(&self.observations(), &influence.optimal_ranges),
            None => Classification::default(),
        }
    }

    fn rebind(&mut self) -> bool {
        let observations = self.observations();
        let influence = self.state.active_influence();
        self.binder.refresh(
            self.state.mode,
            &observations,
            influence.map(|table| &table.optimal_ranges),
            influence.and_then(|table| table.importance.as_ref()),
        )
    }
}
