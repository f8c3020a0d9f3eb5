use crate::gateway::{ModelKind, Outcome};

use super::HabitatController;
use super::jobs::{InfluenceLoaded, JobMessage, PredictionFinished, StatusLoaded, TrainingFinished};
use super::state::{ModeInfluence, Notice, RequestPhase};

fn read_phase<T>(outcome: &Outcome<T>) -> RequestPhase {
    if outcome.is_degraded() {
        RequestPhase::Degraded
    } else {
        RequestPhase::Succeeded
    }
}

impl HabitatController {
    /// Apply one job message; returns `true` if the chart changed.
    pub(super) fn handle_message(&mut self, message: JobMessage) -> bool {
        match message {
            JobMessage::StatusLoaded(message) => {
                self.apply_status(message);
                false
            }
            JobMessage::InfluenceLoaded(message) => self.apply_influence(message),
            JobMessage::PredictionFinished(message) => self.apply_prediction(message),
            JobMessage::TrainingFinished(message) => {
                self.apply_training(message);
                false
            }
        }
    }

    fn apply_status(&mut self, message: StatusLoaded) {
        let Some(pending) = self.jobs.take_status_if_current(message.request_id) else {
            tracing::debug!("Discarding stale status response {}", message.request_id);
            return;
        };
        self.state.phases.status = read_phase(&message.outcome);
        if message.outcome.is_degraded() {
            self.state.notice = Some(Notice::connection_failed());
        }
        let report = message.outcome.into_value();
        let follow_up = pending.influence_for.filter(|mode| *mode == self.state.mode);
        if let Some(mode) = follow_up {
            let model_state = report.get(ModelKind::for_mode(mode)).state;
            if model_state.may_have_influence() {
                self.jobs.begin_influence(&self.gateway, mode);
                self.state.phases.influence = RequestPhase::Requesting;
            } else {
                tracing::info!("{mode} model is {}; showing sample chart", model_state.label());
            }
        }
        self.state.model_status = Some(report);
    }

    fn apply_influence(&mut self, message: InfluenceLoaded) -> bool {
        if message.mode != self.state.mode
            || !self.jobs.take_influence_if_current(message.request_id, message.mode)
        {
            tracing::debug!(
                "Discarding stale {} influence response {}",
                message.mode,
                message.request_id
            );
            return false;
        }
        self.state.phases.influence = read_phase(&message.outcome);
        let degraded = message.outcome.is_degraded();
        if degraded {
            self.state.notice = Some(Notice::connection_failed());
        }
        self.state.influence = Some(ModeInfluence {
            mode: message.mode,
            table: message.outcome.into_value(),
            degraded,
        });
        self.rebind()
    }

    fn apply_prediction(&mut self, message: PredictionFinished) -> bool {
        if message.mode != self.state.mode
            || !self.jobs.take_prediction_if_current(message.request_id, message.mode)
        {
            tracing::debug!(
                "Discarding stale {} prediction {}",
                message.mode,
                message.request_id
            );
            return false;
        }
        self.state.phases.prediction = read_phase(&message.outcome);
        if message.outcome.is_degraded() {
            self.state.notice = Some(Notice::prediction_failed());
        } else {
            self.state.notice = None;
        }
        let result = message.outcome.into_value();
        tracing::info!(
            "Prediction for {} mode: {} ({:.1}%)",
            message.mode,
            result.predicted_species,
            result.confidence * 100.0
        );
        self.state.prediction = Some(result);
        if message.form_revision == self.state.form_revision {
            self.state.live_edit = false;
        } else {
            tracing::debug!(
                "Form edited since prediction {}; keeping live values",
                message.request_id
            );
        }
        self.rebind()
    }

    fn apply_training(&mut self, message: TrainingFinished) {
        self.jobs.finish_training();
        self.state.training_model = None;
        match message.result {
            Ok(summary) => {
                self.state.phases.training = RequestPhase::Succeeded;
                self.state.last_training = Some(summary);
                self.state.notice = None;
                self.jobs.begin_status(&self.gateway, None);
                self.state.phases.status = RequestPhase::Requesting;
                if message.kind.mode() == Some(self.state.mode) {
                    self.jobs.begin_influence(&self.gateway, self.state.mode);
                    self.state.phases.influence = RequestPhase::Requesting;
                }
            }
            Err(err) => {
                tracing::warn!("Training {} failed: {err}", message.kind.as_str());
                self.state.phases.training = RequestPhase::Failed;
                self.state.notice = Some(Notice::training_failed(message.kind));
            }
        }
    }
}
