//! Explicit UI state, mutated only by controller handlers.

use crate::gateway::{ModelKind, ModelStatusReport, PredictionResult, TrainingSummary};
use crate::parameters::{FormState, Mode, ParameterInfluence};

/// Message shown above the dashboard until dismissed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub tone: NoticeTone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeTone {
    Info,
    Warning,
    Error,
}

impl Notice {
    pub(crate) fn connection_failed() -> Self {
        Self {
            text: "Failed to connect to the server. Please make sure the backend is running."
                .to_string(),
            tone: NoticeTone::Warning,
        }
    }

    pub(crate) fn prediction_failed() -> Self {
        Self {
            text: "Failed to make prediction. Please check the server logs.".to_string(),
            tone: NoticeTone::Warning,
        }
    }

    pub(crate) fn training_failed(kind: ModelKind) -> Self {
        Self {
            text: format!(
                "Failed to train the {} model. Please check the server logs.",
                kind.as_str()
            ),
            tone: NoticeTone::Error,
        }
    }
}

/// Lifecycle of one remote operation.
///
/// `Degraded` applies to reads only, `Failed` to training only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestPhase {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    Degraded,
    Failed,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestPhases {
    pub status: RequestPhase,
    pub influence: RequestPhase,
    pub prediction: RequestPhase,
    pub training: RequestPhase,
}

impl RequestPhases {
    pub fn any_requesting(&self) -> bool {
        [self.status, self.influence, self.prediction, self.training]
            .contains(&RequestPhase::Requesting)
    }
}

/// Range and weight tables loaded for one mode.
#[derive(Clone, Debug, PartialEq)]
pub struct ModeInfluence {
    pub mode: Mode,
    pub table: ParameterInfluence,
    /// Built-in table substituted for a failed request.
    pub degraded: bool,
}

/// Where the chart's current values come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChartSource {
    LiveEdits,
    Prediction,
    Sample,
}

#[derive(Clone, Debug, Default)]
pub struct UiState {
    pub mode: Mode,
    pub forms: FormState,
    /// Bumped on every accepted form edit.
    pub form_revision: u64,
    /// Form values drive the chart until a prediction of the current form lands.
    pub live_edit: bool,
    pub prediction: Option<PredictionResult>,
    pub influence: Option<ModeInfluence>,
    pub model_status: Option<ModelStatusReport>,
    pub last_training: Option<TrainingSummary>,
    pub training_model: Option<ModelKind>,
    pub notice: Option<Notice>,
    pub phases: RequestPhases,
}

impl UiState {
    pub(crate) fn new() -> Self {
        Self {
            live_edit: true,
            ..Self::default()
        }
    }

    /// Influence tables for the active mode, if loaded.
    pub fn active_influence(&self) -> Option<&ParameterInfluence> {
        self.influence
            .as_ref()
            .filter(|influence| influence.mode == self.mode)
            .map(|influence| &influence.table)
    }

    pub fn chart_source(&self) -> ChartSource {
        if self.active_influence().is_none() {
            ChartSource::Sample
        } else if self.live_edit || self.prediction.is_none() {
            ChartSource::LiveEdits
        } else {
            ChartSource::Prediction
        }
    }
}
