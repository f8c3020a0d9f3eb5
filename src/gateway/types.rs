use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::parameters::{Mode, Observations, ParameterKey, ParameterStatus};

/// Models published by the prediction service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    Basic,
    Advanced,
    WaterQuality,
}

impl ModelKind {
    pub const ALL: [ModelKind; 3] = [
        ModelKind::Basic,
        ModelKind::Advanced,
        ModelKind::WaterQuality,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
            Self::WaterQuality => "water_quality",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Basic => "Basic Model",
            Self::Advanced => "Advanced Model",
            Self::WaterQuality => "Water Quality Model",
        }
    }

    /// The species model backing a form mode.
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Basic => Self::Basic,
            Mode::Advanced => Self::Advanced,
        }
    }

    /// The form mode this model drives, if any.
    pub fn mode(self) -> Option<Mode> {
        match self {
            Self::Basic => Some(Mode::Basic),
            Self::Advanced => Some(Mode::Advanced),
            Self::WaterQuality => None,
        }
    }
}

/// Training state of one model.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelState {
    Available,
    NotTrained,
    Error,
    /// Service unreachable or reported a state this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ModelState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::NotTrained => "Not Trained",
            Self::Error => "Error",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether the service can be asked for this model's influence tables.
    pub fn may_have_influence(self) -> bool {
        matches!(self, Self::Available | Self::Unknown)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelStatusEntry {
    pub state: ModelState,
    /// Numeric entries of the model's published info (accuracy, f1_score, mse, r2_score).
    pub metrics: BTreeMap<String, f64>,
    pub error: Option<String>,
}

impl ModelStatusEntry {
    pub fn with_state(state: ModelState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

/// Status of every model, keyed the way the service reports it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelStatusReport {
    pub basic: ModelStatusEntry,
    pub advanced: ModelStatusEntry,
    pub water_quality: ModelStatusEntry,
}

impl ModelStatusReport {
    /// Every model in the `Unknown` state.
    pub fn unknown() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: ModelKind) -> &ModelStatusEntry {
        match kind {
            ModelKind::Basic => &self.basic,
            ModelKind::Advanced => &self.advanced,
            ModelKind::WaterQuality => &self.water_quality,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: ModelKind) -> &mut ModelStatusEntry {
        match kind {
            ModelKind::Basic => &mut self.basic,
            ModelKind::Advanced => &mut self.advanced,
            ModelKind::WaterQuality => &mut self.water_quality,
        }
    }
}

/// Per-parameter verdict inside a prediction result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisEntry {
    #[serde(deserialize_with = "number_or_nan")]
    pub value: f64,
    #[serde(default)]
    pub status: ParameterStatus,
    #[serde(default)]
    pub recommendation: Option<String>,
}

/// A fish species the service considers suitable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeciesRecord {
    pub name: String,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub ideal_ph_range: Option<Vec<f64>>,
    #[serde(default)]
    pub ideal_temperature_range: Option<Vec<f64>>,
    #[serde(default)]
    pub ideal_turbidity_range: Option<Vec<f64>>,
    #[serde(default)]
    pub description: Option<String>,
}

impl SpeciesRecord {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub predicted_species: String,
    pub confidence: f64,
    #[serde(default)]
    pub water_quality_score: Option<f64>,
    #[serde(rename = "parameter_analysis", default, deserialize_with = "null_as_default")]
    pub analysis: BTreeMap<ParameterKey, AnalysisEntry>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub suitable_species: Vec<SpeciesRecord>,
}

impl PredictionResult {
    /// Observed value per analysed parameter.
    pub fn observations(&self) -> Observations {
        self.analysis
            .iter()
            .map(|(key, entry)| (key.clone(), entry.value))
            .collect()
    }
}

/// Body of `POST /train`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingRequest {
    pub model_type: ModelKind,
    pub test_size: f64,
    pub random_state: u64,
}

/// What the service reports after training a model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrainingSummary {
    pub model_type: String,
    #[serde(default)]
    pub training_time: f64,
    #[serde(default)]
    pub model_path: String,
    #[serde(default)]
    pub accuracy: Option<f64>,
    #[serde(default)]
    pub f1_score: Option<f64>,
    #[serde(default)]
    pub mse: Option<f64>,
    #[serde(default)]
    pub r2_score: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}
