//! HTTP client for the prediction service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::GatewaySettings;
use crate::http_client::{self, RetryConfig};
use crate::parameters::{
    AdvancedReadings, ImportanceWeights, Mode, OptimalRange, OptimalRanges, ParameterInfluence,
    ParameterKey, Readings,
};

use super::GatewayError;
use super::types::{
    ModelKind, ModelState, ModelStatusEntry, ModelStatusReport, PredictionResult, TrainingRequest,
    TrainingSummary,
};

/// Remote operations the gateway needs; implemented over HTTP and by test doubles.
pub trait PredictionBackend: Send + Sync {
    fn model_status(&self) -> Result<ModelStatusReport, GatewayError>;
    fn parameter_influence(&self, mode: Mode) -> Result<ParameterInfluence, GatewayError>;
    fn predict(&self, readings: &Readings) -> Result<PredictionResult, GatewayError>;
    fn water_quality_score(&self, readings: &AdvancedReadings) -> Result<f64, GatewayError>;
    fn train_model(&self, request: &TrainingRequest) -> Result<TrainingSummary, GatewayError>;
}

/// JSON-over-HTTP backend rooted at the configured base URL.
pub struct HttpBackend {
    agent: ureq::Agent,
    base_url: String,
    max_response_bytes: usize,
    read_retry: RetryConfig,
}

impl HttpBackend {
    pub fn new(settings: &GatewaySettings) -> Self {
        Self {
            agent: http_client::build_agent(settings),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            max_response_bytes: settings.max_response_bytes,
            read_retry: RetryConfig::from_settings(settings),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        http_client::retry_with_backoff(
            self.read_retry,
            || {
                let request = self.agent.get(&url).set("Accept", "application/json");
                let response = request.call().map_err(|err| self.map_call_error(err))?;
                self.parse_body(response)
            },
            GatewayError::is_retryable,
        )
    }

    fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let url = self.endpoint(path);
        let response = self
            .agent
            .post(&url)
            .set("Accept", "application/json")
            .send_json(body)
            .map_err(|err| self.map_call_error(err))?;
        self.parse_body(response)
    }

    fn parse_body<T: DeserializeOwned>(&self, response: ureq::Response) -> Result<T, GatewayError> {
        let bytes = http_client::read_response_bytes(response, self.max_response_bytes)
            .map_err(|err| GatewayError::MalformedResponse(err.to_string()))?;
        serde_json::from_slice(&bytes)
            .map_err(|err| GatewayError::MalformedResponse(err.to_string()))
    }

    fn map_call_error(&self, error: ureq::Error) -> GatewayError {
        match error {
            ureq::Error::Status(code, response) => GatewayError::Status {
                code,
                body: http_client::read_body_lossy(response, self.max_response_bytes),
            },
            ureq::Error::Transport(err) => GatewayError::Transport(err.to_string()),
        }
    }
}

impl PredictionBackend for HttpBackend {
    fn model_status(&self) -> Result<ModelStatusReport, GatewayError> {
        let wire: BTreeMap<String, ModelStatusWire> = self.get_json("models/status")?;
        Ok(status_report_from_wire(wire))
    }

    fn parameter_influence(&self, mode: Mode) -> Result<ParameterInfluence, GatewayError> {
        let path = format!("parameters/{}/influence", mode.as_str());
        let wire: InfluenceWire = self.get_json(&path)?;
        Ok(influence_from_wire(mode, wire))
    }

    fn predict(&self, readings: &Readings) -> Result<PredictionResult, GatewayError> {
        self.post_json(&format!("predict/{}", readings.mode().as_str()), readings)
    }

    fn water_quality_score(&self, readings: &AdvancedReadings) -> Result<f64, GatewayError> {
        self.post_json("water-quality", readings)
    }

    fn train_model(&self, request: &TrainingRequest) -> Result<TrainingSummary, GatewayError> {
        self.post_json("train", request)
    }
}

#[derive(Debug, Deserialize)]
struct ModelStatusWire {
    #[serde(default)]
    status: ModelState,
    #[serde(default)]
    info: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfluenceWire {
    #[serde(default)]
    parameter_importance: Option<BTreeMap<String, f64>>,
    #[serde(default)]
    optimal_ranges: BTreeMap<String, serde_json::Value>,
}

/// Models the service does not mention have never been trained.
fn status_report_from_wire(mut wire: BTreeMap<String, ModelStatusWire>) -> ModelStatusReport {
    let mut report = ModelStatusReport::unknown();
    for kind in ModelKind::ALL {
        let entry = match wire.remove(kind.as_str()) {
            Some(model) => ModelStatusEntry {
                state: model.status,
                metrics: numeric_metrics(model.info),
                error: model.error,
            },
            None => ModelStatusEntry::with_state(ModelState::NotTrained),
        };
        *report.get_mut(kind) = entry;
    }
    report
}

fn numeric_metrics(
    info: Option<serde_json::Map<String, serde_json::Value>>,
) -> BTreeMap<String, f64> {
    info.into_iter()
        .flatten()
        .filter_map(|(name, value)| value.as_f64().map(|number| (name, number)))
        .collect()
}

fn influence_from_wire(mode: Mode, wire: InfluenceWire) -> ParameterInfluence {
    let mut optimal_ranges = OptimalRanges::new();
    for (key, value) in wire.optimal_ranges {
        match range_from_value(&value) {
            Some(range) => {
                optimal_ranges.insert(ParameterKey::new(key), range);
            }
            None => tracing::warn!("Dropping malformed {mode} optimal range for {key}: {value}"),
        }
    }
    let importance = wire.parameter_importance.map(|weights| {
        weights
            .into_iter()
            .map(|(key, weight)| (ParameterKey::new(key), weight))
            .collect::<ImportanceWeights>()
    });
    ParameterInfluence {
        importance,
        optimal_ranges,
    }
}

fn range_from_value(value: &serde_json::Value) -> Option<OptimalRange> {
    let bounds = value.as_array()?;
    let [low, high] = bounds.as_slice() else {
        return None;
    };
    OptimalRange::new(low.as_f64()?, high.as_f64()?)
}
