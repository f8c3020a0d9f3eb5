//! Prediction service gateway.
//!
//! Reads (status, influence, prediction, score) never fail from the caller's
//! point of view: transport and decoding problems are logged and replaced by
//! local fallback data wrapped in [`Outcome::Degraded`]. Training is a write
//! and surfaces its error.

mod api;
mod fallback;
mod types;

use std::sync::Arc;

use crate::config::{Settings, TrainingSettings};
use crate::parameters::{AdvancedReadings, Mode, ParameterInfluence, Readings};

pub use api::{HttpBackend, PredictionBackend};
pub use fallback::{DEFAULT_SPECIES, fallback_prediction, influence_table, unknown_status};
pub use types::{
    AnalysisEntry, ModelKind, ModelState, ModelStatusEntry, ModelStatusReport, PredictionResult,
    SpeciesRecord, TrainingRequest, TrainingSummary,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP error: {0}")]
    Transport(String),
    #[error("Server returned HTTP {code}: {body}")]
    Status { code: u16, body: String },
    #[error("Unexpected response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Network failures and 5xx answers may succeed on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { code, .. } => (500..=599).contains(code),
            Self::MalformedResponse(_) => false,
        }
    }
}

/// Fallback data standing in for a failed read.
#[derive(Debug, Clone, PartialEq)]
pub struct Degraded<T> {
    pub fallback: T,
    pub cause: GatewayError,
}

/// Result of a read: live data from the service, or a degraded substitute.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Live(T),
    Degraded(Degraded<T>),
}

impl<T> Outcome<T> {
    fn from_result(
        result: Result<T, GatewayError>,
        what: &str,
        fallback: impl FnOnce() -> T,
    ) -> Self {
        match result {
            Ok(value) => Self::Live(value),
            Err(cause) => {
                tracing::warn!("{what} failed, using fallback: {cause}");
                Self::Degraded(Degraded {
                    fallback: fallback(),
                    cause,
                })
            }
        }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Live(value) => value,
            Self::Degraded(degraded) => &degraded.fallback,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Live(value) => value,
            Self::Degraded(degraded) => degraded.fallback,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn cause(&self) -> Option<&GatewayError> {
        match self {
            Self::Live(_) => None,
            Self::Degraded(degraded) => Some(&degraded.cause),
        }
    }
}

/// Typed access to the prediction service with fallbacks for reads.
#[derive(Clone)]
pub struct RemoteGateway {
    backend: Arc<dyn PredictionBackend>,
    training: TrainingSettings,
}

impl RemoteGateway {
    pub fn new(backend: Arc<dyn PredictionBackend>, training: TrainingSettings) -> Self {
        Self { backend, training }
    }

    /// HTTP gateway for the configured service.
    pub fn from_settings(settings: &Settings) -> Self {
        let backend = HttpBackend::new(&settings.gateway);
        tracing::info!("Prediction service at {}", backend.base_url());
        Self::new(Arc::new(backend), settings.training.clone())
    }

    pub fn model_status(&self) -> Outcome<ModelStatusReport> {
        Outcome::from_result(self.backend.model_status(), "Model status request", unknown_status)
    }

    pub fn parameter_influence(&self, mode: Mode) -> Outcome<ParameterInfluence> {
        Outcome::from_result(
            self.backend.parameter_influence(mode),
            "Parameter influence request",
            || influence_table(mode),
        )
    }

    pub fn predict(&self, readings: &Readings) -> Outcome<PredictionResult> {
        Outcome::from_result(self.backend.predict(readings), "Prediction request", || {
            fallback_prediction(readings)
        })
    }

    /// Standalone water-quality score; degrades to no score.
    pub fn water_quality_score(&self, readings: &AdvancedReadings) -> Outcome<Option<f64>> {
        Outcome::from_result(
            self.backend.water_quality_score(readings).map(Some),
            "Water quality request",
            || None,
        )
    }

    /// Train `kind` with the configured split; failures are returned, never replaced.
    pub fn train_model(&self, kind: ModelKind) -> Result<TrainingSummary, GatewayError> {
        let request = TrainingRequest {
            model_type: kind,
            test_size: self.training.test_size,
            random_state: self.training.random_state,
        };
        tracing::info!("Training {} model", kind.as_str());
        match self.backend.train_model(&request) {
            Ok(summary) => {
                tracing::info!(
                    "Trained {} model in {:.1}s",
                    kind.as_str(),
                    summary.training_time
                );
                Ok(summary)
            }
            Err(err) => {
                tracing::error!("Training {} model failed: {err}", kind.as_str());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_client::test_server::{json_response, serve};
    use crate::parameters::{BasicReadings, ParameterStatus};

    fn gateway(responses: Vec<String>) -> (RemoteGateway, std::sync::mpsc::Receiver<String>) {
        let (url, requests) = serve(responses);
        let mut settings = Settings::default();
        settings.gateway.base_url = url;
        settings.gateway.read_attempts = 1;
        settings.training.random_state = 7;
        (RemoteGateway::from_settings(&settings), requests)
    }

    #[test]
    fn failed_status_degrades_to_unknown() {
        let (gateway, _requests) = gateway(vec![json_response(500, "{}")]);
        let outcome = gateway.model_status();
        assert!(outcome.is_degraded());
        assert!(matches!(outcome.cause(), Some(GatewayError::Status { code: 500, .. })));
        assert_eq!(outcome.value().advanced.state, ModelState::Unknown);
    }

    #[test]
    fn failed_influence_degrades_to_builtin_table() {
        let (gateway, _requests) =
            gateway(vec![json_response(404, r#"{"detail": "not trained"}"#)]);
        let outcome = gateway.parameter_influence(Mode::Basic);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_value(), influence_table(Mode::Basic));
    }

    #[test]
    fn failed_prediction_echoes_readings() {
        let (gateway, _requests) = gateway(vec![json_response(200, "not json")]);
        let readings = Readings::Basic(BasicReadings {
            ph: 5.0,
            ..BasicReadings::default()
        });
        let outcome = gateway.predict(&readings);
        assert!(matches!(outcome.cause(), Some(GatewayError::MalformedResponse(_))));
        let result = outcome.into_value();
        assert_eq!(result.predicted_species, DEFAULT_SPECIES);
        assert_eq!(result.analysis["ph"].value, 5.0);
        assert_eq!(result.analysis["ph"].status, ParameterStatus::Unknown);
    }

    #[test]
    fn failed_score_degrades_to_none() {
        let (gateway, _requests) = gateway(vec![json_response(500, "{}")]);
        let outcome = gateway.water_quality_score(&AdvancedReadings::default());
        assert!(outcome.is_degraded());
        assert_eq!(outcome.into_value(), None);
    }

    #[test]
    fn training_sends_configured_split_and_propagates_failure() {
        let (gateway, requests) = gateway(vec![json_response(500, r#"{"detail": "boom"}"#)]);
        let err = gateway.train_model(ModelKind::Advanced).unwrap_err();
        assert!(matches!(err, GatewayError::Status { code: 500, .. }));
        let request = requests.recv().unwrap();
        assert!(request.starts_with("POST /train "));
        assert!(request.contains(r#""model_type":"advanced""#));
        assert!(request.contains(r#""random_state":7"#));
    }

    #[test]
    fn training_returns_summary() {
        let body = r#"{
            "model_type": "basic",
            "accuracy": 0.9,
            "f1_score": 0.88,
            "training_time": 1.5,
            "model_path": "models/basic.pkl"
        }"#;
        let (gateway, _requests) = gateway(vec![json_response(200, body)]);
        let summary = gateway.train_model(ModelKind::Basic).unwrap();
        assert_eq!(summary.accuracy, Some(0.9));
        assert_eq!(summary.mse, None);
        assert_eq!(summary.model_path, "models/basic.pkl");
    }

    #[test]
    fn retry_policy_covers_transport_and_server_errors() {
        assert!(GatewayError::Transport("refused".into()).is_retryable());
        assert!(GatewayError::Status { code: 502, body: String::new() }.is_retryable());
        assert!(!GatewayError::Status { code: 404, body: String::new() }.is_retryable());
        assert!(!GatewayError::MalformedResponse("eof".into()).is_retryable());
    }
}
