use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::time::Duration;

use super::*;
use crate::config::TrainingSettings;
use crate::gateway::{
    AnalysisEntry, GatewayError, ModelState, ModelStatusEntry, ModelStatusReport, PredictionBackend,
    PredictionResult, TrainingRequest, TrainingSummary, influence_table,
};
use crate::parameters::{
    AdvancedReadings, ParameterInfluence, ParameterKey, ParameterStatus, Readings, keys,
};

const WAIT: Duration = Duration::from_secs(5);

#[derive(Default)]
struct StubBackend {
    offline: AtomicBool,
    fail_training: AtomicBool,
    untrained: Mutex<Vec<ModelKind>>,
    prediction_gate: Mutex<Option<mpsc::Receiver<()>>>,
    calls: Mutex<Vec<String>>,
}

impl StubBackend {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PredictionBackend for StubBackend {
    fn model_status(&self) -> Result<ModelStatusReport, GatewayError> {
        self.record("status".to_string());
        self.check_online()?;
        let untrained = self.untrained.lock().unwrap().clone();
        let mut report = ModelStatusReport::unknown();
        for kind in ModelKind::ALL {
            let state = if untrained.contains(&kind) {
                ModelState::NotTrained
            } else {
                ModelState::Available
            };
            *report.get_mut(kind) = ModelStatusEntry::with_state(state);
        }
        Ok(report)
    }

    fn parameter_influence(&self, mode: Mode) -> Result<ParameterInfluence, GatewayError> {
        self.record(format!("influence:{mode}"));
        self.check_online()?;
        let mut table = influence_table(mode);
        if let Some(weights) = table.importance.as_mut() {
            weights.insert(ParameterKey::from(keys::TURBIDITY), 0.9);
        }
        Ok(table)
    }

    fn predict(&self, readings: &Readings) -> Result<PredictionResult, GatewayError> {
        self.record(format!("predict:{}", readings.mode()));
        let gate = self.prediction_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        self.check_online()?;
        let analysis = readings
            .observations()
            .into_iter()
            .map(|(key, value)| {
                let entry = AnalysisEntry {
                    value,
                    status: ParameterStatus::Optimal,
                    recommendation: None,
                };
                (key, entry)
            })
            .collect();
        Ok(PredictionResult {
            predicted_species: format!("{} species", readings.mode()),
            confidence: 0.8,
            water_quality_score: Some(7.5),
            analysis,
            suitable_species: Vec::new(),
        })
    }

    fn water_quality_score(&self, _readings: &AdvancedReadings) -> Result<f64, GatewayError> {
        self.check_online()?;
        Ok(7.5)
    }

    fn train_model(&self, request: &TrainingRequest) -> Result<TrainingSummary, GatewayError> {
        self.record(format!("train:{}", request.model_type.as_str()));
        if self.fail_training.load(Ordering::SeqCst) {
            return Err(GatewayError::Status {
                code: 500,
                body: "dataset missing".to_string(),
            });
        }
        Ok(TrainingSummary {
            model_type: request.model_type.as_str().to_string(),
            training_time: 0.5,
            model_path: "models/test.pkl".to_string(),
            accuracy: Some(0.9),
            f1_score: Some(0.88),
            mse: None,
            r2_score: None,
        })
    }
}

fn controller_with(backend: StubBackend) -> (HabitatController, Arc<StubBackend>) {
    let backend = Arc::new(backend);
    let gateway = RemoteGateway::new(backend.clone(), TrainingSettings::default());
    (HabitatController::start(gateway), backend)
}

fn chart_names(controller: &HabitatController) -> Vec<String> {
    controller
        .chart()
        .iter()
        .map(|point| point.display_name.clone())
        .collect()
}

#[test]
fn new_controller_shows_sample_chart_until_tables_arrive() {
    let (mut controller, backend) = controller_with(StubBackend::default());
    assert!(controller.loading());
    assert_eq!(controller.chart_source(), ChartSource::Sample);
    assert_eq!(controller.chart().len(), 3);

    assert!(controller.wait_for_jobs(WAIT));
    assert!(!controller.loading());
    assert_eq!(backend.calls(), vec!["status", "influence:basic"]);
    assert_eq!(controller.state().phases.status, RequestPhase::Succeeded);
    assert_eq!(controller.state().phases.influence, RequestPhase::Succeeded);
    assert_eq!(controller.chart_source(), ChartSource::LiveEdits);
    assert_eq!(chart_names(&controller), vec!["Turbidity", "Temperature", "pH"]);
}

#[test]
fn untrained_model_skips_influence_request() {
    let backend = StubBackend::default();
    backend.untrained.lock().unwrap().push(ModelKind::Basic);
    let (mut controller, backend) = controller_with(backend);
    assert!(controller.wait_for_jobs(WAIT));
    assert_eq!(backend.calls(), vec!["status"]);
    assert!(controller.state().influence.is_none());
    assert_eq!(controller.chart_source(), ChartSource::Sample);
    assert!(controller.classification().is_empty());
}

#[test]
fn offline_service_degrades_reads_with_notice() {
    let backend = StubBackend::default();
    backend.offline.store(true, Ordering::SeqCst);
    let (mut controller, _backend) = controller_with(backend);
    assert!(controller.wait_for_jobs(WAIT));

    let state = controller.state();
    assert_eq!(state.phases.status, RequestPhase::Degraded);
    assert_eq!(state.phases.influence, RequestPhase::Degraded);
    assert!(state.influence.as_ref().is_some_and(|influence| influence.degraded));
    assert_eq!(
        state.model_status.as_ref().map(|report| report.basic.state),
        Some(ModelState::Unknown)
    );
    assert!(
        state
            .notice
            .as_ref()
            .is_some_and(|notice| notice.text.starts_with("Failed to connect"))
    );
    assert_eq!(chart_names(&controller), vec!["Temperature", "pH", "Turbidity"]);

    controller.dismiss_notice();
    assert!(controller.state().notice.is_none());
}

#[test]
fn degraded_prediction_is_applied_with_notice() {
    let backend = StubBackend::default();
    backend.offline.store(true, Ordering::SeqCst);
    let (mut controller, _backend) = controller_with(backend);
    assert!(controller.wait_for_jobs(WAIT));
    controller.dismiss_notice();

    controller.edit_field(keys::PH, 9.0);
    controller.submit_prediction();
    assert!(controller.wait_for_jobs(WAIT));

    let state = controller.state();
    assert_eq!(state.phases.prediction, RequestPhase::Degraded);
    let prediction = state.prediction.as_ref().unwrap();
    assert_eq!(prediction.predicted_species, crate::gateway::DEFAULT_SPECIES);
    assert_eq!(prediction.analysis[keys::PH].value, 9.0);
    assert!(
        state
            .notice
            .as_ref()
            .is_some_and(|notice| notice.text.starts_with("Failed to make prediction"))
    );
    assert_eq!(controller.chart_source(), ChartSource::Prediction);
    let ph = controller
        .chart()
        .iter()
        .find(|point| point.key.as_str() == keys::PH)
        .unwrap();
    assert_eq!(ph.current, Some(9.0));
    assert_eq!(ph.status, ParameterStatus::Suboptimal);
}

#[test]
fn edits_outside_the_active_mode_are_rejected() {
    let (mut controller, _backend) = controller_with(StubBackend::default());
    assert!(!controller.edit_field(keys::AMMONIA, 0.2));
    assert!(controller.edit_field(keys::TEMPERATURE, 26.0));
    assert_eq!(controller.observations()[keys::TEMPERATURE], 26.0);
}

#[test]
fn stale_prediction_is_discarded_after_mode_switch() {
    let backend = StubBackend::default();
    let (release, gate) = mpsc::channel();
    *backend.prediction_gate.lock().unwrap() = Some(gate);
    let (mut controller, _backend) = controller_with(backend);
    assert!(controller.wait_for_jobs(WAIT));

    controller.submit_prediction();
    controller.switch_mode(Mode::Advanced);
    release.send(()).unwrap();
    assert!(controller.wait_for_jobs(WAIT));

    let state = controller.state();
    assert_eq!(state.mode, Mode::Advanced);
    assert!(state.prediction.is_none());
    assert_eq!(state.phases.prediction, RequestPhase::Idle);
    assert_eq!(controller.chart_source(), ChartSource::LiveEdits);
    assert_eq!(controller.chart().len(), 6);
}

#[test]
fn training_failure_surfaces_without_fallback() {
    let backend = StubBackend::default();
    backend.fail_training.store(true, Ordering::SeqCst);
    let (mut controller, backend) = controller_with(backend);
    assert!(controller.wait_for_jobs(WAIT));

    assert!(controller.train_model(ModelKind::WaterQuality));
    assert!(controller.state().training_model.is_some());
    assert!(controller.wait_for_jobs(WAIT));

    let state = controller.state();
    assert_eq!(state.phases.training, RequestPhase::Failed);
    assert!(state.last_training.is_none());
    assert_eq!(
        state.notice.as_ref().map(|notice| notice.text.as_str()),
        Some("Failed to train the water_quality model. Please check the server logs.")
    );
    assert_eq!(backend.calls().last().map(String::as_str), Some("train:water_quality"));
}

#[test]
fn training_active_mode_refreshes_status_and_influence() {
    let (mut controller, backend) = controller_with(StubBackend::default());
    assert!(controller.wait_for_jobs(WAIT));

    assert!(controller.train_model(ModelKind::Basic));
    assert!(!controller.train_model(ModelKind::Advanced));
    assert!(controller.wait_for_jobs(WAIT));

    let state = controller.state();
    assert_eq!(state.phases.training, RequestPhase::Succeeded);
    assert_eq!(state.last_training.as_ref().and_then(|summary| summary.accuracy), Some(0.9));
    let calls = backend.calls();
    assert_eq!(&calls[..3], &["status", "influence:basic", "train:basic"]);
    assert_eq!(calls.len(), 5);
    assert!(calls[3..].contains(&"status".to_string()));
    assert!(calls[3..].contains(&"influence:basic".to_string()));
}

#[test]
fn training_other_model_refreshes_status_only() {
    let (mut controller, backend) = controller_with(StubBackend::default());
    assert!(controller.wait_for_jobs(WAIT));

    assert!(controller.train_model(ModelKind::Advanced));
    assert!(controller.wait_for_jobs(WAIT));
    assert_eq!(
        backend.calls(),
        vec!["status", "influence:basic", "train:advanced", "status"]
    );
}
