use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
    mpsc,
};

use habitat::config::TrainingSettings;
use habitat::gateway::{
    AnalysisEntry, GatewayError, ModelKind, ModelState, ModelStatusEntry, ModelStatusReport,
    PredictionBackend, PredictionResult, RemoteGateway, TrainingRequest, TrainingSummary,
    influence_table,
};
use habitat::parameters::{
    AdvancedReadings, Mode, ParameterInfluence, ParameterStatus, Readings,
};

/// Handle on a call parked inside the fake service.
pub struct HeldCall {
    /// Fires once the call has reached the service.
    pub entered: mpsc::Receiver<()>,
    /// Lets the call answer.
    pub release: mpsc::Sender<()>,
}

struct Gate {
    entered: mpsc::Sender<()>,
    release: mpsc::Receiver<()>,
}

fn gate() -> (Gate, HeldCall) {
    let (entered_tx, entered_rx) = mpsc::channel();
    let (release_tx, release_rx) = mpsc::channel();
    let gate = Gate {
        entered: entered_tx,
        release: release_rx,
    };
    let held = HeldCall {
        entered: entered_rx,
        release: release_tx,
    };
    (gate, held)
}

/// Park the caller if `slot` holds a gate; `true` when it did.
fn pass(slot: &Mutex<Option<Gate>>) -> bool {
    let gate = slot.lock().unwrap().take();
    match gate {
        Some(gate) => {
            let _ = gate.entered.send(());
            let _ = gate.release.recv();
            true
        }
        None => false,
    }
}

/// In-memory prediction service.
///
/// Serves the built-in influence tables and echoes readings as predictions.
/// It can be switched offline, and the next status, influence or prediction
/// call can be parked until released. Parked status calls answer with every
/// model untrained and parked influence calls without an importance table, so
/// an answer applied out of order is visible in the state.
#[derive(Default)]
pub struct FakeService {
    offline: AtomicBool,
    status_gate: Mutex<Option<Gate>>,
    influence_gate: Mutex<Option<Gate>>,
    prediction_gate: Mutex<Option<Gate>>,
    calls: Mutex<Vec<String>>,
}

impl FakeService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn gateway(self: &Arc<Self>) -> RemoteGateway {
        RemoteGateway::new(self.clone(), TrainingSettings::default())
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn hold_next_status(&self) -> HeldCall {
        let (gate, held) = gate();
        *self.status_gate.lock().unwrap() = Some(gate);
        held
    }

    pub fn hold_next_influence(&self) -> HeldCall {
        let (gate, held) = gate();
        *self.influence_gate.lock().unwrap() = Some(gate);
        held
    }

    pub fn hold_next_prediction(&self) -> HeldCall {
        let (gate, held) = gate();
        *self.prediction_gate.lock().unwrap() = Some(gate);
        held
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn enter(&self, call: String) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(call);
        if self.offline.load(Ordering::SeqCst) {
            Err(GatewayError::Transport("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

impl PredictionBackend for FakeService {
    fn model_status(&self) -> Result<ModelStatusReport, GatewayError> {
        let held = pass(&self.status_gate);
        self.enter("status".to_string())?;
        let state = if held {
            ModelState::NotTrained
        } else {
            ModelState::Available
        };
        let entry = ModelStatusEntry {
            state,
            metrics: [("accuracy".to_string(), 0.9)].into_iter().collect(),
            error: None,
        };
        Ok(ModelStatusReport {
            basic: entry.clone(),
            advanced: entry.clone(),
            water_quality: entry,
        })
    }

    fn parameter_influence(&self, mode: Mode) -> Result<ParameterInfluence, GatewayError> {
        let held = pass(&self.influence_gate);
        self.enter(format!("influence:{mode}"))?;
        let mut table = influence_table(mode);
        if held {
            table.importance = None;
        }
        Ok(table)
    }

    fn predict(&self, readings: &Readings) -> Result<PredictionResult, GatewayError> {
        pass(&self.prediction_gate);
        self.enter(format!("predict:{}", readings.mode()))?;
        let table = influence_table(readings.mode());
        let analysis = readings
            .observations()
            .into_iter()
            .map(|(key, value)| {
                let status = table
                    .range(key.as_str())
                    .map_or(ParameterStatus::Unknown, |range| range.status_of(value));
                let entry = AnalysisEntry {
                    value,
                    status,
                    recommendation: None,
                };
                (key, entry)
            })
            .collect();
        Ok(PredictionResult {
            predicted_species: "Rohu".to_string(),
            confidence: 0.77,
            water_quality_score: Some(6.1),
            analysis,
            suitable_species: Vec::new(),
        })
    }

    fn water_quality_score(&self, _readings: &AdvancedReadings) -> Result<f64, GatewayError> {
        self.enter("water_quality".to_string())?;
        Ok(6.1)
    }

    fn train_model(&self, request: &TrainingRequest) -> Result<TrainingSummary, GatewayError> {
        self.enter(format!("train:{}", request.model_type.as_str()))?;
        Ok(TrainingSummary {
            model_type: request.model_type.as_str().to_string(),
            training_time: 1.0,
            model_path: format!("models/{}.pkl", request.model_type.as_str()),
            accuracy: (request.model_type != ModelKind::WaterQuality).then_some(0.9),
            f1_score: None,
            mse: None,
            r2_score: (request.model_type == ModelKind::WaterQuality).then_some(0.8),
        })
    }
}
