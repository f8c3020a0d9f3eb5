use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError},
    thread,
    time::Duration,
};

use crate::gateway::{
    GatewayError, ModelKind, ModelStatusReport, Outcome, PredictionResult, RemoteGateway,
    TrainingSummary,
};
use crate::parameters::{Mode, ParameterInfluence, Readings};

pub(crate) enum JobMessage {
    StatusLoaded(StatusLoaded),
    InfluenceLoaded(InfluenceLoaded),
    PredictionFinished(PredictionFinished),
    TrainingFinished(TrainingFinished),
}

#[derive(Debug)]
pub(crate) struct StatusLoaded {
    pub(crate) request_id: u64,
    pub(crate) outcome: Outcome<ModelStatusReport>,
}

#[derive(Debug)]
pub(crate) struct InfluenceLoaded {
    pub(crate) request_id: u64,
    pub(crate) mode: Mode,
    pub(crate) outcome: Outcome<ParameterInfluence>,
}

#[derive(Debug)]
pub(crate) struct PredictionFinished {
    pub(crate) request_id: u64,
    pub(crate) mode: Mode,
    /// Form revision the submitted readings were taken from.
    pub(crate) form_revision: u64,
    pub(crate) outcome: Outcome<PredictionResult>,
}

#[derive(Debug)]
pub(crate) struct TrainingFinished {
    pub(crate) kind: ModelKind,
    pub(crate) result: Result<TrainingSummary, GatewayError>,
}

/// A mode-scoped request still awaiting its answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingRequest {
    pub(crate) request_id: u64,
    pub(crate) mode: Mode,
}

/// Outstanding status request and the mode whose influence should follow it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingStatus {
    pub(crate) request_id: u64,
    pub(crate) influence_for: Option<Mode>,
}

pub(crate) struct ControllerJobs {
    message_tx: Sender<JobMessage>,
    message_rx: Receiver<JobMessage>,
    next_request_id: u64,
    in_flight: usize,
    pending_status: Option<PendingStatus>,
    pending_influence: Option<PendingRequest>,
    pending_prediction: Option<PendingRequest>,
    training: Option<ModelKind>,
}

impl ControllerJobs {
    pub(crate) fn new() -> Self {
        let (message_tx, message_rx) = mpsc::channel();
        Self {
            message_tx,
            message_rx,
            next_request_id: 1,
            in_flight: 0,
            pending_status: None,
            pending_influence: None,
            pending_prediction: None,
            training: None,
        }
    }

    pub(crate) fn try_recv_message(&mut self) -> Result<JobMessage, TryRecvError> {
        let message = self.message_rx.try_recv()?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(message)
    }

    pub(crate) fn recv_message_timeout(
        &mut self,
        timeout: Duration,
    ) -> Result<JobMessage, RecvTimeoutError> {
        let message = self.message_rx.recv_timeout(timeout)?;
        self.in_flight = self.in_flight.saturating_sub(1);
        Ok(message)
    }

    /// Jobs spawned whose message has not been received yet, stale ones included.
    pub(crate) fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn next_request_id(&mut self) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id = self.next_request_id.wrapping_add(1).max(1);
        request_id
    }

    fn spawn(&mut self, job: impl FnOnce() -> JobMessage + Send + 'static) {
        self.in_flight += 1;
        let tx = self.message_tx.clone();
        thread::spawn(move || {
            let _ = tx.send(job());
        });
    }

    pub(crate) fn begin_status(
        &mut self,
        gateway: &RemoteGateway,
        influence_for: Option<Mode>,
    ) -> u64 {
        let request_id = self.next_request_id();
        // A superseded status request hands over its influence follow-up.
        let influence_for =
            influence_for.or(self.pending_status.and_then(|pending| pending.influence_for));
        self.pending_status = Some(PendingStatus {
            request_id,
            influence_for,
        });
        let gateway = gateway.clone();
        self.spawn(move || {
            JobMessage::StatusLoaded(StatusLoaded {
                request_id,
                outcome: gateway.model_status(),
            })
        });
        request_id
    }

    pub(crate) fn begin_influence(&mut self, gateway: &RemoteGateway, mode: Mode) -> u64 {
        let request_id = self.next_request_id();
        self.pending_influence = Some(PendingRequest { request_id, mode });
        let gateway = gateway.clone();
        self.spawn(move || {
            JobMessage::InfluenceLoaded(InfluenceLoaded {
                request_id,
                mode,
                outcome: gateway.parameter_influence(mode),
            })
        });
        request_id
    }

    pub(crate) fn begin_prediction(
        &mut self,
        gateway: &RemoteGateway,
        readings: Readings,
        form_revision: u64,
    ) -> u64 {
        let request_id = self.next_request_id();
        let mode = readings.mode();
        self.pending_prediction = Some(PendingRequest { request_id, mode });
        let gateway = gateway.clone();
        self.spawn(move || {
            JobMessage::PredictionFinished(PredictionFinished {
                request_id,
                mode,
                form_revision,
                outcome: gateway.predict(&readings),
            })
        });
        request_id
    }

    /// Start training `kind`; `false` while another training run is active.
    pub(crate) fn begin_training(&mut self, gateway: &RemoteGateway, kind: ModelKind) -> bool {
        if self.training.is_some() {
            return false;
        }
        self.training = Some(kind);
        let gateway = gateway.clone();
        self.spawn(move || {
            JobMessage::TrainingFinished(TrainingFinished {
                kind,
                result: gateway.train_model(kind),
            })
        });
        true
    }

    /// Forget pending influence and prediction requests so their answers are discarded.
    pub(crate) fn invalidate_mode_scoped(&mut self) {
        self.pending_influence = None;
        self.pending_prediction = None;
    }

    pub(crate) fn take_status_if_current(&mut self, request_id: u64) -> Option<PendingStatus> {
        match self.pending_status {
            Some(pending) if pending.request_id == request_id => self.pending_status.take(),
            _ => None,
        }
    }

    pub(crate) fn take_influence_if_current(&mut self, request_id: u64, mode: Mode) -> bool {
        take_if_current(&mut self.pending_influence, request_id, mode)
    }

    pub(crate) fn take_prediction_if_current(&mut self, request_id: u64, mode: Mode) -> bool {
        take_if_current(&mut self.pending_prediction, request_id, mode)
    }

    pub(crate) fn finish_training(&mut self) -> Option<ModelKind> {
        self.training.take()
    }

    pub(crate) fn status_pending(&self) -> bool {
        self.pending_status.is_some()
    }

    pub(crate) fn influence_pending(&self) -> bool {
        self.pending_influence.is_some()
    }

    pub(crate) fn prediction_pending(&self) -> bool {
        self.pending_prediction.is_some()
    }

    pub(crate) fn training_in_progress(&self) -> bool {
        self.training.is_some()
    }
}

fn take_if_current(slot: &mut Option<PendingRequest>, request_id: u64, mode: Mode) -> bool {
    let current = PendingRequest { request_id, mode };
    if slot.as_ref() == Some(&current) {
        *slot = None;
        true
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_ids_are_monotonic_and_non_zero() {
        let mut jobs = ControllerJobs::new();
        jobs.next_request_id = u64::MAX;
        assert_eq!(jobs.next_request_id(), u64::MAX);
        assert_eq!(jobs.next_request_id(), 1);
        assert_eq!(jobs.next_request_id(), 2);
    }

    #[test]
    fn only_the_latest_request_is_current() {
        let mut slot = Some(PendingRequest {
            request_id: 4,
            mode: Mode::Advanced,
        });
        assert!(!take_if_current(&mut slot, 3, Mode::Advanced));
        assert!(!take_if_current(&mut slot, 4, Mode::Basic));
        assert!(take_if_current(&mut slot, 4, Mode::Advanced));
        assert!(slot.is_none());
        assert!(!take_if_current(&mut slot, 4, Mode::Advanced));
    }
}
