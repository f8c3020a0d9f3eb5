//! Locally synthesized data used when a read from the service fails.

use crate::parameters::{
    ImportanceWeights, Mode, OptimalRange, OptimalRanges, ParameterInfluence, ParameterKey,
    ParameterStatus, Readings, keys,
};

use super::types::{AnalysisEntry, ModelStatusReport, PredictionResult, SpeciesRecord};

/// Species reported when no prediction could be made.
pub const DEFAULT_SPECIES: &str = "Tilapia";

const BASIC_WEIGHTS: [(&str, f64); 3] = [
    (keys::PH, 0.3),
    (keys::TEMPERATURE, 0.4),
    (keys::TURBIDITY, 0.3),
];

const RANGES: [(&str, f64, f64); 14] = [
    (keys::PH, 6.5, 8.5),
    (keys::TEMPERATURE, 22.0, 30.0),
    (keys::TURBIDITY, 30.0, 80.0),
    (keys::DISSOLVED_OXYGEN, 5.0, 9.0),
    (keys::BOD, 0.0, 3.0),
    (keys::CO2, 5.0, 15.0),
    (keys::ALKALINITY, 100.0, 180.0),
    (keys::HARDNESS, 120.0, 200.0),
    (keys::CALCIUM, 30.0, 60.0),
    (keys::AMMONIA, 0.0, 0.1),
    (keys::NITRITE, 0.0, 0.05),
    (keys::PHOSPHORUS, 0.0, 0.5),
    (keys::H2S, 0.0, 0.01),
    (keys::PLANKTON, 300.0, 800.0),
];

pub fn unknown_status() -> ModelStatusReport {
    ModelStatusReport::unknown()
}

/// Built-in range and weight tables for `mode`.
pub fn influence_table(mode: Mode) -> ParameterInfluence {
    let optimal_ranges: OptimalRanges = RANGES
        .iter()
        .filter(|(key, _, _)| mode.contains(key))
        .filter_map(|(key, low, high)| {
            Some((ParameterKey::from(*key), OptimalRange::new(*low, *high)?))
        })
        .collect();
    let importance: ImportanceWeights = match mode {
        Mode::Basic => BASIC_WEIGHTS
            .iter()
            .map(|(key, weight)| (ParameterKey::from(*key), *weight))
            .collect(),
        Mode::Advanced => {
            let weight = 1.0 / optimal_ranges.len() as f64;
            optimal_ranges.keys().map(|key| (key.clone(), weight)).collect()
        }
    };
    ParameterInfluence {
        importance: Some(importance),
        optimal_ranges,
    }
}

/// Echo the submitted readings back with unknown status and the default species.
pub fn fallback_prediction(readings: &Readings) -> PredictionResult {
    let analysis = readings
        .observations()
        .into_iter()
        .map(|(key, value)| {
            let entry = AnalysisEntry {
                value,
                status: ParameterStatus::Unknown,
                recommendation: None,
            };
            (key, entry)
        })
        .collect();
    PredictionResult {
        predicted_species: DEFAULT_SPECIES.to_string(),
        confidence: 0.0,
        water_quality_score: None,
        analysis,
        suitable_species: vec![SpeciesRecord::named(DEFAULT_SPECIES)],
    }
}
