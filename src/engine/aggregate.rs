use crate::gateway::PredictionResult;
use crate::parameters::{Mode, Observations, Readings};

/// Merge the available sources into one observation map for `mode`.
///
/// Live form values win in full. Otherwise the last prediction's analysis
/// supplies the values, restricted to the mode's keys. With neither, the map
/// is empty. Values are never coerced; NaN passes through.
pub fn aggregate(
    mode: Mode,
    live: Option<&Readings>,
    last: Option<&PredictionResult>,
) -> Observations {
    if let Some(readings) = live.filter(|readings| readings.mode() == mode) {
        return readings.observations();
    }
    match last {
        Some(result) => result
            .analysis
            .iter()
            .filter(|(key, _)| mode.contains(key.as_str()))
            .map(|(key, entry)| (key.clone(), entry.value))
            .collect(),
        None => Observations::new(),
    }
}
