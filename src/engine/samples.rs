use crate::parameters::{Mode, ParameterCatalog, ParameterKey, ParameterStatus, keys};

use super::ChartPoint;

const BASIC: [(&str, f64, f64, f64); 3] = [
    (keys::PH, 6.5, 8.5, 7.2),
    (keys::TEMPERATURE, 22.0, 30.0, 28.5),
    (keys::TURBIDITY, 30.0, 80.0, 45.2),
];

const ADVANCED: [(&str, f64, f64, f64); 5] = [
    (keys::PH, 6.5, 8.5, 7.2),
    (keys::TEMPERATURE, 22.0, 30.0, 28.5),
    (keys::DISSOLVED_OXYGEN, 5.0, 9.0, 6.8),
    (keys::CO2, 5.0, 15.0, 10.2),
    (keys::AMMONIA, 0.0, 0.1, 0.05),
];

/// Fixed chart shown while no range table is available for `mode`.
pub fn sample_points(mode: Mode, catalog: &ParameterCatalog) -> Vec<ChartPoint> {
    let rows: &[(&str, f64, f64, f64)] = match mode {
        Mode::Basic => &BASIC,
        Mode::Advanced => &ADVANCED,
    };
    rows.iter()
        .map(|(key, low, high, current)| ChartPoint {
            key: ParameterKey::from(*key),
            display_name: catalog.display_name(key).into_owned(),
            optimal_low: *low,
            optimal_high: *high,
            current: Some(*current),
            status: ParameterStatus::Optimal,
        })
        .collect()
}
