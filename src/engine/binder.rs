use serde::Serialize;

use crate::parameters::{
    ImportanceWeights, Mode, Observations, OptimalRanges, ParameterCatalog, ParameterKey,
    ParameterStatus,
};

use super::classify::classify;
use super::rank::rank;
use super::samples::sample_points;

/// Most parameters the chart displays at once.
pub const MAX_CHART_POINTS: usize = 6;

/// One bar group of the comparison chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartPoint {
    pub key: ParameterKey,
    pub display_name: String,
    pub optimal_low: f64,
    pub optimal_high: f64,
    /// `None` when no source observed the parameter.
    pub current: Option<f64>,
    pub status: ParameterStatus,
}

impl ChartPoint {
    /// Equality that treats two NaN readings as the same value.
    fn same_as(&self, other: &ChartPoint) -> bool {
        self.key == other.key
            && self.display_name == other.display_name
            && self.optimal_low.to_bits() == other.optimal_low.to_bits()
            && self.optimal_high.to_bits() == other.optimal_high.to_bits()
            && self.current.map(f64::to_bits) == other.current.map(f64::to_bits)
            && self.status == other.status
    }
}

/// Build the chart for `mode`: classify, rank, keep the top entries.
///
/// Only ranges for the mode's own parameters are charted. With no range table
/// at all the built-in sample chart is returned instead.
pub fn bind(
    mode: Mode,
    observations: &Observations,
    ranges: Option<&OptimalRanges>,
    weights: Option<&ImportanceWeights>,
) -> Vec<ChartPoint> {
    bind_with(&ParameterCatalog::standard(), mode, observations, ranges, weights)
}

pub fn bind_with(
    catalog: &ParameterCatalog,
    mode: Mode,
    observations: &Observations,
    ranges: Option<&OptimalRanges>,
    weights: Option<&ImportanceWeights>,
) -> Vec<ChartPoint> {
    let Some(ranges) = ranges else {
        return sample_points(mode, catalog);
    };
    let mode_ranges: OptimalRanges = ranges
        .iter()
        .filter(|(key, _)| mode.contains(key.as_str()))
        .map(|(key, range)| (key.clone(), *range))
        .collect();
    let classified = classify(observations, &mode_ranges);
    rank(classified.keys().cloned(), weights, catalog)
        .into_iter()
        .take(MAX_CHART_POINTS)
        .filter_map(|key| {
            let entry = classified.get(key.as_str())?;
            Some(ChartPoint {
                display_name: catalog.display_name(key.as_str()).into_owned(),
                optimal_low: entry.range.low,
                optimal_high: entry.range.high,
                current: entry.value,
                status: entry.status,
                key,
            })
        })
        .collect()
}

/// Memo of the last bound chart, used to tell whether a recompute changed anything.
#[derive(Debug, Default)]
pub struct ChartBinder {
    catalog: ParameterCatalog,
    points: Vec<ChartPoint>,
}

impl ChartBinder {
    pub fn new(catalog: ParameterCatalog) -> Self {
        Self {
            catalog,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[ChartPoint] {
        &self.points
    }

    /// Recompute the chart; returns `true` when the output differs from the memo.
    pub fn refresh(
        &mut self,
        mode: Mode,
        observations: &Observations,
        ranges: Option<&OptimalRanges>,
        weights: Option<&ImportanceWeights>,
    ) -> bool {
        let next = bind_with(&self.catalog, mode, observations, ranges, weights);
        let unchanged = next.len() == self.points.len()
            && next.iter().zip(&self.points).all(|(a, b)| a.same_as(b));
        if unchanged {
            return false;
        }
        self.points = next;
        true
    }
}
