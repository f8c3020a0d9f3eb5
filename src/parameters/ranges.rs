use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ParameterKey;

/// Outcome of comparing one observation with its optimal range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterStatus {
    Optimal,
    Suboptimal,
    /// No usable observation or no range; neither passing nor failing.
    #[default]
    #[serde(other)]
    Unknown,
}

impl ParameterStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Suboptimal => "Suboptimal",
            Self::Unknown => "Unknown",
        }
    }
}

/// Closed interval `[low, high]` of values considered optimal.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    pub low: f64,
    pub high: f64,
}

impl OptimalRange {
    /// Build a range, rejecting non-finite bounds and `low > high`.
    pub fn new(low: f64, high: f64) -> Option<Self> {
        if low.is_finite() && high.is_finite() && low <= high {
            Some(Self { low, high })
        } else {
            None
        }
    }

    /// Inclusive at both ends; non-finite values are `Unknown`.
    pub fn status_of(&self, value: f64) -> ParameterStatus {
        if !value.is_finite() {
            return ParameterStatus::Unknown;
        }
        if self.low <= value && value <= self.high {
            ParameterStatus::Optimal
        } else {
            ParameterStatus::Suboptimal
        }
    }
}

pub type OptimalRanges = BTreeMap<ParameterKey, OptimalRange>;

/// Relative ranking score per parameter; missing keys rank as weight 0.
pub type ImportanceWeights = BTreeMap<ParameterKey, f64>;

/// Range and weight tables published for one mode's model.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterInfluence {
    /// `None` when the service published no importance table at all.
    pub importance: Option<ImportanceWeights>,
    pub optimal_ranges: OptimalRanges,
}

impl ParameterInfluence {
    pub fn range(&self, key: &str) -> Option<&OptimalRange> {
        self.optimal_ranges.get(key)
    }

    pub fn weight(&self, key: &str) -> Option<f64> {
        self.importance.as_ref().and_then(|weights| weights.get(key).copied())
    }
}
