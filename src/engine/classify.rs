use std::collections::BTreeMap;

use crate::parameters::{Observations, OptimalRange, OptimalRanges, ParameterKey, ParameterStatus};

/// An observation paired with the range it was judged against.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClassifiedObservation {
    /// `None` when no source observed the parameter.
    pub value: Option<f64>,
    pub status: ParameterStatus,
    pub range: OptimalRange,
}

/// Verdicts for every parameter that has an optimal range.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    entries: BTreeMap<ParameterKey, ClassifiedObservation>,
}

impl Classification {
    pub fn get(&self, key: &str) -> Option<&ClassifiedObservation> {
        self.entries.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParameterKey, &ClassifiedObservation)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ParameterKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: ParameterStatus) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.status == status)
            .count()
    }

    /// Share of comparable parameters inside their range; `None` when nothing was comparable.
    pub fn in_range_fraction(&self) -> Option<f64> {
        let optimal = self.count(ParameterStatus::Optimal);
        let comparable = optimal + self.count(ParameterStatus::Suboptimal);
        (comparable > 0).then(|| optimal as f64 / comparable as f64)
    }
}

/// Judge each ranged parameter against its observation.
///
/// Observed keys without a range are left out; they stay available in the
/// raw observation map.
pub fn classify(observations: &Observations, ranges: &OptimalRanges) -> Classification {
    let entries = ranges
        .iter()
        .map(|(key, range)| {
            let value = observations.get(key).copied();
            let status = value.map_or(ParameterStatus::Unknown, |value| range.status_of(value));
            let entry = ClassifiedObservation {
                value,
                status,
                range: *range,
            };
            (key.clone(), entry)
        })
        .collect();
    Classification { entries }
}
