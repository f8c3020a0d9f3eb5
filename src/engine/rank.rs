use std::cmp::Ordering;

use crate::parameters::{ImportanceWeights, ParameterCatalog, ParameterKey};

/// Order `keys` by descending importance, ties broken by catalog order.
///
/// Missing, negative or non-finite weights rank as 0. Without a weights table
/// the catalog order is returned unchanged. The output holds every input key.
pub fn rank(
    keys: impl IntoIterator<Item = ParameterKey>,
    weights: Option<&ImportanceWeights>,
    catalog: &ParameterCatalog,
) -> Vec<ParameterKey> {
    let mut ranked: Vec<ParameterKey> = keys.into_iter().collect();
    ranked.sort_by(|a, b| catalog.compare(a, b));
    if let Some(weights) = weights {
        // Stable sort keeps the catalog order among equal weights.
        ranked.sort_by(|a, b| {
            effective_weight(weights, b)
                .partial_cmp(&effective_weight(weights, a))
                .unwrap_or(Ordering::Equal)
        });
    }
    ranked
}

fn effective_weight(weights: &ImportanceWeights, key: &ParameterKey) -> f64 {
    match weights.get(key) {
        Some(weight) if weight.is_finite() && *weight > 0.0 => *weight,
        _ => 0.0,
    }
}
