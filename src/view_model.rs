//! Helpers to convert engine and gateway data into display-ready view structs.

use crate::controller::ChartSource;
use crate::engine::ChartPoint;
use crate::gateway::{ModelKind, ModelState, ModelStatusReport, PredictionResult, SpeciesRecord};
use crate::parameters::{
    FormState, Mode, ParameterCatalog, ParameterInfluence, ParameterKey, ParameterStatus,
    ValidationError,
};

/// Most alternative species listed under a prediction.
pub const MAX_OTHER_SPECIES: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct ResultsView {
    pub species: String,
    /// Confidence as a percentage, e.g. `85.0%`.
    pub confidence_label: String,
    pub score: Option<ScoreView>,
    pub analysis: Vec<AnalysisRow>,
    pub other_species: Vec<SpeciesRecord>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScoreView {
    pub label: String,
    /// Marker position on a 0..10 gauge, normalized to `0.0..=1.0`.
    pub gauge: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisRow {
    pub key: ParameterKey,
    pub display_name: String,
    pub value: f64,
    pub status: ParameterStatus,
    pub recommendation: Option<String>,
}

/// Build the results panel for a prediction.
pub fn results_view(result: &PredictionResult, catalog: &ParameterCatalog) -> ResultsView {
    let mut keys: Vec<&ParameterKey> = result.analysis.keys().collect();
    keys.sort_by(|a, b| catalog.compare(a, b));
    let analysis = keys
        .into_iter()
        .filter_map(|key| {
            let entry = result.analysis.get(key)?;
            Some(AnalysisRow {
                key: key.clone(),
                display_name: catalog.display_name(key.as_str()).into_owned(),
                value: entry.value,
                status: entry.status,
                recommendation: entry.recommendation.clone(),
            })
        })
        .collect();
    let score = result
        .water_quality_score
        .filter(|score| score.is_finite())
        .map(|score| ScoreView {
            label: format!("{score:.1}"),
            gauge: (score / 10.0).clamp(0.0, 1.0),
        });
    let other_species = result
        .suitable_species
        .iter()
        .filter(|species| species.name != result.predicted_species)
        .take(MAX_OTHER_SPECIES)
        .cloned()
        .collect();
    ResultsView {
        species: result.predicted_species.clone(),
        confidence_label: format!("{:.1}%", result.confidence * 100.0),
        score,
        analysis,
        other_species,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MetricView {
    pub label: &'static str,
    pub value: String,
}

/// One model tile on the dashboard.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelCard {
    pub kind: ModelKind,
    pub title: &'static str,
    pub state: ModelState,
    pub badge: &'static str,
    pub metrics: Vec<MetricView>,
    /// This model is being trained right now.
    pub training: bool,
}

/// Dashboard tiles; models without a loaded status read as not trained.
pub fn model_cards(
    status: Option<&ModelStatusReport>,
    training: Option<ModelKind>,
) -> Vec<ModelCard> {
    ModelKind::ALL
        .into_iter()
        .map(|kind| {
            let entry = status.map(|report| report.get(kind));
            let state = entry.map_or(ModelState::NotTrained, |entry| entry.state);
            let metric = |name: &str| {
                entry
                    .filter(|_| state == ModelState::Available)
                    .and_then(|entry| entry.metric(name))
            };
            let mut metrics = Vec::new();
            match kind {
                ModelKind::Basic | ModelKind::Advanced => {
                    metrics.push(MetricView {
                        label: "Accuracy",
                        value: metric("accuracy").map_or_else(
                            || "N/A".to_string(),
                            |value| format!("{:.1}%", value * 100.0),
                        ),
                    });
                    if let Some(f1) = metric("f1_score") {
                        metrics.push(MetricView {
                            label: "F1 Score",
                            value: format!("{f1:.3}"),
                        });
                    }
                }
                ModelKind::WaterQuality => {
                    metrics.push(MetricView {
                        label: "R² Score",
                        value: metric("r2_score")
                            .map_or_else(|| "N/A".to_string(), |value| format!("{value:.3}")),
                    });
                    if let Some(mse) = metric("mse") {
                        metrics.push(MetricView {
                            label: "MSE",
                            value: format!("{mse:.4}"),
                        });
                    }
                }
            }
            ModelCard {
                kind,
                title: kind.label(),
                state,
                badge: state.label(),
                metrics,
                training: training == Some(kind),
            }
        })
        .collect()
}

/// One input of the prediction form.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldView {
    pub key: ParameterKey,
    pub label: String,
    pub value: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// e.g. `(Optimal: 6.5 - 8.5)` when a range is known.
    pub hint: Option<String>,
    /// Importance bar width in percent, clamped to `5..=100`.
    pub importance_width: Option<f64>,
    /// `true` when no range is known.
    pub in_range: bool,
    pub error: Option<ValidationError>,
}

pub fn form_fields(
    mode: Mode,
    forms: &FormState,
    influence: Option<&ParameterInfluence>,
    catalog: &ParameterCatalog,
) -> Vec<FieldView> {
    mode.profile()
        .specs(catalog)
        .map(|spec| {
            let value = forms.get(mode, spec.key).unwrap_or(f64::NAN);
            let range = influence.and_then(|influence| influence.range(spec.key));
            FieldView {
                key: ParameterKey::from(spec.key),
                label: spec.label(),
                value,
                min: spec.min,
                max: spec.max,
                step: spec.step,
                hint: range.map(|range| format!("(Optimal: {} - {})", range.low, range.high)),
                importance_width: influence
                    .and_then(|influence| influence.weight(spec.key))
                    .map(|weight| (weight * 100.0).clamp(5.0, 100.0)),
                in_range: range.is_none_or(|range| range.low <= value && value <= range.high),
                error: spec.validate(value).err(),
            }
        })
        .collect()
}

/// Y-axis bounds covering every range and current value.
///
/// The lower bound drops by 20% of the span and is floored at 0. The upper
/// bound then grows by 20% of the distance from that new lower bound.
pub fn y_axis_domain(points: &[ChartPoint]) -> (f64, f64) {
    if points.is_empty() {
        return (0.0, 100.0);
    }
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for point in points {
        let current = point.current.filter(|value| value.is_finite());
        for value in [Some(point.optimal_low), Some(point.optimal_high), current]
            .into_iter()
            .flatten()
        {
            min = min.min(value);
            max = max.max(value);
        }
    }
    let low = (min - (max - min) * 0.2).max(0.0);
    (low, max + (max - low) * 0.2)
}

pub fn chart_caption(source: ChartSource) -> &'static str {
    match source {
        ChartSource::LiveEdits => "Watching parameter changes in real-time",
        ChartSource::Prediction => "Current water parameters compared to optimal ranges",
        ChartSource::Sample => "Sample water parameters for visualization",
    }
}
