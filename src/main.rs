//! Headless entry point: loads settings, contacts the prediction service and
//! prints the dashboard, optional prediction and chart for one mode.
//!
//! Usage: `habitat [basic|advanced] [--predict] [key=value ...]`

use std::time::Duration;

use habitat::config;
use habitat::controller::HabitatController;
use habitat::gateway::RemoteGateway;
use habitat::logging;
use habitat::parameters::{Mode, parse_input};
use habitat::view_model;

const JOB_TIMEOUT: Duration = Duration::from_secs(120);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = config::load_or_default()?;
    if let Err(err) = logging::init(&settings.logging) {
        eprintln!("Logging disabled: {err}");
    }

    let mut mode = Mode::Basic;
    let mut predict = false;
    let mut edits = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "basic" => mode = Mode::Basic,
            "advanced" => mode = Mode::Advanced,
            "--predict" => predict = true,
            other => match other.split_once('=') {
                Some((key, value)) => edits.push((key.to_string(), parse_input(value))),
                None => return Err(format!("Unrecognized argument: {other}").into()),
            },
        }
    }

    let mut controller = HabitatController::start(RemoteGateway::from_settings(&settings));
    controller.switch_mode(mode);
    for (key, value) in edits {
        if !controller.edit_field(&key, value) {
            return Err(format!("{key} is not a {mode} parameter").into());
        }
    }
    if !controller.wait_for_jobs(JOB_TIMEOUT) {
        tracing::warn!("Timed out waiting for the prediction service");
    }
    if predict {
        controller.submit_prediction();
        if !controller.wait_for_jobs(JOB_TIMEOUT) {
            tracing::warn!("Timed out waiting for the prediction");
        }
    }

    let state = controller.state();
    if let Some(notice) = &state.notice {
        println!("! {}", notice.text);
    }
    for card in view_model::model_cards(state.model_status.as_ref(), state.training_model) {
        let metrics: Vec<String> = card
            .metrics
            .iter()
            .map(|metric| format!("{}: {}", metric.label, metric.value))
            .collect();
        println!("{:<20} {:<12} {}", card.title, card.badge, metrics.join(", "));
    }
    let fields = view_model::form_fields(
        mode,
        &state.forms,
        state.active_influence(),
        controller.catalog(),
    );
    for field in fields {
        let warning = match &field.error {
            Some(err) => format!("  [{err}]"),
            None => String::new(),
        };
        println!(
            "  {:<26} {:>10} {}{warning}",
            field.label,
            field.value,
            field.hint.unwrap_or_default()
        );
    }
    if let Some(result) = &state.prediction {
        let view = view_model::results_view(result, controller.catalog());
        println!("Predicted species: {} ({})", view.species, view.confidence_label);
        if let Some(score) = &view.score {
            println!("Water quality score: {}", score.label);
        }
        for row in &view.analysis {
            println!("  {:<18} {:>10} {}", row.display_name, row.value, row.status.label());
            if let Some(recommendation) = &row.recommendation {
                println!("      {recommendation}");
            }
        }
        for species in &view.other_species {
            println!("  Also suitable: {}", species.name);
        }
    }

    println!("{}", view_model::chart_caption(controller.chart_source()));
    let (low, high) = view_model::y_axis_domain(controller.chart());
    println!("Axis {low:.2} .. {high:.2}");
    for point in controller.chart() {
        let current = point
            .current
            .map_or_else(|| "-".to_string(), |value| value.to_string());
        println!(
            "  {:<18} {:>8} in [{} - {}] {}",
            point.display_name,
            current,
            point.optimal_low,
            point.optimal_high,
            point.status.label()
        );
    }
    Ok(())
}
