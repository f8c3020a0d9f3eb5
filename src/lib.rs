//! Fish habitat water-quality client: parameter evaluation and chart binding.
/// Application directory resolution.
pub mod app_dirs;
/// Settings loaded from `habitat.toml`.
pub mod config;
/// UI state and background request handling.
pub mod controller;
/// Aggregation, classification, ranking and chart binding.
pub mod engine;
/// Prediction service client with fallbacks.
pub mod gateway;
/// HTTP agent and bounded response helpers.
pub mod http_client;
/// Tracing setup.
pub mod logging;
/// Parameter catalog, modes and readings.
pub mod parameters;
/// Display-ready views of results, models, form fields and the chart.
pub mod view_model;
