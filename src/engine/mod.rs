//! Observation pipeline: aggregate, classify, rank, bind.
//!
//! Everything here is pure and synchronous; the controller calls it after
//! every edit, mode switch or applied result.

mod aggregate;
mod binder;
mod classify;
mod rank;
mod samples;

pub use aggregate::aggregate;
pub use binder::{ChartBinder, ChartPoint, MAX_CHART_POINTS, bind, bind_with};
pub use classify::{Classification, ClassifiedObservation, classify};
pub use rank::rank;
pub use samples::sample_points;
