//! Experiment service layer for fuzzytherm.
//!
//! Loads experiment parameters, runs the three controller comparisons,
//! tabulates their metrics and exports series and reports. The CLI is a thin
//! shell over this crate.

pub mod error;
pub mod experiments;
pub mod export;
pub mod params;
pub mod report;

pub use error::{AppError, AppResult};
pub use experiments::{
    ExperimentKind, ExperimentResult, ExperimentRunner, RunResult, disturbance_schedule,
};
pub use export::{
    ExperimentSummary, Report, RunSummary, export_experiment, series_csv, write_report_json,
};
pub use params::{ExperimentParams, load_fuzzy_config, load_params};
pub use report::{ComparisonTable, MetricRow};
