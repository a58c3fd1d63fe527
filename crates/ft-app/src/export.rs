//! CSV series and JSON report export.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use ft_sim::{Metrics, TimeSeries};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::experiments::{ExperimentKind, ExperimentResult};
use crate::params::ExperimentParams;
use crate::report::ComparisonTable;

/// `time,temperature,control_signal,setpoint` rows, one per sample.
pub fn series_csv(series: &TimeSeries) -> String {
    let mut out = String::from("time,temperature,control_signal,setpoint\n");
    let setpoint = series.setpoint();
    for s in series.samples() {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{}",
            s.time, s.temperature, s.control_signal, setpoint
        );
    }
    out
}

/// File-name friendly form of a run label, e.g. `fuzzy_centroid`.
fn slug(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('_') && !slug.is_empty() {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

fn write_file(path: &Path, content: &str) -> AppResult<()> {
    fs::write(path, content).map_err(|source| AppError::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write one CSV per run of `result` into `dir`, returning the paths.
pub fn export_experiment(dir: &Path, result: &ExperimentResult) -> AppResult<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    result
        .runs
        .iter()
        .map(|run| {
            let path = dir.join(format!("{}_{}.csv", result.experiment, slug(&run.label)));
            write_file(&path, &series_csv(&run.series))?;
            Ok(path)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub label: String,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub experiment: ExperimentKind,
    pub title: String,
    pub runs: Vec<RunSummary>,
    pub table: ComparisonTable,
    pub overall_winner: Option<String>,
}

/// Metrics of every experiment, without the raw series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// RFC 3339 UTC timestamp.
    pub generated_at: String,
    pub params: ExperimentParams,
    pub experiments: Vec<ExperimentSummary>,
}

impl Report {
    pub fn new(params: &ExperimentParams, results: &[ExperimentResult]) -> Self {
        let experiments = results
            .iter()
            .map(|result| ExperimentSummary {
                experiment: result.experiment,
                title: result.experiment.title().to_string(),
                runs: result
                    .runs
                    .iter()
                    .map(|run| RunSummary {
                        label: run.label.clone(),
                        metrics: run.metrics,
                    })
                    .collect(),
                table: result.table.clone(),
                overall_winner: result.table.overall_winner().map(str::to_string),
            })
            .collect();
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            params: params.clone(),
            experiments,
        }
    }
}

pub fn write_report_json(path: &Path, report: &Report) -> AppResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    write_file(path, &json)
}
