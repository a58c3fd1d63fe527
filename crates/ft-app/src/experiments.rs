//! The three controller comparisons.
//!
//! 1. **Basic**: fuzzy (centroid) vs PID from the initial temperature
//! 2. **Disturbance**: the same pair with ambient steps at 30 % and 60 % of
//!    the run
//! 3. **Defuzzification**: centroid, bisector and mean of maximum side by side
//!
//! Every run gets its own plant and, for PID, its own controller state. The
//! fuzzy system is built once and shared.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use ft_controls::{Controller, ControllerKind, Defuzzification, FuzzyController, FuzzySystem};
use ft_sim::{
    Disturbance, Metrics, SimOptions, ThermalPlant, TimeSeries, compute_metrics, run_closed_loop,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::params::ExperimentParams;
use crate::report::ComparisonTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperimentKind {
    Basic,
    Disturbance,
    Defuzzification,
}

impl ExperimentKind {
    pub const ALL: [ExperimentKind; 3] = [
        ExperimentKind::Basic,
        ExperimentKind::Disturbance,
        ExperimentKind::Defuzzification,
    ];

    /// Short name used on the command line and in file names.
    pub fn name(&self) -> &'static str {
        match self {
            ExperimentKind::Basic => "basic",
            ExperimentKind::Disturbance => "disturbance",
            ExperimentKind::Defuzzification => "defuzz",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ExperimentKind::Basic => "Fuzzy vs PID",
            ExperimentKind::Disturbance => "Disturbance rejection",
            ExperimentKind::Defuzzification => "Defuzzification methods",
        }
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExperimentKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(ExperimentKind::Basic),
            "disturbance" => Ok(ExperimentKind::Disturbance),
            "defuzz" | "defuzzification" => Ok(ExperimentKind::Defuzzification),
            other => Err(AppError::UnknownExperiment(other.to_string())),
        }
    }
}

/// Ambient +3 °C at 30 % and -4 °C at 60 % of `duration`.
pub fn disturbance_schedule(duration: f64) -> Vec<Disturbance> {
    vec![
        Disturbance::offset_ambient(0.3 * duration, 3.0),
        Disturbance::offset_ambient(0.6 * duration, -4.0),
    ]
}

/// One controller's run inside an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    pub controller: ControllerKind,
    pub label: String,
    pub series: TimeSeries,
    pub metrics: Metrics,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub experiment: ExperimentKind,
    pub disturbances: Vec<Disturbance>,
    pub runs: Vec<RunResult>,
    pub table: ComparisonTable,
}

impl ExperimentResult {
    fn new(
        experiment: ExperimentKind,
        disturbances: Vec<Disturbance>,
        runs: Vec<RunResult>,
    ) -> Self {
        let labels = runs.iter().map(|r| r.label.clone()).collect();
        let metrics: Vec<Metrics> = runs.iter().map(|r| r.metrics).collect();
        Self {
            experiment,
            disturbances,
            table: ComparisonTable::new(labels, &metrics),
            runs,
        }
    }

    pub fn run(&self, controller: ControllerKind) -> Option<&RunResult> {
        self.runs.iter().find(|r| r.controller == controller)
    }
}

/// Runs experiments for one parameter set against one fuzzy system.
#[derive(Debug, Clone)]
pub struct ExperimentRunner {
    params: ExperimentParams,
    system: Arc<FuzzySystem>,
}

impl ExperimentRunner {
    pub fn new(params: ExperimentParams, system: Arc<FuzzySystem>) -> AppResult<Self> {
        params.validate()?;
        Ok(Self { params, system })
    }

    /// Runner over the built-in HVAC rule base.
    pub fn hvac(params: ExperimentParams) -> AppResult<Self> {
        let system = FuzzySystem::new(ft_controls::hvac::hvac_config()?)?;
        Self::new(params, Arc::new(system))
    }

    pub fn params(&self) -> &ExperimentParams {
        &self.params
    }

    pub fn run(&self, kind: ExperimentKind) -> AppResult<ExperimentResult> {
        info!(experiment = %kind, "running experiment");
        let result = match kind {
            ExperimentKind::Basic => self.fuzzy_vs_pid(kind, Vec::new())?,
            ExperimentKind::Disturbance => {
                self.fuzzy_vs_pid(kind, disturbance_schedule(self.params.duration))?
            }
            ExperimentKind::Defuzzification => {
                let opts = self.params.sim_options();
                let runs = Defuzzification::COMPARED
                    .par_iter()
                    .map(|&method| self.run_fuzzy(method, &opts))
                    .collect::<AppResult<Vec<_>>>()?;
                ExperimentResult::new(kind, Vec::new(), runs)
            }
        };
        info!(
            experiment = %kind,
            winner = result.table.overall_winner().unwrap_or("none"),
            "experiment finished"
        );
        Ok(result)
    }

    pub fn run_all(&self) -> AppResult<Vec<ExperimentResult>> {
        ExperimentKind::ALL.iter().map(|&kind| self.run(kind)).collect()
    }

    fn fuzzy_vs_pid(
        &self,
        kind: ExperimentKind,
        disturbances: Vec<Disturbance>,
    ) -> AppResult<ExperimentResult> {
        let opts = self.params.sim_options().with_disturbances(disturbances.clone());
        let runs = vec![
            self.run_fuzzy(Defuzzification::Centroid, &opts)?,
            self.run_pid(&opts)?,
        ];
        Ok(ExperimentResult::new(kind, disturbances, runs))
    }

    fn run_fuzzy(&self, method: Defuzzification, opts: &SimOptions) -> AppResult<RunResult> {
        let mut controller = FuzzyController::new(Arc::clone(&self.system), method);
        self.run_one(&mut controller, opts)
    }

    fn run_pid(&self, opts: &SimOptions) -> AppResult<RunResult> {
        let mut controller = ft_controls::PidController::new(self.params.pid_config()?);
        self.run_one(&mut controller, opts)
    }

    fn run_one(&self, controller: &mut dyn Controller, opts: &SimOptions) -> AppResult<RunResult> {
        let mut plant = ThermalPlant::new(self.params.plant_config())?;
        let series = run_closed_loop(controller, &mut plant, opts)?;
        let metrics = compute_metrics(&series);
        let kind = controller.kind();
        Ok(RunResult {
            controller: kind,
            label: kind.label(),
            series,
            metrics,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_experiment_names() {
        assert_eq!(
            "defuzz".parse::<ExperimentKind>().unwrap(),
            ExperimentKind::Defuzzification
        );
        assert_eq!("basic".parse::<ExperimentKind>().unwrap(), ExperimentKind::Basic);
        assert!(matches!(
            "chaos".parse::<ExperimentKind>(),
            Err(AppError::UnknownExperiment(_))
        ));
    }

    #[test]
    fn schedule_scales_with_duration() {
        let schedule = disturbance_schedule(200.0);
        assert_eq!(schedule[0], Disturbance::offset_ambient(60.0, 3.0));
        assert_eq!(schedule[1], Disturbance::offset_ambient(120.0, -4.0));
    }

    #[test]
    fn runner_rejects_invalid_params() {
        let params = ExperimentParams {
            dt: 0.0,
            ..ExperimentParams::default()
        };
        assert!(matches!(
            ExperimentRunner::hvac(params),
            Err(AppError::Validation(_))
        ));
    }
}
