//! Experiment parameters: defaults, YAML loading and validation.

use std::path::Path;

use ft_controls::{ControlAction, FuzzySystemConfig, PidConfig};
use ft_sim::{IntegratorType, PlantConfig, SimOptions};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Everything an experiment needs besides the fuzzy rule base.
///
/// Missing YAML keys take the [`Default`] values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentParams {
    pub initial_temperature: f64,
    pub ambient_temperature: f64,
    pub setpoint: f64,
    /// Simulated seconds per run.
    pub duration: f64,
    pub dt: f64,
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub pid_action: ControlAction,
    /// Plant time constant `tau` in seconds.
    pub time_constant: f64,
    /// Plant temperature rate per percent of power; negative for cooling.
    pub plant_gain: f64,
    pub integrator: IntegratorType,
}

impl Default for ExperimentParams {
    fn default() -> Self {
        Self {
            initial_temperature: 20.0,
            ambient_temperature: 30.0,
            setpoint: 22.0,
            duration: 100.0,
            dt: 0.5,
            kp: 8.0,
            ki: 0.3,
            kd: 2.0,
            pid_action: ControlAction::Reverse,
            time_constant: 5.0,
            plant_gain: -0.08,
            integrator: IntegratorType::ForwardEuler,
        }
    }
}

impl ExperimentParams {
    pub fn from_yaml_str(content: &str) -> AppResult<Self> {
        let params: Self = serde_yaml::from_str(content)?;
        params.validate()?;
        Ok(params)
    }

    pub fn to_yaml_string(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Check every derived configuration before anything runs.
    pub fn validate(&self) -> AppResult<()> {
        let plant = self.plant_config();
        plant
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.sim_options()
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        plant
            .check_step(self.dt)
            .map_err(|e| AppError::Validation(e.to_string()))?;
        self.pid_config()?;
        Ok(())
    }

    pub fn plant_config(&self) -> PlantConfig {
        PlantConfig {
            initial_temperature: self.initial_temperature,
            ambient_temperature: self.ambient_temperature,
            time_constant: self.time_constant,
            gain: self.plant_gain,
            integrator: self.integrator,
        }
    }

    pub fn sim_options(&self) -> SimOptions {
        SimOptions::new(self.setpoint, self.duration, self.dt)
    }

    pub fn pid_config(&self) -> AppResult<PidConfig> {
        PidConfig::with_power_limits(self.kp, self.ki, self.kd)
            .map(|config| config.with_action(self.pid_action))
            .map_err(|e| AppError::Validation(e.to_string()))
    }
}

/// Load and validate parameters from a YAML file.
pub fn load_params(path: &Path) -> AppResult<ExperimentParams> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    ExperimentParams::from_yaml_str(&content)
}

/// Load a fuzzy system description from a YAML file.
pub fn load_fuzzy_config(path: &Path) -> AppResult<FuzzySystemConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(FuzzySystemConfig::from_yaml_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = ExperimentParams::default();
        params.validate().unwrap();
        assert_eq!(params.sim_options().steps(), 200);
        assert_eq!(params.pid_config().unwrap().action, ControlAction::Reverse);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let params = ExperimentParams::from_yaml_str("setpoint: 24.0\nkp: 5\n").unwrap();
        assert_eq!(params.setpoint, 24.0);
        assert_eq!(params.kp, 5.0);
        assert_eq!(params.ki, 0.3);
        assert_eq!(params.duration, 100.0);
    }

    #[test]
    fn yaml_round_trip() {
        let params = ExperimentParams {
            pid_action: ControlAction::Direct,
            plant_gain: 0.05,
            integrator: IntegratorType::RK4,
            ..ExperimentParams::default()
        };
        let yaml = params.to_yaml_string().unwrap();
        assert!(yaml.contains("pid_action: direct"));
        assert_eq!(ExperimentParams::from_yaml_str(&yaml).unwrap(), params);
    }

    #[test]
    fn invalid_values_rejected() {
        for yaml in [
            "time_constant: 0.0",
            "dt: -0.5",
            "duration: 0.0",
            "dt: 200.0",
            "kp: -1.0",
        ] {
            let err = ExperimentParams::from_yaml_str(yaml).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{yaml}: {err}");
        }
        assert!(matches!(
            ExperimentParams::from_yaml_str("setpoint: [1").unwrap_err(),
            AppError::Yaml(_)
        ));
    }

    #[test]
    fn euler_unstable_step_rejected() {
        let err = ExperimentParams::from_yaml_str("dt: 10.0").unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("forward Euler"), "{msg}"),
            other => panic!("unexpected error: {other}"),
        }
        // RK4 tolerates the same step
        assert!(ExperimentParams::from_yaml_str("dt: 10.0\nintegrator: rk4").is_ok());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = std::env::temp_dir().join("ft_app_params_missing.yaml");
        let _ = std::fs::remove_file(&path);
        match load_params(&path) {
            Err(AppError::FileRead { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
