//! Error types for the ft-app service layer.

use std::path::PathBuf;

/// Unified error for experiment orchestration, used by the CLI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Failed to read {path}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    FileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parameter validation failed: {0}")]
    Validation(String),

    #[error("Controller error: {0}")]
    Control(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Unknown experiment: {0}")]
    UnknownExperiment(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for ft-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<ft_controls::ControlError> for AppError {
    fn from(err: ft_controls::ControlError) -> Self {
        AppError::Control(err.to_string())
    }
}

impl From<ft_sim::SimError> for AppError {
    fn from(err: ft_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
