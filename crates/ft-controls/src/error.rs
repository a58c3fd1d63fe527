//! Error types for controller construction and evaluation.

use ft_core::FtError;
use thiserror::Error;

/// Result type for controller operations.
pub type ControlResult<T> = Result<T, ControlError>;

/// Errors that can occur while configuring or stepping a controller.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ControlError {
    /// A scalar parameter violates its constraint.
    #[error("Invalid parameter {param} = {value}: {constraint}")]
    InvalidParameter {
        param: &'static str,
        constraint: &'static str,
        value: f64,
    },

    /// Membership function parameters are out of order.
    #[error("Domain mismatch in {context}: {what}")]
    DomainMismatch { context: String, what: String },

    /// A rule references a fuzzy set that its variable does not define.
    #[error("Unknown fuzzy set '{set}' for variable '{variable}'")]
    UnknownSet { variable: String, set: String },

    /// Structurally invalid fuzzy configuration.
    #[error("Invalid fuzzy configuration: {what}")]
    InvalidConfig { what: String },

    /// Configuration text could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

impl From<FtError> for ControlError {
    fn from(e: FtError) -> Self {
        match e {
            FtError::NonFinite { what, value } => ControlError::InvalidParameter {
                param: what,
                constraint: "must be finite",
                value,
            },
            FtError::InvalidParameter {
                param,
                constraint,
                value,
            } => ControlError::InvalidParameter {
                param,
                constraint,
                value,
            },
            FtError::DomainMismatch { what } => ControlError::DomainMismatch {
                context: "core".to_string(),
                what,
            },
        }
    }
}

impl From<serde_yaml::Error> for ControlError {
    fn from(e: serde_yaml::Error) -> Self {
        ControlError::Parse(e.to_string())
    }
}
