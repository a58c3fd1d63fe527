//! Error types for simulation operations.

use ft_controls::ControlError;
use ft_core::FtError;
use thiserror::Error;

/// Errors encountered while configuring or running a simulation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error("Invalid parameter {param} = {value}: {constraint}")]
    InvalidParameter {
        param: &'static str,
        constraint: &'static str,
        value: f64,
    },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Controller error: {0}")]
    Control(#[from] ControlError),
}

pub type SimResult<T> = Result<T, SimError>;

impl From<FtError> for SimError {
    fn from(e: FtError) -> Self {
        match e {
            FtError::NonFinite { what, value } => SimError::InvalidParameter {
                param: what,
                constraint: "must be finite",
                value,
            },
            FtError::InvalidParameter {
                param,
                constraint,
                value,
            } => SimError::InvalidParameter {
                param,
                constraint,
                value,
            },
            FtError::DomainMismatch { .. } => SimError::InvalidArg {
                what: "domain mismatch",
            },
        }
    }
}
