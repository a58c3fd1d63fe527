use thiserror::Error;

pub type FtResult<T> = Result<T, FtError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FtError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid parameter {param} = {value}: {constraint}")]
    InvalidParameter {
        param: &'static str,
        constraint: &'static str,
        value: f64,
    },

    #[error("Domain mismatch: {what}")]
    DomainMismatch { what: String },
}
