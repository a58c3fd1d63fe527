use crate::{FtError, FtResult};

/// Floating point type used throughout system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> FtResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FtError::NonFinite { what, value: v })
    }
}

/// Strictly positive and finite (time constants, step sizes, durations).
pub fn ensure_positive(v: Real, param: &'static str) -> FtResult<Real> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(FtError::InvalidParameter {
            param,
            constraint: "must be finite and > 0",
            value: v,
        })
    }
}

/// Finite and >= 0 (controller gains).
pub fn ensure_non_negative(v: Real, param: &'static str) -> FtResult<Real> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(FtError::InvalidParameter {
            param,
            constraint: "must be finite and >= 0",
            value: v,
        })
    }
}

/// Finite, any sign (temperatures, signed plant gain).
pub fn ensure_finite_param(v: Real, param: &'static str) -> FtResult<Real> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(FtError::InvalidParameter {
            param,
            constraint: "must be finite",
            value: v,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.5, "dt").is_ok());
        assert!(ensure_positive(0.0, "dt").is_err());
        assert!(ensure_positive(-1.0, "dt").is_err());
        assert!(ensure_positive(Real::INFINITY, "dt").is_err());
    }

    #[test]
    fn invalid_parameter_names_param_and_constraint() {
        let err = ensure_positive(-2.0, "tau").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("tau"));
        assert!(msg.contains("> 0"));
        assert!(msg.contains("-2"));
    }

    #[test]
    fn ensure_non_negative_allows_zero() {
        assert!(ensure_non_negative(0.0, "kd").is_ok());
        assert!(ensure_non_negative(-0.1, "kd").is_err());
        assert!(ensure_non_negative(Real::NAN, "kd").is_err());
    }
}
