//! Membership functions and named fuzzy sets.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};

/// Maps a crisp value to a degree of membership in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum MembershipFunction {
    /// Peak at `b`, zero outside `[a, c]`. `a == b` or `b == c` gives a shoulder.
    Triangular { a: f64, b: f64, c: f64 },
    /// Plateau on `[b, c]`, zero outside `[a, d]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
    /// Bell curve centred on `mean`.
    Gaussian { mean: f64, sigma: f64 },
}

impl MembershipFunction {
    /// Triangular function, requires `a <= b <= c`.
    pub fn triangular(a: f64, b: f64, c: f64) -> ControlResult<Self> {
        let mf = Self::Triangular { a, b, c };
        mf.validate()?;
        Ok(mf)
    }

    /// Trapezoidal function, requires `a <= b <= c <= d`.
    pub fn trapezoidal(a: f64, b: f64, c: f64, d: f64) -> ControlResult<Self> {
        let mf = Self::Trapezoidal { a, b, c, d };
        mf.validate()?;
        Ok(mf)
    }

    /// Gaussian function, requires `sigma > 0`.
    pub fn gaussian(mean: f64, sigma: f64) -> ControlResult<Self> {
        let mf = Self::Gaussian { mean, sigma };
        mf.validate()?;
        Ok(mf)
    }

    /// Check parameter ordering and finiteness.
    pub fn validate(&self) -> ControlResult<()> {
        match *self {
            Self::Triangular { a, b, c } => {
                check_finite(&[a, b, c], "triangular")?;
                if a > b || b > c {
                    return Err(ControlError::DomainMismatch {
                        context: "triangular".to_string(),
                        what: format!("expected a <= b <= c, got ({a}, {b}, {c})"),
                    });
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                check_finite(&[a, b, c, d], "trapezoidal")?;
                if a > b || b > c || c > d {
                    return Err(ControlError::DomainMismatch {
                        context: "trapezoidal".to_string(),
                        what: format!("expected a <= b <= c <= d, got ({a}, {b}, {c}, {d})"),
                    });
                }
            }
            Self::Gaussian { mean, sigma } => {
                check_finite(&[mean, sigma], "gaussian")?;
                if sigma <= 0.0 {
                    return Err(ControlError::InvalidParameter {
                        param: "sigma",
                        constraint: "must be > 0",
                        value: sigma,
                    });
                }
            }
        }
        Ok(())
    }

    /// Degree of membership of `x`.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Self::Triangular { a, b, c } => {
                if x == b {
                    1.0
                } else if x <= a || x >= c {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (c - x) / (c - b)
                }
            }
            Self::Trapezoidal { a, b, c, d } => {
                if (b..=c).contains(&x) {
                    1.0
                } else if x <= a || x >= d {
                    0.0
                } else if x < b {
                    (x - a) / (b - a)
                } else {
                    (d - x) / (d - c)
                }
            }
            Self::Gaussian { mean, sigma } => {
                let z = (x - mean) / sigma;
                (-0.5 * z * z).exp()
            }
        }
    }

    /// Abscissa of maximum membership (centre of the plateau for trapezoids).
    pub fn peak(&self) -> f64 {
        match *self {
            Self::Triangular { b, .. } => b,
            Self::Trapezoidal { b, c, .. } => 0.5 * (b + c),
            Self::Gaussian { mean, .. } => mean,
        }
    }
}

fn check_finite(values: &[f64], shape: &'static str) -> ControlResult<()> {
    match values.iter().find(|v| !v.is_finite()) {
        Some(&value) => Err(ControlError::InvalidParameter {
            param: shape,
            constraint: "membership parameters must be finite",
            value,
        }),
        None => Ok(()),
    }
}

/// A named linguistic term, e.g. `cold` or `positive_large`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySet {
    pub name: String,
    pub membership: MembershipFunction,
}

impl FuzzySet {
    pub fn new(name: impl Into<String>, membership: MembershipFunction) -> Self {
        Self {
            name: name.into(),
            membership,
        }
    }

    /// Triangular set, validated.
    pub fn triangular(name: impl Into<String>, a: f64, b: f64, c: f64) -> ControlResult<Self> {
        Ok(Self::new(name, MembershipFunction::triangular(a, b, c)?))
    }

    pub fn degree(&self, x: f64) -> f64 {
        self.membership.degree(x)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn ordered_triple() -> impl Strategy<Value = (f64, f64, f64)> {
        (-100.0_f64..100.0, 0.5_f64..50.0, 0.5_f64..50.0)
            .prop_map(|(a, ab, bc)| (a, a + ab, a + ab + bc))
    }

    proptest! {
        #[test]
        fn triangular_degree_in_unit_interval((a, b, c) in ordered_triple(), x in -200.0_f64..200.0) {
            let mf = MembershipFunction::triangular(a, b, c).unwrap();
            let mu = mf.degree(x);
            prop_assert!((0.0..=1.0).contains(&mu));
        }

        #[test]
        fn triangular_monotonic_on_each_side(
            (a, b, c) in ordered_triple(),
            t1 in 0.0_f64..1.0,
            t2 in 0.0_f64..1.0,
        ) {
            let mf = MembershipFunction::triangular(a, b, c).unwrap();
            let (lo, hi) = if t1 <= t2 { (t1, t2) } else { (t2, t1) };
            // Rising edge
            let x1 = a + lo * (b - a);
            let x2 = a + hi * (b - a);
            prop_assert!(mf.degree(x1) <= mf.degree(x2) + 1e-9);
            // Falling edge
            let y1 = b + lo * (c - b);
            let y2 = b + hi * (c - b);
            prop_assert!(mf.degree(y1) + 1e-9 >= mf.degree(y2));
        }

        #[test]
        fn triangular_peak_is_one((a, b, c) in ordered_triple()) {
            let mf = MembershipFunction::triangular(a, b, c).unwrap();
            prop_assert_eq!(mf.degree(b), 1.0);
        }
    }
}
