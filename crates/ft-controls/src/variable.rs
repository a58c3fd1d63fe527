//! Linguistic variables: a crisp domain partitioned into named fuzzy sets.

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::membership::FuzzySet;

/// A linguistic variable such as `temperature = {cold, mild, warm}`.
///
/// Set order is significant: degrees returned by [`fuzzify`](Self::fuzzify)
/// are indexed by position in `sets`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinguisticVariable {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub sets: Vec<FuzzySet>,
}

impl LinguisticVariable {
    /// Create and validate a variable.
    pub fn new(
        name: impl Into<String>,
        min: f64,
        max: f64,
        sets: Vec<FuzzySet>,
    ) -> ControlResult<Self> {
        let var = Self {
            name: name.into(),
            min,
            max,
            sets,
        };
        var.validate()?;
        Ok(var)
    }

    /// Domain must be a finite, non-empty interval; sets must be present,
    /// uniquely named and individually well-formed.
    pub fn validate(&self) -> ControlResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ControlError::InvalidConfig {
                what: format!(
                    "variable '{}' has invalid domain [{}, {}]",
                    self.name, self.min, self.max
                ),
            });
        }
        if self.sets.is_empty() {
            return Err(ControlError::InvalidConfig {
                what: format!("variable '{}' defines no fuzzy sets", self.name),
            });
        }
        for (i, set) in self.sets.iter().enumerate() {
            if self.sets[..i].iter().any(|other| other.name == set.name) {
                return Err(ControlError::InvalidConfig {
                    what: format!("variable '{}' repeats set '{}'", self.name, set.name),
                });
            }
            set.membership
                .validate()
                .map_err(|e| match e {
                    ControlError::DomainMismatch { what, .. } => ControlError::DomainMismatch {
                        context: format!("{}.{}", self.name, set.name),
                        what,
                    },
                    other => other,
                })?;
        }
        Ok(())
    }

    /// Clamp a crisp value into the domain.
    pub fn clamp(&self, x: f64) -> f64 {
        x.clamp(self.min, self.max)
    }

    /// Degree of membership of `x` in every set, in set order.
    ///
    /// `x` is clamped into the domain first. NaN belongs to no set.
    pub fn fuzzify(&self, x: f64) -> Vec<f64> {
        if x.is_nan() {
            return vec![0.0; self.sets.len()];
        }
        let x = self.clamp(x);
        self.sets.iter().map(|set| set.degree(x)).collect()
    }

    /// Position of a set by name.
    pub fn set_index(&self, name: &str) -> Option<usize> {
        self.sets.iter().position(|set| set.name == name)
    }

    /// Like [`set_index`](Self::set_index) but reports unknown names.
    pub fn require_set(&self, name: &str) -> ControlResult<usize> {
        self.set_index(name).ok_or_else(|| ControlError::UnknownSet {
            variable: self.name.clone(),
            set: name.to_string(),
        })
    }

    pub fn set_names(&self) -> impl Iterator<Item = &str> {
        self.sets.iter().map(|set| set.name.as_str())
    }

    /// Midpoint of the domain.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }
}
