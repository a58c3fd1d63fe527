//! Mamdani rule base: `IF temperature IS t AND error IS e THEN power IS p`.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ControlError, ControlResult};
use crate::variable::LinguisticVariable;

fn default_weight() -> f64 {
    1.0
}

/// One hand-authored rule, referring to sets by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyRule {
    /// Temperature set of the antecedent.
    pub temperature: String,
    /// Error set of the antecedent.
    pub error: String,
    /// Power set of the consequent.
    pub power: String,
    /// Scales the firing strength, in `(0, 1]`.
    #[serde(default = "default_weight")]
    pub weight: f64,
}

impl FuzzyRule {
    pub fn new(
        temperature: impl Into<String>,
        error: impl Into<String>,
        power: impl Into<String>,
    ) -> Self {
        Self {
            temperature: temperature.into(),
            error: error.into(),
            power: power.into(),
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

impl fmt::Display for FuzzyRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "IF temperature IS {} AND error IS {} THEN power IS {}",
            self.temperature, self.error, self.power
        )?;
        if self.weight != 1.0 {
            write!(f, " (weight {})", self.weight)?;
        }
        Ok(())
    }
}

/// A rule with its set names resolved to indices.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ResolvedRule {
    temperature: usize,
    error: usize,
    power: usize,
    weight: f64,
}

/// Immutable mapping `(temperature set, error set) -> (power set, weight)`.
///
/// Built once from authored rules; evaluation never touches set names.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    rules: Vec<ResolvedRule>,
    lookup: HashMap<(usize, usize), usize>,
    output_sets: usize,
}

impl RuleBase {
    /// Resolve and validate `rules` against the three variables.
    ///
    /// Unknown set names, non-positive weights and repeated antecedents are
    /// rejected.
    pub fn build(
        rules: &[FuzzyRule],
        temperature: &LinguisticVariable,
        error: &LinguisticVariable,
        power: &LinguisticVariable,
    ) -> ControlResult<Self> {
        if rules.is_empty() {
            return Err(ControlError::InvalidConfig {
                what: "rule base is empty".to_string(),
            });
        }

        let mut resolved = Vec::with_capacity(rules.len());
        let mut lookup = HashMap::with_capacity(rules.len());
        for rule in rules {
            if !(rule.weight > 0.0 && rule.weight <= 1.0) {
                return Err(ControlError::InvalidParameter {
                    param: "rule weight",
                    constraint: "must be in (0, 1]",
                    value: rule.weight,
                });
            }
            let r = ResolvedRule {
                temperature: temperature.require_set(&rule.temperature)?,
                error: error.require_set(&rule.error)?,
                power: power.require_set(&rule.power)?,
                weight: rule.weight,
            };
            if lookup.insert((r.temperature, r.error), resolved.len()).is_some() {
                return Err(ControlError::InvalidConfig {
                    what: format!(
                        "duplicate rule for temperature '{}' and error '{}'",
                        rule.temperature, rule.error
                    ),
                });
            }
            resolved.push(r);
        }

        Ok(Self {
            rules: resolved,
            lookup,
            output_sets: power.sets.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Consequent set index and weight for an antecedent pair.
    pub fn consequent(&self, temperature: usize, error: usize) -> Option<(usize, f64)> {
        self.lookup.get(&(temperature, error)).map(|&i| {
            let rule = &self.rules[i];
            (rule.power, rule.weight)
        })
    }

    /// Firing strength per output set.
    ///
    /// Each rule fires with `min(temperature degree, error degree) * weight`;
    /// rules sharing a consequent are combined with `max`.
    pub fn evaluate(&self, temperature_degrees: &[f64], error_degrees: &[f64]) -> Vec<f64> {
        let mut strengths = vec![0.0_f64; self.output_sets];
        for rule in &self.rules {
            let mu_t = temperature_degrees.get(rule.temperature).copied().unwrap_or(0.0);
            let mu_e = error_degrees.get(rule.error).copied().unwrap_or(0.0);
            let firing = mu_t.min(mu_e) * rule.weight;
            if firing <= 0.0 {
                continue;
            }
            let slot = &mut strengths[rule.power];
            *slot = slot.max(firing);
        }
        strengths
    }
}
