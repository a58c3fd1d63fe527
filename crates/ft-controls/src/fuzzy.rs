//! Mamdani fuzzy controller.
//!
//! Pipeline per call:
//! 1. fuzzify temperature and error against every set of their variables
//! 2. fire each rule with `min` conjunction, aggregate per consequent with `max`
//! 3. build the aggregated output membership on the discretised power domain
//! 4. defuzzify with the controller's method and clamp to `[0, 100]`
//!
//! [`FuzzySystem`] is immutable after construction and shared behind an
//! `Arc`, so one system can back any number of controllers and concurrent
//! simulation runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::controller::{ControlInput, Controller, ControllerKind, POWER_MAX, POWER_MIN};
use crate::defuzz::{Defuzzification, Implication, discretize};
use crate::error::{ControlError, ControlResult};
use crate::rules::{FuzzyRule, RuleBase};
use crate::variable::LinguisticVariable;

fn default_resolution() -> f64 {
    0.1
}

/// Hand-authored description of a fuzzy system, as stored in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySystemConfig {
    pub temperature: LinguisticVariable,
    pub error: LinguisticVariable,
    pub power: LinguisticVariable,
    pub rules: Vec<FuzzyRule>,
    #[serde(default)]
    pub implication: Implication,
    /// Sample spacing of the output domain used by defuzzification.
    #[serde(default = "default_resolution")]
    pub resolution: f64,
}

impl FuzzySystemConfig {
    pub fn from_yaml_str(content: &str) -> ControlResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml_string(&self) -> ControlResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

/// Validated fuzzy system with resolved rules and precomputed output shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzySystem {
    config: FuzzySystemConfig,
    rule_base: RuleBase,
    universe: Vec<f64>,
    /// `output_shapes[k][i]` is the membership of `universe[i]` in power set `k`.
    output_shapes: Vec<Vec<f64>>,
}

impl FuzzySystem {
    pub fn new(config: FuzzySystemConfig) -> ControlResult<Self> {
        config.temperature.validate()?;
        config.error.validate()?;
        config.power.validate()?;

        let span = config.power.max - config.power.min;
        if !(config.resolution > 0.0 && config.resolution <= span) {
            return Err(ControlError::InvalidParameter {
                param: "resolution",
                constraint: "must be > 0 and no wider than the power domain",
                value: config.resolution,
            });
        }

        let rule_base = RuleBase::build(
            &config.rules,
            &config.temperature,
            &config.error,
            &config.power,
        )?;

        let universe = discretize(config.power.min, config.power.max, config.resolution);
        let output_shapes = config
            .power
            .sets
            .iter()
            .map(|set| universe.iter().map(|&x| set.degree(x)).collect())
            .collect();

        Ok(Self {
            config,
            rule_base,
            universe,
            output_shapes,
        })
    }

    pub fn from_yaml_str(content: &str) -> ControlResult<Self> {
        Self::new(FuzzySystemConfig::from_yaml_str(content)?)
    }

    pub fn config(&self) -> &FuzzySystemConfig {
        &self.config
    }

    pub fn rule_base(&self) -> &RuleBase {
        &self.rule_base
    }

    /// Sample points of the power domain.
    pub fn universe(&self) -> &[f64] {
        &self.universe
    }

    /// Fuzzification and rule evaluation, without defuzzification.
    pub fn infer(&self, temperature: f64, error: f64) -> Inference {
        let temperature_degrees = self.config.temperature.fuzzify(temperature);
        let error_degrees = self.config.error.fuzzify(error);
        let strengths = self.rule_base.evaluate(&temperature_degrees, &error_degrees);
        Inference {
            temperature_degrees,
            error_degrees,
            strengths,
        }
    }

    /// Aggregated output membership on [`universe`](Self::universe).
    pub fn aggregate(&self, strengths: &[f64]) -> Vec<f64> {
        let implication = self.config.implication;
        let mut aggregated = vec![0.0_f64; self.universe.len()];
        for (shape, &strength) in self.output_shapes.iter().zip(strengths) {
            if strength <= 0.0 {
                continue;
            }
            for (slot, &mu) in aggregated.iter_mut().zip(shape) {
                *slot = slot.max(implication.apply(mu, strength));
            }
        }
        aggregated
    }

    /// Crisp output for the given inputs and method, clamped to `[0, 100]`.
    pub fn evaluate(&self, temperature: f64, error: f64, method: Defuzzification) -> f64 {
        let inference = self.infer(temperature, error);
        let aggregated = self.aggregate(&inference.strengths);
        method
            .defuzzify(&self.universe, &aggregated)
            .clamp(POWER_MIN, POWER_MAX)
    }
}

/// Intermediate results of one inference, indexed in set order.
#[derive(Debug, Clone, PartialEq)]
pub struct Inference {
    pub temperature_degrees: Vec<f64>,
    pub error_degrees: Vec<f64>,
    /// Aggregated firing strength per power set.
    pub strengths: Vec<f64>,
}

impl Inference {
    /// True when at least one rule fired.
    pub fn fired(&self) -> bool {
        self.strengths.iter().any(|&s| s > 0.0)
    }
}

/// Stateless fuzzy controller: a shared system plus a defuzzification method.
#[derive(Debug, Clone)]
pub struct FuzzyController {
    system: Arc<FuzzySystem>,
    method: Defuzzification,
}

impl FuzzyController {
    pub fn new(system: Arc<FuzzySystem>, method: Defuzzification) -> Self {
        Self { system, method }
    }

    /// Controller over the built-in HVAC configuration.
    pub fn hvac(method: Defuzzification) -> ControlResult<Self> {
        let system = FuzzySystem::new(crate::hvac::hvac_config()?)?;
        Ok(Self::new(Arc::new(system), method))
    }

    /// Power in `[0, 100]` for the current temperature and error.
    pub fn compute(&self, temperature: f64, error: f64) -> f64 {
        self.system.evaluate(temperature, error, self.method)
    }

    pub fn method(&self) -> Defuzzification {
        self.method
    }

    pub fn system(&self) -> &Arc<FuzzySystem> {
        &self.system
    }

    /// Evaluate the controller on a `resolution x resolution` grid spanning
    /// both input domains.
    pub fn control_surface(&self, resolution: usize) -> ControlResult<ControlSurface> {
        if resolution < 2 {
            return Err(ControlError::InvalidParameter {
                param: "resolution",
                constraint: "surface needs at least 2 points per axis",
                value: resolution as f64,
            });
        }
        let config = self.system.config();
        let axis = |var: &LinguisticVariable| -> Vec<f64> {
            let n = (resolution - 1) as f64;
            (0..resolution)
                .map(|i| var.min + (var.max - var.min) * (i as f64 / n))
                .collect()
        };
        let temperatures = axis(&config.temperature);
        let errors = axis(&config.error);
        let values = errors
            .iter()
            .map(|&e| temperatures.iter().map(|&t| self.compute(t, e)).collect())
            .collect();
        Ok(ControlSurface {
            temperatures,
            errors,
            values,
        })
    }
}

impl Controller for FuzzyController {
    fn kind(&self) -> ControllerKind {
        ControllerKind::Fuzzy(self.method)
    }

    fn control_signal(&mut self, input: &ControlInput) -> ControlResult<f64> {
        Ok(self.compute(input.measurement, input.error()))
    }
}

/// Controller output sampled over the input plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlSurface {
    pub temperatures: Vec<f64>,
    pub errors: Vec<f64>,
    /// `values[i][j]` is the output at `errors[i]`, `temperatures[j]`.
    pub values: Vec<Vec<f64>>,
}
