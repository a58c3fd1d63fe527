//! Built-in HVAC fuzzy configuration.
//!
//! Five temperature sets over `[10, 35]` °C, five error sets over `[-10, 10]`
//! °C and five power sets over `[0, 100]` %, all triangular, with a complete
//! 5x5 rule table. The plant cools, so a room that is warm or above its
//! setpoint (negative error) asks for more power.

use crate::defuzz::Implication;
use crate::error::ControlResult;
use crate::fuzzy::FuzzySystemConfig;
use crate::membership::FuzzySet;
use crate::rules::FuzzyRule;
use crate::variable::LinguisticVariable;

pub const TEMPERATURE_SETS: [(&str, [f64; 3]); 5] = [
    ("very_cold", [10.0, 10.0, 15.0]),
    ("cold", [12.0, 16.0, 20.0]),
    ("mild", [18.0, 22.0, 26.0]),
    ("warm", [24.0, 28.0, 32.0]),
    ("very_warm", [30.0, 35.0, 35.0]),
];

pub const ERROR_SETS: [(&str, [f64; 3]); 5] = [
    ("negative_large", [-10.0, -10.0, -4.0]),
    ("negative", [-6.0, -3.0, 0.0]),
    ("zero", [-2.0, 0.0, 2.0]),
    ("positive", [0.0, 3.0, 6.0]),
    ("positive_large", [4.0, 10.0, 10.0]),
];

pub const POWER_SETS: [(&str, [f64; 3]); 5] = [
    ("very_low", [0.0, 0.0, 10.0]),
    ("low", [0.0, 10.0, 20.0]),
    ("medium", [10.0, 20.0, 30.0]),
    ("high", [20.0, 45.0, 70.0]),
    ("very_high", [50.0, 100.0, 100.0]),
];

/// Consequent per temperature row, columns in [`ERROR_SETS`] order.
pub const RULE_TABLE: [(&str, [&str; 5]); 5] = [
    ("very_cold", ["medium", "low", "very_low", "very_low", "very_low"]),
    ("cold", ["high", "medium", "low", "very_low", "very_low"]),
    ("mild", ["very_high", "high", "medium", "low", "very_low"]),
    ("warm", ["very_high", "very_high", "high", "medium", "low"]),
    ("very_warm", ["very_high", "very_high", "very_high", "high", "medium"]),
];

fn variable(
    name: &str,
    min: f64,
    max: f64,
    sets: &[(&str, [f64; 3])],
) -> ControlResult<LinguisticVariable> {
    let sets = sets
        .iter()
        .map(|&(set, [a, b, c])| FuzzySet::triangular(set, a, b, c))
        .collect::<ControlResult<Vec<_>>>()?;
    LinguisticVariable::new(name, min, max, sets)
}

/// The 25 rules of [`RULE_TABLE`], row by row.
pub fn hvac_rules() -> Vec<FuzzyRule> {
    RULE_TABLE
        .iter()
        .flat_map(|&(temperature, row)| {
            ERROR_SETS
                .iter()
                .zip(row)
                .map(move |(&(error, _), power)| FuzzyRule::new(temperature, error, power))
        })
        .collect()
}

pub fn hvac_config() -> ControlResult<FuzzySystemConfig> {
    Ok(FuzzySystemConfig {
        temperature: variable("temperature", 10.0, 35.0, &TEMPERATURE_SETS)?,
        error: variable("error", -10.0, 10.0, &ERROR_SETS)?,
        power: variable("power", 0.0, 100.0, &POWER_SETS)?,
        rules: hvac_rules(),
        implication: Implication::Minimum,
        resolution: 0.1,
    })
}
