//! Implication and defuzzification over a discretised output domain.
//!
//! Provides:
//! - **Centroid** (centre of area): `Σ x·μ(x) / Σ μ(x)`
//! - **Bisector**: first `x` where the cumulative area reaches half the total
//! - **Mean of maximum**: mean of every `x` attaining the maximum membership
//! - **Smallest / largest of maximum**: first / last such `x`
//!
//! All methods fall back to the midpoint of the domain when the aggregated
//! membership is identically zero (no rule fired).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ControlError;

/// Two samples count as the same maximum within this distance.
const MAX_TIE_EPS: f64 = 1e-12;

/// Defuzzification strategy, fixed per controller instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Defuzzification {
    #[default]
    Centroid,
    Bisector,
    MeanOfMaximum,
    SmallestOfMaximum,
    LargestOfMaximum,
}

impl Defuzzification {
    /// The three methods compared by the defuzzification experiment.
    pub const COMPARED: [Defuzzification; 3] = [
        Defuzzification::Centroid,
        Defuzzification::Bisector,
        Defuzzification::MeanOfMaximum,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Defuzzification::Centroid => "centroid",
            Defuzzification::Bisector => "bisector",
            Defuzzification::MeanOfMaximum => "mean_of_maximum",
            Defuzzification::SmallestOfMaximum => "smallest_of_maximum",
            Defuzzification::LargestOfMaximum => "largest_of_maximum",
        }
    }

    /// Reduce an aggregated membership sampled on `universe` to a crisp value.
    ///
    /// `universe` and `membership` must have the same length.
    pub fn defuzzify(&self, universe: &[f64], membership: &[f64]) -> f64 {
        let midpoint = match (universe.first(), universe.last()) {
            (Some(lo), Some(hi)) => 0.5 * (lo + hi),
            _ => return 0.0,
        };
        match self {
            Defuzzification::Centroid => centroid(universe, membership),
            Defuzzification::Bisector => bisector(universe, membership),
            Defuzzification::MeanOfMaximum => {
                let xs = maxima(universe, membership);
                if xs.is_empty() {
                    None
                } else {
                    Some(xs.iter().sum::<f64>() / xs.len() as f64)
                }
            }
            Defuzzification::SmallestOfMaximum => maxima(universe, membership).first().copied(),
            Defuzzification::LargestOfMaximum => maxima(universe, membership).last().copied(),
        }
        .unwrap_or(midpoint)
    }
}

impl fmt::Display for Defuzzification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Defuzzification {
    type Err = ControlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "centroid" | "coa" => Ok(Defuzzification::Centroid),
            "bisector" | "boa" => Ok(Defuzzification::Bisector),
            "mean_of_maximum" | "mom" => Ok(Defuzzification::MeanOfMaximum),
            "smallest_of_maximum" | "som" => Ok(Defuzzification::SmallestOfMaximum),
            "largest_of_maximum" | "lom" => Ok(Defuzzification::LargestOfMaximum),
            other => Err(ControlError::InvalidConfig {
                what: format!("unknown defuzzification method '{other}'"),
            }),
        }
    }
}

fn centroid(universe: &[f64], membership: &[f64]) -> Option<f64> {
    let (num, den) = universe
        .iter()
        .zip(membership)
        .fold((0.0, 0.0), |(num, den), (&x, &mu)| (num + x * mu, den + mu));
    if den > 0.0 { Some(num / den) } else { None }
}

fn bisector(universe: &[f64], membership: &[f64]) -> Option<f64> {
    let total: f64 = membership.iter().sum();
    if total <= 0.0 {
        return None;
    }
    let half = 0.5 * total;
    let mut cumulative = 0.0;
    for (&x, &mu) in universe.iter().zip(membership) {
        cumulative += mu;
        if cumulative >= half {
            return Some(x);
        }
    }
    universe.last().copied()
}

/// Every abscissa attaining the maximum membership, in ascending order.
fn maxima(universe: &[f64], membership: &[f64]) -> Vec<f64> {
    let peak = membership.iter().copied().fold(0.0, f64::max);
    if peak <= 0.0 {
        return Vec::new();
    }
    universe
        .iter()
        .zip(membership)
        .filter(|&(_, &mu)| peak - mu <= MAX_TIE_EPS)
        .map(|(&x, _)| x)
        .collect()
}

/// How a rule's firing strength shapes its consequent set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Implication {
    /// Clip the set at the firing strength.
    #[default]
    Minimum,
    /// Scale the set by the firing strength.
    Product,
}

impl Implication {
    pub fn apply(self, membership: f64, strength: f64) -> f64 {
        match self {
            Implication::Minimum => membership.min(strength),
            Implication::Product => membership * strength,
        }
    }
}

/// `n + 1` evenly spaced samples over `[min, max]` with spacing close to
/// `resolution`. Sample `i` is `min + (max - min) * i / n`.
pub fn discretize(min: f64, max: f64, resolution: f64) -> Vec<f64> {
    let span = max - min;
    let n = ((span / resolution).round() as usize).max(1);
    (0..=n)
        .map(|i| min + span * (i as f64 / n as f64))
        .collect()
}
